//! Cross-module integration tests
//!
//! Scenarios that exercise the full query surface together: projection
//! round trips, hierarchy edits observed through raycasts, culling
//! against raycast visibility, and snapshot-sourced geometry.

mod viewport_queries;
