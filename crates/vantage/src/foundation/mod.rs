//! Foundation utilities shared by every other module.

pub mod math;
