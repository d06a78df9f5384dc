//! Light sources attached to a scene.

use crate::foundation::math::Vec3;

/// Light categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// Directional light (like sunlight)
    Directional,
    /// Point light (like a lightbulb)
    Point,
}

/// Light source
#[derive(Debug, Clone)]
pub struct Light {
    /// Light category
    pub kind: LightKind,
    /// Position (point lights)
    pub position: Vec3,
    /// Direction (directional lights, normalized)
    pub direction: Vec3,
    /// Light color
    pub color: Vec3,
    /// Light intensity
    pub intensity: f32,
    /// Falloff range (point lights)
    pub range: f32,
}

impl Light {
    /// Create a directional light
    pub fn directional(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional,
            position: Vec3::zeros(),
            direction: direction.normalize(),
            color,
            intensity,
            range: 0.0,
        }
    }

    /// Create a point light
    pub fn point(position: Vec3, color: Vec3, intensity: f32, range: f32) -> Self {
        Self {
            kind: LightKind::Point,
            position,
            direction: Vec3::zeros(),
            color,
            intensity,
            range,
        }
    }
}
