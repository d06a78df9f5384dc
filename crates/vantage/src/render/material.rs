//! Material and blend state carried per mesh.
//!
//! The engine itself never shades; these values ride through the
//! snapshot protocol so backends and offline consumers can. Defaults
//! describe a plain white dielectric surface.

/// How a mesh blends over what's already in the framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Fully opaque, depth-tested
    #[default]
    Opaque,
    /// Classic alpha blending using material/vertex alpha and mesh opacity
    Alpha,
    /// Additive blending
    Additive,
}

/// Surface shading inputs, interpreted by whichever backend draws the mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Base color (RGB)
    pub base_color: [f32; 3],

    /// Metallic factor, 0 dielectric to 1 metal
    pub metallic: f32,

    /// Roughness factor, 0 mirror to 1 fully diffuse
    pub roughness: f32,

    /// Material alpha, 0 transparent to 1 opaque (combined with mesh opacity)
    pub alpha: f32,
}

impl Material {
    /// Plain white dielectric
    pub fn new() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0],
            metallic: 0.0,
            roughness: 0.5,
            alpha: 1.0,
        }
    }

    /// Set the base color
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.base_color = [r, g, b];
        self
    }

    /// Set the metallic factor, clamped to `[0, 1]`
    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic.clamp(0.0, 1.0);
        self
    }

    /// Set the roughness factor, clamped to `[0, 1]`
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Set the material alpha, clamped to `[0, 1]`
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_clamps_factors() {
        let material = Material::new()
            .with_color(0.2, 0.3, 0.4)
            .with_metallic(2.0)
            .with_alpha(-0.5);
        assert_eq!(material.base_color, [0.2, 0.3, 0.4]);
        assert_eq!(material.metallic, 1.0);
        assert_eq!(material.alpha, 0.0);
    }

    #[test]
    fn blend_mode_defaults_to_opaque() {
        assert_eq!(BlendMode::default(), BlendMode::Opaque);
        assert_eq!(Material::default(), Material::new());
    }
}
