//! Demo configuration loaded from TOML

use serde::{Deserialize, Serialize};

/// Tracer demo configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerConfig {
    /// Output image width in pixels
    pub width: u32,
    /// Output image height in pixels
    pub height: u32,
    /// Path for the rendered PNG
    pub output: String,
    /// Camera settings
    pub camera: CameraConfig,
}

/// Camera section of the demo configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye position
    pub position: [f32; 3],
    /// Look-at target
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            output: "tracer_demo.png".to_string(),
            camera: CameraConfig::default(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [4.0, 3.0, 10.0],
            target: [0.0, 0.5, 0.0],
            fov_degrees: 45.0,
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}

impl TracerConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let config = TracerConfig::default();
        let text = toml::to_string(&config).unwrap();
        let back: TracerConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.width, config.width);
        assert_eq!(back.camera.position, config.camera.position);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: TracerConfig = toml::from_str("width = 320\nheight = 240\n").unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.output, "tracer_demo.png");
    }
}
