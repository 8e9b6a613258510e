//! Sequencer configuration: tick cadence and rest frame.
//!
//! Hosts can construct a config in code, or load one from a JSON file
//! (`--config` in the demo binary). Loaded values are validated before
//! use so a bad file fails fast instead of producing a sequencer that
//! never advances or rests on a frame that does not exist.

use std::fs;
use std::path::Path;
use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};

use crate::core::sequencer::FRAME_COUNT;

/// Nominal tick cadence, ticks per second
pub const DEFAULT_FPS: f32 = 60.0;

fn default_fps() -> f32 {
    DEFAULT_FPS
}

/// Runtime settings for a sequencer instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SequencerConfig {
    /// Tick rate driving frame advancement
    #[serde(default = "default_fps")]
    pub fps: f32,
    /// Frame shown while idle and after a run settles
    #[serde(default)]
    pub rest_frame: usize,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            rest_frame: 0,
        }
    }
}

impl SequencerConfig {
    /// Interval between ticks derived from fps.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.fps)
    }

    /// Check ranges: fps must be finite and positive, rest frame must
    /// index an existing frame.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(ConfigError::InvalidFps(self.fps));
        }
        if self.rest_frame >= FRAME_COUNT {
            return Err(ConfigError::RestFrameOutOfRange(self.rest_frame));
        }
        Ok(())
    }

    /// Load and validate config from a JSON file.
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e))?;

        let config: SequencerConfig = serde_json::from_str(&json)
            .map_err(|e| ConfigError::Parse(path.display().to_string(), e))?;

        config.validate()?;
        info!(
            "Loaded config from {}: fps={}, rest_frame={}",
            path.display(),
            config.fps,
            config.rest_frame
        );
        Ok(config)
    }
}

/// Config loading and validation errors
#[derive(Debug)]
pub enum ConfigError {
    Io(String, std::io::Error),
    Parse(String, serde_json::Error),
    InvalidFps(f32),
    RestFrameOutOfRange(usize),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Read config error ({}): {}", path, e),
            ConfigError::Parse(path, e) => write!(f, "Parse config error ({}): {}", path, e),
            ConfigError::InvalidFps(fps) => {
                write!(f, "Invalid fps {}: must be finite and positive", fps)
            }
            ConfigError::RestFrameOutOfRange(frame) => {
                write!(
                    f,
                    "Rest frame {} out of range: must be below {}",
                    frame, FRAME_COUNT
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SequencerConfig::default();
        assert_eq!(config.fps, DEFAULT_FPS);
        assert_eq!(config.rest_frame, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_frame_duration() {
        let config = SequencerConfig {
            fps: 60.0,
            rest_frame: 0,
        };
        let d = config.frame_duration();
        // 1/60s within float tolerance
        assert!((d.as_secs_f32() - 1.0 / 60.0).abs() < 1e-6);

        // 1/8 is exactly representable, so this one is exact
        let slow = SequencerConfig {
            fps: 8.0,
            rest_frame: 0,
        };
        assert_eq!(slow.frame_duration(), Duration::from_millis(125));
    }

    #[test]
    fn test_validate_rejects_bad_fps() {
        for fps in [0.0, -24.0, f32::NAN, f32::INFINITY] {
            let config = SequencerConfig {
                fps,
                rest_frame: 0,
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidFps(_))
            ));
        }
    }

    #[test]
    fn test_validate_rejects_rest_frame_out_of_range() {
        let config = SequencerConfig {
            fps: 60.0,
            rest_frame: FRAME_COUNT,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RestFrameOutOfRange(_))
        ));
    }

    #[test]
    fn test_from_json_partial_file_uses_defaults() {
        let dir = std::env::temp_dir();
        let path = dir.join("flipbook_test_config_partial.json");
        std::fs::write(&path, r#"{ "fps": 30.0 }"#).unwrap();

        let config = SequencerConfig::from_json(&path).unwrap();
        assert_eq!(config.fps, 30.0);
        assert_eq!(config.rest_frame, 0);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_from_json_rejects_invalid_values() {
        let dir = std::env::temp_dir();
        let path = dir.join("flipbook_test_config_invalid.json");
        std::fs::write(&path, r#"{ "fps": -1.0 }"#).unwrap();

        assert!(matches!(
            SequencerConfig::from_json(&path),
            Err(ConfigError::InvalidFps(_))
        ));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_from_json_missing_file() {
        let result = SequencerConfig::from_json("definitely/not/here.json");
        assert!(matches!(result, Err(ConfigError::Io(_, _))));
    }
}
