//! config.rs
//! Encode session configuration.
//!
//! Loaded from JSON (all fields optional) or built in code, then validated
//! once before any frame is produced.

use std::path::Path;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_FPS, DEFAULT_HEIGHT, DEFAULT_MIN_DURATION_SECS, DEFAULT_WIDTH};
use crate::frames::FrameGeometry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarrierConfig {
    pub width: u32,
    pub height: u32,
    /// Frames per second of the output video.
    pub fps: f64,
    /// Minimum output duration. More frames are added if the payload needs them.
    pub min_duration_secs: f64,
    /// Noise seed. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for CarrierConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fps: DEFAULT_FPS,
            min_duration_secs: DEFAULT_MIN_DURATION_SECS,
            seed: None,
        }
    }
}

impl CarrierConfig {
    pub fn new(width: u32, height: u32, fps: f64, min_duration_secs: f64) -> Self {
        Self { width, height, fps, min_duration_secs, seed: None }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.geometry()?;

        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(ConfigError::InvalidFrameRate { fps: self.fps });
        }
        if !self.min_duration_secs.is_finite() || self.min_duration_secs < 0.0 {
            return Err(ConfigError::InvalidDuration { secs: self.min_duration_secs });
        }
        Ok(())
    }

    pub fn geometry(&self) -> Result<FrameGeometry, ConfigError> {
        FrameGeometry::new(self.width, self.height)
            .map_err(|_| ConfigError::InvalidGeometry { width: self.width, height: self.height })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid frame size {width}x{height}")]
    InvalidGeometry { width: u32, height: u32 },

    #[error("invalid frame rate {fps}: must be finite and > 0")]
    InvalidFrameRate { fps: f64 },

    #[error("invalid minimum duration {secs}s: must be finite and >= 0")]
    InvalidDuration { secs: f64 },

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
}
