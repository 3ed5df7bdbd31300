//! Glide configuration system
//!
//! This crate provides centralized configuration for the glide tweening
//! engine, loading transition defaults and ticker settings from `glide.toml`
//! with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default transition duration in milliseconds.
pub const DEFAULT_DURATION_MS: f64 = 280.0;

/// Default easing curve name.
pub const DEFAULT_EASING: &str = "easeOutQuart";

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "glide.toml";

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`GlideConfig`].
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure for glide
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GlideConfig {
    /// Defaults applied to newly created transitions
    pub transition: TransitionConfig,
    /// Frame scheduler settings
    pub ticker: TickerConfig,
    /// Demo binary settings
    pub demo: DemoConfig,
}

/// Transition defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransitionConfig {
    /// Duration of a transition in milliseconds
    pub duration_ms: f64,
    /// Easing curve name (e.g. "linear", "easeOutQuart")
    pub easing: String,
}

/// Frame scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TickerConfig {
    /// Frames per second used when driving the scheduler in real time
    pub frame_rate: f64,
    /// Upper bound on frames run by `run_until_idle`
    pub max_frames: usize,
}

/// Demo configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Scalar start value
    pub from: f64,
    /// Scalar target value
    pub to: f64,
    /// Color start value
    pub from_color: String,
    /// Color target value
    pub to_color: String,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            easing: DEFAULT_EASING.to_string(),
        }
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            max_frames: 600,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            from: 0.0,
            to: 100.0,
            from_color: "#000000".to_string(),
            to_color: "#ffffff".to_string(),
        }
    }
}

impl TickerConfig {
    /// Interval between frames in milliseconds.
    ///
    /// Non-positive frame rates fall back to 60fps.
    pub fn frame_interval_ms(&self) -> f64 {
        if self.frame_rate > 0.0 {
            1000.0 / self.frame_rate
        } else {
            1000.0 / 60.0
        }
    }
}

impl GlideConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the glide.toml configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from the default location (glide.toml in the current directory)
    /// or return default configuration if file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file(CONFIG_FILE).unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Values that fail to parse are ignored.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("GLIDE_DURATION_MS") {
            if let Ok(duration) = val.parse::<f64>() {
                self.transition.duration_ms = duration;
            }
        }
        if let Ok(easing) = std::env::var("GLIDE_EASING") {
            self.transition.easing = easing;
        }

        if let Ok(val) = std::env::var("GLIDE_FRAME_RATE") {
            if let Ok(rate) = val.parse::<f64>() {
                self.ticker.frame_rate = rate;
            }
        }
        if let Ok(val) = std::env::var("GLIDE_MAX_FRAMES") {
            if let Ok(frames) = val.parse::<usize>() {
                self.ticker.max_frames = frames;
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from glide.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
