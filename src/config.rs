//! Dashboard Configuration Module
//! Built-in defaults, optionally overridden by a JSON file in the working directory.

use crate::data::ImputationScope;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Optional configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "vehicle_dashboard.json";

/// Dataset read when no configuration overrides it.
pub const DEFAULT_DATA_PATH: &str = "vehicles_us.csv";

/// Half-width of the uniform jitter applied to model years.
pub const DEFAULT_JITTER_RADIUS: f64 = 0.3;

/// Label written into missing `paint_color` cells.
pub const DEFAULT_UNKNOWN_COLOR: &str = "Unknown";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("jitter_radius must be finite and non-negative, got {0}")]
    InvalidJitter(f64),
    #[error("unknown_paint_color must not be empty")]
    EmptyUnknownColor,
}

/// Settings for the whole dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub jitter_radius: f64,
    pub unknown_paint_color: String,
    pub imputation_scope: ImputationScope,
    pub show_scatter: bool,
    pub show_bar: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            jitter_radius: DEFAULT_JITTER_RADIUS,
            unknown_paint_color: DEFAULT_UNKNOWN_COLOR.to_string(),
            imputation_scope: ImputationScope::default(),
            show_scatter: true,
            show_bar: true,
        }
    }
}

impl DashboardConfig {
    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No {} found, using default configuration", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.jitter_radius.is_finite() || self.jitter_radius < 0.0 {
            return Err(ConfigError::InvalidJitter(self.jitter_radius));
        }
        if self.unknown_paint_color.is_empty() {
            return Err(ConfigError::EmptyUnknownColor);
        }
        Ok(())
    }
}
