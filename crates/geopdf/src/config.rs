//! Configuration for the GeoPDF service.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default upscaling factor for fallback page rasterization.
pub const DEFAULT_FALLBACK_SCALE: f32 = 4.0;

/// Default number of bytes read by the metadata byte scan.
pub const DEFAULT_SCAN_LIMIT_BYTES: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for the GeoPDF service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Upscaling factor applied when rasterizing the first page in the fallback path.
    pub fallback_scale: f32,

    /// Maximum bytes read from the head of a file by the byte-pattern scan.
    pub scan_limit_bytes: usize,

    /// Capacity of the request queue in front of the worker.
    pub queue_depth: usize,

    /// Directory holding the PDFium shared library. System search path when unset.
    pub pdfium_library_path: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            fallback_scale: DEFAULT_FALLBACK_SCALE,
            scan_limit_bytes: DEFAULT_SCAN_LIMIT_BYTES,
            queue_depth: 32,
            pdfium_library_path: None,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GEOPDF_FALLBACK_SCALE") {
            if let Ok(scale) = val.parse() {
                config.fallback_scale = scale;
            }
        }

        if let Ok(val) = std::env::var("GEOPDF_SCAN_LIMIT_BYTES") {
            if let Ok(limit) = val.parse() {
                config.scan_limit_bytes = limit;
            }
        }

        if let Ok(val) = std::env::var("GEOPDF_QUEUE_DEPTH") {
            if let Ok(depth) = val.parse() {
                config.queue_depth = depth;
            }
        }

        if let Ok(val) = std::env::var("PDFIUM_LIBRARY_PATH") {
            if !val.is_empty() {
                config.pdfium_library_path = Some(PathBuf::from(val));
            }
        }

        config
    }

    /// Load configuration from a YAML file. Missing keys take their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fallback_scale.is_finite() && self.fallback_scale > 0.0) {
            return Err(ConfigError::Invalid(
                "fallback_scale must be a positive number".to_string(),
            ));
        }

        if self.scan_limit_bytes == 0 {
            return Err(ConfigError::Invalid("scan_limit_bytes must be > 0".to_string()));
        }

        if self.queue_depth == 0 {
            return Err(ConfigError::Invalid("queue_depth must be > 0".to_string()));
        }

        Ok(())
    }
}
