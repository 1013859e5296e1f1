//! Subsystem configuration
//!
//! Small TOML-backed configuration: device selection, output buffer sizing
//! and the two fixed pool capacities. Missing fields fall back to built-in
//! defaults so an empty file (or no file at all) is a valid configuration.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

fn default_max_samples() -> usize {
    128
}

fn default_max_instances() -> usize {
    32
}

/// Audio subsystem configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// Output device name (None = system default device)
    #[serde(default)]
    pub device: Option<String>,

    /// Output buffer size in frames (None = device default)
    #[serde(default)]
    pub buffer_size: Option<u32>,

    /// Capacity of the decoded sample store
    #[serde(default = "default_max_samples")]
    pub max_samples: usize,

    /// Capacity of the sound instance pool
    #[serde(default = "default_max_instances")]
    pub max_instances: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            buffer_size: None,
            max_samples: default_max_samples(),
            max_instances: default_max_instances(),
        }
    }
}

impl AudioConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::Config(format!("failed to parse config: {}", e)))
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }
}
