//! Run configuration loaded from `pipetron.toml`.
//!
//! The [`RunConfig`] struct holds every configurable parameter. Values
//! absent from the file fall back to sensible defaults. The
//! `PIPETRON_ROBOT_ADDR` environment variable takes precedence over the
//! file for the robot address, and CLI flags take precedence over both.
//! The sample count is only validated when the run starts, so an invalid
//! file still fails before any physical action — not here.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration loaded from `pipetron.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Number of samples in the run. Validated against the rack capacity
    /// (1–12) before any command is issued.
    #[serde(default = "default_sample_count")]
    pub sample_count: u32,

    /// Base address of the robot-control HTTP endpoint.
    #[serde(default = "default_robot_addr")]
    pub robot_addr: String,

    /// Protocol variant to run: "standard" or "temperature".
    #[serde(default = "default_protocol")]
    pub protocol: String,
}

// Default sample count: 2.
fn default_sample_count() -> u32 {
    2
}

// Default robot endpoint: the robot runtime's usual port on localhost.
fn default_robot_addr() -> String {
    "http://localhost:31950".to_string()
}

// Default protocol variant: "standard".
fn default_protocol() -> String {
    "standard".to_string()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            sample_count: default_sample_count(),
            robot_addr: default_robot_addr(),
            protocol: default_protocol(),
        }
    }
}

impl RunConfig {
    /// Loads the configuration from the given path, or `pipetron.toml`
    /// in the current directory. Uses defaults if the file is absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new("pipetron.toml"));
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<RunConfig>(&contents)?
        } else {
            Self::default()
        };

        // Environment variable takes precedence over the file for the
        // robot address.
        if let Ok(addr) = std::env::var("PIPETRON_ROBOT_ADDR")
            && !addr.is_empty()
        {
            config.robot_addr = addr;
        }

        Ok(config)
    }
}
