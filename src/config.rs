//! Player configuration
//!
//! Configuration is read from the JSON blob the embedding page passes to the
//! player. Every field has a default, so `{}` is a valid configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::provider::ProviderKind;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerConfig {
    pub id: String,
    pub autostart: bool,
    pub default_playback_rate: f64,
    /// Volume percentage (0-100).
    pub volume: u8,
    pub mute: bool,
    /// Provider kinds in the order they are tried. Kinds left out are never used.
    pub provider_order: Vec<ProviderKind>,
    /// The native media element can play HLS by itself.
    pub native_hls: bool,
    pub logging: LoggingConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            id: "player".to_string(),
            autostart: false,
            default_playback_rate: 1.0,
            volume: 90,
            mute: false,
            provider_order: ProviderKind::ALL.to_vec(),
            native_hls: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl PlayerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid player configuration")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read player configuration {}", path.display()))?;
        Self::from_json_str(&raw)
    }
}

/// Where and how much the player logs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggingConfig {
    pub dir: PathBuf,
    pub file_prefix: String,
    /// `EnvFilter` directives used when `RUST_LOG` is not set.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".logs"),
            file_prefix: "playback-core".to_string(),
            filter: "playback_core=debug,warn".to_string(),
        }
    }
}
