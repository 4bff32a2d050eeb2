// File: src/config.rs
// Purpose: TOML configuration for drafts, autosave, toasts and booking

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "medforms.toml";

/// Top-level configuration. Every section and field is optional; a
/// missing file or an empty one yields the defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MedformsConfig {
    #[serde(default)]
    pub autosave: AutosaveConfig,
    #[serde(default)]
    pub toast: ToastConfig,
    #[serde(default)]
    pub draft: DraftConfig,
    #[serde(default)]
    pub booking: BookingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AutosaveConfig {
    #[serde(default = "default_autosave_interval_secs")]
    pub interval_secs: u64,
}

impl AutosaveConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_autosave_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ToastConfig {
    #[serde(default = "default_toast_visible_ms")]
    pub visible_ms: u64,
    #[serde(default = "default_toast_fade_ms")]
    pub fade_ms: u64,
}

impl ToastConfig {
    /// Visible duration plus the dismissal fade.
    pub fn total_duration(&self) -> Duration {
        Duration::from_millis(self.visible_ms + self.fade_ms)
    }
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            visible_ms: default_toast_visible_ms(),
            fade_ms: default_toast_fade_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DraftConfig {
    #[serde(default = "default_draft_dir")]
    pub dir: String,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            dir: default_draft_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BookingConfig {
    #[serde(default = "default_booking_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_listing_path")]
    pub listing_path: String,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_booking_endpoint(),
            listing_path: default_listing_path(),
        }
    }
}

fn default_autosave_interval_secs() -> u64 {
    30
}

fn default_toast_visible_ms() -> u64 {
    3000
}

fn default_toast_fade_ms() -> u64 {
    300
}

fn default_draft_dir() -> String {
    ".medforms/drafts".to_string()
}

fn default_booking_endpoint() -> String {
    "/appointments/api/".to_string()
}

fn default_listing_path() -> String {
    "/appointments/".to_string()
}

impl MedformsConfig {
    /// Load from a TOML file; a missing file is the default config, a
    /// malformed one is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn load_default() -> Result<Self> {
        Self::load(DEFAULT_CONFIG_FILE)
    }
}
