//! Session settings persistence
//!
//! Saves and loads [`SessionSettings`] to/from a JSON file.
//!
//! # File Location
//!
//! `settings.json` in the user's configuration directory, e.g.
//! `~/.config/netchess/settings.json` on Linux. Falls back to the working
//! directory if the system config dir cannot be found.
//!
//! # Error Handling
//!
//! [`SessionSettings::load_or_default`] never fails: a missing or invalid file
//! is logged and defaults are used. Explicit `load_from` / `save_to` report
//! errors to the caller.

use super::error::CoreResult;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Settings filename
const SETTINGS_FILENAME: &str = "settings.json";

/// Settings for connecting to a relay and running a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// `host:port` of the relay
    pub relay_addr: String,
    pub player_name: String,
    /// `tracing` filter directive, overridden by `RUST_LOG`
    pub log_filter: String,
    /// Room to join; `None` creates a new room
    pub room_code: Option<String>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            relay_addr: "127.0.0.1:5000".to_string(),
            player_name: "Player".to_string(),
            log_filter: "info".to_string(),
            room_code: None,
        }
    }
}

impl SessionSettings {
    /// Path of `settings.json` in the user's configuration directory
    pub fn default_path() -> PathBuf {
        match ProjectDirs::from("com", "netchess", "NetChess") {
            Some(proj_dirs) => proj_dirs.config_dir().join(SETTINGS_FILENAME),
            None => PathBuf::from(SETTINGS_FILENAME),
        }
    }

    /// Load from the default path, falling back to defaults on any problem
    pub fn load_or_default() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            info!("[SETTINGS] No settings file found at {:?}. Using defaults.", path);
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => {
                info!("[SETTINGS] Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("[SETTINGS] Failed to load {:?}: {}. Using defaults.", path, e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> CoreResult<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Write pretty JSON, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("[SETTINGS] Saved settings to {:?}", path);
        Ok(())
    }

    /// Save to the default path and return it
    pub fn save(&self) -> CoreResult<PathBuf> {
        let path = Self::default_path();
        self.save_to(&path)?;
        Ok(path)
    }
}
