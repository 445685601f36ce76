//! The `Config` struct plus YAML persistence and validation.
//!
//! Covers:
//! - `load` / `save` against `~/.config/quick-term/config.yaml`
//! - `load_from_path` / `save_to_path` (atomic write via temp file + rename)
//! - `validate`, applied on every load

use crate::error::ConfigError;
use crate::types::{QuickTerminalPosition, QuickTerminalScreen, SpaceBehavior};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Quick terminal configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Edge the quick terminal slides from (top, bottom, left, right, center).
    /// Read once when the quick terminal is created.
    #[serde(default)]
    pub quick_terminal_position: QuickTerminalPosition,

    /// Screen the quick terminal appears on (main, mouse, menu_bar)
    #[serde(default)]
    pub quick_terminal_screen: QuickTerminalScreen,

    /// Duration of the slide in/out animation in seconds (0 disables animation)
    #[serde(default = "crate::defaults::animation_duration")]
    pub quick_terminal_animation_duration: f64,

    /// Hide the quick terminal when it loses focus
    #[serde(default = "crate::defaults::bool_true")]
    pub quick_terminal_autohide: bool,

    /// Behavior when the active Space (virtual desktop) changes
    /// - move: follow the user to the new Space (default)
    /// - remain: stay on the original Space
    #[serde(default)]
    pub quick_terminal_space_behavior: SpaceBehavior,

    /// Initial size as a fraction of the screen along the anchor axis
    /// (height for top/bottom, width for left/right; center uses twice the
    /// fraction on both axes)
    #[serde(default = "crate::defaults::size_fraction")]
    pub quick_terminal_size: f64,

    /// Background opacity (0.0 = fully transparent, 1.0 = fully opaque)
    #[serde(default = "crate::defaults::background_opacity")]
    pub background_opacity: f64,

    /// Debounce delay for config hot reload, in milliseconds
    #[serde(default = "crate::defaults::config_watch_debounce_ms")]
    pub config_watch_debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quick_terminal_position: QuickTerminalPosition::default(),
            quick_terminal_screen: QuickTerminalScreen::default(),
            quick_terminal_animation_duration: crate::defaults::animation_duration(),
            quick_terminal_autohide: crate::defaults::bool_true(),
            quick_terminal_space_behavior: SpaceBehavior::default(),
            quick_terminal_size: crate::defaults::size_fraction(),
            background_opacity: crate::defaults::background_opacity(),
            config_watch_debounce_ms: crate::defaults::config_watch_debounce_ms(),
        }
    }
}

impl Config {
    /// Load configuration from the default path, creating it if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            log::info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            if let Err(e) = config.save() {
                log::error!("Failed to save default config: {}", e);
                return Err(e);
            }
            Ok(config)
        }
    }

    /// Load and validate configuration from a specific file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        log::info!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path).map_err(ConfigError::from)?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let mut config: Config = serde_yaml_ng::from_str(contents).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::from)?;
        }

        let yaml = serde_yaml_ng::to_string(self).map_err(ConfigError::from)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml).map_err(ConfigError::from)?;
        fs::rename(&temp_path, path).map_err(ConfigError::from)?;

        Ok(())
    }

    /// Check field ranges.
    ///
    /// Opacity outside `[0, 1]` is clamped with a warning; a negative or
    /// non-finite animation duration and a size fraction outside `(0, 1]` are
    /// rejected.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        let duration = self.quick_terminal_animation_duration;
        if !duration.is_finite() || duration < 0.0 {
            return Err(ConfigError::Validation(format!(
                "quick_terminal_animation_duration must be a non-negative number of seconds, got {duration}"
            )));
        }

        let size = self.quick_terminal_size;
        if !size.is_finite() || size <= 0.0 || size > 1.0 {
            return Err(ConfigError::Validation(format!(
                "quick_terminal_size must be in (0, 1], got {size}"
            )));
        }

        if !self.background_opacity.is_finite() {
            return Err(ConfigError::Validation(
                "background_opacity must be a number".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.background_opacity) {
            let clamped = self.background_opacity.clamp(0.0, 1.0);
            log::warn!(
                "background_opacity {} out of range, clamping to {}",
                self.background_opacity,
                clamped
            );
            self.background_opacity = clamped;
        }

        Ok(())
    }

    /// Get the configuration file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Get the configuration directory path (using XDG convention)
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("quick-term")
            } else {
                PathBuf::from(".")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("quick-term")
            } else {
                PathBuf::from(".")
            }
        }
    }
}
