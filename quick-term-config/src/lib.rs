//! Configuration system for the quick-term drop-down terminal.
//!
//! This crate provides configuration loading, saving, and default values
//! for the quick terminal overlay. It includes:
//!
//! - Anchor position, screen selection and space behavior types
//! - Default values for every setting
//! - YAML persistence and validation
//! - Configuration file watching

pub mod config;
pub mod defaults;
pub mod error;
mod types;
#[cfg(feature = "watcher")]
pub mod watcher;

pub use config::Config;
pub use error::ConfigError;
pub use types::{QuickTerminalPosition, QuickTerminalScreen, SpaceBehavior};
#[cfg(feature = "watcher")]
pub use watcher::{ConfigReloadEvent, ConfigWatcher};
