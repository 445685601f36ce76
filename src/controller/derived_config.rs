//! Behavior-affecting settings captured from [`Config`].

use crate::config::{Config, QuickTerminalScreen, SpaceBehavior};
use std::time::Duration;

/// Immutable snapshot of the settings the controller reads while running.
///
/// Replaced as a whole on configuration change, never patched field by
/// field, so an animation in flight always sees one consistent snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedConfig {
    pub screen: QuickTerminalScreen,
    pub animation_duration: Duration,
    pub autohide: bool,
    pub space_behavior: SpaceBehavior,
    pub background_opacity: f64,
    /// Share of the screen used when the window is first loaded
    pub size_fraction: f64,
}

impl DerivedConfig {
    pub fn new(config: &Config) -> Self {
        let animation_duration =
            Duration::try_from_secs_f64(config.quick_terminal_animation_duration)
                .unwrap_or_else(|_| {
                    log::warn!(
                        "Invalid quick_terminal_animation_duration {}, using default",
                        config.quick_terminal_animation_duration
                    );
                    default_animation_duration()
                });

        Self {
            screen: config.quick_terminal_screen,
            animation_duration,
            autohide: config.quick_terminal_autohide,
            space_behavior: config.quick_terminal_space_behavior,
            background_opacity: config.background_opacity.clamp(0.0, 1.0),
            size_fraction: config.quick_terminal_size,
        }
    }

    /// The window needs a translucent, blurred background
    pub fn is_translucent(&self) -> bool {
        self.background_opacity < 1.0
    }
}

fn default_animation_duration() -> Duration {
    Duration::from_secs_f64(crate::config::defaults::animation_duration())
}

impl Default for DerivedConfig {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl From<&Config> for DerivedConfig {
    fn from(config: &Config) -> Self {
        Self::new(config)
    }
}
