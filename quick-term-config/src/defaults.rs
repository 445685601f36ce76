//! Default values for quick terminal settings.

pub fn bool_true() -> bool {
    true
}

pub fn animation_duration() -> f64 {
    0.2 // Seconds for the slide in/out animation
}

pub fn size_fraction() -> f64 {
    0.25 // Quarter of the screen along the anchor axis
}

pub fn background_opacity() -> f64 {
    1.0 // Fully opaque by default
}

pub fn config_watch_debounce_ms() -> u64 {
    100
}
