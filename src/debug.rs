//! Debug logging for quick-term.
//!
//! Controlled by the `DEBUG_LEVEL` environment variable:
//! - 0 or unset: No debugging
//! - 1: Errors only
//! - 2: Info level (visibility transitions, tab changes)
//! - 3: Debug level (timers, retries, dock state)
//! - 4: Trace level (every deferred callback)
//!
//! Output goes to `/tmp/quick_term_debug.log` on Unix/macOS, or
//! `%TEMP%\quick_term_debug.log` on Windows, so it never interleaves with the
//! terminal content hosted in the overlay. When `RUST_LOG` is set, records
//! are mirrored to stderr as well.

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Debug level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl DebugLevel {
    /// Parse a `DEBUG_LEVEL` value; anything unrecognised is `Off`
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<u8>() {
            Ok(1) => DebugLevel::Error,
            Ok(2) => DebugLevel::Info,
            Ok(3) => DebugLevel::Debug,
            Ok(4) => DebugLevel::Trace,
            _ => DebugLevel::Off,
        }
    }

    fn from_env() -> Self {
        std::env::var("DEBUG_LEVEL")
            .map(|v| Self::parse(&v))
            .unwrap_or(DebugLevel::Off)
    }

    /// Equivalent `log` filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            DebugLevel::Off => log::LevelFilter::Off,
            DebugLevel::Error => log::LevelFilter::Error,
            DebugLevel::Info => log::LevelFilter::Info,
            DebugLevel::Debug => log::LevelFilter::Debug,
            DebugLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Location of the debug log file
pub fn log_path() -> PathBuf {
    #[cfg(unix)]
    {
        PathBuf::from("/tmp/quick_term_debug.log")
    }
    #[cfg(not(unix))]
    {
        std::env::temp_dir().join("quick_term_debug.log")
    }
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// File-backed `log::Log` implementation
struct DebugLogger {
    filter: log::LevelFilter,
    file: Mutex<Option<File>>,
    mirror_stderr: bool,
}

impl DebugLogger {
    fn new(filter: log::LevelFilter) -> Self {
        let file = if filter == log::LevelFilter::Off {
            None
        } else {
            // Failing to open the file silently disables file output
            OpenOptions::new()
                .write(true)
                .truncate(true)
                .create(true)
                .open(log_path())
                .ok()
        };

        let logger = Self {
            filter,
            file: Mutex::new(file),
            mirror_stderr: std::env::var_os("RUST_LOG").is_some(),
        };
        logger.write_raw(&format!(
            "\n{}\nquick-term debug session started at {} (level={})\n{}\n",
            "=".repeat(80),
            get_timestamp(),
            filter,
            "=".repeat(80)
        ));
        logger
    }

    fn write_raw(&self, msg: &str) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }
}

impl log::Log for DebugLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        self.write_raw(&line);
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<DebugLogger> = OnceLock::new();

/// Install the debug logger as the global `log` backend.
///
/// `level_override` takes precedence over `DEBUG_LEVEL`. Calling this more
/// than once (or after another logger was installed) is harmless: the first
/// installation wins.
pub fn init_log_bridge(level_override: Option<DebugLevel>) {
    let level = level_override.unwrap_or_else(DebugLevel::from_env);
    let logger = LOGGER.get_or_init(|| DebugLogger::new(level.to_level_filter()));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(logger.filter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_debug_levels() {
        assert_eq!(DebugLevel::parse("0"), DebugLevel::Off);
        assert_eq!(DebugLevel::parse(" 3 "), DebugLevel::Debug);
        assert_eq!(DebugLevel::parse("4"), DebugLevel::Trace);
        assert_eq!(DebugLevel::parse("verbose"), DebugLevel::Off);
        assert_eq!(DebugLevel::parse("9"), DebugLevel::Off);
    }

    #[test]
    fn levels_map_onto_log_filters() {
        assert_eq!(DebugLevel::Off.to_level_filter(), log::LevelFilter::Off);
        assert_eq!(DebugLevel::Info.to_level_filter(), log::LevelFilter::Info);
        assert!(DebugLevel::Trace > DebugLevel::Error);
    }

    #[test]
    fn init_is_idempotent() {
        init_log_bridge(Some(DebugLevel::Off));
        init_log_bridge(Some(DebugLevel::Trace));
        log::info!("logging after double init does not panic");
    }
}
