//! Quarry Logging
//!
//! Lightweight logging used by every Quarry crate. Output is controlled
//! through `QUARRY_*` environment variables so a server operator can turn
//! on translation diagnostics without rebuilding a plugin.
//!
//! # Usage
//!
//! ```rust
//! use quarry_log::{debug, info, warn};
//!
//! info!("Loaded {} locales", 3);
//! debug!(target: "quarry::i18n", "Resolving key {}", "welcome");
//! warn!("Falling back to default locale");
//! ```
//!
//! # Environment Variables
//!
//! - `QUARRY_DEBUG=1` - Enable debug logging
//! - `QUARRY_LOG_LEVEL=trace|debug|info|warn|error|off` - Minimum level
//! - `QUARRY_LOG_FORMAT=pretty|compact|json` - Output format
//! - `QUARRY_LOG_COLOR=1|0` - Colored level names (pretty format)
//! - `QUARRY_LOG_TIMESTAMPS=1|0` - Prefix records with a timestamp
//! - `QUARRY_LOG_MODULE=1|0` - Include the record target

use once_cell::sync::OnceCell;
use std::env;
use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

// ============================================================================
// Levels and formats
// ============================================================================

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    /// Disables all output
    Off = 5,
}

impl Level {
    /// Parse a level name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "off" | "none" => Some(Level::Off),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Off => "OFF",
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Trace,
            1 => Level::Debug,
            2 => Level::Info,
            3 => Level::Warn,
            4 => Level::Error,
            _ => Level::Off,
        }
    }

    #[cfg(feature = "color")]
    fn colored(&self) -> colored::ColoredString {
        use colored::Colorize;
        match self {
            Level::Trace => self.as_str().magenta(),
            Level::Debug => self.as_str().blue(),
            Level::Info => self.as_str().green(),
            Level::Warn => self.as_str().yellow(),
            Level::Error => self.as_str().red().bold(),
            Level::Off => self.as_str().white(),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace => Level::Trace,
            log::Level::Debug => Level::Debug,
            log::Level::Info => Level::Info,
            log::Level::Warn => Level::Warn,
            log::Level::Error => Level::Error,
        }
    }
}

/// Output format for records written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Human readable, optionally colored
    Pretty,
    /// One short line per record
    Compact,
    /// One JSON object per line
    Json,
}

impl Format {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Format::Pretty),
            "compact" => Some(Format::Compact),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);
static CONFIG: OnceCell<LogConfig> = OnceCell::new();

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub debug: bool,
    pub level: Level,
    pub format: Format,
    pub color: bool,
    pub timestamps: bool,
    pub module_path: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Info,
            format: Format::Json,
            color: false,
            timestamps: true,
            module_path: true,
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

impl LogConfig {
    /// Read the `QUARRY_*` variables, falling back to defaults.
    pub fn from_env() -> Self {
        let debug = env_flag("QUARRY_DEBUG").unwrap_or(false);
        let level = env::var("QUARRY_LOG_LEVEL")
            .ok()
            .and_then(|s| Level::parse(&s))
            .unwrap_or(if debug { Level::Debug } else { Level::Info });
        let format = env::var("QUARRY_LOG_FORMAT")
            .ok()
            .and_then(|s| Format::parse(&s))
            .unwrap_or(Format::Json);
        let color = env_flag("QUARRY_LOG_COLOR").unwrap_or_else(|| {
            env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
        });

        Self {
            debug,
            level,
            format,
            color,
            timestamps: env_flag("QUARRY_LOG_TIMESTAMPS").unwrap_or(true),
            module_path: env_flag("QUARRY_LOG_MODULE").unwrap_or(true),
        }
    }

    /// Set the minimum level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }
}

/// Initialize logging from the environment.
///
/// Called lazily by the first record; calling it eagerly only moves the
/// environment read to a predictable point.
pub fn init() {
    config();
}

/// Initialize logging with an explicit configuration.
///
/// Returns `false` if logging was already initialized, in which case the
/// existing configuration stays in effect.
pub fn init_with(config: LogConfig) -> bool {
    let debug = config.debug;
    let level = config.level;
    let installed = CONFIG.set(config).is_ok();
    if installed {
        DEBUG_ENABLED.store(debug, Ordering::SeqCst);
        LOG_LEVEL.store(level as u8, Ordering::SeqCst);
    }
    installed
}

/// The active configuration.
pub fn config() -> &'static LogConfig {
    CONFIG.get_or_init(|| {
        let config = LogConfig::from_env();
        DEBUG_ENABLED.store(config.debug, Ordering::SeqCst);
        LOG_LEVEL.store(config.level as u8, Ordering::SeqCst);
        config
    })
}

#[inline]
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

#[inline]
pub fn is_level_enabled(level: Level) -> bool {
    level != Level::Off && level as u8 >= LOG_LEVEL.load(Ordering::Relaxed)
}

pub fn current_level() -> Level {
    Level::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Change the minimum level at runtime.
pub fn set_level(level: Level) {
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Toggle debug mode at runtime. Enabling it lowers the level to debug.
pub fn set_debug(enabled: bool) {
    DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    if enabled && current_level() > Level::Debug {
        set_level(Level::Debug);
    }
}

// ============================================================================
// Output
// ============================================================================

#[doc(hidden)]
pub fn log(level: Level, target: &str, message: &str) {
    let config = config();
    if !is_level_enabled(level) && !(level == Level::Debug && is_debug_enabled()) {
        return;
    }

    let mut stderr = std::io::stderr().lock();
    let _ = match config.format {
        Format::Pretty => write_pretty(&mut stderr, level, target, message, config),
        Format::Compact => write_compact(&mut stderr, level, target, message, config),
        Format::Json => write_json(&mut stderr, level, target, message),
    };
}

fn write_pretty(
    out: &mut impl Write,
    level: Level,
    target: &str,
    message: &str,
    config: &LogConfig,
) -> std::io::Result<()> {
    if config.timestamps {
        write!(out, "{} ", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))?;
    }

    #[cfg(feature = "color")]
    if config.color {
        write!(out, "{:5} ", level.colored())?;
    } else {
        write!(out, "{:5} ", level.as_str())?;
    }
    #[cfg(not(feature = "color"))]
    write!(out, "{:5} ", level.as_str())?;

    if config.module_path && !target.is_empty() {
        write!(out, "[{}] ", target)?;
    }
    writeln!(out, "{}", message)
}

fn write_compact(
    out: &mut impl Write,
    level: Level,
    target: &str,
    message: &str,
    config: &LogConfig,
) -> std::io::Result<()> {
    if config.timestamps {
        write!(out, "{} ", chrono::Local::now().format("%H:%M:%S"))?;
    }
    write!(out, "{} ", level.as_str().chars().next().unwrap_or('?'))?;
    if config.module_path && !target.is_empty() {
        write!(out, "{}: ", target)?;
    }
    writeln!(out, "{}", message)
}

#[cfg(feature = "json")]
fn write_json(out: &mut impl Write, level: Level, target: &str, message: &str) -> std::io::Result<()> {
    #[derive(serde::Serialize)]
    struct Record<'a> {
        timestamp: String,
        level: &'a str,
        target: &'a str,
        message: &'a str,
    }

    let record = Record {
        timestamp: chrono::Utc::now().to_rfc3339(),
        level: level.as_str(),
        target,
        message,
    };
    match serde_json::to_string(&record) {
        Ok(line) => writeln!(out, "{}", line),
        Err(_) => Ok(()),
    }
}

#[cfg(not(feature = "json"))]
fn write_json(out: &mut impl Write, level: Level, target: &str, message: &str) -> std::io::Result<()> {
    writeln!(
        out,
        r#"{{"timestamp":"{}","level":"{}","target":"{}","message":"{}"}}"#,
        chrono::Utc::now().to_rfc3339(),
        level.as_str(),
        target.escape_default(),
        message.escape_default()
    )
}

// ============================================================================
// `log` facade bridge
// ============================================================================

struct Bridge;

impl log::Log for Bridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        is_level_enabled(metadata.level().into())
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            log(record.level().into(), record.target(), &record.args().to_string());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Route records emitted through the `log` crate into Quarry output.
///
/// Fails if another `log` backend is already installed.
pub fn install_log_bridge() -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(Bridge))?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

// ============================================================================
// Macros
// ============================================================================

#[macro_export]
macro_rules! trace {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Trace) {
            $crate::log($crate::Level::Trace, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        $crate::trace!(target: module_path!(), $($arg)+)
    };
}

/// Log a debug record.
///
/// Emitted when `QUARRY_DEBUG=1` or the level is `debug` or lower.
///
/// ```rust
/// use quarry_log::debug;
///
/// let locale = "de_DE";
/// debug!(target: "quarry::i18n", "Loaded locale {}", locale);
/// ```
#[macro_export]
macro_rules! debug {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_debug_enabled() || $crate::is_level_enabled($crate::Level::Debug) {
            $crate::log($crate::Level::Debug, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        $crate::debug!(target: module_path!(), $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Info) {
            $crate::log($crate::Level::Info, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        $crate::info!(target: module_path!(), $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Warn) {
            $crate::log($crate::Level::Warn, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        $crate::warn!(target: module_path!(), $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Error) {
            $crate::log($crate::Level::Error, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        $crate::error!(target: module_path!(), $($arg)+)
    };
}

// ============================================================================
// Tracing
// ============================================================================

#[cfg(feature = "tracing")]
pub mod tracing_compat {
    //! Subscriber for crates that log through `tracing`.

    use super::{Level, LogConfig, config};
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    /// Build a subscriber filtered at the Quarry level unless `RUST_LOG`
    /// says otherwise.
    pub fn subscriber() -> impl tracing::Subscriber + Send + Sync {
        let config = config();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(directive(config.level)));
        layered(filter, config.color)
    }

    /// Build a subscriber for an explicit configuration, ignoring `RUST_LOG`.
    pub fn subscriber_for(config: &LogConfig) -> impl tracing::Subscriber + Send + Sync {
        layered(EnvFilter::new(directive(config.level)), config.color)
    }

    fn layered(filter: EnvFilter, color: bool) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_ansi(color))
    }

    fn directive(level: Level) -> &'static str {
        match level {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Off => "off",
        }
    }

    /// Install [`subscriber`] as the global default.
    pub fn install() -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
        tracing::subscriber::set_global_default(subscriber())
    }
}
