//! Process-wide application logger.
//!
//! # Lifecycle
//!
//! - **First initialization** ([`init`] / [`init_named`]): reads the
//!   [`AppConfig`] snapshot once, builds the single [`LoggerHandle`], binds it
//!   to stderr (plus `logging.log_file` when set) and installs its dispatcher
//!   as the global `tracing` default so `tracing::debug!` and friends in
//!   library code land in the same destinations.
//! - **Every later access** ([`logger`], or another `init` call with a
//!   different config) returns the same handle; configuration is never re-run.
//! - If nothing initialized the logger explicitly, the first [`logger`] call
//!   configures it from [`LoggerConfig::default`].
//!
//! Output is one line per call rendered from a `%`-style template (see
//! [`LogFormat`]). Example with the default template:
//!
//! ```text
//! INFO:Entering: add
//! DEBUG:Args: (2, 3)
//! ```

mod format;
mod handle;
mod registry;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use tracing::Level;
use tracing::level_filters::LevelFilter;

use crate::config::AppConfig;
use crate::error::ConfigError;

pub use format::{LogFormat, LogRecord};
pub use handle::{Destination, LoggerBuilder, LoggerHandle};
pub use registry::{LoggerRegistry, global as registry};

/// Logger name used when neither the caller nor the config provides one.
pub const DEFAULT_APP_NAME: &str = "MyApp";

/// Template used when the config does not override `logging.log_format`.
pub const DEFAULT_LOG_FORMAT: &str = "%(levelname)s:%(message)s";

/// Ordered log importance: `DEBUG < INFO < WARNING < ERROR < CRITICAL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }

    /// Numeric level rendered by `%(levelno)d`.
    pub const fn levelno(self) -> u8 {
        match self {
            Severity::Debug => 10,
            Severity::Info => 20,
            Severity::Warning => 30,
            Severity::Error => 40,
            Severity::Critical => 50,
        }
    }

    /// Coarse `tracing` filter; `CRITICAL` shares `ERROR` and is narrowed by
    /// the formatter.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Severity::Debug => LevelFilter::DEBUG,
            Severity::Info => LevelFilter::INFO,
            Severity::Warning => LevelFilter::WARN,
            Severity::Error | Severity::Critical => LevelFilter::ERROR,
        }
    }

    pub fn from_level(level: &Level) -> Self {
        match *level {
            Level::ERROR => Severity::Error,
            Level::WARN => Severity::Warning,
            Level::INFO => Severity::Info,
            _ => Severity::Debug,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ConfigError;

    /// Case-insensitive; `WARN` and `FATAL` are accepted aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "WARNING" | "WARN" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            "CRITICAL" | "FATAL" => Ok(Severity::Critical),
            _ => Err(ConfigError::UnknownLevel(s.to_string())),
        }
    }
}

/// Immutable snapshot the logger is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub name: String,
    pub level: Severity,
    pub format: LogFormat,
    /// Extra file destination appended after stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_APP_NAME.to_string(),
            level: Severity::Debug,
            format: LogFormat::default(),
            log_file: None,
        }
    }
}

impl LoggerConfig {
    /// Derive the logger snapshot from application settings.
    ///
    /// `name` overrides `app_name`; an empty `app_name` falls back to
    /// [`DEFAULT_APP_NAME`].
    pub fn from_settings(config: &AppConfig, name: Option<&str>) -> Result<Self, ConfigError> {
        let name = name
            .or(Some(config.app_name.as_str()).filter(|n| !n.trim().is_empty()))
            .unwrap_or(DEFAULT_APP_NAME);
        Ok(Self {
            name: name.to_string(),
            level: config.logging.log_level.parse()?,
            format: LogFormat::parse(&config.logging.log_format)?,
            log_file: config.logging.log_file.clone(),
        })
    }
}

/// Initialize the process-wide logger from `config` (first call wins).
pub fn init(config: &AppConfig) -> Result<Arc<LoggerHandle>, ConfigError> {
    init_named(config, None)
}

/// Like [`init`], with an explicit logger name taking precedence over
/// `app_name`.
pub fn init_named(config: &AppConfig, name: Option<&str>) -> Result<Arc<LoggerHandle>, ConfigError> {
    registry::global().get_or_try_init(|| {
        let handle = LoggerHandle::from_config(LoggerConfig::from_settings(config, name)?)?;
        install(&handle);
        Ok(handle)
    })
}

/// The shared handle, configured with defaults if nothing initialized it yet.
pub fn logger() -> Arc<LoggerHandle> {
    registry::global().get_or_init(|| {
        let handle = LoggerHandle::console(LoggerConfig::default());
        install(&handle);
        handle
    })
}

fn install(handle: &LoggerHandle) {
    if !handle.install_global() {
        handle.debug("global tracing subscriber already set; library events are not routed here");
    }
}
