//! Application configuration (`jl.toml` plus `APP_*` environment overrides).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};

use crate::logging::{DEFAULT_APP_NAME, DEFAULT_LOG_FORMAT};

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "APP_";

/// Deployment environment; Kelvin conversions warn in `prod`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Prod,
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Dev),
            "prod" | "production" => Ok(Environment::Prod),
            other => Err(anyhow!("unknown environment {other:?} (expected dev or prod)")),
        }
    }
}

/// Application settings (TOML).
///
/// Missing fields fall back to defaults. `logging.log_level` is kept as a
/// string so an unknown level surfaces when the logger is first configured.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub app_name: String,

    pub env: Environment,

    /// Offset subtracted by the faulty converter on C→F conversions.
    pub calibration_error: f64,

    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    pub log_level: String,

    /// `%`-style template, e.g. `%(levelname)s:%(message)s`.
    pub log_format: String,

    /// Optional file destination in addition to stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_level: "DEBUG".to_string(),
            log_format: DEFAULT_LOG_FORMAT.to_string(),
            log_file: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            env: Environment::default(),
            calibration_error: 0.0,
            logging: LoggingSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.app_name.trim().is_empty() {
            bail!("app_name must not be empty");
        }
        if !self.calibration_error.is_finite() {
            bail!("calibration_error must be a finite number");
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `AppConfig::default()`.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        let cfg = AppConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: AppConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Apply `APP_*` overrides from `vars` (normally `std::env::vars()`).
///
/// Nested keys use a double underscore: `APP_LOGGING__LOG_LEVEL=INFO`.
/// Unrelated variables are ignored; malformed values are errors.
pub fn apply_env_overrides<I, K, V>(mut cfg: AppConfig, vars: I) -> Result<AppConfig>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    for (key, value) in vars {
        let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let value: String = value.into();
        match name.to_ascii_uppercase().as_str() {
            "APP_NAME" => cfg.app_name = value,
            "ENV" => {
                cfg.env = value
                    .parse()
                    .with_context(|| format!("{ENV_PREFIX}{name}"))?;
            }
            "CALIBRATION_ERROR" => {
                cfg.calibration_error = value
                    .trim()
                    .parse()
                    .with_context(|| format!("{ENV_PREFIX}{name}={value:?} is not a number"))?;
            }
            "LOGGING__LOG_LEVEL" => cfg.logging.log_level = value,
            "LOGGING__LOG_FORMAT" => cfg.logging.log_format = value,
            "LOGGING__LOG_FILE" => cfg.logging.log_file = Some(PathBuf::from(value)),
            _ => {}
        }
    }
    cfg.validate()?;
    Ok(cfg)
}
