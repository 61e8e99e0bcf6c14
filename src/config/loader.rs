//! Configuration file loading with precedence handling.

use crate::surface::SurfaceMetrics;
use crate::view_state::{RenderHeight, ScreenSettings};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "QUIZPANE_CONFIG";

/// Environment variable overriding the estimated row height.
pub const ESTIMATED_ROW_HEIGHT_ENV: &str = "QUIZPANE_ESTIMATED_ROW_HEIGHT";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A setting has a value the screen cannot use.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Setting name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/quizpane/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Height reported for rows that have not been measured yet.
    #[serde(default)]
    pub estimated_row_height: Option<f64>,

    /// Presentation offset added to every measured height.
    #[serde(default)]
    pub row_padding: Option<f64>,

    /// Measurement timeout in milliseconds, 0 waits forever.
    #[serde(default)]
    pub measurement_timeout_ms: Option<u64>,

    /// Width of the simulated rendering surface.
    #[serde(default)]
    pub viewport_width: Option<u32>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Estimated row height in points.
    pub estimated_row_height: f64,
    /// Row padding in points.
    pub row_padding: f64,
    /// Measurement timeout in milliseconds.
    pub measurement_timeout_ms: u64,
    /// Surface viewport width in points.
    pub viewport_width: u32,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            estimated_row_height: 200.0,
            row_padding: 48.0,
            measurement_timeout_ms: 3000,
            viewport_width: 320,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Screen settings, validating the height fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for negative or non-finite heights.
    pub fn screen_settings(&self) -> Result<ScreenSettings, ConfigError> {
        let height = |field: &'static str, points: f64| {
            RenderHeight::new(points).map_err(|e| ConfigError::InvalidValue {
                field,
                reason: e.to_string(),
            })
        };

        Ok(ScreenSettings {
            estimated_row_height: height("estimated_row_height", self.estimated_row_height)?,
            row_padding: height("row_padding", self.row_padding)?,
            measurement_timeout: (self.measurement_timeout_ms > 0)
                .then(|| Duration::from_millis(self.measurement_timeout_ms)),
        })
    }

    /// Metrics for the simulated rendering surface.
    pub fn surface_metrics(&self) -> SurfaceMetrics {
        SurfaceMetrics::with_width(f64::from(self.viewport_width))
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/quizpane/quizpane.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("quizpane").join("quizpane.log")
    } else {
        PathBuf::from("quizpane.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/quizpane/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("quizpane").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `QUIZPANE_CONFIG` environment variable
/// 3. Default path `~/.config/quizpane/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `QUIZPANE_ESTIMATED_ROW_HEIGHT`: Override the estimated row height
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if the variable is set but is not a number.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(raw) = std::env::var(ESTIMATED_ROW_HEIGHT_ENV) {
        config.estimated_row_height =
            raw.trim()
                .parse()
                .map_err(|e: std::num::ParseFloatError| ConfigError::InvalidValue {
                    field: "estimated_row_height",
                    reason: format!("{ESTIMATED_ROW_HEIGHT_ENV}={raw:?}: {e}"),
                })?;
    }

    Ok(config)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        estimated_row_height: config
            .estimated_row_height
            .unwrap_or(defaults.estimated_row_height),
        row_padding: config.row_padding.unwrap_or(defaults.row_padding),
        measurement_timeout_ms: config
            .measurement_timeout_ms
            .unwrap_or(defaults.measurement_timeout_ms),
        viewport_width: config.viewport_width.unwrap_or(defaults.viewport_width),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, width_override: Option<u32>) -> ResolvedConfig {
    if let Some(width) = width_override {
        config.viewport_width = width;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
