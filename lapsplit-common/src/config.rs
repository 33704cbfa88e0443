//! Splitting settings and TOML configuration loading
//!
//! Settings sources, highest priority first:
//! 1. Command-line `--config` path
//! 2. `LAPSPLIT_CONFIG` environment variable
//! 3. Platform config file (`<config dir>/lapsplit/config.toml`)
//! 4. Built-in defaults (no file)
//!
//! An explicitly named file (priority 1 or 2) must exist. A missing platform
//! file is not an error: the built-in defaults are used and a warning is logged.

use crate::error::{Error, Result};
use crate::spot::SpotFeature;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "LAPSPLIT_CONFIG";

/// Parameters of the splitting cost function
///
/// Passed explicitly to the cost builder; there is no process-wide default
/// for multithreading or any other field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplittingSettings {
    /// When false, every pair is blocked and no per-pair work is done
    pub allow_splitting: bool,

    /// Maximum distance between a middle spot and a segment start
    pub max_distance: f64,

    /// Maximum frame gap between a middle spot and a segment start
    pub time_cutoff: f64,

    /// Cost written for forbidden pairs
    pub blocking_value: f64,

    /// Maximum allowed normalized difference per feature
    pub feature_cutoffs: BTreeMap<SpotFeature, f64>,

    pub use_multithreading: bool,

    /// Worker count override; `None` sizes the pool to the available CPUs
    pub worker_threads: Option<usize>,
}

impl Default for SplittingSettings {
    fn default() -> Self {
        Self {
            allow_splitting: true,
            max_distance: 15.0,
            time_cutoff: 1.0,
            blocking_value: f64::MAX,
            feature_cutoffs: BTreeMap::from([(SpotFeature::MeanIntensity, 1.0)]),
            use_multithreading: true,
            worker_threads: None,
        }
    }
}

impl SplittingSettings {
    /// Check numeric ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.max_distance.is_finite() && self.max_distance > 0.0) {
            return Err(Error::Config(format!(
                "max_distance must be a positive finite number, got {}",
                self.max_distance
            )));
        }
        if !(self.time_cutoff.is_finite() && self.time_cutoff > 0.0) {
            return Err(Error::Config(format!(
                "time_cutoff must be a positive finite number, got {}",
                self.time_cutoff
            )));
        }
        // Written into the JSON matrix, which has no representation for inf or NaN
        if !self.blocking_value.is_finite() {
            return Err(Error::Config(format!(
                "blocking_value must be a finite number, got {}",
                self.blocking_value
            )));
        }
        for (feature, cutoff) in &self.feature_cutoffs {
            if cutoff.is_nan() || *cutoff < 0.0 {
                return Err(Error::Config(format!(
                    "feature cutoff for {} must be >= 0, got {}",
                    feature, cutoff
                )));
            }
        }
        if self.worker_threads == Some(0) {
            return Err(Error::Config("worker_threads must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Configuration file contents; every section is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub splitting: SplittingSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Parse and validate configuration text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)?;
        config.splitting.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Resolve the configuration file by priority and load it
    ///
    /// Returns the source alongside the configuration without logging, so the
    /// caller can install its subscriber (whose level may come from this very
    /// file) before calling [`ConfigSource::log`].
    pub fn resolve(cli_path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let source = resolve_config_path(cli_path);
        let config = match &source {
            ConfigSource::Explicit(path) => Self::load(path)?,
            ConfigSource::Platform(path) if path.exists() => Self::load(path)?,
            ConfigSource::Platform(_) | ConfigSource::Defaults => Self::default(),
        };
        Ok((config, source))
    }
}

/// Where the configuration comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named on the command line or in the environment; must exist
    Explicit(PathBuf),
    /// Platform default location; may be absent
    Platform(PathBuf),
    /// No file location available
    Defaults,
}

impl ConfigSource {
    /// Log where the configuration was taken from
    ///
    /// Falling back to the built-in defaults is a warning.
    pub fn log(&self) {
        match self {
            ConfigSource::Explicit(path) => {
                info!("Loaded configuration from {}", path.display());
            }
            ConfigSource::Platform(path) if path.exists() => {
                info!("Loaded configuration from {}", path.display());
            }
            ConfigSource::Platform(path) => {
                warn!(
                    "No config file at {}, using built-in defaults",
                    path.display()
                );
            }
            ConfigSource::Defaults => {
                warn!("No config directory for this platform, using built-in defaults");
            }
        }
    }
}

/// Determine the configuration source following the documented priority order
pub fn resolve_config_path(cli_path: Option<&Path>) -> ConfigSource {
    // Priority 1: Command-line argument
    if let Some(path) = cli_path {
        return ConfigSource::Explicit(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return ConfigSource::Explicit(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config file
    match dirs::config_dir() {
        Some(dir) => ConfigSource::Platform(dir.join("lapsplit").join("config.toml")),
        None => ConfigSource::Defaults,
    }
}
