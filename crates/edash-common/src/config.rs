//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Shared primitives and utilities for the dashboard pipeline."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds, DurationSeconds};
use tracing::debug;

use crate::logging::LogFormat;
use crate::period::Period;

fn default_refresh_interval() -> Duration {
    Duration::from_secs(30)
}

fn default_readings_latency() -> Duration {
    Duration::from_millis(800)
}

fn default_stats_latency() -> Duration {
    Duration::from_millis(600)
}

fn default_anomalies_latency() -> Duration {
    Duration::from_millis(700)
}

fn default_suggestions_latency() -> Duration {
    Duration::from_millis(500)
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::StructuredJson
}

/// Primary configuration object for the dashboard runtime.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub latency: LatencyConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    /// `None` when no file was found and defaults were used.
    pub source: Option<PathBuf>,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &str = "EDASH_CONFIG";

    /// Load configuration from disk, respecting the `EDASH_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        let loaded = Self::load_or_default(candidates)?;
        if loaded.source.is_none() {
            return Err(anyhow!(
                "no configuration files found. inspected: {}",
                describe_candidates(candidates)
            ));
        }
        Ok(loaded.config)
    }

    /// Load the first existing candidate, falling back to defaults when none exist.
    ///
    /// An explicit `EDASH_CONFIG` path must exist; it never falls back.
    pub fn load_or_default<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        let env_path = std::env::var(Self::ENV_CONFIG_PATH)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        Self::load_or_default_with(env_path, candidates)
    }

    /// Same as [`AppConfig::load_or_default`] with the override path passed in
    /// rather than read from `EDASH_CONFIG`.
    pub fn load_or_default_with<P: AsRef<Path>>(
        override_path: Option<PathBuf>,
        candidates: &[P],
    ) -> Result<LoadedAppConfig> {
        if let Some(path) = override_path {
            let config = Self::from_path(&path)?;
            return Ok(LoadedAppConfig {
                config,
                source: Some(path),
            });
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        debug!(
            inspected = %describe_candidates(candidates),
            "no configuration file found; using defaults"
        );
        Ok(LoadedAppConfig {
            config: AppConfig::default(),
            source: None,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        contents
            .parse::<AppConfig>()
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.dashboard.validate()
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

fn describe_candidates<P: AsRef<Path>>(candidates: &[P]) -> String {
    candidates
        .iter()
        .map(|p| p.as_ref().display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub default_period: Period,
    #[serde(default = "default_refresh_interval")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub refresh_interval: Duration,
    /// Upper bound on a single join-all refresh; `None` waits indefinitely.
    #[serde(default)]
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    pub refresh_timeout: Option<Duration>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_period: Period::default(),
            refresh_interval: default_refresh_interval(),
            refresh_timeout: None,
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval.is_zero() {
            return Err(anyhow!("dashboard.refresh_interval must be greater than zero"));
        }
        if matches!(self.refresh_timeout, Some(timeout) if timeout.is_zero()) {
            return Err(anyhow!("dashboard.refresh_timeout must be greater than zero"));
        }
        Ok(())
    }
}

/// Simulated round-trip delay per producer. Zero disables the delay.
#[serde_as]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LatencyConfig {
    #[serde(default = "default_readings_latency")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub readings: Duration,
    #[serde(default = "default_stats_latency")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub stats: Duration,
    #[serde(default = "default_anomalies_latency")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub anomalies: Duration,
    #[serde(default = "default_suggestions_latency")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub suggestions: Duration,
}

impl LatencyConfig {
    pub fn none() -> Self {
        Self {
            readings: Duration::ZERO,
            stats: Duration::ZERO,
            anomalies: Duration::ZERO,
            suggestions: Duration::ZERO,
        }
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            readings: default_readings_latency(),
            stats: default_stats_latency(),
            anomalies: default_anomalies_latency(),
            suggestions: default_suggestions_latency(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SimulationConfig {
    /// Fixed seed for reproducible runs; entropy-seeded when unset.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
        }
    }
}
