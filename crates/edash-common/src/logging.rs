//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Tracing bootstrap shared by the dashboard binaries."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use anyhow::Result;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_appender::rolling::daily;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;

const LOG_ENV: &str = "EDASH_LOG";
const DEFAULT_DIRECTIVE: &str = "debug";

static FILE_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();
static STDOUT_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

/// Available log formats for the binaries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    #[default]
    StructuredJson,
    Pretty,
}

/// Initialize the tracing subscriber based on configuration and environment variables.
///
/// * `EDASH_LOG` overrides the log filter (e.g. `info`, `debug,edash_core=trace`).
///   When unset the standard `RUST_LOG` variable is honoured, finally defaulting
///   to `debug`.
/// * Stdout receives JSON or pretty output per [`LogFormat`]; a rolling daily
///   JSON file is written under the configured directory.
pub fn init_tracing(service_name: &str, config: &LoggingConfig) -> Result<()> {
    std::fs::create_dir_all(&config.directory)?;
    let prefix = config
        .file_prefix
        .clone()
        .unwrap_or_else(|| service_name.to_owned());

    let file_appender = daily(&config.directory, format!("{prefix}-{service_name}.log"));
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
    let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());

    let _ = FILE_GUARD.set(file_guard);
    let _ = STDOUT_GUARD.set(stdout_guard);

    let filter = env_filter(std::env::var(LOG_ENV).ok());

    let fmt_layer = match config.format {
        LogFormat::StructuredJson => fmt::layer()
            .with_target(false)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .json()
            .with_writer(stdout_writer)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(stdout_writer)
            .boxed(),
    };

    let file_layer = fmt::layer()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .json()
        .with_writer(file_writer)
        .boxed();

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(file_layer)
        .try_init();
    if let Err(err) = installed {
        warn!(service = %service_name, error = %err, "global subscriber already set; keeping it");
        return Ok(());
    }

    info!(service = %service_name, log_dir = %config.directory.display(), format = ?config.format, "tracing initialised");
    Ok(())
}

/// Filter from an `EDASH_LOG` directive, else `RUST_LOG`, else `debug`.
fn env_filter(directive: Option<String>) -> EnvFilter {
    match directive {
        Some(directive) => EnvFilter::try_new(directive).unwrap_or_else(|err| {
            eprintln!("invalid {LOG_ENV} directive ({err}); defaulting to debug logging");
            EnvFilter::new(DEFAULT_DIRECTIVE)
        }),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn log_format_uses_kebab_case() {
        let json = serde_json::to_string(&LogFormat::StructuredJson).unwrap();
        assert_eq!(json, "\"structured-json\"");
    }

    #[test]
    fn init_creates_log_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            directory: dir.path().join("logs"),
            format: LogFormat::Pretty,
            file_prefix: Some("test".to_owned()),
        };
        init_tracing("edash-test", &config).unwrap();
        assert!(config.directory.is_dir());
    }

    #[test]
    fn second_init_keeps_first_subscriber() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            directory: dir.path().join("again"),
            format: LogFormat::StructuredJson,
            file_prefix: None,
        };
        init_tracing("edash-first", &config).unwrap();
        init_tracing("edash-second", &config).unwrap();
        assert!(config.directory.is_dir());
    }

    #[test]
    fn directive_is_parsed_or_replaced_by_debug() {
        let filter = env_filter(Some("warn,edash_core=trace".to_owned()));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
        let filter = env_filter(Some("info".to_owned()));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
        let filter = env_filter(Some("edash_core=notalevel".to_owned()));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
