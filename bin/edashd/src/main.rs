//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "binary"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Binary entrypoint for the edash daemon."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use edash_common::{init_tracing, AppConfig, LogFormat, Period, Selection, SelectionWindow};
use edash_core::{refresh_once, Dashboard, DashboardSource, SimulatedSource, SnapshotStore};
use edash_sim::SimulationEngine;
use tokio::signal;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Energy consumption dashboard daemon",
    long_about = None
)]
struct Cli {
    #[arg(long, value_name = "FILE", help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, help = "Override the initial aggregation period")]
    period: Option<CliPeriod>,

    #[arg(long, value_name = "YYYY-MM-DD", help = "Last day covered by the series")]
    date: Option<NaiveDate>,

    #[arg(long, help = "Override the simulation seed")]
    seed: Option<u64>,

    #[arg(long, value_enum, help = "Override the stdout log format")]
    log_format: Option<CliLogFormat>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliPeriod {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl From<CliPeriod> for Period {
    fn from(value: CliPeriod) -> Self {
        match value {
            CliPeriod::Daily => Period::Daily,
            CliPeriod::Weekly => Period::Weekly,
            CliPeriod::Monthly => Period::Monthly,
            CliPeriod::Yearly => Period::Yearly,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliLogFormat {
    Json,
    Pretty,
}

impl From<CliLogFormat> for LogFormat {
    fn from(value: CliLogFormat) -> Self {
        match value {
            CliLogFormat::Json => LogFormat::StructuredJson,
            CliLogFormat::Pretty => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Run the refresh loop until interrupted")]
    Run,
    #[command(about = "Perform a single refresh and write the snapshot as JSON")]
    Once {
        #[arg(long, value_name = "FILE", help = "Write to FILE instead of stdout")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut candidates = Vec::new();
    if let Some(path) = &cli.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from("configs/edash.toml"));
    candidates.push(PathBuf::from("configs/example.toml"));

    let loaded = AppConfig::load_or_default(&candidates)?;
    let mut config = loaded.config;
    apply_overrides(&cli, &mut config);
    config.validate()?;
    init_tracing("edashd", &config.logging)?;

    match &loaded.source {
        Some(path) => info!(config_path = %path.display(), "configuration loaded"),
        None => warn!("no configuration file found; running with defaults"),
    }

    let selection = initial_selection(&cli, &config, SelectionWindow::today())?;
    let engine = SimulationEngine::new(config.simulation.random_seed);
    info!(seed = ?engine.seed(), range = %selection.label(), "simulation engine ready");
    let source: Arc<dyn DashboardSource> = Arc::new(SimulatedSource::new(engine, config.latency));

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_daemon(config, source, selection).await?,
        Commands::Once { output } => {
            let store = SnapshotStore::new();
            let snapshot = refresh_once(
                source.as_ref(),
                &store,
                selection,
                config.dashboard.refresh_timeout,
            )
            .await?;
            let mut writer: Box<dyn Write> = match &output {
                Some(path) => Box::new(File::create(path).with_context(|| {
                    format!("failed to create output file {}", path.display())
                })?),
                None => Box::new(io::stdout()),
            };
            serde_json::to_writer_pretty(&mut writer, snapshot.as_ref())?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
    }

    Ok(())
}

fn apply_overrides(cli: &Cli, config: &mut AppConfig) {
    if let Some(period) = cli.period {
        config.dashboard.default_period = period.into();
    }
    if let Some(seed) = cli.seed {
        config.simulation.random_seed = Some(seed);
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format.into();
    }
}

fn initial_selection(cli: &Cli, config: &AppConfig, window: SelectionWindow) -> Result<Selection> {
    let date = cli
        .date
        .map(|date| window.validate(date))
        .transpose()
        .context("invalid --date")?;
    Ok(Selection::new(config.dashboard.default_period, date))
}

async fn run_daemon(
    config: AppConfig,
    source: Arc<dyn DashboardSource>,
    selection: Selection,
) -> Result<()> {
    let handle = Dashboard::new(source, config.dashboard.clone()).spawn(selection);
    let mut published = handle.subscribe();
    let ctrl_c = signal::ctrl_c();
    tokio::pin!(ctrl_c);

    info!("daemon running; waiting for termination signal");
    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                result?;
                info!("ctrl-c received; shutting down");
                break;
            }
            changed = published.changed() => {
                if changed.is_err() {
                    warn!("snapshot store closed; stopping");
                    break;
                }
                if let Some(snapshot) = handle.latest() {
                    info!(
                        generation = snapshot.generation,
                        range = %snapshot.label,
                        total = snapshot.stats.total_consumption,
                        average = snapshot.stats.avg_consumption,
                        peak = snapshot.stats.peak_consumption,
                        trend = %snapshot.stats.trend,
                        savings = snapshot.stats.savings_potential,
                        anomalies = snapshot.anomalies.len(),
                        "dashboard snapshot"
                    );
                }
            }
        }
    }

    handle.shutdown().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> SelectionWindow {
        SelectionWindow::ending(NaiveDate::from_ymd_opt(2024, 8, 1).unwrap())
    }

    #[test]
    fn overrides_replace_config_values() {
        let cli = Cli::try_parse_from([
            "edashd",
            "--period",
            "yearly",
            "--seed",
            "17",
            "--log-format",
            "pretty",
        ])
        .unwrap();
        let mut config = AppConfig::default();
        apply_overrides(&cli, &mut config);
        assert_eq!(config.dashboard.default_period, Period::Yearly);
        assert_eq!(config.simulation.random_seed, Some(17));
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn default_command_is_run() {
        let cli = Cli::try_parse_from(["edashd"]).unwrap();
        assert!(cli.command.is_none());
        let cli = Cli::try_parse_from(["edashd", "once", "--output", "snap.json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Once { output: Some(_) })));
    }

    #[test]
    fn date_must_fall_in_selection_window() {
        let config = AppConfig::default();
        let cli = Cli::try_parse_from(["edashd", "--date", "2024-09-01"]).unwrap();
        assert!(initial_selection(&cli, &config, window()).is_err());

        let cli = Cli::try_parse_from(["edashd", "--date", "2024-07-31"]).unwrap();
        let selection = initial_selection(&cli, &config, window()).unwrap();
        assert_eq!(selection.date, NaiveDate::from_ymd_opt(2024, 7, 31));
        assert_eq!(selection.period, Period::Daily);
    }
}
