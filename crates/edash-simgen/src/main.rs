//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "01-bootstrap"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Export simulated dashboard datasets for fixtures and inspection."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use edash_common::{Period, Selection, SelectionWindow};
use edash_sim::SimulationEngine;
use edash_stats::{compute_stats, device_breakdown, location_breakdown};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Dataset {
    Readings,
    Stats,
    Anomalies,
    Suggestions,
    Breakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Grouping {
    Device,
    Location,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Generate simulated energy dashboard datasets",
    long_about = None
)]
struct Cli {
    /// Dataset to generate
    #[arg(long, value_enum, default_value_t = Dataset::Readings)]
    dataset: Dataset,

    /// Aggregation period: daily, weekly, monthly or yearly
    #[arg(long, default_value_t = Period::Daily)]
    period: Period,

    /// Last day covered by the series (YYYY-MM-DD); defaults to now
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Grouping used by the breakdown dataset
    #[arg(long, value_enum, default_value_t = Grouping::Device)]
    group: Grouping,

    /// Random seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Output file path. Use '-' for stdout.
    #[arg(long, default_value = "-")]
    output: PathBuf,

    /// Explicit output format when extension is ambiguous
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let selection = resolve_selection(&cli, SelectionWindow::today())?;
    let format = determine_format(&cli.output, cli.format);
    let mut engine = SimulationEngine::new(cli.seed);
    let written = generate(&cli, selection, &mut engine, format)?;

    if cli.output.as_os_str() != "-" {
        eprintln!(
            "generated {} {:?} records for {} -> {}",
            written,
            cli.dataset,
            selection.label(),
            cli.output.display()
        );
    }
    Ok(())
}

fn resolve_selection(cli: &Cli, window: SelectionWindow) -> Result<Selection> {
    let date = cli
        .date
        .map(|date| window.validate(date))
        .transpose()
        .context("invalid --date")?;
    Ok(Selection::new(cli.period, date))
}

fn determine_format(path: &Path, override_format: Option<OutputFormat>) -> OutputFormat {
    if let Some(format) = override_format {
        return format;
    }
    if path.as_os_str() == "-" {
        return OutputFormat::Json;
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Csv,
    }
}

fn generate(
    cli: &Cli,
    selection: Selection,
    engine: &mut SimulationEngine,
    format: OutputFormat,
) -> Result<usize> {
    let reference = selection.reference();
    match cli.dataset {
        Dataset::Readings => {
            let readings = engine.readings(selection.period, reference)?;
            write_records(&cli.output, format, &readings)
        }
        Dataset::Stats => {
            let readings = engine.readings(selection.period, reference)?;
            let stats = compute_stats(&readings)?;
            write_records(&cli.output, format, &[stats])
        }
        Dataset::Anomalies => {
            let anomalies = engine.anomalies(selection.period, reference)?;
            write_records(&cli.output, format, &anomalies)
        }
        Dataset::Suggestions => write_records(&cli.output, format, &engine.suggestions()),
        Dataset::Breakdown => {
            let readings = engine.readings(selection.period, reference)?;
            match cli.group {
                Grouping::Device => {
                    write_records(&cli.output, format, &device_breakdown(&readings))
                }
                Grouping::Location => {
                    write_records(&cli.output, format, &location_breakdown(&readings))
                }
            }
        }
    }
}

fn write_records<T: Serialize>(output: &Path, format: OutputFormat, records: &[T]) -> Result<usize> {
    match format {
        OutputFormat::Csv => write_csv(output, records)?,
        OutputFormat::Json => write_json(output, records)?,
    }
    Ok(records.len())
}

fn open_output(output: &Path) -> Result<Box<dyn Write>> {
    if output.as_os_str() == "-" {
        return Ok(Box::new(io::stdout()));
    }
    let file = File::create(output)
        .with_context(|| format!("failed to create output file {}", output.display()))?;
    Ok(Box::new(file))
}

fn write_csv<T: Serialize>(output: &Path, records: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(open_output(output)?);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json<T: Serialize>(output: &Path, records: &[T]) -> Result<()> {
    let mut writer = open_output(output)?;
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
