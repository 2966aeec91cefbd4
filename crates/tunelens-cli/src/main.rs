//! tunelens command-line front end.
//!
//! Loads the datalog, ROM image, and definition file from paths given
//! on the command line, runs the analysis, and prints the report.
//! All analysis logic lives in `tunelens-core`; this binary only does
//! argument handling and formatting.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tunelens_core::analysis::ReportOptions;
use tunelens_core::rom::resolve;
use tunelens_core::session::AnalysisSession;

#[derive(Parser, Debug)]
#[command(
    name = "tunelens",
    version,
    about = "Analyze an ECU datalog against a ROM image and its definition file"
)]
struct Cli {
    /// ECU datalog (CSV)
    #[arg(short, long)]
    log: PathBuf,

    /// ROM image (raw binary)
    #[arg(short, long)]
    rom: Option<PathBuf>,

    /// ROM definition file (XML)
    #[arg(short, long)]
    defs: Option<PathBuf>,

    /// Resolve and print only these tables (repeatable)
    #[arg(short, long = "table")]
    tables: Vec<String>,

    /// Emit the full report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Re-export the parsed datalog as normalized CSV
    #[arg(long)]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut session = AnalysisSession::new();
    session
        .load_log(&cli.log)
        .with_context(|| format!("loading datalog {}", cli.log.display()))?;
    if let Some(path) = &cli.rom {
        session
            .load_rom(path)
            .with_context(|| format!("loading ROM image {}", path.display()))?;
    }
    if let Some(path) = &cli.defs {
        session
            .load_definition(path)
            .with_context(|| format!("loading definition {}", path.display()))?;
    }

    if let (Some(path), Some(log)) = (&cli.export, session.log()) {
        tunelens_core::datalog::write_csv(path, log)
            .with_context(|| format!("exporting datalog to {}", path.display()))?;
    }

    if let Some(defs) = session.definition() {
        for warning in defs.warnings() {
            eprintln!("warning: {}", warning);
        }
    }

    let report = if cli.tables.is_empty() {
        session.analyze(&ReportOptions::default())?
    } else {
        // Explicit table list: resolve just those instead of the sweep
        let mut report = session.analyze(&ReportOptions::default())?;
        report.reference_values.clear();
        report.reference_warnings.clear();
        if let (Some(defs), Some(rom)) = (session.definition(), session.rom()) {
            for name in &cli.tables {
                match resolve(defs, rom, name) {
                    Ok(value) => report.reference_values.push(value),
                    Err(e) => report.reference_warnings.push(e.to_string()),
                }
            }
        } else {
            anyhow::bail!("--table requires both --rom and --defs");
        }
        report
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for metric in &report.metrics {
        println!("{}: {:.2}  [{}]", metric.key, metric.value, metric.column);
    }
    for series in &report.series {
        println!(
            "series '{}': {} points ({} x {})",
            series.title,
            series.points.len(),
            series.x_label,
            series.y_label
        );
    }
    for value in &report.reference_values {
        let samples = value.as_slice();
        let rendered: Vec<String> = samples.iter().map(|v| format!("{:.3}", v)).collect();
        let units = if value.units.is_empty() {
            String::new()
        } else {
            format!(" {}", value.units)
        };
        println!("rom '{}': {}{}", value.name, rendered.join(", "), units);
    }
    for warning in &report.reference_warnings {
        eprintln!("warning: {}", warning);
    }

    Ok(())
}
