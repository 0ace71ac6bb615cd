#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the incident response-time report.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use incident_response_cli_utils::{IndicatifProgress, init_logger};
use incident_response_report::config::AnalysisConfig;
use incident_response_report::pipeline;

#[derive(Parser)]
#[command(
    name = "incident_response_report",
    about = "Police response-time report from report and 911 response CSVs"
)]
struct Cli {
    /// Police report CSV (overrides `[inputs] reports`)
    #[arg(long)]
    reports: Option<PathBuf>,
    /// 911 incident response CSV (overrides `[inputs] responses`)
    #[arg(long)]
    responses: Option<PathBuf>,
    /// Directory for `Plot1.png` and `Plot2.png` (overrides `[inputs] output_dir`)
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// TOML config file. Built-in defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Also write every computed statistic to this JSON file
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = init_logger();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(reports) = cli.reports {
        config.inputs.reports = reports;
    }
    if let Some(responses) = cli.responses {
        config.inputs.responses = responses;
    }
    if let Some(output_dir) = cli.output_dir {
        config.inputs.output_dir = output_dir;
    }

    let start = Instant::now();
    let steps = IndicatifProgress::steps_bar(&multi, "Report", 4);

    steps.set_message("Reading tables".to_string());
    let (reports, responses) = pipeline::read_tables(
        &config,
        &IndicatifProgress::file_bar(&multi, "Police reports"),
        &IndicatifProgress::file_bar(&multi, "911 responses"),
    )?;
    steps.inc(1);

    steps.set_message("Joining".to_string());
    let prepared = pipeline::prepare(reports, responses, &config)?;
    steps.inc(1);

    steps.set_message("Analyzing".to_string());
    let analysis = pipeline::analyze(&prepared, &config)?;
    steps.inc(1);

    steps.set_message("Plotting".to_string());
    let (overview, correlation) = pipeline::render(&analysis, &config)?;
    steps.inc(1);

    if let Some(path) = &cli.summary {
        pipeline::write_summary(path, &analysis)?;
    }

    steps.finish(format!("Report done in {:.1}s", start.elapsed().as_secs_f64()));
    log::info!(
        "{} incidents, figures at {} and {}",
        analysis.incidents,
        overview.display(),
        correlation.display()
    );

    println!("{}", analysis.out_of_range_ratio);

    Ok(())
}
