//! Load, join, analyze and plot.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use incident_response_analytics::{counts, histogram, regression, response};
use incident_response_analytics_models::{
    CategoryCount, CellStats, DistrictStats, Histogram, ScatterSeries,
};
use incident_response_charts::figures::{
    CorrelationFigure, OverviewFigure, render_correlation, render_overview,
};
use incident_response_incident_models::Incident;
use incident_response_source::join::{JoinStats, join_incidents};
use incident_response_source::parsing::parse_incidents;
use incident_response_source::progress::ProgressCallback;
use incident_response_source::table::CsvTable;
use serde::Serialize;

use crate::ReportError;
use crate::config::AnalysisConfig;

/// Label of the group covering every offense type.
pub const ALL_OFFENSES: &str = "ALL OFFENSES";

/// Joined incidents plus the row accounting of how they were obtained.
#[derive(Debug, Clone)]
pub struct PreparedIncidents {
    pub incidents: Vec<Incident>,
    pub join: JoinStats,
    /// Joined rows dropped for an unparseable timestamp.
    pub skipped_timestamps: usize,
}

/// Every statistic the figures and the JSON summary are built from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub join: JoinStats,
    pub skipped_timestamps: usize,
    /// Incidents with both timestamps parsed.
    pub incidents: usize,
    /// Share of incidents with `|response time|` above the outlier threshold.
    pub out_of_range_ratio: f64,
    /// Distinct offense types in the data.
    pub offense_type_total: usize,
    pub offense_counts: Vec<CategoryCount>,
    pub district_counts: Vec<CategoryCount>,
    /// All offenses first, then one per highlighted offense.
    pub histograms: Vec<Histogram>,
    pub districts: Vec<DistrictStats>,
    pub cells: Vec<CellStats>,
    pub all_offenses: ScatterSeries,
    pub highlighted: Vec<ScatterSeries>,
}

/// Reads the police report and 911 response CSV files named in `config`,
/// keeping only the columns the analysis uses.
///
/// # Errors
///
/// Returns [`ReportError::Source`] if either file is missing, malformed or
/// lacks a required column.
pub fn read_tables(
    config: &AnalysisConfig,
    reports_progress: &Arc<dyn ProgressCallback>,
    responses_progress: &Arc<dyn ProgressCallback>,
) -> Result<(CsvTable, CsvTable), ReportError> {
    let columns = &config.columns;

    let reports = CsvTable::from_path(
        &config.inputs.reports,
        &columns.report_columns(),
        reports_progress,
    )?;
    let responses = CsvTable::from_path(
        &config.inputs.responses,
        &columns.response_columns(),
        responses_progress,
    )?;

    Ok((reports, responses))
}

/// Joins the two tables and parses their timestamps into incidents.
///
/// # Errors
///
/// * [`ReportError::Source`] if a column is missing, or a timestamp is
///   invalid under the `fail` policy
pub fn prepare(
    reports: CsvTable,
    responses: CsvTable,
    config: &AnalysisConfig,
) -> Result<PreparedIncidents, ReportError> {
    let columns = &config.columns;
    let filters = &config.filters;

    let (raw, join) = join_incidents(reports, responses, columns)?;

    let (incidents, skipped_timestamps) = parse_incidents(
        raw,
        &filters.timestamp_format,
        (&columns.date_reported, &columns.at_scene_time),
        filters.invalid_timestamps,
    )?;
    log::info!("Derived response times for {} incidents", incidents.len());

    Ok(PreparedIncidents {
        incidents,
        join,
        skipped_timestamps,
    })
}

/// Computes every statistic of the report.
///
/// # Errors
///
/// * [`ReportError::Analytics`] if there are no incidents, a highlighted
///   offense never occurs, or the histogram bins are unusable
pub fn analyze(
    prepared: &PreparedIncidents,
    config: &AnalysisConfig,
) -> Result<Analysis, ReportError> {
    let incidents = &prepared.incidents;
    let plots = &config.plots;
    let window = config.filters.window();

    let out_of_range_ratio =
        response::out_of_range_ratio(incidents, config.filters.outlier_minutes)?;

    let density = |label: &str, values: &[f64]| {
        histogram::density_histogram(
            label,
            values,
            plots.histogram_start,
            plots.histogram_stop,
            plots.bin_width,
        )
    };

    let all_times: Vec<f64> = incidents.iter().map(|i| i.response_minutes).collect();
    let mut histograms = vec![density(ALL_OFFENSES, &all_times)?];
    for offense in &plots.highlighted_offenses {
        let times = response::response_times_for(incidents, offense)?;
        histograms.push(density(offense.as_str(), &times)?);
    }

    let cells = response::cell_stats(incidents, window);
    let districts = response::district_stats(incidents, window);
    log::info!(
        "{} offense/district cells and {} districts inside {}..={} min",
        cells.len(),
        districts.len(),
        window.min_exclusive,
        window.max_inclusive
    );

    let all_offenses =
        regression::scatter_series(ALL_OFFENSES, response::district_points(&districts));
    let highlighted = plots
        .highlighted_offenses
        .iter()
        .map(|offense| {
            regression::scatter_series(
                offense,
                response::offense_district_points(&cells, offense),
            )
        })
        .collect();

    Ok(Analysis {
        join: prepared.join,
        skipped_timestamps: prepared.skipped_timestamps,
        incidents: incidents.len(),
        out_of_range_ratio,
        offense_type_total: counts::distinct_offense_types(incidents),
        offense_counts: counts::by_offense_type(incidents, plots.offense_type_limit()),
        district_counts: counts::by_district(incidents, plots.district_limit()),
        histograms,
        districts,
        cells,
        all_offenses,
        highlighted,
    })
}

/// Writes the overview and correlation figures into the output directory
/// and returns their paths.
///
/// # Errors
///
/// * [`ReportError::Io`] if the output directory cannot be created
/// * [`ReportError::Chart`] if drawing fails
pub fn render(
    analysis: &Analysis,
    config: &AnalysisConfig,
) -> Result<(PathBuf, PathBuf), ReportError> {
    let output_dir = &config.inputs.output_dir;
    std::fs::create_dir_all(output_dir).map_err(|source| ReportError::Io {
        path: output_dir.clone(),
        source,
    })?;

    let overview_path = config.overview_path();
    render_overview(
        &overview_path,
        &OverviewFigure {
            offense_counts: &analysis.offense_counts,
            offense_type_total: analysis.offense_type_total,
            district_counts: &analysis.district_counts,
            histograms: &analysis.histograms,
            density_limit: config.plots.density_limit,
        },
    )?;

    let correlation_path = config.correlation_path();
    render_correlation(
        &correlation_path,
        &CorrelationFigure {
            all_offenses: &analysis.all_offenses,
            highlighted: &analysis.highlighted,
        },
    )?;

    Ok((overview_path, correlation_path))
}

/// Writes `analysis` as pretty-printed JSON.
///
/// # Errors
///
/// * [`ReportError::Io`] if the file cannot be created
/// * [`ReportError::Json`] if serialization fails
pub fn write_summary(path: &Path, analysis: &Analysis) -> Result<(), ReportError> {
    let file = File::create(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), analysis)?;
    log::info!("Wrote summary to {}", path.display());
    Ok(())
}
