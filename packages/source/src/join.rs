//! Deduplication and inner join of the report and response tables.

use std::collections::HashMap;

use incident_response_incident_models::{District, IncidentColumns, RawIncident};
use serde::Serialize;

use crate::SourceError;
use crate::table::{CsvTable, DedupStats};

/// Row accounting for one [`join_incidents`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinStats {
    /// Rows read from the police report table.
    pub report_rows: usize,
    /// Rows read from the 911 response table.
    pub response_rows: usize,
    /// Rows dropped from the report table during dedup.
    pub report_dedup: DedupStats,
    /// Rows dropped from the response table during dedup.
    pub response_dedup: DedupStats,
    /// Offense numbers present in both tables.
    pub matched: usize,
    /// Matched rows dropped because a required field was empty.
    pub incomplete: usize,
}

impl JoinStats {
    /// Rows that survived the join and the required-field check.
    #[must_use]
    pub const fn joined(&self) -> usize {
        self.matched - self.incomplete
    }
}

/// Deduplicates both tables on the offense number (first occurrence wins),
/// inner-joins them, and drops joined rows with an empty offense type,
/// district, report time or arrival time.
///
/// Output rows follow the order of the report table.
///
/// # Errors
///
/// Returns [`SourceError::MissingColumn`] if either table was not loaded
/// with the columns named in `columns`.
pub fn join_incidents(
    mut reports: CsvTable,
    mut responses: CsvTable,
    columns: &IncidentColumns,
) -> Result<(Vec<RawIncident>, JoinStats), SourceError> {
    let report_key = index(&reports, &columns.offense_id)?;
    let offense_col = index(&reports, &columns.offense_type)?;
    let district_col = index(&reports, &columns.district)?;
    let reported_col = index(&reports, &columns.date_reported)?;
    let response_key = index(&responses, &columns.offense_id)?;
    let arrival_col = index(&responses, &columns.at_scene_time)?;

    let mut stats = JoinStats {
        report_rows: reports.len(),
        response_rows: responses.len(),
        report_dedup: reports.dedup_by(report_key),
        response_dedup: responses.dedup_by(response_key),
        ..JoinStats::default()
    };

    let arrivals: HashMap<&str, Option<&str>> = responses
        .rows()
        .iter()
        .filter_map(|row| {
            let key = row[response_key].as_deref()?;
            Some((key, row[arrival_col].as_deref()))
        })
        .collect();

    let mut incidents = Vec::new();

    for row in reports.rows() {
        let Some(key) = row[report_key].as_deref() else {
            continue;
        };
        let Some(arrival) = arrivals.get(key) else {
            continue;
        };
        stats.matched += 1;

        let (Some(offense), Some(district), Some(reported), Some(arrival)) = (
            row[offense_col].as_deref(),
            row[district_col].as_deref(),
            row[reported_col].as_deref(),
            *arrival,
        ) else {
            stats.incomplete += 1;
            continue;
        };

        incidents.push(RawIncident {
            offense_id: key.to_string(),
            offense_type: offense.to_string(),
            district: District::new(district),
            date_reported: reported.to_string(),
            at_scene_time: arrival.to_string(),
        });
    }

    log::info!(
        "Joined {} of {} report rows with {} response rows ({} matched, {} incomplete)",
        incidents.len(),
        stats.report_rows,
        stats.response_rows,
        stats.matched,
        stats.incomplete
    );

    Ok((incidents, stats))
}

fn index(table: &CsvTable, column: &str) -> Result<usize, SourceError> {
    table
        .column_index(column)
        .ok_or_else(|| SourceError::MissingColumn {
            table: table.label().to_string(),
            column: column.to_string(),
        })
}
