#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident record types shared across the response-time analysis.
//!
//! A police report row and a 911 response row are joined on their offense
//! number into a [`RawIncident`], whose two timestamps are then parsed into
//! an [`Incident`] carrying the derived response time in minutes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// District code used by the source data for unknown or unassigned sectors.
pub const UNKNOWN_DISTRICT: &str = "99";

/// Timestamp layout used by both source tables
/// (e.g. `01/01/2020 01:30:00 AM`).
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Administrative district (sector) code of an incident.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct District(String);

impl District {
    /// Creates a district from its code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the raw district code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the [`UNKNOWN_DISTRICT`] sentinel.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_DISTRICT
    }
}

impl std::fmt::Display for District {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for District {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// What to do with a joined row whose timestamp does not parse.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InvalidTimestampPolicy {
    /// Drop the row and log a warning.
    #[default]
    Skip,
    /// Abort the whole run.
    Fail,
}

/// Names of the source columns each incident field is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct IncidentColumns {
    /// Join key present in both tables.
    pub offense_id: String,
    /// Offense type, read from the police report table.
    pub offense_type: String,
    /// District/sector, read from the police report table.
    pub district: String,
    /// Report timestamp, read from the police report table.
    pub date_reported: String,
    /// Arrival timestamp, read from the 911 response table.
    pub at_scene_time: String,
}

impl Default for IncidentColumns {
    fn default() -> Self {
        Self {
            offense_id: "General Offense Number".to_string(),
            offense_type: "Summarized Offense Description".to_string(),
            district: "District/Sector".to_string(),
            date_reported: "Date Reported".to_string(),
            at_scene_time: "At Scene Time".to_string(),
        }
    }
}

impl IncidentColumns {
    /// Columns required from the police report table, join key first.
    #[must_use]
    pub fn report_columns(&self) -> [&str; 4] {
        [
            &self.offense_id,
            &self.offense_type,
            &self.district,
            &self.date_reported,
        ]
    }

    /// Columns required from the 911 response table, join key first.
    #[must_use]
    pub fn response_columns(&self) -> [&str; 2] {
        [&self.offense_id, &self.at_scene_time]
    }
}

/// A joined report/response row whose required fields are all present but
/// whose timestamps are still unparsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIncident {
    pub offense_id: String,
    pub offense_type: String,
    pub district: District,
    pub date_reported: String,
    pub at_scene_time: String,
}

/// A fully parsed incident with its derived response time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub offense_id: String,
    pub offense_type: String,
    pub district: District,
    pub reported_at: NaiveDateTime,
    pub at_scene_at: NaiveDateTime,
    /// Minutes from report to arrival. Negative when the source timestamps
    /// are inconsistent.
    pub response_minutes: f64,
}

impl Incident {
    /// Builds an incident from a raw row and its two parsed timestamps.
    #[must_use]
    pub fn from_raw(raw: RawIncident, reported_at: NaiveDateTime, at_scene_at: NaiveDateTime) -> Self {
        Self {
            response_minutes: response_minutes(reported_at, at_scene_at),
            offense_id: raw.offense_id,
            offense_type: raw.offense_type,
            district: raw.district,
            reported_at,
            at_scene_at,
        }
    }
}

/// Elapsed minutes between the report and the arrival on scene.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn response_minutes(reported_at: NaiveDateTime, at_scene_at: NaiveDateTime) -> f64 {
    (at_scene_at - reported_at).num_milliseconds() as f64 / 60_000.0
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, DEFAULT_TIMESTAMP_FORMAT).unwrap()
    }

    #[test]
    fn half_hour_response() {
        let minutes = response_minutes(
            ts("01/01/2020 01:00:00 AM"),
            ts("01/01/2020 01:30:00 AM"),
        );
        assert!((minutes - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn arrival_before_report_is_negative() {
        let minutes = response_minutes(
            ts("01/01/2020 01:00:00 PM"),
            ts("01/01/2020 12:45:30 PM"),
        );
        assert!((minutes - -14.5).abs() < 1e-9);
    }

    #[test]
    fn sentinel_district_is_unknown() {
        assert!(District::from("99").is_unknown());
        assert!(!District::from("B").is_unknown());
    }

    #[test]
    fn timestamp_policy_parses_from_config_strings() {
        assert_eq!(
            InvalidTimestampPolicy::from_str("fail").unwrap(),
            InvalidTimestampPolicy::Fail
        );
        assert_eq!(InvalidTimestampPolicy::default().as_ref(), "skip");
    }

    #[test]
    fn join_key_leads_both_column_lists() {
        let columns = IncidentColumns::default();
        assert_eq!(columns.report_columns()[0], "General Offense Number");
        assert_eq!(columns.response_columns()[0], "General Offense Number");
    }
}
