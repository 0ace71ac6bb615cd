//! Timestamp parsing and response-time derivation.

use chrono::NaiveDateTime;
use incident_response_incident_models::{Incident, InvalidTimestampPolicy, RawIncident};

use crate::SourceError;

/// Parses a timestamp such as `01/01/2020 01:30:00 AM` with the given
/// `chrono` format string.
#[must_use]
pub fn parse_timestamp(s: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), format).ok()
}

/// Parses both timestamps of every joined row and derives its response
/// time.
///
/// Rows with an unparseable timestamp are handled according to `policy`.
/// Returns the parsed incidents and the number of rows skipped.
///
/// # Errors
///
/// Returns [`SourceError::InvalidTimestamp`] for the first bad value when
/// `policy` is [`InvalidTimestampPolicy::Fail`].
pub fn parse_incidents(
    raw: Vec<RawIncident>,
    format: &str,
    columns: (&str, &str),
    policy: InvalidTimestampPolicy,
) -> Result<(Vec<Incident>, usize), SourceError> {
    let (reported_column, at_scene_column) = columns;
    let mut incidents = Vec::with_capacity(raw.len());
    let mut skipped = 0;

    for row in raw {
        let reported = parse_field(&row, &row.date_reported, reported_column, format);
        let at_scene = parse_field(&row, &row.at_scene_time, at_scene_column, format);

        match (reported, at_scene) {
            (Ok(reported_at), Ok(at_scene_at)) => {
                incidents.push(Incident::from_raw(row, reported_at, at_scene_at));
            }
            (Err(e), _) | (_, Err(e)) => match policy {
                InvalidTimestampPolicy::Fail => return Err(e),
                InvalidTimestampPolicy::Skip => {
                    log::warn!("Skipping row: {e}");
                    skipped += 1;
                }
            },
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} rows with unparseable timestamps");
    }

    Ok((incidents, skipped))
}

fn parse_field(
    row: &RawIncident,
    value: &str,
    column: &str,
    format: &str,
) -> Result<NaiveDateTime, SourceError> {
    parse_timestamp(value, format).ok_or_else(|| SourceError::InvalidTimestamp {
        offense_id: row.offense_id.clone(),
        column: column.to_string(),
        value: value.to_string(),
        format: format.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use incident_response_incident_models::{DEFAULT_TIMESTAMP_FORMAT, District};

    use super::*;

    const COLUMNS: (&str, &str) = ("Date Reported", "At Scene Time");

    fn raw(id: &str, reported: &str, at_scene: &str) -> RawIncident {
        RawIncident {
            offense_id: id.to_string(),
            offense_type: "ASSAULT".to_string(),
            district: District::from("B"),
            date_reported: reported.to_string(),
            at_scene_time: at_scene.to_string(),
        }
    }

    #[test]
    fn parses_twelve_hour_timestamps() {
        let dt = parse_timestamp("07/04/2015 12:05:09 PM", DEFAULT_TIMESTAMP_FORMAT).unwrap();
        assert_eq!(dt.to_string(), "2015-07-04 12:05:09");

        let dt = parse_timestamp("07/04/2015 12:05:09 AM", DEFAULT_TIMESTAMP_FORMAT).unwrap();
        assert_eq!(dt.to_string(), "2015-07-04 00:05:09");
    }

    #[test]
    fn rejects_other_layouts() {
        assert!(parse_timestamp("2015-07-04T12:05:09", DEFAULT_TIMESTAMP_FORMAT).is_none());
        assert!(parse_timestamp("13/04/2015 01:00:00 AM", DEFAULT_TIMESTAMP_FORMAT).is_none());
    }

    #[test]
    fn derives_response_minutes() {
        let (incidents, skipped) = parse_incidents(
            vec![raw("1", "01/01/2020 01:00:00 AM", "01/01/2020 01:30:00 AM")],
            DEFAULT_TIMESTAMP_FORMAT,
            COLUMNS,
            InvalidTimestampPolicy::Skip,
        )
        .unwrap();

        assert_eq!(skipped, 0);
        assert_eq!(incidents.len(), 1);
        assert!((incidents[0].response_minutes - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn skip_policy_drops_bad_rows() {
        let (incidents, skipped) = parse_incidents(
            vec![
                raw("1", "garbage", "01/01/2020 01:30:00 AM"),
                raw("2", "01/01/2020 01:00:00 AM", "01/01/2020 01:10:00 AM"),
            ],
            DEFAULT_TIMESTAMP_FORMAT,
            COLUMNS,
            InvalidTimestampPolicy::Skip,
        )
        .unwrap();

        assert_eq!(skipped, 1);
        assert_eq!(incidents[0].offense_id, "2");
    }

    #[test]
    fn fail_policy_names_row_and_column() {
        let err = parse_incidents(
            vec![raw("42", "01/01/2020 01:00:00 AM", "tomorrow")],
            DEFAULT_TIMESTAMP_FORMAT,
            COLUMNS,
            InvalidTimestampPolicy::Fail,
        )
        .unwrap_err();

        match err {
            SourceError::InvalidTimestamp {
                offense_id,
                column,
                value,
                ..
            } => {
                assert_eq!(offense_id, "42");
                assert_eq!(column, "At Scene Time");
                assert_eq!(value, "tomorrow");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
