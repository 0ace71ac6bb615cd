//! Incident counts grouped by a categorical column.

use std::collections::{BTreeMap, BTreeSet};

use incident_response_analytics_models::CategoryCount;
use incident_response_incident_models::Incident;

/// Counts incidents per distinct value of `key`, largest first.
///
/// Equal counts are ordered by label so the result is deterministic.
/// `limit` keeps only the top-N groups; `None` keeps all of them.
#[must_use]
pub fn count_by<'a, F>(
    incidents: &'a [Incident],
    key: F,
    limit: Option<usize>,
) -> Vec<CategoryCount>
where
    F: Fn(&'a Incident) -> &'a str,
{
    let mut groups: BTreeMap<&str, u64> = BTreeMap::new();
    for incident in incidents {
        *groups.entry(key(incident)).or_default() += 1;
    }

    let mut counts: Vec<CategoryCount> = groups
        .into_iter()
        .map(|(label, count)| CategoryCount {
            label: label.to_string(),
            count,
        })
        .collect();

    // Stable, so ties keep the label order from the map.
    counts.sort_by(|a, b| b.count.cmp(&a.count));

    if let Some(limit) = limit {
        counts.truncate(limit);
    }

    counts
}

/// Incidents per offense type, largest first.
#[must_use]
pub fn by_offense_type(incidents: &[Incident], limit: Option<usize>) -> Vec<CategoryCount> {
    count_by(incidents, |i| i.offense_type.as_str(), limit)
}

/// Incidents per district (the unknown sentinel included), largest first.
#[must_use]
pub fn by_district(incidents: &[Incident], limit: Option<usize>) -> Vec<CategoryCount> {
    count_by(incidents, |i| i.district.as_str(), limit)
}

/// Number of distinct offense types.
#[must_use]
pub fn distinct_offense_types(incidents: &[Incident]) -> usize {
    incidents
        .iter()
        .map(|i| i.offense_type.as_str())
        .collect::<BTreeSet<_>>()
        .len()
}

/// Reverses a largest-first count list so that a horizontal bar chart
/// drawn bottom-up ends with the largest bar on top.
#[must_use]
pub fn plotting_order(counts: &[CategoryCount]) -> Vec<CategoryCount> {
    counts.iter().rev().cloned().collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::NaiveDate;
    use incident_response_incident_models::District;

    use super::*;

    pub fn incident(id: &str, offense: &str, district: &str, minutes: f64) -> Incident {
        let reported_at = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        #[allow(clippy::cast_possible_truncation)]
        let at_scene_at = reported_at + chrono::Duration::seconds((minutes * 60.0) as i64);
        Incident {
            offense_id: id.to_string(),
            offense_type: offense.to_string(),
            district: District::from(district),
            reported_at,
            at_scene_at,
            response_minutes: minutes,
        }
    }

    fn sample() -> Vec<Incident> {
        vec![
            incident("1", "THEFT", "B", 5.0),
            incident("2", "ASSAULT", "B", 5.0),
            incident("3", "THEFT", "C", 5.0),
            incident("4", "BURGLARY", "99", 5.0),
            incident("5", "THEFT", "99", 5.0),
            incident("6", "ASSAULT", "C", 5.0),
        ]
    }

    #[test]
    fn counts_sorted_descending_with_label_tiebreak() {
        let counts = by_offense_type(&sample(), None);
        let pairs: Vec<_> = counts.iter().map(|c| (c.label.as_str(), c.count)).collect();
        assert_eq!(pairs, [("THEFT", 3), ("ASSAULT", 2), ("BURGLARY", 1)]);
    }

    #[test]
    fn limit_keeps_top_groups() {
        let counts = by_offense_type(&sample(), Some(2));
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[1].label, "ASSAULT");
    }

    #[test]
    fn district_counts_include_unknown() {
        let counts = by_district(&sample(), None);
        assert!(counts.iter().any(|c| c.label == "99" && c.count == 2));
        assert_eq!(counts.iter().map(|c| c.count).sum::<u64>(), 6);
    }

    #[test]
    fn plotting_order_is_non_decreasing() {
        let plotted = plotting_order(&by_district(&sample(), None));
        assert!(plotted.windows(2).all(|w| w[0].count <= w[1].count));
    }

    #[test]
    fn counts_distinct_offense_types() {
        assert_eq!(distinct_offense_types(&sample()), 3);
        assert_eq!(distinct_offense_types(&[]), 0);
    }
}
