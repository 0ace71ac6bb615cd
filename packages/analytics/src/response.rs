//! Response-time aggregates.

use std::collections::BTreeMap;

use incident_response_analytics_models::{
    CellStats, DistrictStats, ResponseStats, ResponseWindow,
};
use incident_response_incident_models::{District, Incident};

use crate::AnalyticsError;

/// Fraction of incidents whose response time is more than
/// `threshold_minutes` away from zero in either direction.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyDataset`] if `incidents` is empty.
#[allow(clippy::cast_precision_loss)]
pub fn out_of_range_ratio(
    incidents: &[Incident],
    threshold_minutes: f64,
) -> Result<f64, AnalyticsError> {
    if incidents.is_empty() {
        return Err(AnalyticsError::EmptyDataset);
    }

    let outliers = incidents
        .iter()
        .filter(|i| i.response_minutes.abs() > threshold_minutes)
        .count();

    Ok(outliers as f64 / incidents.len() as f64)
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median, averaging the two middle values for even-length input.
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some(f64::midpoint(sorted[mid - 1], sorted[mid]))
    } else {
        Some(sorted[mid])
    }
}

/// Count, mean and median of `values`, or `None` when empty.
#[must_use]
pub fn response_stats(values: &[f64]) -> Option<ResponseStats> {
    Some(ResponseStats {
        count: values.len() as u64,
        mean: mean(values)?,
        median: median(values)?,
    })
}

/// Aggregates response times per (offense type, district) pair.
///
/// Only incidents in a known district whose response time falls in `window`
/// contribute; pairs without any such incident are absent. Results are
/// ordered by offense type, then district.
#[must_use]
pub fn cell_stats(incidents: &[Incident], window: ResponseWindow) -> Vec<CellStats> {
    let mut cells: BTreeMap<(&str, &District), Vec<f64>> = BTreeMap::new();

    for incident in incidents.iter().filter(|i| counts_towards(i, window)) {
        cells
            .entry((incident.offense_type.as_str(), &incident.district))
            .or_default()
            .push(incident.response_minutes);
    }

    cells
        .into_iter()
        .filter_map(|((offense_type, district), values)| {
            Some(CellStats {
                offense_type: offense_type.to_string(),
                district: district.clone(),
                stats: response_stats(&values)?,
            })
        })
        .collect()
}

/// Aggregates response times per known district across all offense types.
///
/// Every known district occurring in `incidents` is listed (ordered by
/// code), even when none of its response times falls in `window`.
#[must_use]
pub fn district_stats(incidents: &[Incident], window: ResponseWindow) -> Vec<DistrictStats> {
    let mut districts: BTreeMap<&District, Vec<f64>> = BTreeMap::new();

    for incident in incidents.iter().filter(|i| !i.district.is_unknown()) {
        let values = districts.entry(&incident.district).or_default();
        if window.contains(incident.response_minutes) {
            values.push(incident.response_minutes);
        }
    }

    districts
        .into_iter()
        .map(|(district, values)| DistrictStats {
            district: district.clone(),
            count: values.len() as u64,
            mean: mean(&values),
        })
        .collect()
}

/// All response times of one offense type, unfiltered.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownOffense`] if no incident has that
/// offense type.
pub fn response_times_for(
    incidents: &[Incident],
    offense_type: &str,
) -> Result<Vec<f64>, AnalyticsError> {
    let values: Vec<f64> = incidents
        .iter()
        .filter(|i| i.offense_type == offense_type)
        .map(|i| i.response_minutes)
        .collect();

    if values.is_empty() {
        return Err(AnalyticsError::UnknownOffense {
            offense: offense_type.to_string(),
        });
    }

    Ok(values)
}

/// `(count, mean)` per district for one offense type, taken from
/// [`cell_stats`] output.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn offense_district_points(cells: &[CellStats], offense_type: &str) -> Vec<(f64, f64)> {
    cells
        .iter()
        .filter(|c| c.offense_type == offense_type)
        .map(|c| (c.stats.count as f64, c.stats.mean))
        .collect()
}

/// `(count, mean)` per district across all offense types. Districts without
/// an in-window response time are left out.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn district_points(districts: &[DistrictStats]) -> Vec<(f64, f64)> {
    districts
        .iter()
        .filter_map(|d| Some((d.count as f64, d.mean?)))
        .collect()
}

fn counts_towards(incident: &Incident, window: ResponseWindow) -> bool {
    !incident.district.is_unknown() && window.contains(incident.response_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counts::tests::incident;

    fn sample() -> Vec<Incident> {
        vec![
            incident("1", "ASSAULT", "B", 10.0),
            incident("2", "ASSAULT", "B", 20.0),
            incident("3", "ASSAULT", "B", 60.0),
            incident("4", "ASSAULT", "C", 1.0),
            incident("5", "ASSAULT", "99", 15.0),
            incident("6", "THEFT", "C", 300.0),
            incident("7", "THEFT", "C", 301.0),
            incident("8", "THEFT", "D", -400.0),
        ]
    }

    #[test]
    fn ratio_counts_both_tails() {
        let ratio = out_of_range_ratio(&sample(), 300.0).unwrap();
        assert!((ratio - 2.0 / 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ratio_of_nothing_is_an_error() {
        assert!(matches!(
            out_of_range_ratio(&[], 300.0),
            Err(AnalyticsError::EmptyDataset)
        ));
    }

    #[test]
    fn median_handles_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn cells_aggregate_in_window_known_districts() {
        let cells = cell_stats(&sample(), ResponseWindow::default());

        let keys: Vec<_> = cells
            .iter()
            .map(|c| (c.offense_type.as_str(), c.district.as_str()))
            .collect();
        assert_eq!(keys, [("ASSAULT", "B"), ("THEFT", "C")]);

        let assault_b = &cells[0].stats;
        assert_eq!(assault_b.count, 3);
        assert!((assault_b.mean - 30.0).abs() < 1e-9);
        assert!((assault_b.median - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_district_never_aggregated() {
        let incidents = vec![incident("1", "ASSAULT", "99", 15.0)];
        assert!(cell_stats(&incidents, ResponseWindow::default()).is_empty());
        assert!(district_stats(&incidents, ResponseWindow::default()).is_empty());
    }

    #[test]
    fn cell_counts_sum_to_filtered_records() {
        let incidents = sample();
        let window = ResponseWindow::default();
        let total: u64 = cell_stats(&incidents, window)
            .iter()
            .map(|c| c.stats.count)
            .sum();
        let filtered = incidents
            .iter()
            .filter(|i| !i.district.is_unknown() && window.contains(i.response_minutes))
            .count() as u64;
        assert_eq!(total, filtered);
        assert_eq!(total, 4);
    }

    #[test]
    fn districts_listed_even_without_in_window_times() {
        let districts = district_stats(&sample(), ResponseWindow::default());

        let codes: Vec<_> = districts.iter().map(|d| d.district.as_str()).collect();
        assert_eq!(codes, ["B", "C", "D"]);
        assert_eq!(districts[1].count, 1);
        assert_eq!(districts[1].mean, Some(300.0));
        assert_eq!(districts[2].mean, None);

        assert_eq!(district_points(&districts), [(3.0, 30.0), (1.0, 300.0)]);
    }

    #[test]
    fn offense_points_come_from_cells() {
        let cells = cell_stats(&sample(), ResponseWindow::default());
        assert_eq!(offense_district_points(&cells, "THEFT"), [(1.0, 300.0)]);
        assert!(offense_district_points(&cells, "ARSON").is_empty());
    }

    #[test]
    fn response_times_for_missing_offense_is_an_error() {
        assert_eq!(response_times_for(&sample(), "THEFT").unwrap().len(), 3);
        assert!(matches!(
            response_times_for(&sample(), "ARSON"),
            Err(AnalyticsError::UnknownOffense { .. })
        ));
    }
}
