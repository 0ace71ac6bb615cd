#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types produced by the response-time analytics.
//!
//! Everything here is plain data: the analytics crate fills these in, the
//! chart renderer draws them and the report binary serializes them into
//! the optional JSON summary.

use incident_response_incident_models::District;
use serde::{Deserialize, Serialize};

/// Number of incidents sharing one categorical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// The grouped value (offense type or district code).
    pub label: String,
    /// Incidents with that value.
    pub count: u64,
}

/// Half-open window `(min_exclusive, max_inclusive]` of response times, in
/// minutes, that count towards the per-district aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseWindow {
    pub min_exclusive: f64,
    pub max_inclusive: f64,
}

impl Default for ResponseWindow {
    fn default() -> Self {
        Self {
            min_exclusive: 1.0,
            max_inclusive: 300.0,
        }
    }
}

impl ResponseWindow {
    /// Whether `minutes` falls inside the window.
    #[must_use]
    pub fn contains(&self, minutes: f64) -> bool {
        minutes > self.min_exclusive && minutes <= self.max_inclusive
    }
}

/// Count, mean and median of a non-empty set of response times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseStats {
    pub count: u64,
    pub mean: f64,
    pub median: f64,
}

/// Aggregate for one (offense type, district) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellStats {
    pub offense_type: String,
    pub district: District,
    #[serde(flatten)]
    pub stats: ResponseStats,
}

/// Response-time aggregate for one district across all offense types.
///
/// `mean` is `None` when no response time in the district falls inside the
/// [`ResponseWindow`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictStats {
    pub district: District,
    pub count: u64,
    pub mean: Option<f64>,
}

/// Ordinary least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Evaluates the line at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }
}

/// Points of one scatter panel together with its fit and correlation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterSeries {
    /// What the points describe (e.g. `"ALL OFFENSES"` or an offense type).
    pub label: String,
    /// `(offense count, mean response time)` per district.
    pub points: Vec<(f64, f64)>,
    /// Least-squares line, when the points allow one.
    pub fit: Option<LinearFit>,
    /// Pearson correlation coefficient, when defined.
    pub r: Option<f64>,
}

/// Density-normalized histogram over fixed-width bins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Histogram {
    /// What the values describe.
    pub label: String,
    /// Left edge of the first bin.
    pub min: f64,
    pub bin_width: f64,
    /// Density of each bin: `count / (in_range * bin_width)`.
    pub densities: Vec<f64>,
    /// Values that landed in some bin.
    pub in_range: u64,
    /// All values offered, in range or not.
    pub total: u64,
}

impl Histogram {
    /// Right edge of the last bin.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn max(&self) -> f64 {
        self.bin_width.mul_add(self.densities.len() as f64, self.min)
    }

    /// Iterates `(left edge, right edge, density)` per bin.
    #[allow(clippy::cast_precision_loss)]
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.densities.iter().enumerate().map(|(i, &density)| {
            let left = self.bin_width.mul_add(i as f64, self.min);
            (left, left + self.bin_width, density)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_excludes_lower_bound_and_includes_upper() {
        let window = ResponseWindow::default();
        assert!(!window.contains(1.0));
        assert!(window.contains(1.5));
        assert!(window.contains(300.0));
        assert!(!window.contains(300.5));
        assert!(!window.contains(-20.0));
    }

    #[test]
    fn fit_predicts_along_line() {
        let fit = LinearFit {
            slope: 2.0,
            intercept: -1.0,
        };
        assert!((fit.predict(3.0) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn histogram_bins_cover_range() {
        let histogram = Histogram {
            label: "ALL OFFENSES".to_string(),
            min: -300.0,
            bin_width: 10.0,
            densities: vec![0.0; 59],
            in_range: 0,
            total: 0,
        };
        assert!((histogram.max() - 290.0).abs() < f64::EPSILON);

        let (left, right, _) = histogram.bins().last().unwrap();
        assert!((left - 280.0).abs() < f64::EPSILON);
        assert!((right - 290.0).abs() < f64::EPSILON);
    }
}
