//! Density histograms of response times.

use incident_response_analytics_models::Histogram;

use crate::AnalyticsError;

/// Bins `values` into fixed-width bins whose edges run from `start` in
/// steps of `bin_width`, stopping before `stop` (so `-300, 300, 10` gives
/// edges `-300 ..= 290` and 59 bins). Each bin is half-open except the
/// last, which also includes its right edge.
///
/// Densities are normalized over the values that landed in a bin, so they
/// integrate to one whenever any value is in range.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidBins`] if `bin_width` is not positive
/// or the edges would not form at least one bin.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn density_histogram(
    label: &str,
    values: &[f64],
    start: f64,
    stop: f64,
    bin_width: f64,
) -> Result<Histogram, AnalyticsError> {
    if bin_width <= 0.0 || !bin_width.is_finite() {
        return Err(AnalyticsError::InvalidBins {
            message: format!("bin width must be positive, got {bin_width}"),
        });
    }

    let edges = ((stop - start) / bin_width).ceil();
    if !edges.is_finite() || edges < 2.0 {
        return Err(AnalyticsError::InvalidBins {
            message: format!("range {start}..{stop} with width {bin_width} has no complete bin"),
        });
    }

    let bin_count = edges as usize - 1;
    let last_edge = bin_width.mul_add(bin_count as f64, start);

    let mut counts = vec![0_u64; bin_count];
    for &value in values {
        if value < start || value > last_edge {
            continue;
        }
        let index = (((value - start) / bin_width).floor() as usize).min(bin_count - 1);
        counts[index] += 1;
    }

    let in_range: u64 = counts.iter().sum();
    let densities = counts
        .iter()
        .map(|&count| {
            if in_range == 0 {
                0.0
            } else {
                count as f64 / (in_range as f64 * bin_width)
            }
        })
        .collect();

    log::debug!(
        "[{label}] {in_range} of {} values inside {start}..={last_edge}",
        values.len()
    );

    Ok(Histogram {
        label: label.to_string(),
        min: start,
        bin_width,
        densities,
        in_range,
        total: values.len() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_has_fifty_nine_bins() {
        let histogram = density_histogram("all", &[], -300.0, 300.0, 10.0).unwrap();
        assert_eq!(histogram.densities.len(), 59);
        assert!((histogram.max() - 290.0).abs() < f64::EPSILON);
        assert!(histogram.densities.iter().all(|&d| d == 0.0));
    }

    #[test]
    fn last_bin_is_closed_and_outliers_ignored() {
        let histogram =
            density_histogram("all", &[-300.0, 5.0, 290.0, 295.0, -301.0], -300.0, 300.0, 10.0)
                .unwrap();

        assert_eq!(histogram.in_range, 3);
        assert_eq!(histogram.total, 5);
        assert!(histogram.densities[0] > 0.0);
        assert!(histogram.densities[30] > 0.0);
        assert!(histogram.densities[58] > 0.0);
    }

    #[test]
    fn densities_integrate_to_one() {
        let values = [-12.0, 3.0, 4.0, 17.5, 120.0, 250.0];
        let histogram = density_histogram("all", &values, -300.0, 300.0, 10.0).unwrap();
        let area: f64 = histogram.densities.iter().map(|d| d * 10.0).sum();
        assert!((area - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_degenerate_bins() {
        assert!(density_histogram("all", &[], -300.0, 300.0, 0.0).is_err());
        assert!(density_histogram("all", &[], 0.0, 5.0, 10.0).is_err());
    }
}
