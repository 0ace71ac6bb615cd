//! Axis ranges, bar geometry and titles.
//!
//! Nothing in here touches a drawing backend, so the figure layout can be
//! checked without rendering a bitmap.

use std::ops::Range;

use incident_response_analytics::regression::linspace;
use incident_response_analytics_models::{CategoryCount, Histogram, LinearFit, ScatterSeries};

/// Number of points used to draw a least-squares line.
pub const FIT_LINE_POINTS: usize = 20;

/// Half the height of a horizontal bar, in category units.
const BAR_HALF_HEIGHT: f64 = 0.4;

/// A horizontal bar: label plus its rectangle corners in chart coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub corners: [(f64, f64); 2],
}

/// Lays out `counts` (largest first) as horizontal bars from the bottom of
/// the panel up, so the largest bar ends on top.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn horizontal_bars(counts: &[CategoryCount]) -> Vec<Bar> {
    incident_response_analytics::counts::plotting_order(counts)
        .into_iter()
        .enumerate()
        .map(|(i, c)| {
            let y = i as f64;
            let value = c.count as f64;
            Bar {
                label: c.label,
                value,
                corners: [(0.0, y - BAR_HALF_HEIGHT), (value, y + BAR_HALF_HEIGHT)],
            }
        })
        .collect()
}

/// Label for a tick at `y` on a bar panel, empty between categories.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn bar_label(bars: &[Bar], y: f64) -> String {
    let nearest = y.round();
    if (y - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    bars.get(nearest as usize)
        .map(|b| b.label.clone())
        .unwrap_or_default()
}

/// Value axis for a bar panel, with some headroom past the longest bar.
#[must_use]
pub fn bar_value_range(bars: &[Bar]) -> Range<f64> {
    let max = bars.iter().map(|b| b.value).fold(0.0, f64::max).max(1.0);
    0.0..max * 1.05
}

/// Category axis for `n` bars centered on `0 .. n-1`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn bar_category_range(n: usize) -> Range<f64> {
    -0.5..(n.max(1) as f64 - 0.5)
}

/// Range covering `values` with `pad` of the span added on each side.
///
/// Falls back to `0..1` for no values and to `v-1 .. v+1` when every
/// value is equal.
#[must_use]
pub fn padded_range(values: impl IntoIterator<Item = f64>, pad: f64) -> Range<f64> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() {
        return 0.0..1.0;
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0)..(max + 1.0);
    }
    let margin = (max - min) * pad;
    (min - margin)..(max + margin)
}

/// Points tracing `fit` across the x extent of the scatter points.
#[must_use]
pub fn fit_line(series: &ScatterSeries) -> Option<Vec<(f64, f64)>> {
    let fit: LinearFit = series.fit?;
    let (lo, hi) = series
        .points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.0), hi.max(p.0))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    Some(
        linspace(lo, hi, FIT_LINE_POINTS)
            .into_iter()
            .map(|x| (x, fit.predict(x)))
            .collect(),
    )
}

/// Axis ranges for a scatter panel, covering the points and the fit line.
#[must_use]
pub fn scatter_ranges(series: &ScatterSeries) -> (Range<f64>, Range<f64>) {
    let line = fit_line(series).unwrap_or_default();
    let x = padded_range(series.points.iter().map(|p| p.0), 0.05);
    let y = padded_range(
        series.points.iter().chain(line.iter()).map(|p| p.1),
        0.1,
    );
    (x, y)
}

/// Bin rectangles of a histogram with heights capped at `limit`.
#[must_use]
pub fn histogram_bars(histogram: &Histogram, limit: f64) -> Vec<[(f64, f64); 2]> {
    histogram
        .bins()
        .map(|(left, right, density)| [(left, 0.0), (right, density.min(limit))])
        .collect()
}

/// `R=0.123`, or `R=n/a` when the correlation is undefined.
#[must_use]
pub fn correlation_text(r: Option<f64>) -> String {
    r.map_or_else(|| "R=n/a".to_string(), |r| format!("R={r:.3}"))
}

#[must_use]
pub fn offense_counts_title(shown: usize, total: usize) -> String {
    format!("Number of offenses by type (top {shown} out of {total})")
}

#[must_use]
pub fn histogram_title(histogram: &Histogram) -> String {
    format!(
        "Response time distribution, {}, n={}",
        histogram.label, histogram.total
    )
}

#[must_use]
pub fn scatter_title(series: &ScatterSeries) -> String {
    format!(
        "Districts offense count vs. mean response time, {} {}",
        series.label,
        correlation_text(series.r)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts() -> Vec<CategoryCount> {
        [("THEFT", 9), ("ASSAULT", 4), ("ARSON", 1)]
            .into_iter()
            .map(|(label, count)| CategoryCount {
                label: label.to_string(),
                count,
            })
            .collect()
    }

    fn series(points: Vec<(f64, f64)>) -> ScatterSeries {
        incident_response_analytics::regression::scatter_series("ALL OFFENSES", points)
    }

    #[test]
    fn bars_grow_towards_the_top() {
        let bars = horizontal_bars(&counts());
        let values: Vec<_> = bars.iter().map(|b| b.value).collect();
        assert_eq!(values, [1.0, 4.0, 9.0]);
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        let [(x0, y0), (x1, y1)] = bars[2].corners;
        assert!(x0.abs() < f64::EPSILON && (x1 - 9.0).abs() < f64::EPSILON);
        assert!((y0 - 1.6).abs() < 1e-12 && (y1 - 2.4).abs() < 1e-12);
    }

    #[test]
    fn bar_labels_only_on_integer_ticks() {
        let bars = horizontal_bars(&counts());
        assert_eq!(bar_label(&bars, 0.0), "ARSON");
        assert_eq!(bar_label(&bars, 2.0), "THEFT");
        assert_eq!(bar_label(&bars, 0.5), "");
        assert_eq!(bar_label(&bars, 3.0), "");
        assert_eq!(bar_label(&bars, -1.0), "");
    }

    #[test]
    fn bar_ranges_leave_headroom() {
        let bars = horizontal_bars(&counts());
        let values = bar_value_range(&bars);
        assert!(values.end > 9.0);
        assert_eq!(bar_category_range(bars.len()), -0.5..2.5);
    }

    #[test]
    fn padded_range_fallbacks() {
        assert_eq!(padded_range([], 0.1), 0.0..1.0);
        assert_eq!(padded_range([5.0, 5.0], 0.1), 4.0..6.0);
        let range = padded_range([0.0, 10.0], 0.1);
        assert!((range.start + 1.0).abs() < 1e-12);
        assert!((range.end - 11.0).abs() < 1e-12);
    }

    #[test]
    fn fit_line_spans_point_extent() {
        let line = fit_line(&series(vec![(1.0, 3.0), (2.0, 5.0), (4.0, 9.0)])).unwrap();
        assert_eq!(line.len(), FIT_LINE_POINTS);
        assert!((line[0].0 - 1.0).abs() < 1e-12);
        assert!((line[0].1 - 3.0).abs() < 1e-9);
        let (x, y) = line[FIT_LINE_POINTS - 1];
        assert!((x - 4.0).abs() < 1e-12);
        assert!((y - 9.0).abs() < 1e-9);
    }

    #[test]
    fn single_point_has_no_line_and_na_correlation() {
        let single = series(vec![(3.0, 12.0)]);
        assert!(fit_line(&single).is_none());
        assert_eq!(
            scatter_title(&single),
            "Districts offense count vs. mean response time, ALL OFFENSES R=n/a"
        );
    }

    #[test]
    fn histogram_bars_are_capped() {
        let histogram = incident_response_analytics::histogram::density_histogram(
            "ALL OFFENSES",
            &[5.0],
            -300.0,
            300.0,
            10.0,
        )
        .unwrap();
        let bars = histogram_bars(&histogram, 0.045);
        assert_eq!(bars.len(), 59);
        assert_eq!(bars[30], [(0.0, 0.0), (10.0, 0.045)]);
        assert_eq!(histogram_title(&histogram), "Response time distribution, ALL OFFENSES, n=1");
    }

    #[test]
    fn correlation_formats_three_decimals() {
        assert_eq!(correlation_text(Some(-0.12345)), "R=-0.123");
        assert_eq!(offense_counts_title(12, 40), "Number of offenses by type (top 12 out of 40)");
    }
}
