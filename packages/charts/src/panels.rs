//! Single chart panels drawn onto a sub-area of a figure.

use incident_response_analytics_models::{CategoryCount, Histogram, ScatterSeries};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::ChartError;
use crate::layout::{
    bar_category_range, bar_label, bar_value_range, fit_line, histogram_bars, horizontal_bars,
    scatter_ranges,
};

const CAPTION_FONT: (&str, u32) = ("sans-serif", 15);

/// Where a scatter panel puts its legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendCorner {
    UpperLeft,
    UpperRight,
}

impl From<LegendCorner> for SeriesLabelPosition {
    fn from(corner: LegendCorner) -> Self {
        match corner {
            LegendCorner::UpperLeft => Self::UpperLeft,
            LegendCorner::UpperRight => Self::UpperRight,
        }
    }
}

/// Horizontal bar chart of `counts` (largest first), largest bar on top.
///
/// # Errors
///
/// Returns [`ChartError`] if the backend fails to draw.
pub fn count_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    counts: &[CategoryCount],
) -> Result<(), ChartError> {
    let bars = horizontal_bars(counts);
    let longest_label = bars.iter().map(|b| b.label.len()).max().unwrap_or(0);
    #[allow(clippy::cast_possible_truncation)]
    let label_area = (longest_label as u32 * 7).clamp(40, 260);

    let mut chart = ChartBuilder::on(area)
        .caption(title, CAPTION_FONT)
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(label_area)
        .build_cartesian_2d(bar_value_range(&bars), bar_category_range(bars.len()))?;

    let label_for = |y: &f64| bar_label(&bars, *y);
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(bars.len().max(1))
        .y_label_formatter(&label_for)
        .x_desc("# of visited offenses")
        .draw()?;

    chart.draw_series(
        bars.iter()
            .map(|bar| Rectangle::new(bar.corners, BLUE.mix(0.7).filled())),
    )?;

    Ok(())
}

/// Response-time histogram with the density axis fixed to
/// `0 ..= density_limit`.
///
/// # Errors
///
/// Returns [`ChartError`] if the backend fails to draw.
pub fn response_histogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    histogram: &Histogram,
    density_limit: f64,
    with_y_desc: bool,
) -> Result<(), ChartError> {
    let mut chart = ChartBuilder::on(area)
        .caption(title, CAPTION_FONT)
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(55)
        .build_cartesian_2d(histogram.min..histogram.max(), 0.0..density_limit)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc("Response time (min.)");
    if with_y_desc {
        mesh.y_desc("Probability");
    }
    mesh.draw()?;

    chart.draw_series(
        histogram_bars(histogram, density_limit)
            .into_iter()
            .map(|corners| Rectangle::new(corners, BLUE.mix(0.6).filled())),
    )?;

    Ok(())
}

/// District scatter plot with its least-squares line, if any.
///
/// # Errors
///
/// Returns [`ChartError`] if the backend fails to draw.
pub fn district_scatter<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    series: &ScatterSeries,
    legend: LegendCorner,
) -> Result<(), ChartError> {
    let (x_range, y_range) = scatter_ranges(series);

    let mut chart = ChartBuilder::on(area)
        .caption(title, CAPTION_FONT)
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(55)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Number of offenses")
        .y_desc("Mean response time")
        .draw()?;

    chart
        .draw_series(
            series
                .points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
        )?
        .label("Districts")
        .legend(|(x, y)| Circle::new((x, y), 4, BLUE.filled()));

    if let Some(line) = fit_line(series) {
        chart.draw_series(LineSeries::new(line, &RED))?;
    }

    chart
        .configure_series_labels()
        .position(legend.into())
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}
