//! The two composite figures.

use std::path::Path;

use incident_response_analytics_models::{CategoryCount, Histogram, ScatterSeries};
use plotters::prelude::*;

use crate::ChartError;
use crate::layout::{correlation_text, histogram_title, offense_counts_title, scatter_title};
use crate::panels::{LegendCorner, count_bars, district_scatter, response_histogram};

const OVERVIEW_SIZE: (u32, u32) = (1200, 800);
const CORRELATION_SIZE: (u32, u32) = (1000, 800);

/// Contents of the overview figure.
#[derive(Debug, Clone, Copy)]
pub struct OverviewFigure<'a> {
    /// Top offense types, largest first.
    pub offense_counts: &'a [CategoryCount],
    /// Number of distinct offense types in the data.
    pub offense_type_total: usize,
    /// Top districts, largest first.
    pub district_counts: &'a [CategoryCount],
    /// Histogram of all offenses followed by one per highlighted offense.
    pub histograms: &'a [Histogram],
    /// Upper bound of the histogram density axis.
    pub density_limit: f64,
}

/// Contents of the correlation figure.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationFigure<'a> {
    /// Per-district points across all offense types.
    pub all_offenses: &'a ScatterSeries,
    /// Per-district points for each highlighted offense.
    pub highlighted: &'a [ScatterSeries],
}

/// Renders offense counts by type and district on the top row and the
/// response-time histograms side by side on the bottom row.
///
/// # Errors
///
/// * [`ChartError::EmptyPanel`] if there are no histograms
/// * [`ChartError::Draw`] if the backend fails
pub fn render_overview(path: &Path, figure: &OverviewFigure<'_>) -> Result<(), ChartError> {
    if figure.histograms.is_empty() {
        return Err(ChartError::EmptyPanel {
            message: "overview figure needs at least one histogram".to_string(),
        });
    }

    let root = BitMapBackend::new(path, OVERVIEW_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (top, bottom) = root.split_vertically(OVERVIEW_SIZE.1 / 2);
    let (offenses, districts) = top.split_horizontally(OVERVIEW_SIZE.0 / 2);

    count_bars(
        &offenses,
        &offense_counts_title(figure.offense_counts.len(), figure.offense_type_total),
        figure.offense_counts,
    )?;
    count_bars(
        &districts,
        "Number of offenses by district",
        figure.district_counts,
    )?;

    let panels = bottom.split_evenly((1, figure.histograms.len()));
    for (i, (panel, histogram)) in panels.iter().zip(figure.histograms).enumerate() {
        response_histogram(
            panel,
            &histogram_title(histogram),
            histogram,
            figure.density_limit,
            i == 0,
        )?;
    }

    root.present()?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Renders the all-offense district scatter centered on the top row and
/// one scatter per highlighted offense on the bottom row.
///
/// # Errors
///
/// Returns [`ChartError::Draw`] if the backend fails.
pub fn render_correlation(path: &Path, figure: &CorrelationFigure<'_>) -> Result<(), ChartError> {
    let root = BitMapBackend::new(path, CORRELATION_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (top, bottom) = root.split_vertically(CORRELATION_SIZE.1 / 2);
    let side = CORRELATION_SIZE.0 / 4;
    let top = top.margin(0, 0, side, side);

    district_scatter(
        &top,
        &format!(
            "Districts number of offenses vs. mean response time, {} {}",
            figure.all_offenses.label,
            correlation_text(figure.all_offenses.r)
        ),
        figure.all_offenses,
        LegendCorner::UpperLeft,
    )?;

    if !figure.highlighted.is_empty() {
        let panels = bottom.split_evenly((1, figure.highlighted.len()));
        let last = figure.highlighted.len() - 1;
        for (i, (panel, series)) in panels.iter().zip(figure.highlighted).enumerate() {
            let legend = if i == last && i > 0 {
                LegendCorner::UpperRight
            } else {
                LegendCorner::UpperLeft
            };
            district_scatter(panel, &scatter_title(series), series, legend)?;
        }
    }

    root.present()?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_without_histograms_is_rejected_before_drawing() {
        let path = std::env::temp_dir().join("incident_response_empty_overview.png");
        let figure = OverviewFigure {
            offense_counts: &[],
            offense_type_total: 0,
            district_counts: &[],
            histograms: &[],
            density_limit: 0.045,
        };

        let err = render_overview(&path, &figure).unwrap_err();
        assert!(matches!(err, ChartError::EmptyPanel { .. }));
        assert!(!path.exists());
    }
}
