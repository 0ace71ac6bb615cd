//! Least-squares line fitting and Pearson correlation.

use incident_response_analytics_models::{LinearFit, ScatterSeries};

struct Moments {
    mean_x: f64,
    mean_y: f64,
    sxx: f64,
    syy: f64,
    sxy: f64,
}

#[allow(clippy::cast_precision_loss)]
fn moments(points: &[(f64, f64)]) -> Option<Moments> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let (sxx, syy, sxy) = points.iter().fold((0.0, 0.0, 0.0), |(sxx, syy, sxy), &(x, y)| {
        let dx = x - mean_x;
        let dy = y - mean_y;
        (dx.mul_add(dx, sxx), dy.mul_add(dy, syy), dx.mul_add(dy, sxy))
    });

    Some(Moments {
        mean_x,
        mean_y,
        sxx,
        syy,
        sxy,
    })
}

/// Ordinary least-squares fit of `y` on `x`.
///
/// `None` with fewer than two points or when every `x` is equal.
#[must_use]
pub fn least_squares(points: &[(f64, f64)]) -> Option<LinearFit> {
    let m = moments(points)?;
    if m.sxx <= 0.0 {
        return None;
    }
    let slope = m.sxy / m.sxx;
    Some(LinearFit {
        slope,
        intercept: slope.mul_add(-m.mean_x, m.mean_y),
    })
}

/// Pearson correlation coefficient of `x` and `y`.
///
/// `None` with fewer than two points or when either coordinate is
/// constant.
#[must_use]
pub fn pearson(points: &[(f64, f64)]) -> Option<f64> {
    let m = moments(points)?;
    if m.sxx <= 0.0 || m.syy <= 0.0 {
        return None;
    }
    Some(m.sxy / (m.sxx * m.syy).sqrt())
}

/// `count` evenly spaced values from `start` to `end` inclusive.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| step.mul_add(i as f64, start)).collect()
        }
    }
}

/// Bundles points with their least-squares fit and correlation.
#[must_use]
pub fn scatter_series(label: &str, points: Vec<(f64, f64)>) -> ScatterSeries {
    let fit = least_squares(&points);
    let r = pearson(&points);
    if fit.is_none() {
        log::debug!("[{label}] {} points, no least-squares fit", points.len());
    }
    ScatterSeries {
        label: label.to_string(),
        points,
        fit,
        r,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_exact_line() {
        let points = [(1.0, 3.0), (2.0, 5.0), (4.0, 9.0)];
        let fit = least_squares(&points).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((pearson(&points).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn fits_noisy_points() {
        // x̄ = 2, ȳ = 2, Sxx = 2, Sxy = 1, Syy = 2
        let points = [(1.0, 1.0), (2.0, 3.0), (3.0, 2.0)];
        let fit = least_squares(&points).unwrap();
        assert!((fit.slope - 0.5).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((pearson(&points).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn negative_correlation() {
        let points = [(0.0, 10.0), (1.0, 8.0), (2.0, 6.0)];
        assert!((pearson(&points).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_inputs_have_no_fit() {
        assert!(least_squares(&[(1.0, 2.0)]).is_none());
        assert!(least_squares(&[(1.0, 2.0), (1.0, 5.0)]).is_none());
        assert!(pearson(&[(1.0, 2.0), (3.0, 2.0)]).is_none());
        assert!(least_squares(&[(1.0, 2.0), (3.0, 2.0)]).is_some());
    }

    #[test]
    fn linspace_includes_both_ends() {
        let xs = linspace(10.0, 50.0, 5);
        assert_eq!(xs, [10.0, 20.0, 30.0, 40.0, 50.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 9.0, 1), [3.0]);
    }

    #[test]
    fn series_without_fit_keeps_points() {
        let series = scatter_series("ASSAULT", vec![(4.0, 12.0)]);
        assert_eq!(series.points.len(), 1);
        assert!(series.fit.is_none());
        assert!(series.r.is_none());
    }
}
