#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Rendering of the two response-time figures with `plotters`.
//!
//! * [`figures::render_overview`]: offense/district counts and response
//!   time histograms (`Plot1.png`)
//! * [`figures::render_correlation`]: district offense count against mean
//!   response time with least-squares lines (`Plot2.png`)
//!
//! [`layout`] holds the pure geometry and text helpers the panels use.

pub mod figures;
pub mod layout;
pub mod panels;

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

/// Errors that can occur while rendering a figure.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The plotting backend failed.
    #[error("Drawing failed: {message}")]
    Draw {
        /// Backend error description.
        message: String,
    },

    /// A figure was given nothing to draw in a required panel.
    #[error("Nothing to plot: {message}")]
    EmptyPanel {
        /// Which panel was empty.
        message: String,
    },
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        Self::Draw {
            message: e.to_string(),
        }
    }
}
