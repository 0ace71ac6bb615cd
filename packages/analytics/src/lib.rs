#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Response-time statistics over joined incidents.
//!
//! * [`counts`]: incidents per offense type / district, sorted and
//!   truncated for bar charts
//! * [`response`]: out-of-range ratio, per-(offense, district) and
//!   per-district aggregates
//! * [`histogram`]: density histograms of response times
//! * [`regression`]: least-squares lines and Pearson correlation

pub mod counts;
pub mod histogram;
pub mod regression;
pub mod response;

use thiserror::Error;

/// Errors that can occur while computing statistics.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// No incidents survived loading, so ratios and means are undefined.
    #[error("No incidents to analyze")]
    EmptyDataset,

    /// A requested offense type does not occur in the data.
    #[error("Offense type '{offense}' does not occur in the joined data")]
    UnknownOffense {
        /// The offense type that was asked for.
        offense: String,
    },

    /// Histogram bin layout is unusable.
    #[error("Invalid histogram bins: {message}")]
    InvalidBins {
        /// Description of what went wrong.
        message: String,
    },
}
