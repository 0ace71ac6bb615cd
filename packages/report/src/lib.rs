#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Response-time report over joined police report and 911 response data.
//!
//! The run is a straight line: [`pipeline::read_tables`] loads both CSV
//! files, [`pipeline::prepare`] joins them and derives response times,
//! [`pipeline::analyze`] computes every statistic into an
//! [`pipeline::Analysis`], and [`pipeline::render`] writes the two figures.
//! Settings come from [`config::AnalysisConfig`].

pub mod config;
pub mod pipeline;

use std::path::PathBuf;

use incident_response_analytics::AnalyticsError;
use incident_response_charts::ChartError;
use incident_response_source::SourceError;
use thiserror::Error;

/// Errors that can occur while producing the report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    /// The config file is not valid TOML for [`config::AnalysisConfig`].
    #[error("Invalid config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The config parsed but holds contradictory values.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Reading the config or writing an output failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write summary: {0}")]
    Json(#[from] serde_json::Error),
}
