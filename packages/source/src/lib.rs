#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loading and joining of the police report and 911 response tables.
//!
//! [`table::CsvTable`] reads a CSV file and projects the columns the
//! analysis needs, [`join::join_incidents`] deduplicates both tables on the
//! offense number and inner-joins them, and [`parsing::parse_incidents`]
//! turns the joined rows into [`Incident`]s with a response time.

pub mod join;
pub mod parsing;
pub mod progress;
pub mod table;

use std::path::PathBuf;

pub use incident_response_incident_models::Incident;

/// Errors that can occur while loading the source tables.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The input file could not be opened or read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the input.
    #[error("CSV error in {table}: {source}")]
    Csv {
        /// Label of the table being read.
        table: String,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// A required column is not present in the header row.
    #[error("{table} has no column named '{column}'")]
    MissingColumn {
        /// Label of the table being read.
        table: String,
        /// Column that was expected.
        column: String,
    },

    /// A timestamp did not match the expected format.
    #[error("Offense {offense_id}: cannot parse {column} value '{value}' with format '{format}'")]
    InvalidTimestamp {
        /// Join key of the offending row.
        offense_id: String,
        /// Column holding the bad value.
        column: String,
        /// The raw value.
        value: String,
        /// The `chrono` format string that was tried.
        format: String,
    },
}
