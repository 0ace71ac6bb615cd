//! Run configuration, read from an optional TOML file.
//!
//! Every field has a default, so an empty file (or no file at all)
//! reproduces the stock Seattle analysis:
//!
//! ```toml
//! [inputs]
//! reports = "Seattle_Police_Department_Police_Report_Incident.csv"
//! responses = "Seattle_Police_Department_911_Incident_Response.csv"
//! output_dir = "."
//!
//! [filters]
//! min_response_minutes = 1.0
//! max_response_minutes = 300.0
//! invalid_timestamps = "skip"
//!
//! [plots]
//! highlighted_offenses = ["VEHICLE THEFT", "ASSAULT"]
//! ```

use std::path::{Path, PathBuf};

use incident_response_analytics_models::ResponseWindow;
use incident_response_incident_models::{
    DEFAULT_TIMESTAMP_FORMAT, IncidentColumns, InvalidTimestampPolicy,
};
use serde::{Deserialize, Serialize};

use crate::ReportError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub inputs: InputsConfig,
    pub columns: IncidentColumns,
    pub filters: FiltersConfig,
    pub plots: PlotsConfig,
}

/// Where to read the tables and where to put the figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputsConfig {
    /// Police report CSV.
    pub reports: PathBuf,
    /// 911 incident response CSV.
    pub responses: PathBuf,
    /// Directory the PNG files are written to.
    pub output_dir: PathBuf,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            reports: PathBuf::from("Seattle_Police_Department_Police_Report_Incident.csv"),
            responses: PathBuf::from("Seattle_Police_Department_911_Incident_Response.csv"),
            output_dir: PathBuf::from("."),
        }
    }
}

/// Row filtering and timestamp handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiltersConfig {
    /// Exclusive lower bound of the aggregate window, in minutes.
    pub min_response_minutes: f64,
    /// Inclusive upper bound of the aggregate window, in minutes.
    pub max_response_minutes: f64,
    /// `|response time|` above this counts towards the out-of-range ratio.
    pub outlier_minutes: f64,
    /// `chrono` format of both timestamp columns.
    pub timestamp_format: String,
    pub invalid_timestamps: InvalidTimestampPolicy,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            min_response_minutes: 1.0,
            max_response_minutes: 300.0,
            outlier_minutes: 300.0,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            invalid_timestamps: InvalidTimestampPolicy::default(),
        }
    }
}

impl FiltersConfig {
    #[must_use]
    pub const fn window(&self) -> ResponseWindow {
        ResponseWindow {
            min_exclusive: self.min_response_minutes,
            max_inclusive: self.max_response_minutes,
        }
    }
}

/// Figure contents and file names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotsConfig {
    /// Offense types shown in the count bar chart. `0` shows all.
    pub top_offense_types: usize,
    /// Districts shown in the count bar chart. `0` shows all.
    pub top_districts: usize,
    pub histogram_start: f64,
    pub histogram_stop: f64,
    pub bin_width: f64,
    /// Upper bound of the histogram density axis.
    pub density_limit: f64,
    /// Offense types that get their own histogram and scatter panel.
    pub highlighted_offenses: Vec<String>,
    pub overview_file: String,
    pub correlation_file: String,
}

impl Default for PlotsConfig {
    fn default() -> Self {
        Self {
            top_offense_types: 12,
            top_districts: 17,
            histogram_start: -300.0,
            histogram_stop: 300.0,
            bin_width: 10.0,
            density_limit: 0.045,
            highlighted_offenses: vec!["VEHICLE THEFT".to_string(), "ASSAULT".to_string()],
            overview_file: "Plot1.png".to_string(),
            correlation_file: "Plot2.png".to_string(),
        }
    }
}

impl PlotsConfig {
    #[must_use]
    pub const fn offense_type_limit(&self) -> Option<usize> {
        limit(self.top_offense_types)
    }

    #[must_use]
    pub const fn district_limit(&self) -> Option<usize> {
        limit(self.top_districts)
    }
}

const fn limit(n: usize) -> Option<usize> {
    if n == 0 { None } else { Some(n) }
}

impl AnalysisConfig {
    /// Reads and validates a TOML config file.
    ///
    /// # Errors
    ///
    /// * [`ReportError::Io`] if the file cannot be read
    /// * [`ReportError::ConfigParse`] if it is not valid config TOML
    /// * [`ReportError::InvalidConfig`] if [`Self::validate`] rejects it
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let text = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml_str(&text).map_err(|source| ReportError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        log::debug!("Loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Parses config TOML without validating it.
    ///
    /// # Errors
    ///
    /// Returns the `toml` error if the text does not deserialize.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Checks the numeric settings for consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<(), ReportError> {
        let invalid = |message: String| Err(ReportError::InvalidConfig { message });

        let filters = &self.filters;
        if filters.min_response_minutes >= filters.max_response_minutes {
            return invalid(format!(
                "min_response_minutes ({}) must be below max_response_minutes ({})",
                filters.min_response_minutes, filters.max_response_minutes
            ));
        }
        if filters.outlier_minutes.is_nan() || filters.outlier_minutes < 0.0 {
            return invalid(format!(
                "outlier_minutes must be non-negative, got {}",
                filters.outlier_minutes
            ));
        }
        if filters.timestamp_format.trim().is_empty() {
            return invalid("timestamp_format is empty".to_string());
        }

        let plots = &self.plots;
        if plots.bin_width.is_nan() || plots.bin_width <= 0.0 {
            return invalid(format!("bin_width must be positive, got {}", plots.bin_width));
        }
        if plots.histogram_start >= plots.histogram_stop {
            return invalid(format!(
                "histogram_start ({}) must be below histogram_stop ({})",
                plots.histogram_start, plots.histogram_stop
            ));
        }
        if plots.density_limit.is_nan() || plots.density_limit <= 0.0 {
            return invalid(format!(
                "density_limit must be positive, got {}",
                plots.density_limit
            ));
        }
        if let Some(blank) = plots.highlighted_offenses.iter().find(|o| o.trim().is_empty()) {
            return invalid(format!("highlighted offense name '{blank}' is blank"));
        }

        Ok(())
    }

    /// Path of the overview figure.
    #[must_use]
    pub fn overview_path(&self) -> PathBuf {
        self.inputs.output_dir.join(&self.plots.overview_file)
    }

    /// Path of the correlation figure.
    #[must_use]
    pub fn correlation_path(&self) -> PathBuf {
        self.inputs.output_dir.join(&self.plots.correlation_file)
    }
}
