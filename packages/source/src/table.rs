//! CSV table reader.
//!
//! Reads a whole CSV file into memory, keeping only the requested columns
//! (in the requested order). Empty or whitespace-only cells are stored as
//! `None` so that downstream code can treat them as missing values.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::SourceError;
use crate::progress::ProgressCallback;

/// How often (in rows) the byte position is pushed to the progress bar.
const PROGRESS_INTERVAL: usize = 10_000;

/// A projected, in-memory CSV table.
#[derive(Debug, Clone)]
pub struct CsvTable {
    label: String,
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

/// Rows removed by [`CsvTable::dedup_by`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DedupStats {
    /// Rows dropped because an earlier row had the same key.
    pub duplicates: usize,
    /// Rows dropped because the key cell was empty.
    pub missing_keys: usize,
}

impl CsvTable {
    /// Opens `path` and reads it with [`Self::from_reader`]. The file size
    /// is used as the progress total.
    ///
    /// # Errors
    ///
    /// * [`SourceError::Io`] if the file cannot be opened
    /// * anything [`Self::from_reader`] returns
    pub fn from_path(
        path: &Path,
        columns: &[&str],
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if let Ok(metadata) = file.metadata() {
            progress.set_total(metadata.len());
        }

        Self::from_reader(file, &path.display().to_string(), columns, progress)
    }

    /// Reads CSV data with a header row from `reader`, keeping `columns`.
    ///
    /// `label` names the table in log lines and errors. Rows shorter than
    /// the header are accepted; their missing trailing cells read as `None`.
    ///
    /// # Errors
    ///
    /// * [`SourceError::Csv`] if the data is not valid CSV
    /// * [`SourceError::MissingColumn`] if a requested column is absent
    pub fn from_reader<R: Read>(
        reader: R,
        label: &str,
        columns: &[&str],
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<Self, SourceError> {
        let csv_error = |source| SourceError::Csv {
            table: label.to_string(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(|h| h.trim().to_owned())
            .collect();

        let indices = columns
            .iter()
            .map(|column| {
                headers
                    .iter()
                    .position(|h| h == column)
                    .ok_or_else(|| SourceError::MissingColumn {
                        table: label.to_string(),
                        column: (*column).to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut rows = Vec::new();
        let mut record = csv::StringRecord::new();

        while reader.read_record(&mut record).map_err(csv_error)? {
            rows.push(indices.iter().map(|&i| cell(record.get(i))).collect());

            if rows.len() % PROGRESS_INTERVAL == 0 {
                progress.set_position(record.position().map_or(0, csv::Position::byte));
                progress.set_message(format!("{label}: {} rows", rows.len()));
            }
        }

        log::info!("[{label}] Read {} rows", rows.len());
        progress.finish(format!("{label}: {} rows", rows.len()));

        Ok(Self {
            label: label.to_string(),
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            rows,
        })
    }

    /// Human-readable table name.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Projected column names, in storage order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of `name` among the projected columns.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keeps only the first row for each distinct value of column `key`.
    /// Rows with an empty key are dropped as well.
    pub fn dedup_by(&mut self, key: usize) -> DedupStats {
        let mut seen = HashSet::new();
        let mut stats = DedupStats::default();

        self.rows.retain(|row| match row.get(key).and_then(Option::as_deref) {
            None => {
                stats.missing_keys += 1;
                false
            }
            Some(value) => {
                if seen.insert(value.to_owned()) {
                    true
                } else {
                    stats.duplicates += 1;
                    false
                }
            }
        });

        if stats.missing_keys > 0 {
            log::warn!(
                "[{}] Dropped {} rows with an empty key",
                self.label,
                stats.missing_keys
            );
        }
        log::debug!(
            "[{}] Dropped {} duplicate rows, {} remain",
            self.label,
            stats.duplicates,
            self.rows.len()
        );

        stats
    }
}

fn cell(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}
