#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident dataset loading, caching, and export.
//!
//! A dataset is read once from a flat delimited file or a JSON record file
//! and normalized into an ordered, immutable list of [`Incident`]s. Any row
//! with a date that cannot be parsed rejects the whole load, so downstream
//! stages never see records with corrupted calendar fields.
//!
//! [`cache::DatasetCache`] memoizes the loaded dataset per source path and
//! [`export`] writes a (filtered) record set back out in the original
//! tabular layout.

pub mod cache;
pub mod csv_source;
pub mod export;
pub mod json_source;
pub mod parsing;

use std::path::{Path, PathBuf};

use incident_dashboard_incident_models::{Column, Incident};
use thiserror::Error;

/// Errors that can occur while loading a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The source file extension does not map to a known format.
    #[error("Unsupported source format for {}", .path.display())]
    UnsupportedFormat {
        /// Path with the unrecognized extension.
        path: PathBuf,
    },

    /// Delimited parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The JSON document as a whole is malformed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A single JSON record does not have the expected shape.
    #[error("Invalid JSON record {row}: {source}")]
    InvalidRecord {
        /// 1-based record number.
        row: usize,
        /// Underlying deserialization error.
        source: serde_json::Error,
    },

    /// A required column is not present in the header row.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// The absent column.
        column: Column,
    },

    /// A row's date could not be parsed into a calendar date.
    #[error("Invalid date '{value}' in row {row}")]
    InvalidDate {
        /// 1-based data row number.
        row: usize,
        /// Raw date text.
        value: String,
    },

    /// A row's casualty count is not a non-negative whole number.
    #[error("Invalid casualties value '{value}' in row {row}")]
    InvalidCasualties {
        /// 1-based data row number.
        row: usize,
        /// Raw casualty text.
        value: String,
    },
}

/// Errors that can occur while exporting records.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing a CSV record failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// On-disk layout of a dataset source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Header row followed by delimited records.
    Delimited {
        /// Field delimiter byte.
        delimiter: u8,
    },
    /// A JSON array of record objects, or one JSON object per line.
    Json,
}

impl SourceFormat {
    /// Picks the format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::UnsupportedFormat`] for unknown extensions.
    pub fn detect(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("csv") => Ok(Self::Delimited { delimiter: b',' }),
            Some("tsv") => Ok(Self::Delimited { delimiter: b'\t' }),
            Some("json" | "jsonl" | "ndjson") => Ok(Self::Json),
            _ => Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// An immutable, ordered incident collection read from one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    source: PathBuf,
    incidents: Vec<Incident>,
}

impl Dataset {
    #[must_use]
    pub const fn new(source: PathBuf, incidents: Vec<Incident>) -> Self {
        Self { source, incidents }
    }

    /// Path the dataset was loaded from.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Records in source order.
    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }
}

/// Reads and normalizes the dataset at `path`.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read, its format is not
/// recognized, or any row fails to parse.
pub fn load(path: &Path) -> Result<Dataset, LoadError> {
    let format = SourceFormat::detect(path)?;

    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let incidents = match format {
        SourceFormat::Delimited { delimiter } => csv_source::parse(&contents, delimiter)?,
        SourceFormat::Json => json_source::parse(&contents)?,
    };

    log::info!(
        "Loaded {} incidents from {}",
        incidents.len(),
        path.display()
    );

    Ok(Dataset::new(path.to_path_buf(), incidents))
}
