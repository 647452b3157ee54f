//! Error types for analysis.

use std::path::PathBuf;

use thiserror::Error;

use partdup_core::ScanError;

/// Errors that stop an analysis run.
///
/// Per-file extraction problems are not errors here; they are collected as
/// [`ExtractionFailure`](crate::ExtractionFailure)s in the report.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Discovery failed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`AnalyzerConfig`](crate::AnalyzerConfig).
    #[error("Invalid config {path}: {details}")]
    ConfigParse { path: PathBuf, details: String },

    /// Threshold outside `[0, 1]`.
    #[error("Threshold must be within [0, 1], got {value}")]
    InvalidThreshold { value: f64 },

    /// Any other invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}
