//! Error types for mesh loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while extracting a signature from a mesh file.
#[derive(Debug, Error)]
pub enum MeshError {
    /// No handler supports this file.
    #[error("Unsupported mesh format: {}", .extension.as_deref().unwrap_or("<none>"))]
    UnsupportedFormat { extension: Option<String> },

    /// The file could not be read.
    #[error("Failed to read {path}: {source}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not a valid mesh.
    #[error("Failed to parse {path}: {details}")]
    Parse { path: PathBuf, details: String },

    /// The mesh contains no triangles.
    #[error("Mesh has no triangles: {path}")]
    EmptyMesh { path: PathBuf },
}

/// Result alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;
