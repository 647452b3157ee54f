//! Scan results: discovered mesh files and summary statistics.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::config::ScanConfig;
use crate::error::ScanWarning;

/// A mesh file found during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredFile {
    /// Full path to the file.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Project inferred from the path relative to the scan root.
    pub project_id: CompactString,
}

impl DiscoveredFile {
    /// Create a new discovered file entry.
    pub fn new(path: impl Into<PathBuf>, size: u64, project_id: impl Into<CompactString>) -> Self {
        Self {
            path: path.into(),
            size,
            project_id: project_id.into(),
        }
    }
}

/// Summary statistics for a scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// Number of mesh files found.
    pub mesh_files: u64,
    /// Total size of mesh files in bytes.
    pub total_size: u64,
    /// Number of directories visited.
    pub dirs_visited: u64,
    /// Number of non-mesh files skipped.
    pub skipped_files: u64,
    /// Maximum depth reached.
    pub max_depth: u32,
    /// Largest mesh file (path, size).
    pub largest_file: Option<(PathBuf, u64)>,
}

impl ScanStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mesh file.
    pub fn record_mesh_file(&mut self, path: PathBuf, size: u64, depth: u32) {
        self.mesh_files += 1;
        self.total_size += size;
        self.max_depth = self.max_depth.max(depth);

        if self.largest_file.as_ref().is_none_or(|(_, s)| size > *s) {
            self.largest_file = Some((path, size));
        }
    }

    /// Record a file that was not a mesh.
    pub fn record_skipped(&mut self) {
        self.skipped_files += 1;
    }

    /// Record a directory.
    pub fn record_dir(&mut self, depth: u32) {
        self.dirs_visited += 1;
        self.max_depth = self.max_depth.max(depth);
    }
}

/// Complete scan result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    /// Root path that was scanned.
    pub root_path: PathBuf,

    /// Mesh files found, sorted by path.
    pub files: Vec<DiscoveredFile>,

    /// When this scan was performed.
    pub scanned_at: SystemTime,

    /// Duration of the scan.
    pub scan_duration: Duration,

    /// Scan configuration used.
    pub config: ScanConfig,

    /// Summary statistics.
    pub stats: ScanStats,

    /// Warnings encountered during scan.
    pub warnings: Vec<ScanWarning>,
}

impl Inventory {
    /// Create a new inventory. Files are sorted by path.
    pub fn new(
        root_path: PathBuf,
        mut files: Vec<DiscoveredFile>,
        config: ScanConfig,
        stats: ScanStats,
        scan_duration: Duration,
        warnings: Vec<ScanWarning>,
    ) -> Self {
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Self {
            root_path,
            files,
            scanned_at: SystemTime::now(),
            scan_duration,
            config,
            stats,
            warnings,
        }
    }

    /// Number of mesh files found.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if no mesh files were found.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check if there were any warnings during scanning.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
