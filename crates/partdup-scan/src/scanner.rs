//! JWalk-based parallel mesh file discovery.

use std::path::Path;
use std::time::{Duration, Instant};

use jwalk::{Parallelism, WalkDir};
use tokio::sync::broadcast;
use tracing::{debug, info};

use partdup_core::{
    DiscoveredFile, Inventory, ScanConfig, ScanError, ScanStats, ScanWarning, WarningKind,
};

use crate::inode::{InodeInfo, InodeTracker};
use crate::progress::ScanProgress;
use crate::project::infer_project;

/// Send a progress update every this many visited entries.
const PROGRESS_INTERVAL: u64 = 500;

/// High-performance scanner using jwalk for parallel traversal.
pub struct JwalkScanner {
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl JwalkScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self { progress_tx }
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Discover all mesh files below the configured root.
    pub fn scan(&self, config: &ScanConfig) -> Result<Inventory, ScanError> {
        let start = Instant::now();
        let root_path = config
            .root
            .canonicalize()
            .map_err(|e| ScanError::io(&config.root, e))?;

        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory { path: root_path });
        }

        let ignore = config.ignore_matcher()?;
        let inode_tracker = InodeTracker::new();
        let mut stats = ScanStats::new();
        let mut warnings = Vec::new();
        let mut files = Vec::new();

        let parallelism = match config.threads {
            0 => Parallelism::RayonDefaultPool {
                busy_timeout: Duration::from_millis(100),
            },
            n => Parallelism::RayonNewPool(n),
        };

        // Prune ignored entries before jwalk descends into them.
        let walker = WalkDir::new(&root_path)
            .parallelism(parallelism)
            .sort(true)
            .skip_hidden(!config.include_hidden)
            .follow_links(config.follow_symlinks)
            .min_depth(1)
            .max_depth(config.max_depth.map(|d| d as usize).unwrap_or(usize::MAX))
            .process_read_dir(move |_depth, _path, _state, children| {
                children.retain(|entry| match entry {
                    Ok(e) => !ignore.is_match(e.file_name()),
                    Err(_) => true,
                });
            });

        let mut visited: u64 = 0;

        for entry_result in walker {
            visited += 1;

            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    let kind = match err.io_error().map(|e| e.kind()) {
                        Some(std::io::ErrorKind::PermissionDenied) => WarningKind::PermissionDenied,
                        _ => WarningKind::ReadError,
                    };
                    warnings.push(ScanWarning::new(path, err.to_string(), kind));
                    continue;
                }
            };

            let path = entry.path();
            let file_type = entry.file_type();
            let depth = entry.depth() as u32;

            if visited % PROGRESS_INTERVAL == 0 {
                self.publish(&stats, &warnings, &path, visited, start);
            }

            if file_type.is_dir() {
                stats.record_dir(depth);
                continue;
            }

            if !file_type.is_file() || !config.is_mesh_file(&path) {
                stats.record_skipped();
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(err) => {
                    warnings.push(ScanWarning::new(
                        &path,
                        err.to_string(),
                        WarningKind::MetadataError,
                    ));
                    continue;
                }
            };

            if let Some(inode) = InodeInfo::from_metadata(&metadata) {
                if !inode_tracker.track(inode) {
                    debug!(path = %path.display(), "skipping already discovered file");
                    warnings.push(ScanWarning::already_seen(&path));
                    continue;
                }
            }

            let size = metadata.len();
            stats.record_mesh_file(path.clone(), size, depth);
            let project_id = infer_project(&path, &root_path);
            files.push(DiscoveredFile::new(path, size, project_id));
        }

        let scan_duration = start.elapsed();
        info!(
            root = %root_path.display(),
            mesh_files = stats.mesh_files,
            warnings = warnings.len(),
            "scan complete in {:.2}s",
            scan_duration.as_secs_f64()
        );

        Ok(Inventory::new(
            root_path,
            files,
            config.clone(),
            stats,
            scan_duration,
            warnings,
        ))
    }

    /// Send a progress snapshot. Nobody listening is fine.
    fn publish(
        &self,
        stats: &ScanStats,
        warnings: &[ScanWarning],
        current: &Path,
        visited: u64,
        start: Instant,
    ) {
        let _ = self.progress_tx.send(ScanProgress {
            entries_visited: visited,
            mesh_files_found: stats.mesh_files,
            current_path: current.to_path_buf(),
            warnings_count: warnings.len() as u64,
            elapsed: start.elapsed(),
        });
    }
}

impl Default for JwalkScanner {
    fn default() -> Self {
        Self::new()
    }
}
