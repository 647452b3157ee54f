//! Mesh file discovery for partdup.
//!
//! This crate walks a directory tree in parallel using jwalk and collects
//! every file whose extension marks it as a mesh.
//!
//! # Overview
//!
//! - **Parallel traversal** via jwalk/rayon
//! - **Extension filtering** (case-insensitive, `stl` by default)
//! - **Project inference** from the first directory below the root
//! - **Link deduplication** so hardlinks are listed once
//! - **Progress updates** via broadcast channels
//!
//! # Example
//!
//! ```rust,no_run
//! use partdup_scan::{JwalkScanner, ScanConfig};
//!
//! let config = ScanConfig::new("/path/to/library");
//! let inventory = JwalkScanner::new().scan(&config).unwrap();
//!
//! for file in &inventory.files {
//!     println!("{} ({})", file.path.display(), file.project_id);
//! }
//! ```

mod inode;
mod progress;
mod project;
mod scanner;

pub use inode::{InodeInfo, InodeTracker};
pub use progress::ScanProgress;
pub use project::infer_project;
pub use scanner::JwalkScanner;

// Re-export core types for convenience
pub use partdup_core::{
    DiscoveredFile, Inventory, ScanConfig, ScanError, ScanStats, ScanWarning, WarningKind,
};
