//! Similarity scoring and duplicate grouping for partdup.
//!
//! This crate turns geometric signatures into groups of likely duplicate
//! parts:
//!
//! - **Similarity** - a weighted ratio score over volume, surface area and
//!   bounding box extents, with an exact-match fast path on the geometry hash
//! - **Grouping** - greedy seed-based clustering at an inclusive threshold
//! - **Analysis** - discovery, parallel extraction and reporting, with
//!   per-file failures collected instead of aborting the run
//!
//! # Grouping
//!
//! ```rust
//! use partdup_analyze::DuplicateGrouper;
//! use partdup_core::{BoundingBox, GeometryHash, Signature};
//!
//! let bracket = Signature::new(
//!     BoundingBox::from_array([0.0, 0.0, 0.0, 10.0, 5.0, 2.0]),
//!     100.0,
//!     220.0,
//!     GeometryHash::from_label("bracket"),
//! );
//!
//! let items = vec![("a.stl", bracket.clone()), ("b.stl", bracket)];
//! let groups = DuplicateGrouper::new().group(&items, 0.95);
//! assert_eq!(groups, vec![vec!["a.stl", "b.stl"]]);
//! ```
//!
//! # Analysis
//!
//! ```rust,no_run
//! use partdup_analyze::ComponentAnalyzer;
//!
//! let mut analyzer = ComponentAnalyzer::new();
//! analyzer.scan_directory("/path/to/library").unwrap();
//!
//! let report = analyzer.report();
//! for group in &report.groups {
//!     println!("{} similar parts across {:?}", group.count(), group.projects);
//! }
//! for failure in &report.failures {
//!     eprintln!("{}: {}", failure.path.display(), failure.message);
//! }
//! ```

mod analyzer;
mod config;
mod error;
mod grouping;
mod report;
pub mod similarity;

pub use analyzer::ComponentAnalyzer;
pub use config::{AnalyzerConfig, AnalyzerConfigBuilder};
pub use error::AnalyzeError;
pub use grouping::{DEFAULT_THRESHOLD, DuplicateGrouper};
pub use report::{DuplicateGroup, DuplicateReport, ExtractionFailure, GroupMember};
pub use similarity::{SimilarityBreakdown, SimilarityScorer};

// Re-export core types
pub use partdup_core::{BoundingBox, Component, ComponentMetadata, GeometryHash, Signature};
