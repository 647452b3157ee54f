//! Component analysis: discovery, extraction and grouping.

use std::path::{Path, PathBuf};
use std::time::Instant;

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use partdup_core::{Component, Inventory, ScanConfig, Signature};
use partdup_mesh::{HandlerRegistry, MeshResult};
use partdup_scan::{JwalkScanner, infer_project};

use crate::config::AnalyzerConfig;
use crate::error::AnalyzeError;
use crate::grouping::DuplicateGrouper;
use crate::report::{DuplicateGroup, DuplicateReport, ExtractionFailure, GroupMember};
use crate::similarity::SimilarityBreakdown;

/// Collects components from mesh files and finds likely duplicates.
///
/// Components are kept in the order they were added, which is the order
/// the grouper sees them. After a directory scan that is sorted path order.
#[derive(Debug)]
pub struct ComponentAnalyzer {
    config: AnalyzerConfig,
    registry: HandlerRegistry,
    grouper: DuplicateGrouper,
    components: IndexMap<PathBuf, Component>,
    failures: Vec<ExtractionFailure>,
}

impl ComponentAnalyzer {
    /// Create an analyzer with the default configuration and handlers.
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    /// Create an analyzer with a specific configuration.
    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self {
            config,
            registry: HandlerRegistry::with_defaults(),
            grouper: DuplicateGrouper::new(),
            components: IndexMap::new(),
            failures: Vec::new(),
        }
    }

    /// Replace the handler registry.
    pub fn with_registry(mut self, registry: HandlerRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// All components, in insertion order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    /// Look up a component by path.
    pub fn component(&self, path: &Path) -> Option<&Component> {
        self.components.get(path)
    }

    /// Number of components loaded.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Files that failed extraction during scans.
    pub fn failures(&self) -> &[ExtractionFailure] {
        &self.failures
    }

    /// Drop all components and failures.
    pub fn clear(&mut self) {
        self.components.clear();
        self.failures.clear();
    }

    /// Extract a single file and add it.
    ///
    /// The project is inferred from `path` relative to `root`. Re-processing
    /// a path replaces its component in place. Errors are returned, not
    /// recorded as failures.
    pub fn process_file(&mut self, path: &Path, root: &Path) -> MeshResult<&Component> {
        let project_id = infer_project(path, root);
        let component = self.registry.extract(path, &project_id)?;
        debug!(path = %path.display(), project = %project_id, "component extracted");

        let (index, _) = self.components.insert_full(path.to_path_buf(), component);
        Ok(&self.components[index])
    }

    /// Scan a directory using the analyzer's configuration.
    pub fn scan_directory(&mut self, root: impl Into<PathBuf>) -> Result<Inventory, AnalyzeError> {
        let scan_config = self.config.scan_config(root)?;
        self.scan(&scan_config)
    }

    /// Discover mesh files and extract every one in parallel.
    ///
    /// A file that cannot be extracted is recorded as an
    /// [`ExtractionFailure`] and the rest of the batch continues. Rescanning
    /// a path replaces its earlier outcome, so a path is never both a
    /// component and a failure.
    pub fn scan(&mut self, scan_config: &ScanConfig) -> Result<Inventory, AnalyzeError> {
        let inventory = JwalkScanner::new().scan(scan_config)?;
        let start = Instant::now();

        let registry = &self.registry;
        let results: Vec<(PathBuf, MeshResult<Component>)> = inventory
            .files
            .par_iter()
            .map(|file| {
                (
                    file.path.clone(),
                    registry.extract(&file.path, &file.project_id),
                )
            })
            .collect();

        let mut extracted = 0usize;
        let mut failed = 0usize;
        for (path, result) in results {
            self.failures.retain(|f| f.path != path);
            match result {
                Ok(component) => {
                    self.components.insert(path, component);
                    extracted += 1;
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "failed to extract component");
                    self.components.shift_remove(&path);
                    self.failures.push(ExtractionFailure::new(path, err.to_string()));
                    failed += 1;
                }
            }
        }

        info!(
            root = %inventory.root_path.display(),
            extracted,
            failed,
            "extraction complete in {:.2}s",
            start.elapsed().as_secs_f64()
        );

        Ok(inventory)
    }

    /// `(path, signature)` pairs in insertion order.
    pub fn signatures(&self) -> Vec<(PathBuf, Signature)> {
        self.components
            .iter()
            .map(|(path, c)| (path.clone(), c.signature.clone()))
            .collect()
    }

    /// Group loaded components at `threshold`.
    pub fn find_duplicates(&self, threshold: f64) -> Vec<Vec<PathBuf>> {
        let groups = self.grouper.group(&self.signatures(), threshold);
        info!(
            components = self.components.len(),
            groups = groups.len(),
            threshold,
            "grouping complete"
        );
        groups
    }

    /// Build a report at the configured threshold.
    pub fn report(&self) -> DuplicateReport {
        self.report_with_threshold(self.config.threshold)
    }

    /// Build a report at `threshold`, capped at the configured `max_groups`.
    pub fn report_with_threshold(&self, threshold: f64) -> DuplicateReport {
        let path_groups = self.find_duplicates(threshold);
        let group_count = path_groups.len();
        let files_with_duplicates = path_groups.iter().map(Vec::len).sum();

        let limit = match self.config.max_groups {
            0 => usize::MAX,
            n => n,
        };

        let groups = path_groups
            .into_iter()
            .take(limit)
            .filter_map(|paths| self.build_group(&paths))
            .collect();

        DuplicateReport {
            groups,
            threshold,
            components_analyzed: self.components.len(),
            files_with_duplicates,
            group_count,
            failures: self.failures.clone(),
        }
    }

    fn build_group(&self, paths: &[PathBuf]) -> Option<DuplicateGroup> {
        let seed = self.components.get(paths.first()?)?;
        let scorer = self.grouper.scorer();

        let members = paths
            .iter()
            .filter_map(|path| self.components.get(path))
            .map(|c| GroupMember {
                path: c.metadata.file_path.clone(),
                project_id: c.metadata.project_id.clone(),
                volume: c.signature.volume,
                score_to_seed: scorer.score(&seed.signature, &c.signature),
            })
            .collect();

        Some(DuplicateGroup::new(members))
    }

    /// Similarity breakdown between two loaded components.
    pub fn compare(&self, a: &Path, b: &Path) -> Option<SimilarityBreakdown> {
        let a = self.components.get(a)?;
        let b = self.components.get(b)?;
        Some(
            self.grouper
                .scorer()
                .score_breakdown(&a.signature, &b.signature),
        )
    }
}

impl Default for ComponentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
