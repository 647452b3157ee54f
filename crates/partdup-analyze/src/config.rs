//! Analyzer configuration.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use partdup_core::ScanConfig;

use crate::error::AnalyzeError;
use crate::grouping::DEFAULT_THRESHOLD;

/// Configuration for duplicate analysis.
///
/// Can be loaded from a TOML file:
///
/// ```toml
/// threshold = 0.9
/// max_groups = 50
/// extensions = ["stl"]
/// ignore_patterns = ["archive", "*.bak.stl"]
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Minimum similarity (inclusive) for two parts to be grouped.
    #[builder(default = "DEFAULT_THRESHOLD")]
    pub threshold: f64,

    /// Maximum number of groups to report (0 = unlimited).
    #[builder(default = "0")]
    pub max_groups: usize,

    /// Mesh file extensions to scan for.
    #[builder(default = "vec![\"stl\".to_string()]")]
    pub extensions: Vec<String>,

    /// Glob patterns for entries to skip while scanning.
    #[builder(default)]
    pub ignore_patterns: Vec<String>,

    /// Follow symbolic links while scanning.
    #[builder(default = "false")]
    pub follow_symlinks: bool,

    /// Number of scanning threads (0 = auto-detect).
    #[builder(default = "0")]
    pub threads: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            max_groups: 0,
            extensions: vec!["stl".to_string()],
            ignore_patterns: Vec::new(),
            follow_symlinks: false,
            threads: 0,
        }
    }
}

impl AnalyzerConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.threshold {
            Some(t) if !valid_threshold(t) => {
                Err(format!("Threshold must be within [0, 1], got {t}"))
            }
            _ => Ok(()),
        }
    }
}

fn valid_threshold(threshold: f64) -> bool {
    (0.0..=1.0).contains(&threshold)
}

impl AnalyzerConfig {
    /// Create a new config builder.
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::default()
    }

    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, AnalyzeError> {
        let config: Self = toml::from_str(text).map_err(|e| AnalyzeError::ConfigParse {
            path: origin.to_path_buf(),
            details: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, AnalyzeError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| AnalyzeError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), AnalyzeError> {
        if !valid_threshold(self.threshold) {
            return Err(AnalyzeError::InvalidThreshold {
                value: self.threshold,
            });
        }
        Ok(())
    }

    /// Override the threshold, validating it.
    pub fn with_threshold(mut self, threshold: f64) -> Result<Self, AnalyzeError> {
        self.threshold = threshold;
        self.validate()?;
        Ok(self)
    }

    /// Build the scan configuration for a root directory.
    pub fn scan_config(&self, root: impl Into<PathBuf>) -> Result<ScanConfig, AnalyzeError> {
        ScanConfig::builder()
            .root(root.into())
            .extensions(self.extensions.clone())
            .ignore_patterns(self.ignore_patterns.clone())
            .follow_symlinks(self.follow_symlinks)
            .threads(self.threads)
            .build()
            .map_err(|e| AnalyzeError::InvalidConfig {
                message: e.to_string(),
            })
    }
}
