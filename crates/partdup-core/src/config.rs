//! Scan configuration types.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Configuration for discovering mesh files.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root path to scan.
    pub root: PathBuf,

    /// File extensions treated as mesh files (case-insensitive, no dot).
    #[builder(default = "default_extensions()")]
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Follow symbolic links.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Maximum depth to traverse (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<u32>,

    /// Glob patterns matched against entry names to skip.
    #[builder(default)]
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Number of threads for scanning (0 = auto-detect).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,

    /// Include hidden files (starting with .).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,
}

fn default_true() -> bool {
    true
}

fn default_extensions() -> Vec<String> {
    vec!["stl".to_string()]
}

/// Normalize an extension: lower-case, without a leading dot.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.as_os_str().is_empty() => {
                return Err("Root path cannot be empty".to_string());
            }
            None => return Err("Root path is required".to_string()),
            _ => {}
        }
        if let Some(ref extensions) = self.extensions {
            if extensions.iter().all(|e| normalize_extension(e).is_empty()) {
                return Err("At least one file extension is required".to_string());
            }
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple config for scanning a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: default_extensions(),
            follow_symlinks: false,
            max_depth: None,
            ignore_patterns: Vec::new(),
            threads: 0,
            include_hidden: true,
        }
    }

    /// Check whether a path carries one of the configured mesh extensions.
    pub fn is_mesh_file(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let ext = ext.to_lowercase();
        self.extensions
            .iter()
            .any(|candidate| normalize_extension(candidate) == ext)
    }

    /// Compile the ignore patterns into a matcher.
    pub fn ignore_matcher(&self) -> Result<GlobSet, ScanError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.ignore_patterns {
            let glob = Glob::new(pattern).map_err(|e| ScanError::InvalidConfig {
                message: format!("bad ignore pattern '{pattern}': {e}"),
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|e| ScanError::InvalidConfig {
            message: e.to_string(),
        })
    }

    /// Check if hidden files should be skipped.
    pub fn should_skip_hidden(&self, name: &str) -> bool {
        !self.include_hidden && name.starts_with('.')
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ScanConfig::builder()
            .root("/parts")
            .threads(4usize)
            .follow_symlinks(true)
            .build()
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/parts"));
        assert_eq!(config.threads, 4);
        assert!(config.follow_symlinks);
        assert_eq!(config.extensions, vec!["stl".to_string()]);
    }

    #[test]
    fn test_builder_requires_root() {
        assert!(ScanConfig::builder().build().is_err());
        assert!(ScanConfig::builder().root("").build().is_err());
    }

    #[test]
    fn test_builder_rejects_empty_extensions() {
        let result = ScanConfig::builder()
            .root("/parts")
            .extensions(vec![".".to_string()])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_is_mesh_file_case_insensitive() {
        let config = ScanConfig::new("/parts");
        assert!(config.is_mesh_file(Path::new("test.stl")));
        assert!(config.is_mesh_file(Path::new("test.STL")));
        assert!(config.is_mesh_file(Path::new("bracket.stl")));
        assert!(!config.is_mesh_file(Path::new("test.txt")));
        assert!(!config.is_mesh_file(Path::new("stl")));
    }

    #[test]
    fn test_custom_extensions_with_dots() {
        let config = ScanConfig::builder()
            .root("/parts")
            .extensions(vec![".stl".to_string(), ".OBJ".to_string(), "ply".to_string()])
            .build()
            .unwrap();

        assert!(config.is_mesh_file(Path::new("a.obj")));
        assert!(config.is_mesh_file(Path::new("a.PLY")));
        assert!(!config.is_mesh_file(Path::new("a.step")));
    }

    #[test]
    fn test_ignore_matcher() {
        let config = ScanConfig::builder()
            .root("/parts")
            .ignore_patterns(vec!["archive".to_string(), "*.bak.stl".to_string()])
            .build()
            .unwrap();

        let matcher = config.ignore_matcher().unwrap();
        assert!(matcher.is_match("archive"));
        assert!(matcher.is_match("bracket.bak.stl"));
        assert!(!matcher.is_match("bracket.stl"));
    }

    #[test]
    fn test_ignore_matcher_bad_pattern() {
        let mut config = ScanConfig::new("/parts");
        config.ignore_patterns.push("[".to_string());
        assert!(matches!(
            config.ignore_matcher(),
            Err(ScanError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_should_skip_hidden() {
        let mut config = ScanConfig::new("/parts");
        assert!(!config.should_skip_hidden(".git"));

        config.include_hidden = false;
        assert!(config.should_skip_hidden(".git"));
        assert!(!config.should_skip_hidden("src"));
    }
}
