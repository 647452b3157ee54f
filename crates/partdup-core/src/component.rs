//! Component metadata and extracted components.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::signature::Signature;

/// Project name used when none can be inferred from the path.
pub const UNKNOWN_PROJECT: &str = "Unknown";

/// Descriptive information about a component file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentMetadata {
    /// Full path to the mesh file.
    pub file_path: PathBuf,

    /// File name (not full path).
    pub file_name: CompactString,

    /// Project the component belongs to.
    pub project_id: CompactString,

    /// Part number, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,

    /// Free-form description (e.g. an ASCII STL solid name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Material name, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,

    /// Weight, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Volume, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl ComponentMetadata {
    /// Create metadata with only the required fields.
    pub fn new(
        file_path: impl Into<PathBuf>,
        file_name: impl Into<CompactString>,
        project_id: impl Into<CompactString>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            file_name: file_name.into(),
            project_id: project_id.into(),
            part_number: None,
            description: None,
            material: None,
            weight: None,
            volume: None,
        }
    }

    /// Set the part number.
    pub fn with_part_number(mut self, part_number: impl Into<String>) -> Self {
        self.part_number = Some(part_number.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the material.
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }

    /// Set the weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Set the volume.
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Check if the project could not be inferred.
    pub fn has_unknown_project(&self) -> bool {
        self.project_id == UNKNOWN_PROJECT
    }
}

/// A component file with its metadata and geometric signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Descriptive metadata.
    pub metadata: ComponentMetadata,
    /// Geometric fingerprint.
    pub signature: Signature,
}

impl Component {
    /// Create a new component.
    pub fn new(metadata: ComponentMetadata, signature: Signature) -> Self {
        Self {
            metadata,
            signature,
        }
    }

    /// Path identifying this component.
    pub fn path(&self) -> &Path {
        &self.metadata.file_path
    }
}
