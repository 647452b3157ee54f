//! The mesh handler capability set.

use std::path::Path;

use partdup_core::{Component, ComponentMetadata, Signature};

use crate::error::MeshResult;

/// A mesh format that can be fingerprinted.
///
/// Implementations are looked up by file extension through a
/// [`HandlerRegistry`](crate::HandlerRegistry).
pub trait MeshHandler: Send + Sync {
    /// Human-readable format name.
    fn format_name(&self) -> &'static str;

    /// Lower-case extensions (without dot) this handler accepts.
    fn extensions(&self) -> &[&'static str];

    /// Check if this handler supports the file, by extension.
    fn can_handle(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .is_some_and(|e| self.extensions().contains(&e.as_str()))
    }

    /// Extract the geometric signature of the file.
    fn extract_signature(&self, path: &Path) -> MeshResult<Signature>;

    /// Extract descriptive metadata for the file.
    fn metadata(&self, path: &Path, project_id: &str) -> MeshResult<ComponentMetadata>;

    /// Extract metadata and signature together.
    fn extract(&self, path: &Path, project_id: &str) -> MeshResult<Component> {
        let signature = self.extract_signature(path)?;
        let metadata = self.metadata(path, project_id)?.with_volume(signature.volume);
        Ok(Component::new(metadata, signature))
    }
}
