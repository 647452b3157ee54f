//! Handler registry keyed by file extension.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use partdup_core::{Component, normalize_extension};

use crate::error::{MeshError, MeshResult};
use crate::handler::MeshHandler;
use crate::stl::StlHandler;

/// Dispatches files to the handler registered for their extension.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn MeshHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in handler.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(StlHandler::new()));
        registry
    }

    /// Register a handler for each of its extensions.
    ///
    /// A later registration replaces an earlier one for the same extension.
    pub fn register(&mut self, handler: Arc<dyn MeshHandler>) {
        for ext in handler.extensions() {
            self.handlers
                .insert(normalize_extension(ext), Arc::clone(&handler));
        }
    }

    /// Find the handler for a path.
    pub fn handler_for(&self, path: &Path) -> Option<&dyn MeshHandler> {
        let ext = normalize_extension(path.extension()?.to_str()?);
        self.handlers.get(&ext).map(|h| h.as_ref())
    }

    /// Extract a component using the matching handler.
    pub fn extract(&self, path: &Path, project_id: &str) -> MeshResult<Component> {
        let handler = self
            .handler_for(path)
            .ok_or_else(|| MeshError::UnsupportedFormat {
                extension: path.extension().and_then(|e| e.to_str()).map(String::from),
            })?;
        handler.extract(path, project_id)
    }

    /// All registered extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<String> {
        let mut exts: Vec<String> = self.handlers.keys().cloned().collect();
        exts.sort();
        exts
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("extensions", &self.supported_extensions())
            .finish()
    }
}
