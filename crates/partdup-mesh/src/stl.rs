//! STL (ASCII and binary) handler.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use nalgebra::Point3;
use tracing::debug;

use partdup_core::{ComponentMetadata, Signature};

use crate::error::{MeshError, MeshResult};
use crate::handler::MeshHandler;
use crate::hash::geometry_hash;
use crate::measure::{self, Triangle};

/// Bytes inspected when looking for an ASCII solid name.
const HEADER_PROBE: usize = 512;

/// Handler for STL files, backed by `stl_io`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StlHandler;

impl StlHandler {
    /// Create a new STL handler.
    pub fn new() -> Self {
        Self
    }

    /// Load every triangle of the file as raw `f32` corners.
    fn load_triangles(&self, path: &Path) -> MeshResult<Vec<[[f32; 3]; 3]>> {
        let file = File::open(path).map_err(|e| MeshError::IoRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut reader = BufReader::new(file);

        let stl = stl_io::read_stl(&mut reader).map_err(|e| MeshError::Parse {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

        debug!(
            path = %path.display(),
            vertices = stl.vertices.len(),
            triangles = stl.faces.len(),
            "loaded STL"
        );

        if stl.faces.is_empty() {
            return Err(MeshError::EmptyMesh {
                path: path.to_path_buf(),
            });
        }

        if stl.vertices.iter().flat_map(|v| v.0).any(|c| !c.is_finite()) {
            return Err(MeshError::Parse {
                path: path.to_path_buf(),
                details: "non-finite vertex coordinate".to_string(),
            });
        }

        Ok(stl
            .faces
            .iter()
            .map(|face| face.vertices.map(|i| stl.vertices[i].0))
            .collect())
    }

    /// Read the name of an ASCII STL solid, if there is one.
    fn solid_name(&self, path: &Path) -> MeshResult<Option<String>> {
        let file = File::open(path).map_err(|e| MeshError::IoRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut probe = Vec::with_capacity(HEADER_PROBE);
        file.take(HEADER_PROBE as u64)
            .read_to_end(&mut probe)
            .map_err(|e| MeshError::IoRead {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(parse_solid_name(&probe))
    }
}

/// Extract the solid name from the start of an ASCII STL.
///
/// Binary STL headers may also begin with `solid`, so the probe must look
/// like text and mention `facet` or `endsolid` as well.
fn parse_solid_name(probe: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(probe).ok().or_else(|| {
        // The probe may cut a multi-byte character in half.
        let valid = std::str::from_utf8(probe).err()?.valid_up_to();
        std::str::from_utf8(&probe[..valid]).ok()
    })?;

    let first_line = text.lines().next()?.trim();
    let name = first_line.strip_prefix("solid")?;
    if !(text.contains("facet") || text.contains("endsolid")) {
        return None;
    }
    if first_line.chars().any(|c| c.is_control()) {
        return None;
    }

    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

impl MeshHandler for StlHandler {
    fn format_name(&self) -> &'static str {
        "STL"
    }

    fn extensions(&self) -> &[&'static str] {
        &["stl"]
    }

    fn extract_signature(&self, path: &Path) -> MeshResult<Signature> {
        let raw = self.load_triangles(path)?;
        let geometric_hash = geometry_hash(raw.iter());

        let triangles: Vec<Triangle> = raw
            .iter()
            .map(|corners| corners.map(|[x, y, z]| Point3::new(x as f64, y as f64, z as f64)))
            .collect();
        let props = measure::measure(&triangles);

        debug!(
            path = %path.display(),
            volume = props.volume,
            area = props.surface_area,
            hash = %geometric_hash.short(),
            "extracted signature"
        );

        Ok(Signature::new(
            props.bounding_box,
            props.volume,
            props.surface_area,
            geometric_hash,
        ))
    }

    fn metadata(&self, path: &Path, project_id: &str) -> MeshResult<ComponentMetadata> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut metadata = ComponentMetadata::new(path, file_name, project_id);
        if let Some(name) = self.solid_name(path)? {
            metadata = metadata.with_description(name);
        }
        Ok(metadata)
    }
}
