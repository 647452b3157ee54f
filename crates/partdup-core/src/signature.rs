//! Geometric signature types.
//!
//! A [`Signature`] is the lightweight fingerprint extracted from one mesh:
//! its axis-aligned bounding box, enclosed volume, surface area, and a digest
//! of the reduced geometry used as an exact-match shortcut.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Axis-aligned bounding box, stored as min and max corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum corner `(min_x, min_y, min_z)`.
    pub min: [f64; 3],
    /// Maximum corner `(max_x, max_y, max_z)`.
    pub max: [f64; 3],
}

impl BoundingBox {
    /// Create a bounding box from its two corners.
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// Create from `(min_x, min_y, min_z, max_x, max_y, max_z)`.
    pub fn from_array(values: [f64; 6]) -> Self {
        let [min_x, min_y, min_z, max_x, max_y, max_z] = values;
        Self {
            min: [min_x, min_y, min_z],
            max: [max_x, max_y, max_z],
        }
    }

    /// Flatten to `(min_x, min_y, min_z, max_x, max_y, max_z)`.
    pub fn as_array(&self) -> [f64; 6] {
        [
            self.min[0],
            self.min[1],
            self.min[2],
            self.max[0],
            self.max[1],
            self.max[2],
        ]
    }

    /// Per-axis extents: `[width, depth, height]`.
    pub fn extents(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

/// Error returned when parsing a [`GeometryHash`] from hex.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid geometry hash '{input}': expected 64 hex characters")]
pub struct HashParseError {
    /// The rejected input.
    pub input: String,
}

/// BLAKE3 digest of a mesh's reduced geometry.
///
/// Equal hashes are treated as a guarantee of identical geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct GeometryHash(pub [u8; 32]);

impl GeometryHash {
    /// Create a new hash from raw bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive a hash from an arbitrary label.
    ///
    /// Useful when a caller already has its own opaque identity string
    /// for the geometry.
    pub fn from_label(label: &str) -> Self {
        Self(*blake3::hash(label.as_bytes()).as_bytes())
    }

    /// Get the hash as a hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a 64-character hex string.
    pub fn from_hex(input: &str) -> Result<Self, HashParseError> {
        let invalid = || HashParseError {
            input: input.to_string(),
        };

        if input.len() != 64 || !input.is_ascii() {
            return Err(invalid());
        }

        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&input[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        }
        Ok(Self(bytes))
    }

    /// Short prefix for display in reports.
    pub fn short(&self) -> String {
        self.to_hex()[..12].to_string()
    }
}

impl fmt::Display for GeometryHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<GeometryHash> for String {
    fn from(hash: GeometryHash) -> Self {
        hash.to_hex()
    }
}

impl TryFrom<String> for GeometryHash {
    type Error = HashParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

/// Geometric fingerprint of one component.
///
/// Signatures are produced once by a mesh handler and only read afterwards.
/// Fields are expected to be finite; `max >= min` on every bounding box axis
/// is the producer's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    /// Axis-aligned bounding box.
    pub bounding_box: BoundingBox,
    /// Enclosed volume (0 for open or degenerate meshes).
    pub volume: f64,
    /// Total surface area.
    pub surface_area: f64,
    /// Digest of the reduced geometry.
    pub geometric_hash: GeometryHash,
}

impl Signature {
    /// Create a new signature.
    pub fn new(
        bounding_box: BoundingBox,
        volume: f64,
        surface_area: f64,
        geometric_hash: GeometryHash,
    ) -> Self {
        Self {
            bounding_box,
            volume,
            surface_area,
            geometric_hash,
        }
    }
}
