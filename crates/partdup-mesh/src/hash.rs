//! Geometry digests.

use blake3::Hasher;

use partdup_core::GeometryHash;

/// Hash the reduced geometry of a mesh: its triangle count followed by each
/// triangle's corner positions as little-endian `f32`, in file order.
///
/// Normals and file framing (ASCII vs. binary, header text, solid names)
/// are not part of the digest, so the same geometry saved in either STL
/// flavor hashes equally. Negative zero is folded into zero.
pub fn geometry_hash<'a, I>(triangles: I) -> GeometryHash
where
    I: ExactSizeIterator<Item = &'a [[f32; 3]; 3]>,
{
    let mut hasher = Hasher::new();
    hasher.update(&(triangles.len() as u64).to_le_bytes());

    for triangle in triangles {
        for corner in triangle {
            for &coord in corner {
                let coord = if coord == 0.0 { 0.0f32 } else { coord };
                hasher.update(&coord.to_le_bytes());
            }
        }
    }

    GeometryHash::new(*hasher.finalize().as_bytes())
}
