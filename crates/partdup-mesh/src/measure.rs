//! Scalar geometry of triangle soups.
//!
//! Volume uses the divergence theorem: the sum of signed tetrahedra formed
//! by each triangle and the origin. For a closed, consistently wound mesh
//! this is the enclosed volume; for open meshes the magnitude is not
//! meaningful but stays finite, and a single flat triangle yields zero.

use nalgebra::{Point3, Vector3};

use partdup_core::BoundingBox;

/// A triangle as three corner positions.
pub type Triangle = [Point3<f64>; 3];

/// Measured scalar properties of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshProperties {
    /// Axis-aligned bounds of all vertices.
    pub bounding_box: BoundingBox,
    /// Absolute enclosed volume.
    pub volume: f64,
    /// Sum of triangle areas.
    pub surface_area: f64,
    /// Number of triangles measured.
    pub triangle_count: usize,
}

/// Measure a set of triangles.
///
/// An empty slice yields a zero bounding box, volume and area.
pub fn measure(triangles: &[Triangle]) -> MeshProperties {
    MeshProperties {
        bounding_box: bounding_box(triangles),
        volume: volume(triangles),
        surface_area: surface_area(triangles),
        triangle_count: triangles.len(),
    }
}

/// Axis-aligned bounding box of all triangle corners.
pub fn bounding_box(triangles: &[Triangle]) -> BoundingBox {
    let mut corners = triangles.iter().flat_map(|t| t.iter());

    let Some(first) = corners.next() else {
        return BoundingBox::new([0.0; 3], [0.0; 3]);
    };

    let (min, max) = corners.fold((first.coords, first.coords), |(min, max), p| {
        (min.inf(&p.coords), max.sup(&p.coords))
    });

    BoundingBox::new([min.x, min.y, min.z], [max.x, max.y, max.z])
}

/// Absolute signed volume of the triangles.
pub fn volume(triangles: &[Triangle]) -> f64 {
    let signed: f64 = triangles
        .iter()
        .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)) / 6.0)
        .sum();
    signed.abs()
}

/// Total area of the triangles.
pub fn surface_area(triangles: &[Triangle]) -> f64 {
    triangles
        .iter()
        .map(|[a, b, c]| {
            let ab: Vector3<f64> = b - a;
            let ac: Vector3<f64> = c - a;
            ab.cross(&ac).norm() / 2.0
        })
        .sum()
}
