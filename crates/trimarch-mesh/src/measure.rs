//! Surface area and enclosed volume of triangle meshes.

use crate::TriangleMesh;
use trimarch_math::Point3;

/// Area and volume of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeshMeasure {
    /// Sum of triangle areas.
    pub area: f64,
    /// Signed enclosed volume; positive for outward winding.
    pub volume: f64,
}

/// Measure area and volume in one pass over the triangles.
///
/// Volume is accumulated with the divergence theorem as signed tetrahedra
/// spanned by each triangle and the vertex centroid. On an open mesh the
/// result depends on that reference point and has no geometric meaning.
pub fn measure(mesh: &TriangleMesh) -> MeshMeasure {
    let origin = reference_point(mesh);
    let mut area = 0.0;
    let mut vol = 0.0;
    for t in 0..mesh.num_triangles() {
        let [p0, p1, p2] = mesh.triangle_points(t);
        let (a, b, c) = (p0 - origin, p1 - origin, p2 - origin);
        area += (b - a).cross(&(c - a)).norm() / 2.0;
        vol += a.dot(&b.cross(&c));
    }
    MeshMeasure {
        area,
        volume: vol / 6.0,
    }
}

/// Total surface area of the mesh.
pub fn surface_area(mesh: &TriangleMesh) -> f64 {
    measure(mesh).area
}

/// Signed enclosed volume of the mesh.
pub fn volume(mesh: &TriangleMesh) -> f64 {
    measure(mesh).volume
}

fn reference_point(mesh: &TriangleMesh) -> Point3 {
    if mesh.vertices.is_empty() {
        return Point3::origin();
    }
    let sum = mesh
        .vertices
        .iter()
        .fold(Point3::origin().coords, |acc, p| acc + p.coords);
    Point3::from(sum / mesh.vertices.len() as f64)
}
