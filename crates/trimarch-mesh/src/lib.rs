#![warn(missing_docs)]

//! Triangle mesh storage and measurement for the trimarch harness.
//!
//! A [`TriangleMesh`] holds three parallel lists: vertex positions, one
//! outward normal per vertex, and index triples into the vertex list. The
//! [`measure`] function reduces a mesh to its surface area and enclosed
//! volume.

pub mod error;
pub mod measure;

pub use error::{MeshError, Result};
pub use measure::{measure, surface_area, volume, MeshMeasure};

use std::collections::HashMap;
use trimarch_math::{Point3, Vec3};

/// Output triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions in creation order.
    pub vertices: Vec<Point3>,
    /// Outward vertex normals. Same length as `vertices`.
    pub normals: Vec<Vec3>,
    /// Triangles as index triples, wound counter-clockwise seen from outside.
    pub triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Append a vertex with its normal, returning its index.
    pub fn push_vertex(&mut self, position: Point3, normal: Vec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(normal);
        index
    }

    /// Append a triangle.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.triangles.push([a, b, c]);
    }

    /// The three corner positions of triangle `t`.
    pub fn triangle_points(&self, t: usize) -> [Point3; 3] {
        let [a, b, c] = self.triangles[t];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// Check index bounds, distinct triangle corners, and normal count.
    pub fn validate(&self) -> Result<()> {
        if self.normals.len() != self.vertices.len() {
            return Err(MeshError::NormalCountMismatch {
                vertices: self.vertices.len(),
                normals: self.normals.len(),
            });
        }
        for (t, tri) in self.triangles.iter().enumerate() {
            for &index in tri {
                if index as usize >= self.vertices.len() {
                    return Err(MeshError::IndexOutOfRange {
                        triangle: t,
                        index,
                        vertices: self.vertices.len(),
                    });
                }
            }
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return Err(MeshError::RepeatedIndex(t));
            }
        }
        Ok(())
    }

    /// Check that the mesh is closed and consistently oriented.
    ///
    /// Every directed edge `(a, b)` must occur exactly once and its reverse
    /// `(b, a)` exactly once.
    pub fn check_closed(&self) -> Result<()> {
        let mut edges: HashMap<(u32, u32), u32> = HashMap::with_capacity(self.triangles.len() * 3);
        for tri in &self.triangles {
            for k in 0..3 {
                *edges.entry((tri[k], tri[(k + 1) % 3])).or_insert(0) += 1;
            }
        }
        for (&(a, b), &count) in &edges {
            if count != 1 || edges.get(&(b, a)) != Some(&1) {
                return Err(MeshError::OpenEdge(a.min(b), a.max(b)));
            }
        }
        Ok(())
    }

    /// Convenience wrapper around [`check_closed`](Self::check_closed).
    pub fn is_closed(&self) -> bool {
        self.check_closed().is_ok()
    }
}
