//! Error types for mesh validation.

use thiserror::Error;

/// Structural defects detected in a [`TriangleMesh`](crate::TriangleMesh).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// Normal list and vertex list disagree in length.
    #[error("normal count {normals} does not match vertex count {vertices}")]
    NormalCountMismatch {
        /// Number of vertices.
        vertices: usize,
        /// Number of normals.
        normals: usize,
    },

    /// A triangle references a vertex that does not exist.
    #[error("triangle {triangle} references vertex {index} (mesh has {vertices})")]
    IndexOutOfRange {
        /// Triangle position in the triangle list.
        triangle: usize,
        /// Offending vertex index.
        index: u32,
        /// Number of vertices.
        vertices: usize,
    },

    /// A triangle repeats a vertex index.
    #[error("triangle {0} repeats a vertex index")]
    RepeatedIndex(usize),

    /// An edge is not shared by exactly two oppositely wound triangles.
    #[error("edge ({0}, {1}) is open or inconsistently oriented")]
    OpenEdge(u32, u32),
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;
