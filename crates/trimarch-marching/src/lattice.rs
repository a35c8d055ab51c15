//! Cubic lattice addressing and the fixed cell decomposition.
//!
//! Corners and cells are addressed by integer coordinates; cell `c` spans
//! corners `c` to `c + (1, 1, 1)`. Local corner `i` of a cell has offset
//! `(i & 1, (i >> 1) & 1, (i >> 2) & 1)`.

use trimarch_math::{Point3, Vec3};

/// Integer lattice coordinate of a corner or cell.
pub type Coord = [i64; 3];

/// Fraction of a cell the lattice is shifted by along each axis.
///
/// Irrational offsets keep lattice corners off the coordinate planes, where a
/// centered surface would otherwise put corners exactly on the level set.
const LATTICE_SHIFT: [f64; 3] = [
    0.318_309_886_183_790_7,
    0.271_828_182_845_904_5,
    0.141_421_356_237_309_5,
];

/// Kuhn split of a cube into six tetrahedra around the 0-7 diagonal.
///
/// Each tetrahedron walks from corner 0 to corner 7 along one permutation of
/// the axes. The split is the same in every cell, so tetrahedra of
/// neighboring cells meet face to face.
pub const KUHN_TETRAHEDRA: [[usize; 4]; 6] = [
    [0, 1, 3, 7],
    [0, 1, 5, 7],
    [0, 2, 3, 7],
    [0, 2, 6, 7],
    [0, 4, 5, 7],
    [0, 4, 6, 7],
];

/// The six cell faces as `(axis, side)`; side 0 is the low face.
pub const FACES: [(usize, usize); 6] = [(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)];

/// A uniform cubic lattice with spacing `delta`.
#[derive(Debug, Clone, Copy)]
pub struct Lattice {
    origin: Point3,
    delta: f64,
}

impl Lattice {
    /// Lattice of spacing `delta`, shifted by [`LATTICE_SHIFT`].
    pub fn new(delta: f64) -> Self {
        Self {
            origin: Point3::new(
                LATTICE_SHIFT[0] * delta,
                LATTICE_SHIFT[1] * delta,
                LATTICE_SHIFT[2] * delta,
            ),
            delta,
        }
    }

    /// World position of a corner.
    pub fn position(&self, c: Coord) -> Point3 {
        self.origin + Vec3::new(c[0] as f64, c[1] as f64, c[2] as f64) * self.delta
    }

    /// The cell containing `p`.
    pub fn cell_containing(&self, p: &Point3) -> Coord {
        let local = (p - self.origin) / self.delta;
        [
            local.x.floor() as i64,
            local.y.floor() as i64,
            local.z.floor() as i64,
        ]
    }
}

/// Global coordinate of local corner `i` of `cell`.
pub fn corner(cell: Coord, i: usize) -> Coord {
    [
        cell[0] + (i & 1) as i64,
        cell[1] + ((i >> 1) & 1) as i64,
        cell[2] + ((i >> 2) & 1) as i64,
    ]
}

/// Local corner indices lying on a face.
pub fn face_corners(axis: usize, side: usize) -> impl Iterator<Item = usize> {
    (0..8).filter(move |i| (i >> axis) & 1 == side)
}

/// The cell across `(axis, side)` from `cell`.
pub fn neighbor(cell: Coord, axis: usize, side: usize) -> Coord {
    let mut n = cell;
    n[axis] += if side == 1 { 1 } else { -1 };
    n
}
