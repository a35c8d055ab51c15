#![warn(missing_docs)]

//! Marching triangulation of implicit surfaces.
//!
//! The triangulator walks a cubic lattice of spacing `delta`, starting from
//! the cell that holds the surface's seed point and advancing a frontier of
//! cells across the level set:
//! 1. Classify the eight corners of the current cell as inside or outside
//! 2. Split the cell into six tetrahedra and emit one or two triangles per
//!    tetrahedron that straddles the surface
//! 3. Snap each new edge vertex onto the surface and attach the surface normal
//! 4. Queue every neighbor that shares a straddling face
//!
//! Triangles are appended until the budget would be exceeded, in which case
//! the mesh built so far is returned as [`Triangulation::Partial`].

pub mod error;
pub mod lattice;

pub use error::{MarchError, Result};

use lattice::{corner, face_corners, neighbor, Coord, Lattice, FACES, KUHN_TETRAHEDRA};
use log::{debug, warn};
use std::collections::{HashMap, HashSet, VecDeque};
use trimarch_math::{Point3, Tolerance, Vec3};
use trimarch_mesh::TriangleMesh;
use trimarch_surface::ImplicitSurface;

/// Triangulation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchParams {
    /// Lattice spacing; roughly the target edge length.
    pub delta: f64,
    /// Hard cap on the number of triangles.
    pub max_triangles: usize,
}

impl MarchParams {
    /// Parameters for resolution `delta` and budget `max_triangles`.
    pub fn new(delta: f64, max_triangles: usize) -> Self {
        Self {
            delta,
            max_triangles,
        }
    }

    /// Validate parameters.
    pub fn validate(&self) -> Result<()> {
        if !(self.delta.is_finite() && self.delta > 0.0) {
            return Err(MarchError::InvalidResolution(self.delta));
        }
        if self.max_triangles == 0 {
            return Err(MarchError::ZeroBudget);
        }
        Ok(())
    }
}

/// Outcome of a triangulation run.
#[derive(Debug, Clone, PartialEq)]
pub enum Triangulation {
    /// The whole surface was covered within budget.
    Complete(TriangleMesh),
    /// The budget ran out; the mesh covers only part of the surface.
    Partial(TriangleMesh),
}

impl Triangulation {
    /// The mesh, complete or not.
    pub fn mesh(&self) -> &TriangleMesh {
        match self {
            Self::Complete(mesh) | Self::Partial(mesh) => mesh,
        }
    }

    /// Take the mesh, complete or not.
    pub fn into_mesh(self) -> TriangleMesh {
        match self {
            Self::Complete(mesh) | Self::Partial(mesh) => mesh,
        }
    }

    /// True when the surface was fully covered.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

/// Lattice refinements tried when the requested spacing misses the surface.
const MAX_REFINEMENTS: usize = 8;

/// Signals that the triangle budget is exhausted.
struct BudgetExhausted;

/// Reusable marching state.
///
/// The lookup tables are cleared at the start of every run; only their
/// allocations carry over between runs.
#[derive(Debug, Default)]
pub struct Marcher {
    tolerance: Tolerance,
    edge_vertices: HashMap<(Coord, Coord), u32>,
    visited: HashSet<Coord>,
    frontier: VecDeque<Coord>,
}

impl Marcher {
    /// Create a marcher with default tolerances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a marcher with custom projection tolerance.
    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    /// Triangulate `surface` at the given resolution and budget.
    pub fn triangulate(
        &mut self,
        surface: &ImplicitSurface,
        params: &MarchParams,
    ) -> Result<Triangulation> {
        params.validate()?;
        self.edge_vertices.clear();
        self.visited.clear();
        self.frontier.clear();

        let (lattice, seed) = seed_lattice(surface, params.delta)?;
        let mut mesh = TriangleMesh::new();
        self.visited.insert(seed);
        self.frontier.push_back(seed);

        let mut cells = 0usize;
        while let Some(cell) = self.frontier.pop_front() {
            cells += 1;
            let values = corner_values(surface, &lattice, cell);
            if self
                .march_cell(surface, &lattice, cell, &values, params.max_triangles, &mut mesh)
                .is_err()
            {
                debug!(
                    "triangle budget {} exhausted after {} cells at delta {}",
                    params.max_triangles, cells, params.delta
                );
                return Ok(Triangulation::Partial(mesh));
            }
            for (axis, side) in FACES {
                if straddles(face_corners(axis, side).map(|i| values[i])) {
                    let next = neighbor(cell, axis, side);
                    if self.visited.insert(next) {
                        self.frontier.push_back(next);
                    }
                }
            }
        }

        debug!(
            "marched {} cells: {} vertices, {} triangles at delta {}",
            cells,
            mesh.num_vertices(),
            mesh.num_triangles(),
            params.delta
        );
        Ok(Triangulation::Complete(mesh))
    }

    fn march_cell(
        &mut self,
        surface: &ImplicitSurface,
        lattice: &Lattice,
        cell: Coord,
        values: &[f64; 8],
        max_triangles: usize,
        mesh: &mut TriangleMesh,
    ) -> std::result::Result<(), BudgetExhausted> {
        for tet in KUHN_TETRAHEDRA {
            let (inside, outside): (Vec<usize>, Vec<usize>) =
                tet.iter().copied().partition(|&i| values[i] < 0.0);
            match (inside.len(), outside.len()) {
                (0, _) | (_, 0) => {}
                (1, 3) | (3, 1) => {
                    if mesh.num_triangles() + 1 > max_triangles {
                        return Err(BudgetExhausted);
                    }
                    let (lone, rest) = if inside.len() == 1 {
                        (inside[0], &outside)
                    } else {
                        (outside[0], &inside)
                    };
                    let edges = [(lone, rest[0]), (lone, rest[1]), (lone, rest[2])];
                    let points = edges.map(|(a, b)| self.edge_point(lattice, cell, values, a, b));
                    let normal = (points[1] - points[0]).cross(&(points[2] - points[0]));
                    let flip = normal.dot(&outward(lattice, cell, values, edges[0])) < 0.0;
                    let ids = edges.map(|(a, b)| {
                        self.edge_vertex(surface, lattice, cell, values, a, b, mesh)
                    });
                    push_oriented(mesh, ids, flip);
                }
                _ => {
                    // 2/2 split: the crossing edges form the cycle ac, ad, bd, bc.
                    if mesh.num_triangles() + 2 > max_triangles {
                        return Err(BudgetExhausted);
                    }
                    let (a, b) = (inside[0], inside[1]);
                    let (c, d) = (outside[0], outside[1]);
                    let quad = [(a, c), (a, d), (b, d), (b, c)];
                    let points = quad.map(|(p, q)| self.edge_point(lattice, cell, values, p, q));
                    let normal = (points[2] - points[0]).cross(&(points[3] - points[1]));
                    let flip = normal.dot(&outward(lattice, cell, values, quad[0])) < 0.0;
                    let ids = quad.map(|(p, q)| {
                        self.edge_vertex(surface, lattice, cell, values, p, q, mesh)
                    });
                    push_oriented(mesh, [ids[0], ids[1], ids[2]], flip);
                    push_oriented(mesh, [ids[0], ids[2], ids[3]], flip);
                }
            }
        }
        Ok(())
    }

    /// Linear zero crossing on the edge between local corners `a` and `b`.
    ///
    /// Always interpolated from the lexicographically smaller corner so both
    /// cells sharing an edge compute the same point.
    fn edge_point(
        &self,
        lattice: &Lattice,
        cell: Coord,
        values: &[f64; 8],
        a: usize,
        b: usize,
    ) -> Point3 {
        let (a, b) = if corner(cell, a) <= corner(cell, b) {
            (a, b)
        } else {
            (b, a)
        };
        let (fa, fb) = (values[a], values[b]);
        let pa = lattice.position(corner(cell, a));
        let pb = lattice.position(corner(cell, b));
        let t = fa / (fa - fb);
        pa + (pb - pa) * t
    }

    /// Index of the surface vertex on an edge, creating it on first use.
    #[allow(clippy::too_many_arguments)]
    fn edge_vertex(
        &mut self,
        surface: &ImplicitSurface,
        lattice: &Lattice,
        cell: Coord,
        values: &[f64; 8],
        a: usize,
        b: usize,
        mesh: &mut TriangleMesh,
    ) -> u32 {
        let (ca, cb) = (corner(cell, a), corner(cell, b));
        let key = if ca <= cb { (ca, cb) } else { (cb, ca) };
        if let Some(&index) = self.edge_vertices.get(&key) {
            return index;
        }
        let p = surface.project(&self.edge_point(lattice, cell, values, a, b), &self.tolerance);
        let index = mesh.push_vertex(p, surface.normal(&p).into_inner());
        self.edge_vertices.insert(key, index);
        index
    }
}

/// Triangulate `surface` with a fresh [`Marcher`].
pub fn triangulate(surface: &ImplicitSurface, params: &MarchParams) -> Result<Triangulation> {
    Marcher::new().triangulate(surface, params)
}

fn corner_values(surface: &ImplicitSurface, lattice: &Lattice, cell: Coord) -> [f64; 8] {
    std::array::from_fn(|i| surface.value(&lattice.position(corner(cell, i))))
}

fn straddles(values: impl IntoIterator<Item = f64>) -> bool {
    let (mut inside, mut outside) = (false, false);
    for v in values {
        if v < 0.0 {
            inside = true;
        } else {
            outside = true;
        }
    }
    inside && outside
}

/// A lattice on which some cell near the seed point straddles the surface.
///
/// Uses spacing `delta` when possible. A surface too small to be caught at
/// that spacing is marched at half its scale instead, halving further if
/// needed, so the result always has at least one triangle.
fn seed_lattice(surface: &ImplicitSurface, delta: f64) -> Result<(Lattice, Coord)> {
    let lattice = Lattice::new(delta);
    if let Some(seed) = find_seed_cell(surface, &lattice) {
        return Ok((lattice, seed));
    }
    let mut spacing = (delta / 2.0).min(surface.scale() / 2.0);
    for _ in 0..MAX_REFINEMENTS {
        if !(spacing > 0.0) {
            break;
        }
        let lattice = Lattice::new(spacing);
        if let Some(seed) = find_seed_cell(surface, &lattice) {
            warn!(
                "delta {delta:e} is coarser than the surface (scale {:e}); marching at {spacing:e}",
                surface.scale()
            );
            return Ok((lattice, seed));
        }
        spacing /= 2.0;
    }
    Err(MarchError::SurfaceNotFound(delta))
}

/// First cell in the 3x3x3 block around the seed point that straddles the surface.
fn find_seed_cell(surface: &ImplicitSurface, lattice: &Lattice) -> Option<Coord> {
    let center = lattice.cell_containing(&surface.seed_point());
    let mut candidates = Vec::with_capacity(27);
    for dz in -1..=1 {
        for dy in -1..=1 {
            for dx in -1..=1 {
                candidates.push([center[0] + dx, center[1] + dy, center[2] + dz]);
            }
        }
    }
    // Nearest first, so the seed cell itself wins when it straddles.
    candidates.sort_by_key(|c| {
        (c[0] - center[0]).abs() + (c[1] - center[1]).abs() + (c[2] - center[2]).abs()
    });
    candidates
        .into_iter()
        .find(|&c| straddles(corner_values(surface, lattice, c)))
}

/// Direction from the inside corner to the outside corner of an edge.
fn outward(lattice: &Lattice, cell: Coord, values: &[f64; 8], (a, b): (usize, usize)) -> Vec3 {
    let (pa, pb) = (
        lattice.position(corner(cell, a)),
        lattice.position(corner(cell, b)),
    );
    if values[a] < 0.0 {
        pb - pa
    } else {
        pa - pb
    }
}

fn push_oriented(mesh: &mut TriangleMesh, [i, j, k]: [u32; 3], flip: bool) {
    if flip {
        mesh.push_triangle(i, k, j);
    } else {
        mesh.push_triangle(i, j, k);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use trimarch_mesh::measure;

    fn sphere_mesh(radius: f64, delta: f64) -> TriangleMesh {
        let surface = ImplicitSurface::sphere(radius);
        let result = triangulate(&surface, &MarchParams::new(delta, 10_000_000)).unwrap();
        assert!(result.is_complete());
        result.into_mesh()
    }

    fn relative_errors(radius: f64, mesh: &TriangleMesh) -> (f64, f64) {
        let m = measure(mesh);
        let area = 4.0 * PI * radius * radius;
        let volume = 4.0 / 3.0 * PI * radius.powi(3);
        ((m.area - area).abs() / area, (m.volume - volume).abs() / volume)
    }

    #[test]
    fn test_sphere_mesh_is_valid_and_closed() {
        let mesh = sphere_mesh(1.0, 0.1);
        assert!(mesh.num_vertices() >= 3);
        assert!(mesh.num_triangles() >= 1);
        assert_eq!(mesh.validate(), Ok(()));
        assert_eq!(mesh.check_closed(), Ok(()));
    }

    #[test]
    fn test_vertices_lie_on_sphere() {
        let radius = 2.0;
        let mesh = sphere_mesh(radius, 0.2);
        for (p, n) in mesh.vertices.iter().zip(&mesh.normals) {
            assert!((p.coords.norm() - radius).abs() < 1e-9, "vertex {p} off the sphere");
            assert!((n.norm() - 1.0).abs() < 1e-12);
            assert!(n.dot(&p.coords.normalize()) > 1.0 - 1e-9);
        }
    }

    #[test]
    fn test_sphere_area_and_volume() {
        let mesh = sphere_mesh(1.0, 0.1);
        let (area_err, volume_err) = relative_errors(1.0, &mesh);
        assert!(area_err < 0.03, "area error {area_err}");
        assert!(volume_err < 0.03, "volume error {volume_err}");
        assert!(measure(&mesh).volume > 0.0, "mesh must be wound outward");
    }

    #[test]
    fn test_finer_resolution_converges() {
        let coarse = sphere_mesh(1.0, 0.2);
        let fine = sphere_mesh(1.0, 0.05);
        assert!(fine.num_triangles() > coarse.num_triangles());
        let (coarse_area, coarse_volume) = relative_errors(1.0, &coarse);
        let (fine_area, fine_volume) = relative_errors(1.0, &fine);
        assert!(fine_area < coarse_area, "{fine_area} !< {coarse_area}");
        assert!(fine_volume < coarse_volume, "{fine_volume} !< {coarse_volume}");
    }

    #[test]
    fn test_budget_exhaustion_returns_partial_mesh() {
        let surface = ImplicitSurface::sphere(1.0);
        let result = triangulate(&surface, &MarchParams::new(0.05, 10)).unwrap();
        assert!(!result.is_complete());
        let mesh = result.mesh();
        assert!(mesh.num_triangles() <= 10);
        assert!(mesh.num_triangles() >= 1);
        assert_eq!(mesh.validate(), Ok(()));
        assert!(!mesh.is_closed());
    }

    #[test]
    fn test_budget_is_respected_exactly() {
        let surface = ImplicitSurface::sphere(1.0);
        let full = triangulate(&surface, &MarchParams::new(0.2, 10_000_000)).unwrap();
        let needed = full.mesh().num_triangles();

        let exact = triangulate(&surface, &MarchParams::new(0.2, needed)).unwrap();
        assert!(exact.is_complete());
        assert_eq!(exact.mesh(), full.mesh());

        let short = triangulate(&surface, &MarchParams::new(0.2, needed - 1)).unwrap();
        assert!(!short.is_complete());
        assert!(short.mesh().num_triangles() < needed);
    }

    #[test]
    fn test_deterministic() {
        let a = sphere_mesh(1.0, 0.15);
        let b = sphere_mesh(1.0, 0.15);
        assert_eq!(a, b);
    }

    #[test]
    fn test_marcher_reuse_matches_fresh_run() {
        let surface = ImplicitSurface::sphere(1.0);
        let mut marcher = Marcher::new();
        marcher
            .triangulate(&surface, &MarchParams::new(0.3, 10_000_000))
            .unwrap();
        let reused = marcher
            .triangulate(&surface, &MarchParams::new(0.12, 10_000_000))
            .unwrap();
        let fresh = triangulate(&surface, &MarchParams::new(0.12, 10_000_000)).unwrap();
        assert_eq!(reused, fresh);
    }

    #[test]
    fn test_loose_projection_tolerance() {
        let surface = ImplicitSurface::sphere(1.0);
        let loose = Tolerance { linear: 1e-3 };
        let mesh = Marcher::with_tolerance(loose)
            .triangulate(&surface, &MarchParams::new(0.1, 10_000_000))
            .unwrap()
            .into_mesh();
        assert!(mesh.is_closed());
        for p in &mesh.vertices {
            assert!((p.coords.norm() - 1.0).abs() <= 1e-3);
        }
    }

    #[test]
    fn test_surface_below_resolution_is_refined() {
        for (radius, delta) in [(0.01, 1.0), (0.01, 0.25), (0.3, 0.8), (1.0, 2.5)] {
            let surface = ImplicitSurface::sphere(radius);
            let result = triangulate(&surface, &MarchParams::new(delta, 10_000_000)).unwrap();
            assert!(result.is_complete());
            let mesh = result.mesh();
            assert!(mesh.num_vertices() >= 3, "R={radius} delta={delta}");
            assert!(mesh.num_triangles() >= 1, "R={radius} delta={delta}");
            assert_eq!(mesh.validate(), Ok(()));
            assert!(mesh.is_closed());
            assert!(measure(mesh).volume > 0.0);
            for p in &mesh.vertices {
                assert!((p.coords.norm() - radius).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_resolvable_surface_keeps_requested_spacing() {
        let surface = ImplicitSurface::sphere(1.0);
        let (_, seed) = seed_lattice(&surface, 0.2).unwrap();
        let lattice = Lattice::new(0.2);
        assert_eq!(seed, find_seed_cell(&surface, &lattice).unwrap());
        assert!(find_seed_cell(&ImplicitSurface::sphere(0.01), &Lattice::new(1.0)).is_none());
    }

    #[test]
    fn test_invalid_params() {
        let surface = ImplicitSurface::sphere(1.0);
        assert_eq!(
            triangulate(&surface, &MarchParams::new(0.0, 100)),
            Err(MarchError::InvalidResolution(0.0))
        );
        assert!(matches!(
            triangulate(&surface, &MarchParams::new(f64::NAN, 100)),
            Err(MarchError::InvalidResolution(_))
        ));
        assert_eq!(
            triangulate(&surface, &MarchParams::new(0.1, 0)),
            Err(MarchError::ZeroBudget)
        );
    }
}
