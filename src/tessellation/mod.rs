mod triangulate_polygon;

pub use triangulate_polygon::TriangulatePolygon;

use crate::math::Point3;

/// A triangle mesh handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Iterates the triangles as explicit vertex triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3; 3]> + '_ {
        self.indices
            .iter()
            .map(|tri| tri.map(|i| self.vertices[i as usize]))
    }

    /// Total surface area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| (b - a).cross(&(c - a)).norm() * 0.5)
            .sum()
    }

    /// Returns a copy with every vertex mapped through `f`; connectivity is kept.
    #[must_use]
    pub fn map_vertices(&self, f: impl Fn(&Point3) -> Point3) -> Self {
        Self {
            vertices: self.vertices.iter().map(f).collect(),
            indices: self.indices.clone(),
        }
    }
}
