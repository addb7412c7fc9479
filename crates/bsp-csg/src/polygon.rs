//! Convex polygons with a cached supporting plane.

use crate::{Classification, Plane, Position, Vector, Vertex};

/// A convex polygon in 3D space, defined by an ordered list of vertices.
///
/// Vertices should be coplanar and in counter-clockwise winding order
/// when viewed from the front (the direction the normal points).
///
/// The supporting plane is derived from the first three vertices when the
/// polygon is created and is kept consistent with the winding by [`flip`].
/// A polygon without a valid plane cannot be constructed.
///
/// [`flip`]: Polygon::flip
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vertex>,
    plane: Plane,
}

impl Polygon {
    /// Creates a new polygon from a list of vertices.
    ///
    /// Returns `None` if fewer than 3 vertices are provided or if the first
    /// three vertices are collinear (no plane can be derived).
    pub fn new(vertices: Vec<Vertex>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let plane = Plane::from_points(
            vertices[0].position(),
            vertices[1].position(),
            vertices[2].position(),
        )?;
        Some(Self { vertices, plane })
    }

    /// Creates a polygon from raw positions.
    pub fn from_positions<I>(positions: I) -> Option<Self>
    where
        I: IntoIterator<Item = Position>,
    {
        Self::new(positions.into_iter().map(Vertex::new).collect())
    }

    /// Creates a triangle. Returns `None` for degenerate triangles.
    pub fn triangle(a: Position, b: Position, c: Position) -> Option<Self> {
        Self::new(vec![Vertex::new(a), Vertex::new(b), Vertex::new(c)])
    }

    /// Returns the vertices of the polygon.
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns the plane this polygon lies on.
    #[inline]
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Returns the unit normal of the polygon's plane.
    #[inline]
    pub fn normal(&self) -> Vector {
        self.plane.normal()
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the polygon has no vertices (always false for valid polygons).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Reverses the winding order and flips the plane, turning the polygon
    /// to face the other way.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }

    /// Returns a flipped copy of the polygon.
    pub fn flipped(&self) -> Self {
        let mut polygon = self.clone();
        polygon.flip();
        polygon
    }

    /// Computes the centroid (average of the vertices) of the polygon.
    pub fn centroid(&self) -> Position {
        let sum: Vector = self.vertices.iter().map(|v| v.position().coords).sum();
        Position::from(sum / self.vertices.len() as f64)
    }

    /// Classifies this polygon relative to a plane.
    pub fn classify(&self, plane: &Plane) -> Classification {
        let sides = self.vertices.iter().map(|v| plane.classify_point(v.position()));
        Classification::from_sides(sides)
    }

    /// Fan-triangulates the polygon around its first vertex.
    pub fn triangles(&self) -> impl Iterator<Item = [Position; 3]> + '_ {
        let pivot = self.vertices[0].position();
        self.vertices[1..]
            .windows(2)
            .map(move |pair| [pivot, pair[0].position(), pair[1].position()])
    }
}
