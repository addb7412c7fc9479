//! Polygon vertices.

use crate::Position;

/// A polygon corner.
///
/// Only carries a position; normals are recomputed by whoever consumes the
/// output mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    position: Position,
}

impl Vertex {
    /// Creates a vertex at the given position.
    #[inline]
    pub fn new(position: Position) -> Self {
        Self { position }
    }

    /// Returns the vertex position.
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Linearly interpolates between `self` (t = 0) and `other` (t = 1).
    #[inline]
    pub fn lerp(&self, other: &Vertex, t: f64) -> Vertex {
        Vertex::new(self.position.lerp(&other.position, t))
    }
}

impl From<Position> for Vertex {
    fn from(position: Position) -> Self {
        Self::new(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_between_vertices() {
        let a = Vertex::new(Position::new(0.0, 0.0, 0.0));
        let b = Vertex::new(Position::new(10.0, 0.0, 0.0));
        assert_eq!(a.lerp(&b, 0.25).position(), Position::new(2.5, 0.0, 0.0));
    }
}
