//! Triangle meshes: the input and output format of the CSG kernel.

use nalgebra::Isometry3;

use crate::{MeshError, Position, Vector};

/// A triangle mesh given as a position list and an optional index buffer.
///
/// Without indices, consecutive position triples form the triangles. With
/// indices, consecutive index triples do. An incomplete trailing triple is
/// ignored in both cases. Index buffers are validated on construction, so
/// every `Mesh` can be walked without bounds failures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    positions: Vec<Position>,
    indices: Option<Vec<u32>>,
}

impl Mesh {
    /// Creates a mesh from a flat triangle list.
    pub fn flat(positions: Vec<Position>) -> Self {
        Self {
            positions,
            indices: None,
        }
    }

    /// Creates an indexed mesh.
    ///
    /// Fails if an index refers to a position that does not exist.
    pub fn indexed(positions: Vec<Position>, indices: Vec<u32>) -> Result<Self, MeshError> {
        validate_indices(positions.len(), &indices)?;
        Ok(Self {
            positions,
            indices: Some(indices),
        })
    }

    /// Creates a flat mesh from triangles.
    pub fn from_triangles<I>(triangles: I) -> Self
    where
        I: IntoIterator<Item = [Position; 3]>,
    {
        Self::flat(triangles.into_iter().flatten().collect())
    }

    /// Returns the vertex positions.
    #[inline]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Returns the index buffer, if the mesh is indexed.
    #[inline]
    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    /// Returns the number of complete triangles.
    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    /// Returns true if the mesh has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }

    /// Iterates over the triangles of the mesh.
    pub fn triangles(&self) -> Box<dyn Iterator<Item = [Position; 3]> + '_> {
        match &self.indices {
            Some(indices) => Box::new(indices.chunks_exact(3).map(|tri| {
                [
                    self.positions[tri[0] as usize],
                    self.positions[tri[1] as usize],
                    self.positions[tri[2] as usize],
                ]
            })),
            None => Box::new(
                self.positions
                    .chunks_exact(3)
                    .map(|tri| [tri[0], tri[1], tri[2]]),
            ),
        }
    }

    /// Computes the enclosed volume using the divergence theorem.
    ///
    /// Only meaningful for closed, outward-wound meshes; inward-wound
    /// meshes yield a negative volume.
    pub fn volume(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)))
            .sum::<f64>()
            / 6.0
    }

    /// Returns the axis-aligned bounding box as `(min, max)`, or `None` for
    /// an empty mesh.
    pub fn bounds(&self) -> Option<(Position, Position)> {
        let mut points = self.triangles().flatten();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.inf(&p), max.sup(&p)));
        Some((min, max))
    }

    /// Returns a copy moved by `offset`.
    pub fn translated(&self, offset: Vector) -> Self {
        Self {
            positions: self.positions.iter().map(|p| p + offset).collect(),
            indices: self.indices.clone(),
        }
    }

    /// Returns a copy with every position transformed by `isometry`.
    pub fn transformed(&self, isometry: &Isometry3<f64>) -> Self {
        Self {
            positions: self
                .positions
                .iter()
                .map(|p| isometry.transform_point(p))
                .collect(),
            indices: self.indices.clone(),
        }
    }
}

/// Checks that every complete index triple refers to an existing position.
pub(crate) fn validate_indices(vertex_count: usize, indices: &[u32]) -> Result<(), MeshError> {
    for (triangle, tri) in indices.chunks_exact(3).enumerate() {
        if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(MeshError::IndexOutOfRange {
                triangle,
                index,
                vertex_count,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Translation3, UnitQuaternion};

    fn p(x: f64, y: f64, z: f64) -> Position {
        Position::new(x, y, z)
    }

    /// Unit right tetrahedron, outward wound.
    fn tetrahedron() -> Mesh {
        let o = p(0.0, 0.0, 0.0);
        let x = p(1.0, 0.0, 0.0);
        let y = p(0.0, 1.0, 0.0);
        let z = p(0.0, 0.0, 1.0);
        Mesh::from_triangles([[o, y, x], [o, x, z], [o, z, y], [x, y, z]])
    }

    #[test]
    fn tetrahedron_volume() {
        assert_relative_eq!(tetrahedron().volume(), 1.0 / 6.0);
    }

    #[test]
    fn indexed_and_flat_agree() {
        let positions = vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, 0.0, 1.0),
        ];
        let indices = vec![0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3];
        let indexed = Mesh::indexed(positions, indices).unwrap();
        let flat = tetrahedron();

        assert_eq!(indexed.triangle_count(), 4);
        assert!(indexed.triangles().eq(flat.triangles()));
    }

    #[test]
    fn indexed_rejects_out_of_range() {
        let positions = vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)];
        let err = Mesh::indexed(positions, vec![0, 1, 2, 2, 1, 7]).unwrap_err();
        assert_eq!(
            err,
            MeshError::IndexOutOfRange {
                triangle: 1,
                index: 7,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn trailing_partial_triangle_is_ignored() {
        let mesh = Mesh::flat(vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(5.0, 5.0, 5.0),
        ]);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangles().count(), 1);
    }

    #[test]
    fn bounds_and_translation() {
        let mesh = tetrahedron().translated(Vector::new(1.0, 2.0, 3.0));
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, p(1.0, 2.0, 3.0));
        assert_eq!(max, p(2.0, 3.0, 4.0));
        assert!(Mesh::default().bounds().is_none());
    }

    #[test]
    fn rigid_transform_preserves_volume() {
        let isometry = Isometry3::from_parts(
            Translation3::new(4.0, -2.0, 7.0),
            UnitQuaternion::from_euler_angles(0.3, 0.4, 0.25),
        );
        let moved = tetrahedron().transformed(&isometry);
        assert_relative_eq!(moved.volume(), 1.0 / 6.0, epsilon = 1e-12);
    }
}
