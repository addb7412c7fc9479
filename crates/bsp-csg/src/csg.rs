//! Boolean operations on polygon soups.

use log::{debug, trace};

use crate::mesh::validate_indices;
use crate::{BspNode, Mesh, MeshError, Polygon, Position};

/// A boolean operation combining two solids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    /// Keep everything inside either solid.
    Union,
    /// Keep everything inside the first solid but outside the second.
    Subtract,
}

/// A solid represented as an unordered collection of polygons.
///
/// No adjacency is stored and nothing is deduplicated. Booleans are only
/// well defined when both operands are closed and consistently wound
/// (outward-facing normals); other input produces unspecified geometry
/// rather than an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Csg {
    polygons: Vec<Polygon>,
}

impl Csg {
    /// Creates an empty solid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing polygon soup.
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    /// Builds a polygon soup from raw triangle buffers.
    ///
    /// Triangles are read from `indices` if given, otherwise from
    /// consecutive position triples. Degenerate triangles are dropped.
    pub fn from_mesh(positions: &[Position], indices: Option<&[u32]>) -> Result<Self, MeshError> {
        let triangles: Vec<[Position; 3]> = match indices {
            Some(indices) => {
                validate_indices(positions.len(), indices)?;
                indices
                    .chunks_exact(3)
                    .map(|tri| {
                        [
                            positions[tri[0] as usize],
                            positions[tri[1] as usize],
                            positions[tri[2] as usize],
                        ]
                    })
                    .collect()
            }
            None => positions
                .chunks_exact(3)
                .map(|tri| [tri[0], tri[1], tri[2]])
                .collect(),
        };
        Ok(Self::from_triangles(triangles))
    }

    /// Builds a polygon soup from triangles, dropping degenerate ones.
    pub fn from_triangles<I>(triangles: I) -> Self
    where
        I: IntoIterator<Item = [Position; 3]>,
    {
        let mut dropped = 0usize;
        let polygons = triangles
            .into_iter()
            .filter_map(|[a, b, c]| {
                let polygon = Polygon::triangle(a, b, c);
                if polygon.is_none() {
                    dropped += 1;
                }
                polygon
            })
            .collect();
        if dropped > 0 {
            debug!("dropped {dropped} degenerate triangles");
        }
        Self { polygons }
    }

    /// Converts the polygons back into a flat triangle list.
    ///
    /// Each polygon is fan-triangulated around its first vertex. No normals
    /// are stored; consumers recompute them from the winding.
    pub fn to_mesh(&self) -> Mesh {
        Mesh::from_triangles(self.polygons.iter().flat_map(Polygon::triangles))
    }

    /// Returns the polygons of the solid.
    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Consumes the solid and returns its polygons.
    #[inline]
    pub fn into_polygons(self) -> Vec<Polygon> {
        self.polygons
    }

    /// Returns the number of polygons.
    #[inline]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// Returns true if the solid has no polygons.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Returns a solid with the orientation of every polygon reversed
    /// (inside and outside swapped).
    pub fn inverse(&self) -> Self {
        Self {
            polygons: self.polygons.iter().map(Polygon::flipped).collect(),
        }
    }

    /// Applies `op` with `self` as the first operand.
    pub fn apply(&self, op: BooleanOp, other: &Csg) -> Csg {
        match op {
            BooleanOp::Union => self.union(other),
            BooleanOp::Subtract => self.subtract(other),
        }
    }

    /// Returns the union of `self` and `other`.
    ///
    /// ```text
    /// +-------+            +-------+
    /// |       |            |       |
    /// |   A   |            |       |
    /// |    +--+----+   =   |       +----+
    /// +----+--+    |       +----+       |
    ///      |   B   |            |       |
    ///      |       |            |       |
    ///      +-------+            +-------+
    /// ```
    pub fn union(&self, other: &Csg) -> Csg {
        let mut a = BspNode::from_polygons(self.polygons.clone());
        let mut b = BspNode::from_polygons(other.polygons.clone());

        trace!("union: clip a to b");
        a.clip_to(&b);
        trace!("union: clip b to a");
        b.clip_to(&a);
        trace!("union: remove coplanar faces of b");
        b.invert();
        b.clip_to(&a);
        b.invert();
        trace!("union: merge b into a");
        a.build(b.all_polygons());

        Csg::from_polygons(a.all_polygons())
    }

    /// Returns `self` with the volume of `other` removed.
    ///
    /// Subtracting from an empty solid returns `other` turned inside out.
    ///
    /// ```text
    /// +-------+            +-------+
    /// |       |            |       |
    /// |   A   |            |       |
    /// |    +--+----+   =   |    +--+
    /// +----+--+    |       +----+
    ///      |   B   |
    ///      |       |
    ///      +-------+
    /// ```
    pub fn subtract(&self, other: &Csg) -> Csg {
        let mut a = BspNode::from_polygons(self.polygons.clone());
        let mut b = BspNode::from_polygons(other.polygons.clone());

        trace!("subtract: invert a");
        a.invert();
        trace!("subtract: clip a to b");
        a.clip_to(&b);
        trace!("subtract: clip b to a");
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        trace!("subtract: merge b into a");
        a.build(b.all_polygons());
        a.invert();

        Csg::from_polygons(a.all_polygons())
    }
}

impl From<&Mesh> for Csg {
    fn from(mesh: &Mesh) -> Self {
        Self::from_triangles(mesh.triangles())
    }
}

impl From<Mesh> for Csg {
    fn from(mesh: Mesh) -> Self {
        Self::from(&mesh)
    }
}
