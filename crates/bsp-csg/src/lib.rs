//! Constructive solid geometry on BSP (Binary Space Partitioning) trees.
//!
//! Solids are unordered soups of convex polygons. A boolean operation builds
//! a BSP tree for each operand, clips each tree against the other, and
//! merges what survives. Triangle meshes go in and come out; the
//! [`primitives`] module builds common closed solids and [`stl`] writes the
//! result to disk. [`pipeline`] runs a sequence of booleans one step at a
//! time for hosts that need to stay responsive.

mod bsp;
mod csg;
mod error;
mod mesh;
mod plane;
mod polygon;
mod split;
mod vector;
mod vertex;

pub mod pipeline;
pub mod primitives;
pub mod stl;

pub use bsp::{BspNode, FirstPolygon, PlaneSelector};
pub use csg::{BooleanOp, Csg};
pub use error::{MeshError, StlError};
pub use mesh::Mesh;
pub use pipeline::{BuildRun, BuildStep, BuildTracker, Progress, Recipe};
pub use plane::{Classification, Plane, PlaneSide};
pub use polygon::Polygon;
pub use split::Split;
pub use vector::{EPSILON, Position, Vector, VectorExt};
pub use vertex::Vertex;
