//! Binary Space Partitioning tree for 3D polygon soups.
//!
//! Each [`BspNode`] stores a splitting plane, the polygons lying on it, and
//! optional front and back subtrees. A tree built from a closed solid
//! answers "is this polygon fragment inside?" by pushing it down the tree,
//! which is all the boolean operations need.
//!
//! - [`BspNode`]: a node and, through its children, a whole tree
//! - [`PlaneSelector`]: strategy trait for choosing splitting planes

mod node;
mod selector;

pub use node::BspNode;
pub use selector::{FirstPolygon, PlaneSelector};
