//! Plane selection strategies for BSP tree construction.
//!
//! The choice of splitting plane affects tree balance and the number of
//! polygon splits during construction. It never changes which volume a tree
//! encloses, only how many fragments the booleans produce on the way.

use crate::Polygon;

/// Strategy for selecting which polygon's plane to use for splitting.
///
/// The selected polygon's plane becomes the splitting plane for a BSP node
/// that does not have one yet.
pub trait PlaneSelector {
    /// Select a polygon from the slice to use as the splitting plane.
    ///
    /// Returns `None` if the slice is empty.
    /// The returned reference must be to an element in the provided slice.
    fn select<'a>(&self, polygons: &'a [Polygon]) -> Option<&'a Polygon>;
}

/// Selects the first polygon in the list.
///
/// This is the simplest and fastest selector, but may produce unbalanced
/// trees depending on input order. It is the default for every boolean
/// operation, which makes their output depend only on the input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPolygon;

impl PlaneSelector for FirstPolygon {
    fn select<'a>(&self, polygons: &'a [Polygon]) -> Option<&'a Polygon> {
        polygons.first()
    }
}
