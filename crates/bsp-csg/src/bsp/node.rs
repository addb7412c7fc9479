//! BSP tree node implementation.

use crate::{Plane, Polygon, Split};

use super::selector::{FirstPolygon, PlaneSelector};

/// Remaining stack below which recursion switches to a fresh segment.
const STACK_RED_ZONE: usize = 64 * 1024;
/// Size of each additional stack segment.
const STACK_SEGMENT_SIZE: usize = 1024 * 1024;

/// Runs `f` on a stack with enough headroom for one more level of recursion.
///
/// Trees built with [`FirstPolygon`] can degenerate into long chains (one
/// node per input plane), which would overflow small thread stacks.
#[inline]
fn with_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT_SIZE, f)
}

/// A node in the BSP tree.
///
/// Each node partitions space using a splitting plane and stores the
/// polygons that lie on that plane (in either orientation). Polygons in
/// front of or behind the plane live in the respective child subtrees.
///
/// A node without a plane is an empty leaf: it stores nothing and clips
/// nothing. Children are exclusively owned, so a tree can be inverted and
/// clipped in place without affecting any other tree.
#[derive(Debug, Clone, Default)]
pub struct BspNode {
    /// The splitting plane, adopted from the first polygon built into the node.
    plane: Option<Plane>,

    /// Polygons coplanar with the plane, facing either direction.
    polygons: Vec<Polygon>,

    /// Subtree containing polygons in FRONT of the splitting plane.
    front: Option<Box<BspNode>>,

    /// Subtree containing polygons BEHIND the splitting plane.
    back: Option<Box<BspNode>>,
}

impl BspNode {
    /// Creates an empty leaf node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree from a polygon soup using the [`FirstPolygon`] selector.
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        let mut node = Self::new();
        node.build(polygons);
        node
    }

    /// Returns the splitting plane, or `None` for an empty leaf.
    #[inline]
    pub fn plane(&self) -> Option<&Plane> {
        self.plane.as_ref()
    }

    /// Returns the polygons stored at this node.
    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Returns a reference to the front child subtree.
    #[inline]
    pub fn front(&self) -> Option<&BspNode> {
        self.front.as_deref()
    }

    /// Returns a reference to the back child subtree.
    #[inline]
    pub fn back(&self) -> Option<&BspNode> {
        self.back.as_deref()
    }

    /// Checks if this node has any children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.front.is_none() && self.back.is_none()
    }

    /// Returns the total number of polygons in this subtree (including all descendants).
    pub fn polygon_count(&self) -> usize {
        with_stack(|| {
            self.polygons.len()
                + self.front.as_ref().map_or(0, |n| n.polygon_count())
                + self.back.as_ref().map_or(0, |n| n.polygon_count())
        })
    }

    /// Returns the depth of this subtree (1 for a leaf node).
    pub fn depth(&self) -> usize {
        with_stack(|| {
            let front_depth = self.front.as_ref().map_or(0, |n| n.depth());
            let back_depth = self.back.as_ref().map_or(0, |n| n.depth());
            1 + front_depth.max(back_depth)
        })
    }

    /// Inserts polygons into the tree using the [`FirstPolygon`] selector.
    pub fn build(&mut self, polygons: Vec<Polygon>) {
        self.build_with(polygons, &FirstPolygon);
    }

    /// Inserts polygons into the tree.
    ///
    /// A node without a plane adopts the plane of the polygon picked by
    /// `selector`. Every polygon is then split by the node's plane: coplanar
    /// ones stay here, the rest are built into the front and back subtrees,
    /// which are created on demand.
    pub fn build_with<S: PlaneSelector>(&mut self, polygons: Vec<Polygon>, selector: &S) {
        if polygons.is_empty() {
            return;
        }

        if self.plane.is_none() {
            self.plane = selector.select(&polygons).map(|p| p.plane().clone());
        }
        let Some(plane) = self.plane.as_ref() else {
            return;
        };

        let mut front_list = Vec::new();
        let mut back_list = Vec::new();

        for polygon in polygons {
            match plane.split_polygon(polygon) {
                Split::CoplanarFront(p) | Split::CoplanarBack(p) => self.polygons.push(p),
                Split::Front(p) => front_list.push(p),
                Split::Back(p) => back_list.push(p),
                Split::Spanning { front, back } => {
                    front_list.extend(front);
                    back_list.extend(back);
                }
            }
        }

        with_stack(|| {
            if !front_list.is_empty() {
                self.front
                    .get_or_insert_with(Default::default)
                    .build_with(front_list, selector);
            }
            if !back_list.is_empty() {
                self.back
                    .get_or_insert_with(Default::default)
                    .build_with(back_list, selector);
            }
        });
    }

    /// Removes the parts of `polygons` that lie inside the solid this tree
    /// bounds.
    ///
    /// Polygons are pushed down the tree; whatever reaches a missing front
    /// child is outside and kept, whatever reaches a missing back child is
    /// inside and discarded. An empty leaf returns the input unchanged.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let Some(plane) = self.plane.as_ref() else {
            return polygons;
        };

        let mut front_list = Vec::new();
        let mut back_list = Vec::new();
        for polygon in polygons {
            let (front, back) = plane.split_polygon(polygon).into_sides();
            front_list.extend(front);
            back_list.extend(back);
        }

        with_stack(|| {
            let mut result = match self.front.as_deref() {
                Some(front) => front.clip_polygons(front_list),
                None => front_list,
            };
            if let Some(back) = self.back.as_deref() {
                result.extend(back.clip_polygons(back_list));
            }
            result
        })
    }

    /// Clips the polygons of this whole subtree against `other`, removing
    /// everything inside the solid `other` bounds.
    pub fn clip_to(&mut self, other: &BspNode) {
        self.polygons = other.clip_polygons(std::mem::take(&mut self.polygons));
        with_stack(|| {
            if let Some(front) = self.front.as_deref_mut() {
                front.clip_to(other);
            }
            if let Some(back) = self.back.as_deref_mut() {
                back.clip_to(other);
            }
        });
    }

    /// Turns the solid inside out: flips every polygon and plane and swaps
    /// the front and back subtrees.
    pub fn invert(&mut self) {
        for polygon in &mut self.polygons {
            polygon.flip();
        }
        if let Some(plane) = self.plane.as_mut() {
            plane.flip();
        }
        with_stack(|| {
            if let Some(front) = self.front.as_deref_mut() {
                front.invert();
            }
            if let Some(back) = self.back.as_deref_mut() {
                back.invert();
            }
        });
        std::mem::swap(&mut self.front, &mut self.back);
    }

    /// Collects all polygons of the subtree (node first, then front, then back).
    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = Vec::with_capacity(self.polygon_count());
        self.collect_polygons(&mut result);
        result
    }

    fn collect_polygons(&self, result: &mut Vec<Polygon>) {
        result.extend(self.polygons.iter().cloned());
        with_stack(|| {
            if let Some(front) = self.front.as_deref() {
                front.collect_polygons(result);
            }
            if let Some(back) = self.back.as_deref() {
                back.collect_polygons(result);
            }
        });
    }
}
