//! Splitting polygons by a plane.

use log::trace;

use crate::{Classification, Plane, PlaneSide, Polygon, Vertex};

/// Where a polygon ended up after being split by a plane.
#[derive(Debug, Clone, PartialEq)]
pub enum Split {
    /// On the plane, facing the same way as the plane.
    CoplanarFront(Polygon),
    /// On the plane, facing the opposite way.
    CoplanarBack(Polygon),
    /// Entirely in front of the plane (unchanged).
    Front(Polygon),
    /// Entirely behind the plane (unchanged).
    Back(Polygon),
    /// Crossed the plane and was cut in two.
    ///
    /// Either side is `None` when its fragment was too small to form a
    /// polygon.
    Spanning {
        front: Option<Polygon>,
        back: Option<Polygon>,
    },
}

impl Split {
    /// Appends the result to the matching list.
    ///
    /// Spanning fragments go to `front` and `back`.
    pub fn route(
        self,
        coplanar_front: &mut Vec<Polygon>,
        coplanar_back: &mut Vec<Polygon>,
        front: &mut Vec<Polygon>,
        back: &mut Vec<Polygon>,
    ) {
        match self {
            Split::CoplanarFront(p) => coplanar_front.push(p),
            Split::CoplanarBack(p) => coplanar_back.push(p),
            Split::Front(p) => front.push(p),
            Split::Back(p) => back.push(p),
            Split::Spanning { front: f, back: b } => {
                front.extend(f);
                back.extend(b);
            }
        }
    }

    /// Collapses the result to a `(front, back)` pair, sending coplanar
    /// polygons to the side their orientation points at.
    pub fn into_sides(self) -> (Option<Polygon>, Option<Polygon>) {
        match self {
            Split::CoplanarFront(p) | Split::Front(p) => (Some(p), None),
            Split::CoplanarBack(p) | Split::Back(p) => (None, Some(p)),
            Split::Spanning { front, back } => (front, back),
        }
    }
}

impl Plane {
    /// Splits `polygon` by this plane.
    ///
    /// Polygons that lie entirely on one side are returned unchanged.
    /// Spanning polygons are cut with a variant of Sutherland-Hodgman:
    /// walk the edges, build one vertex list per side and insert the
    /// intersection point into both lists whenever an edge crosses from
    /// strictly front to strictly back (or the reverse).
    pub fn split_polygon(&self, polygon: Polygon) -> Split {
        let sides: Vec<PlaneSide> = polygon
            .vertices()
            .iter()
            .map(|v| self.classify_point(v.position()))
            .collect();

        match Classification::from_sides(sides.iter().copied()) {
            Classification::Coplanar => {
                if self.faces_same_direction(polygon.plane()) {
                    Split::CoplanarFront(polygon)
                } else {
                    Split::CoplanarBack(polygon)
                }
            }
            Classification::Front => Split::Front(polygon),
            Classification::Back => Split::Back(polygon),
            Classification::Spanning => {
                let (front, back) = split_spanning(self, &polygon, &sides);
                Split::Spanning { front, back }
            }
        }
    }
}

fn split_spanning(
    plane: &Plane,
    polygon: &Polygon,
    sides: &[PlaneSide],
) -> (Option<Polygon>, Option<Polygon>) {
    let vertices = polygon.vertices();
    let n = vertices.len();

    let mut front_verts: Vec<Vertex> = Vec::with_capacity(n + 1);
    let mut back_verts: Vec<Vertex> = Vec::with_capacity(n + 1);

    for i in 0..n {
        let j = (i + 1) % n;
        let (current, next) = (vertices[i], vertices[j]);
        let (current_side, next_side) = (sides[i], sides[j]);

        // On-plane vertices go to both sides
        if current_side != PlaneSide::Back {
            front_verts.push(current);
        }
        if current_side != PlaneSide::Front {
            back_verts.push(current);
        }

        let crosses = matches!(
            (current_side, next_side),
            (PlaneSide::Front, PlaneSide::Back) | (PlaneSide::Back, PlaneSide::Front)
        );
        if crosses {
            if let Some(t) = plane.intersect_segment(current.position(), next.position()) {
                let intersection = current.lerp(&next, t);
                front_verts.push(intersection);
                back_verts.push(intersection);
            }
        }
    }

    (fragment(front_verts), fragment(back_verts))
}

fn fragment(vertices: Vec<Vertex>) -> Option<Polygon> {
    let count = vertices.len();
    let polygon = Polygon::new(vertices);
    if polygon.is_none() {
        trace!("dropping degenerate split fragment with {count} vertices");
    }
    polygon
}
