//! Oriented planes and point classification.

use crate::{EPSILON, Position, Vector, VectorExt};

/// Which side of a plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Point is in front of the plane (positive side of normal)
    Front,
    /// Point is behind the plane (negative side of normal)
    Back,
    /// Point lies on the plane (within epsilon tolerance)
    OnPlane,
}

/// Classification of a polygon relative to a plane.
///
/// This is the union of the sides of its vertices: on-plane vertices never
/// change the outcome, so a polygon touching the plane with one edge and
/// otherwise in front is still `Front`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No vertex is behind the plane, at least one is in front
    Front,
    /// No vertex is in front of the plane, at least one is behind
    Back,
    /// All vertices are on the plane (coplanar)
    Coplanar,
    /// Vertices are on both sides (spans the plane)
    Spanning,
}

impl Classification {
    /// Combines per-vertex sides into a polygon classification.
    pub fn from_sides<I>(sides: I) -> Self
    where
        I: IntoIterator<Item = PlaneSide>,
    {
        let mut front = false;
        let mut back = false;
        for side in sides {
            match side {
                PlaneSide::Front => front = true,
                PlaneSide::Back => back = true,
                PlaneSide::OnPlane => {}
            }
        }

        match (front, back) {
            (false, false) => Classification::Coplanar,
            (true, false) => Classification::Front,
            (false, true) => Classification::Back,
            (true, true) => Classification::Spanning,
        }
    }
}

/// A plane in 3D space, represented as `normal · point = w`.
///
/// The normal always has unit length. Planes can only be obtained through
/// the fallible constructors, which refuse degenerate input.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    normal: Vector,
    w: f64,
}

impl Plane {
    /// Creates a plane from a normal vector and offset.
    /// The normal (and offset) are normalized automatically.
    ///
    /// Returns `None` if the normal is shorter than [`EPSILON`] or either
    /// argument is not finite.
    pub fn new(normal: Vector, w: f64) -> Option<Self> {
        let norm = normal.norm();
        if !(norm >= EPSILON && norm.is_finite() && w.is_finite()) {
            return None;
        }
        Some(Self {
            normal: normal / norm,
            w: w / norm,
        })
    }

    /// Creates a plane from a point on the plane and a normal vector.
    ///
    /// Returns `None` if the normal is shorter than [`EPSILON`] or anything
    /// is not finite.
    pub fn from_point_and_normal(point: Position, normal: Vector) -> Option<Self> {
        if normal.is_degenerate() {
            return None;
        }
        let unit_normal = normal.unit();
        let w = unit_normal.dot(&point.coords);
        if !w.is_finite() {
            return None;
        }
        Some(Self {
            normal: unit_normal,
            w,
        })
    }

    /// Creates a plane from three points.
    /// The normal direction follows the right-hand rule: (b - a) × (c - a).
    ///
    /// Returns `None` when the points are collinear (or nearly so), i.e. the
    /// cross product is shorter than [`EPSILON`].
    pub fn from_points(a: Position, b: Position, c: Position) -> Option<Self> {
        let normal = (b - a).cross(&(c - a));
        Self::from_point_and_normal(a, normal)
    }

    /// Returns the unit normal vector of the plane.
    #[inline]
    pub fn normal(&self) -> Vector {
        self.normal
    }

    /// Returns the signed distance from the origin to the plane along the normal.
    #[inline]
    pub fn w(&self) -> f64 {
        self.w
    }

    /// Computes the signed distance from a point to the plane.
    /// - Positive: point is in front (same side as normal)
    /// - Negative: point is behind (opposite side from normal)
    /// - Zero: point is on the plane
    #[inline]
    pub fn signed_distance(&self, point: Position) -> f64 {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classifies which side of the plane a point lies on.
    pub fn classify_point(&self, point: Position) -> PlaneSide {
        let dist = self.signed_distance(point);
        if dist < -EPSILON {
            PlaneSide::Back
        } else if dist > EPSILON {
            PlaneSide::Front
        } else {
            PlaneSide::OnPlane
        }
    }

    /// Reverses the plane's orientation in place.
    #[inline]
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Returns a new plane with the normal flipped (facing the opposite direction).
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// Returns `true` if `other` faces the same way as this plane.
    #[inline]
    pub fn faces_same_direction(&self, other: &Plane) -> bool {
        self.normal.dot(&other.normal) > 0.0
    }

    /// Computes where the segment `start → end` crosses the plane.
    ///
    /// Returns the interpolation parameter clamped to `[0, 1]`
    /// (0.0 = start, 1.0 = end), or `None` if the segment is parallel to
    /// the plane.
    pub fn intersect_segment(&self, start: Position, end: Position) -> Option<f64> {
        let denom = self.normal.dot(&(end - start));
        if denom.abs() <= EPSILON {
            return None;
        }

        let t = (self.w - self.normal.dot(&start.coords)) / denom;
        Some(t.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn from_points_is_unit_and_contains_points() {
        let a = Position::new(0.0, 0.0, 2.0);
        let b = Position::new(4.0, 0.0, 2.0);
        let c = Position::new(0.0, 3.0, 2.0);
        let plane = Plane::from_points(a, b, c).unwrap();

        assert_relative_eq!(plane.normal().norm(), 1.0);
        assert_relative_eq!(plane.normal(), Vector::z());
        assert_relative_eq!(plane.w(), 2.0);
        for p in [a, b, c] {
            assert_relative_eq!(plane.signed_distance(p), 0.0);
        }
    }

    #[test]
    fn collinear_points_have_no_plane() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(1.0, 1.0, 1.0);
        let c = Position::new(2.0, 2.0, 2.0);
        assert!(Plane::from_points(a, b, c).is_none());
    }

    #[test]
    fn nearly_coincident_points_have_no_plane() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(1e-3, 0.0, 0.0);
        let c = Position::new(0.0, 1e-3, 0.0);
        // |cross| = 1e-6 < EPSILON
        assert!(Plane::from_points(a, b, c).is_none());
    }

    #[test]
    fn non_finite_input_has_no_plane() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(f64::NAN, 0.0, 0.0);
        let c = Position::new(0.0, 1.0, 0.0);
        let d = Position::new(f64::INFINITY, 0.0, 0.0);
        assert!(Plane::from_points(a, b, c).is_none());
        assert!(Plane::from_points(a, d, c).is_none());
        assert!(Plane::new(Vector::new(f64::NAN, 0.0, 1.0), 0.0).is_none());
        assert!(Plane::new(Vector::z(), f64::NAN).is_none());
        assert!(Plane::from_point_and_normal(b, Vector::z()).is_none());
    }

    #[test]
    fn new_rejects_zero_normal() {
        assert!(Plane::new(Vector::zeros(), 1.0).is_none());
        let plane = Plane::new(Vector::new(0.0, 2.0, 0.0), 4.0).unwrap();
        assert_relative_eq!(plane.w(), 2.0);
    }

    #[test]
    fn classify_point_uses_tolerance() {
        let plane = Plane::new(Vector::y(), 0.0).unwrap();
        let side = |x, y, z| plane.classify_point(Position::new(x, y, z));
        assert_eq!(side(0.0, 1.0, 0.0), PlaneSide::Front);
        assert_eq!(side(0.0, -1.0, 0.0), PlaneSide::Back);
        assert_eq!(side(5.0, 5e-6, 5.0), PlaneSide::OnPlane);
        assert_eq!(side(5.0, -5e-6, 5.0), PlaneSide::OnPlane);
    }

    #[test]
    fn flip_reverses_orientation() {
        let mut plane = Plane::new(Vector::x(), 3.0).unwrap();
        let p = Position::new(5.0, 0.0, 0.0);
        assert_eq!(plane.classify_point(p), PlaneSide::Front);

        plane.flip();
        assert_eq!(plane.normal(), -Vector::x());
        assert_eq!(plane.w(), -3.0);
        assert_eq!(plane.classify_point(p), PlaneSide::Back);
        assert_eq!(plane.flipped().flipped(), plane);
    }

    #[test]
    fn classification_is_union_of_sides() {
        use PlaneSide::*;
        let classify = |sides: [PlaneSide; 3]| Classification::from_sides(sides);
        assert_eq!(
            classify([OnPlane, OnPlane, OnPlane]),
            Classification::Coplanar
        );
        assert_eq!(classify([Front, OnPlane, OnPlane]), Classification::Front);
        assert_eq!(classify([Back, Back, OnPlane]), Classification::Back);
        assert_eq!(classify([Front, Back, OnPlane]), Classification::Spanning);
    }

    #[test]
    fn intersect_segment_clamps_and_rejects_parallel() {
        let plane = Plane::new(Vector::z(), 1.0).unwrap();
        let origin = Position::new(0.0, 0.0, 0.0);
        let top = Position::new(0.0, 0.0, 4.0);

        assert_relative_eq!(plane.intersect_segment(origin, top).unwrap(), 0.25);
        let parallel = plane.intersect_segment(origin, Position::new(3.0, 0.0, 0.0));
        assert!(parallel.is_none());
        let beyond = plane.intersect_segment(Position::new(0.0, 0.0, 2.0), top);
        assert_eq!(beyond, Some(0.0));
    }
}
