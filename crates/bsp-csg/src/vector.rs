//! Vector helpers on top of nalgebra's value types.
//!
//! nalgebra vectors and points are `Copy`, so every operation already returns
//! a fresh value. This module only adds the tolerance-aware pieces the CSG
//! kernel needs on top of them.

use nalgebra::{Point3, Vector3};

/// Tolerance used throughout the kernel.
/// Distances and lengths below this value are treated as zero.
pub const EPSILON: f64 = 1e-5;

/// A direction or offset in 3D space.
pub type Vector = Vector3<f64>;

/// A position in 3D space.
pub type Position = Point3<f64>;

/// Tolerance-aware operations missing from nalgebra's vector API.
pub trait VectorExt {
    /// Returns the vector scaled to unit length.
    ///
    /// Returns the zero vector when the length is at or below [`EPSILON`],
    /// so the result never contains NaN or infinity.
    fn unit(&self) -> Self;

    /// Returns `true` if the vector is too short to define a direction.
    /// Vectors with NaN or infinite components are degenerate too.
    fn is_degenerate(&self) -> bool;
}

impl VectorExt for Vector {
    fn unit(&self) -> Self {
        let len = self.norm();
        if len > EPSILON {
            self / len
        } else {
            Vector::zeros()
        }
    }

    #[inline]
    fn is_degenerate(&self) -> bool {
        let len = self.norm();
        !(len >= EPSILON && len.is_finite())
    }
}
