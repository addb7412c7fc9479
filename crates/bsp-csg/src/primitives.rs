//! Closed, outward-wound triangle meshes for common solids.
//!
//! Rotational solids are built by sweeping a profile around the Y axis, so
//! "height" always runs along +Y and "radius" lies in the XZ plane.

use std::f64::consts::{PI, TAU};

use nalgebra::{Isometry3, Rotation3, Translation3, UnitQuaternion};

use crate::{EPSILON, Mesh, Position, Vector};

/// Sweeps a `(radius, y)` profile around the Y axis.
///
/// Profile points with a radius of zero collapse to a single vertex on the
/// axis, which is how caps are closed: a profile running from the axis at
/// the bottom, outwards, up, and back to the axis at the top yields a closed
/// solid with outward-facing triangles.
///
/// Angle zero points along +Z; vertices advance towards +X.
pub fn lathe(profile: &[(f64, f64)], segments: usize) -> Mesh {
    let segments = segments.max(3);
    let rings: Vec<Vec<Position>> = profile
        .iter()
        .map(|&(radius, y)| {
            if radius.abs() <= EPSILON {
                vec![Position::new(0.0, y, 0.0)]
            } else {
                (0..segments)
                    .map(|j| {
                        let phi = TAU * j as f64 / segments as f64;
                        Position::new(radius * phi.sin(), y, radius * phi.cos())
                    })
                    .collect()
            }
        })
        .collect();

    let at = |ring: &[Position], j: usize| ring[j % ring.len()];

    let mut triangles = Vec::new();
    for pair in rings.windows(2) {
        let (lower, upper) = (pair[0].as_slice(), pair[1].as_slice());
        if lower.len() == 1 && upper.len() == 1 {
            continue;
        }
        for j in 0..segments {
            let a = at(lower, j);
            let b = at(lower, j + 1);
            let c = at(upper, j + 1);
            let d = at(upper, j);
            if lower.len() > 1 {
                triangles.push([a, b, c]);
            }
            if upper.len() > 1 {
                triangles.push([a, c, d]);
            }
        }
    }
    Mesh::from_triangles(triangles)
}

/// A cylinder standing on the XZ plane, from `y = 0` to `y = height`.
pub fn cylinder(radius: f64, height: f64, segments: usize) -> Mesh {
    lathe(
        &[(0.0, 0.0), (radius, 0.0), (radius, height), (0.0, height)],
        segments,
    )
}

/// A cylinder whose axis runs from `start` to `end`.
///
/// Returns an empty mesh if the two points coincide.
pub fn cylinder_between(start: Position, end: Position, radius: f64, segments: usize) -> Mesh {
    let axis = end - start;
    let length = axis.norm();
    if length <= EPSILON {
        return Mesh::default();
    }
    // Antiparallel axes have no unique rotation; any half turn will do.
    let rotation = Rotation3::rotation_between(&Vector::y(), &axis)
        .unwrap_or_else(|| Rotation3::from_axis_angle(&Vector::x_axis(), PI));
    let isometry = Isometry3::from_parts(
        Translation3::from(start.coords),
        UnitQuaternion::from_rotation_matrix(&rotation),
    );
    cylinder(radius, length, segments).transformed(&isometry)
}

/// An axis-aligned box spanning `min` to `max`.
pub fn cuboid(min: Position, max: Position) -> Mesh {
    let corners = [
        Position::new(min.x, min.y, min.z), // 0: left-bottom-back
        Position::new(max.x, min.y, min.z), // 1: right-bottom-back
        Position::new(max.x, max.y, min.z), // 2: right-top-back
        Position::new(min.x, max.y, min.z), // 3: left-top-back
        Position::new(min.x, min.y, max.z), // 4: left-bottom-front
        Position::new(max.x, min.y, max.z), // 5: right-bottom-front
        Position::new(max.x, max.y, max.z), // 6: right-top-front
        Position::new(min.x, max.y, max.z), // 7: left-top-front
    ];

    // Counter-clockwise when viewed from outside.
    let faces: [[usize; 4]; 6] = [
        [4, 5, 6, 7], // front (+Z)
        [1, 0, 3, 2], // back (-Z)
        [0, 4, 7, 3], // left (-X)
        [5, 1, 2, 6], // right (+X)
        [7, 6, 2, 3], // top (+Y)
        [0, 1, 5, 4], // bottom (-Y)
    ];

    Mesh::from_triangles(faces.iter().flat_map(|f| {
        [
            [corners[f[0]], corners[f[1]], corners[f[2]]],
            [corners[f[0]], corners[f[2]], corners[f[3]]],
        ]
    }))
}

/// A box centred on the Y axis, resting on the XZ plane.
pub fn centered_box(width: f64, height: f64, depth: f64) -> Mesh {
    cuboid(
        Position::new(-width / 2.0, 0.0, -depth / 2.0),
        Position::new(width / 2.0, height, depth / 2.0),
    )
}

/// A hexagonal prism measured across its flats, from `y = 0` to `y = height`.
pub fn hex_prism(across_flats: f64, height: f64) -> Mesh {
    let circumradius = across_flats / 2.0 / (PI / 6.0).cos();
    cylinder(circumradius, height, 6)
}

/// A UV sphere with `slices` around the Y axis and `stacks` from pole to pole.
pub fn uv_sphere(center: Position, radius: f64, slices: usize, stacks: usize) -> Mesh {
    let stacks = stacks.max(2);
    let profile: Vec<(f64, f64)> = (0..=stacks)
        .map(|k| {
            if k == 0 || k == stacks {
                let y = if k == 0 { -radius } else { radius };
                return (0.0, y);
            }
            let theta = PI * k as f64 / stacks as f64;
            (radius * theta.sin(), -radius * theta.cos())
        })
        .collect();
    lathe(&profile, slices).translated(center.coords)
}
