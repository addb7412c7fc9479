//! End-to-end properties of the boolean operations on closed solids.

use std::collections::HashMap;
use std::f64::consts::{PI, TAU};

use approx::assert_relative_eq;
use bsp_csg::{Csg, Mesh, Position, Vector, primitives};

fn p(x: f64, y: f64, z: f64) -> Position {
    Position::new(x, y, z)
}

fn cube(min: [f64; 3], max: [f64; 3]) -> Csg {
    let [x0, y0, z0] = min;
    let [x1, y1, z1] = max;
    Csg::from(primitives::cuboid(p(x0, y0, z0), p(x1, y1, z1)))
}

fn volume(csg: &Csg) -> f64 {
    csg.to_mesh().volume()
}

/// Möller-Trumbore ray/triangle test, returns the hit distance.
fn ray_hit(origin: Position, dir: Vector, [a, b, c]: [Position; 3]) -> Option<f64> {
    let e1 = b - a;
    let e2 = c - a;
    let h = dir.cross(&e2);
    let det = e1.dot(&h);
    if det.abs() < 1e-12 {
        return None;
    }
    let s = origin - a;
    let u = s.dot(&h) / det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(&e1);
    let v = dir.dot(&q) / det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(&q) / det;
    (t > 0.0).then_some(t)
}

fn count_hits(mesh: &Mesh, origin: Position, dir: Vector) -> usize {
    mesh.triangles()
        .filter(|&tri| ray_hit(origin, dir, tri).is_some())
        .count()
}

/// Returns true if `v` lies on the triangle, edges included.
fn touches(&[a, b, c]: &[Position; 3], v: Position) -> bool {
    let n = (b - a).cross(&(c - a));
    let area = n.norm();
    if area < 1e-12 || (n.dot(&(v - a)) / area).abs() > 1e-6 {
        return false;
    }
    [(a, b), (b, c), (c, a)].into_iter().all(|(p, q)| {
        let edge = q - p;
        edge.cross(&(v - p)).dot(&n) / (area * edge.norm()) >= -1e-6
    })
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn join(parent: &mut [usize], i: usize, j: usize) {
    let (a, b) = (find(parent, i), find(parent, j));
    parent[a] = b;
}

/// Counts the connected pieces of a triangle soup.
///
/// Triangles are joined when they share a vertex or when a vertex of one
/// lies on the other, so pieces that meet at a T-junction or touch at a
/// single point count as one.
fn connected_pieces(mesh: &Mesh) -> usize {
    let triangles: Vec<[Position; 3]> = mesh.triangles().collect();
    let mut parent: Vec<usize> = (0..triangles.len()).collect();
    let key = |v: &Position| {
        (
            (v.x * 1e6).round() as i64,
            (v.y * 1e6).round() as i64,
            (v.z * 1e6).round() as i64,
        )
    };
    let mut owners: HashMap<_, (usize, Position)> = HashMap::new();
    for (i, tri) in triangles.iter().enumerate() {
        for v in tri {
            let (owner, _) = *owners.entry(key(v)).or_insert((i, *v));
            join(&mut parent, i, owner);
        }
    }
    for &(owner, v) in owners.values() {
        for (i, tri) in triangles.iter().enumerate() {
            if touches(tri, v) {
                join(&mut parent, i, owner);
            }
        }
    }

    (0..triangles.len())
        .filter(|&i| find(&mut parent, i) == i)
        .count()
}

#[test]
fn union_is_idempotent() {
    let a = cube([0.0; 3], [10.0; 3]);
    assert_relative_eq!(volume(&a.union(&a)), 1000.0, epsilon = 1e-6);

    let sphere = Csg::from(primitives::uv_sphere(p(0.0, 0.0, 0.0), 4.0, 16, 8));
    let doubled = sphere.union(&sphere);
    assert_relative_eq!(volume(&doubled), volume(&sphere), epsilon = 1e-6);
}

#[test]
fn subtracting_self_leaves_nothing() {
    let a = cube([0.0; 3], [10.0; 3]);
    assert!(a.subtract(&a).is_empty());

    let cylinder = Csg::from(primitives::cylinder(3.0, 7.0, 12));
    assert!(cylinder.subtract(&cylinder).is_empty());
}

#[test]
fn union_volume_is_commutative() {
    let a = cube([0.0; 3], [10.0; 3]);
    let b = cube([5.0; 3], [15.0; 3]);

    let ab = volume(&a.union(&b));
    let ba = volume(&b.union(&a));

    assert_relative_eq!(ab, 1875.0, epsilon = 1e-6);
    assert_relative_eq!(ba, 1875.0, epsilon = 1e-6);
}

#[test]
fn subtracting_disjoint_solid_is_noop() {
    let a = cube([0.0; 3], [10.0; 3]);
    let far = cube([20.0; 3], [30.0; 3]);

    let result = a.subtract(&far);
    assert_eq!(result.len(), a.len());
    assert_relative_eq!(volume(&result), 1000.0, epsilon = 1e-9);
}

#[test]
fn overlapping_subtract_matches_inclusion_exclusion() {
    let a = cube([0.0; 3], [10.0; 3]);
    let b = cube([5.0; 3], [15.0; 3]);

    assert_relative_eq!(volume(&a.subtract(&b)), 875.0, epsilon = 1e-6);
    assert_relative_eq!(volume(&b.subtract(&a)), 875.0, epsilon = 1e-6);
}

#[test]
fn mesh_round_trip_keeps_volume() {
    let mesh = primitives::hex_prism(17.0, 8.0);
    let round_trip = Csg::from(&mesh).to_mesh();
    assert_eq!(round_trip.triangle_count(), mesh.triangle_count());
    assert_relative_eq!(round_trip.volume(), mesh.volume(), epsilon = 1e-9);
}

#[test]
fn cube_union_tangent_sphere_adds_volumes() {
    let a = cube([0.0; 3], [10.0; 3]);
    // Rests on the top face, touching it at a single point.
    let sphere_mesh = primitives::uv_sphere(p(3.0, 15.0, 6.0), 5.0, 32, 16);
    let sphere = Csg::from(&sphere_mesh);

    let result = volume(&a.union(&sphere));

    assert_relative_eq!(result, 1000.0 + sphere_mesh.volume(), epsilon = 1e-6);
    let exact = 1000.0 + 4.0 / 3.0 * PI * 125.0;
    assert!((result - exact).abs() / exact < 0.01);
}

#[test]
fn sphere_resting_on_cube_top_joins_it() {
    let a = cube([0.0; 3], [10.0; 3]);
    // Touches the z = 10 face at (5, 5, 10) only.
    let sphere_mesh = primitives::uv_sphere(p(5.0, 5.0, 15.0), 5.0, 32, 16);

    let result = a.union(&Csg::from(&sphere_mesh)).to_mesh();

    let expected = 1000.0 + sphere_mesh.volume();
    assert_relative_eq!(result.volume(), expected, epsilon = 1e-6);
    assert_eq!(connected_pieces(&result), 1);
}

#[test]
fn sphere_above_cube_stays_separate() {
    let a = cube([0.0; 3], [10.0; 3]);
    let sphere_mesh = primitives::uv_sphere(p(5.0, 5.0, 16.0), 5.0, 16, 8);

    let result = a.union(&Csg::from(&sphere_mesh)).to_mesh();

    let expected = 1000.0 + sphere_mesh.volume();
    assert_relative_eq!(result.volume(), expected, epsilon = 1e-6);
    assert_eq!(connected_pieces(&result), 2);
}

#[test]
fn box_minus_cylinder_leaves_through_hole() {
    let block = cube([-10.0, 0.0, -10.0], [10.0, 20.0, 10.0]);
    let drill = primitives::cylinder(3.0, 30.0, 16);
    let drill = Csg::from(drill.translated(-5.0 * Vector::y()));

    let result = block.subtract(&drill).to_mesh();

    let hole = 16.0 / 2.0 * 9.0 * (TAU / 16.0).sin() * 20.0;
    assert_relative_eq!(result.volume(), 8000.0 - hole, epsilon = 1e-6);

    let up = Vector::y();
    // Slightly off-axis so the ray never grazes a shared edge.
    assert_eq!(count_hits(&result, p(0.5, -100.0, 0.3), up), 0);
    // Through solid material: enters the bottom face, leaves the top face.
    assert_eq!(count_hits(&result, p(7.3, -100.0, 6.1), up), 2);
}

#[test]
fn chained_operations_build_a_bracket() {
    let base = cube([0.0, 0.0, 0.0], [20.0, 2.0, 10.0]);
    let wall = cube([0.0, 0.0, 0.0], [2.0, 15.0, 10.0]);
    let slot = cube([8.0, -1.0, 3.0], [14.0, 3.0, 7.0]);

    let bracket = base.union(&wall).subtract(&slot);

    // 400 + 300 - 40 overlap, minus a 6 x 2 x 4 slot through the base.
    assert_relative_eq!(volume(&bracket), 660.0 - 48.0, epsilon = 1e-6);
    let (min, max) = bracket.to_mesh().bounds().unwrap();
    assert_relative_eq!(min, p(0.0, 0.0, 0.0), epsilon = 1e-9);
    assert_relative_eq!(max, p(20.0, 15.0, 10.0), epsilon = 1e-9);
}
