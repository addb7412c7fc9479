//! Viewer and export support for the antenna-base model.

use bsp_csg::{Mesh as TriangleMesh, VectorExt};
use macroquad::models::{Mesh, Vertex};
use macroquad::prelude::*;

pub mod recipe;

/// Vertices per render chunk; macroquad meshes use `u16` indices.
const MAX_CHUNK_VERTICES: usize = 3 * 21_845;

/// Direction the light comes from, in world space.
const LIGHT_DIRECTION: [f32; 3] = [0.4, 0.8, 0.45];

/// Flat-shades a face: ambient term plus a Lambert term from the normal.
pub fn shade(base: Color, normal: Vec3) -> Color {
    let light = Vec3::from(LIGHT_DIRECTION).normalize();
    let intensity = 0.3 + 0.7 * normal.dot(light).max(0.0);
    let [r, g, b] = [base.r, base.g, base.b].map(|c| c * intensity);
    Color::new(r, g, b, base.a)
}

/// Converts a triangle mesh into flat-shaded macroquad meshes.
///
/// Every triangle gets its own three vertices so faces keep hard edges.
/// The output is split into chunks that fit macroquad's `u16` index buffer.
pub fn to_render_meshes(mesh: &TriangleMesh, base: Color) -> Vec<Mesh> {
    let vertices: Vec<Vertex> = mesh
        .triangles()
        .flat_map(|[a, b, c]| {
            let n = (b - a).cross(&(c - a)).unit();
            let color = shade(base, vec3(n.x as f32, n.y as f32, n.z as f32));
            [a, b, c].map(|p| {
                let position = vec3(p.x as f32, p.y as f32, p.z as f32);
                Vertex::new2(position, Vec2::ZERO, color)
            })
        })
        .collect();

    vertices
        .chunks(MAX_CHUNK_VERTICES)
        .map(|chunk| Mesh {
            vertices: chunk.to_vec(),
            indices: (0..chunk.len() as u16).collect(),
            texture: None,
        })
        .collect()
}

/// Centre of the mesh's bounding box, or the origin for an empty mesh.
pub fn mesh_center(mesh: &TriangleMesh) -> Vec3 {
    match mesh.bounds() {
        Some((min, max)) => {
            let c = nalgebra::center(&min, &max);
            vec3(c.x as f32, c.y as f32, c.z as f32)
        }
        None => Vec3::ZERO,
    }
}

/// Draws a horizontal progress bar in screen space.
pub fn draw_progress_bar(x: f32, y: f32, width: f32, fraction: f64, label: &str) {
    let height = 14.0;
    draw_rectangle(x, y, width, height, Color::from_rgba(50, 50, 60, 255));
    let filled = width * fraction.clamp(0.0, 1.0) as f32;
    draw_rectangle(x, y, filled, height, SKYBLUE);
    draw_rectangle_lines(x, y, width, height, 1.0, GRAY);
    draw_text(label, x, y + height + 16.0, 16.0, LIGHTGRAY);
}

/// Simple orbit camera for 3D scene navigation.
pub struct OrbitCamera {
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub target: Vec3,
    /// Multiplier for scroll wheel zoom
    pub zoom_speed: f32,
    /// Minimum distance from target
    pub min_distance: f32,
    /// Maximum distance from target
    pub max_distance: f32,
}

impl OrbitCamera {
    /// Creates a new orbit camera with the given configuration.
    pub fn new(distance: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            distance,
            yaw,
            pitch,
            target: vec3(0.0, 0.0, 0.0),
            zoom_speed: 5.0,
            min_distance: 10.0,
            max_distance: 200.0,
        }
    }

    /// Sets the zoom configuration (speed and distance limits).
    pub fn with_zoom(mut self, speed: f32, min: f32, max: f32) -> Self {
        self.zoom_speed = speed;
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    /// Sets the camera target point.
    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// Updates camera state from user input (mouse drag, scroll, arrow keys).
    pub fn update(&mut self) {
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.yaw -= delta.x * 2.0;
            self.pitch -= delta.y * 2.0;
        }

        // Clamp pitch to avoid gimbal lock
        self.pitch = self.pitch.clamp(-1.5, 1.5);

        let scroll = mouse_wheel().1;
        self.distance -= scroll * self.zoom_speed;
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);

        if is_key_down(KeyCode::Left) {
            self.yaw += 0.02;
        }
        if is_key_down(KeyCode::Right) {
            self.yaw -= 0.02;
        }
        if is_key_down(KeyCode::Up) {
            self.pitch += 0.02;
        }
        if is_key_down(KeyCode::Down) {
            self.pitch -= 0.02;
        }
    }

    /// Returns the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + vec3(x, y, z)
    }

    /// Converts to macroquad's Camera3D for rendering.
    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: self.position(),
            up: vec3(0.0, 1.0, 0.0),
            target: self.target,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsp_csg::{Position, primitives};

    #[test]
    fn render_meshes_keep_every_triangle() {
        let mesh = primitives::cylinder(5.0, 10.0, 32);
        let chunks = to_render_meshes(&mesh, WHITE);

        let vertices: usize = chunks.iter().map(|m| m.vertices.len()).sum();
        assert_eq!(vertices, mesh.triangle_count() * 3);
        assert!(chunks.iter().all(|m| m.indices.len() == m.vertices.len()));
    }

    #[test]
    fn large_meshes_are_chunked() {
        let mesh = primitives::uv_sphere(Position::origin(), 1.0, 256, 128);
        let chunks = to_render_meshes(&mesh, WHITE);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.vertices.len() <= u16::MAX as usize + 1);
            assert_eq!(chunk.vertices.len() % 3, 0);
        }
    }

    #[test]
    fn faces_towards_light_are_brighter() {
        let lit = shade(WHITE, Vec3::from(LIGHT_DIRECTION).normalize());
        let unlit = shade(WHITE, -Vec3::Y);
        assert!(lit.r > unlit.r);
        assert!((unlit.r - 0.3).abs() < 1e-6);
    }

    #[test]
    fn center_of_box() {
        let mesh = primitives::cuboid(Position::new(0.0, 0.0, 0.0), Position::new(2.0, 4.0, 6.0));
        assert_eq!(mesh_center(&mesh), vec3(1.0, 2.0, 3.0));
        assert_eq!(mesh_center(&TriangleMesh::default()), Vec3::ZERO);
    }
}
