use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};
use bsp_csg::stl::write_binary_stl;
use bsp_csg::{BuildRun, BuildTracker, Mesh as TriangleMesh};
use csg_viz::recipe::{BaseParams, antenna_base_recipe};
use csg_viz::{OrbitCamera, draw_progress_bar, mesh_center, to_render_meshes};
use macroquad::models::draw_mesh;
use macroquad::prelude::*;

const STL_HEADER: &str = "Antenna Base Designer - STL Export";
const OUTPUT_PATH: &str = "antenna_base.stl";
const MODEL_COLOR: Color = Color::new(0.85, 0.6, 0.3, 1.0);

fn save_stl(mesh: &TriangleMesh, path: &str) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {path}"))?;
    let mut writer = BufWriter::new(file);
    write_binary_stl(&mut writer, mesh, STL_HEADER)
        .with_context(|| format!("failed to write {path}"))?;
    Ok(())
}

fn start_build(tracker: &BuildTracker, params: &BaseParams) -> BuildRun {
    println!(
        "Building antenna base ({} grooves)...",
        if params.show_grooves { "with" } else { "without" }
    );
    tracker.start(antenna_base_recipe(params))
}

#[macroquad::main("Antenna Base Designer")]
async fn main() {
    let mut params = BaseParams::default();
    let tracker = BuildTracker::new();
    let mut run = Some(start_build(&tracker, &params));

    let mut model: Option<TriangleMesh> = None;
    let mut render_meshes = Vec::new();
    let mut status = String::from("Building...");

    let height = params.dimensions().total_height as f32;
    let mut camera = OrbitCamera::new(180.0, 0.6, 0.4)
        .with_zoom(10.0, 40.0, 600.0)
        .with_target(vec3(0.0, height / 2.0, 0.0));

    loop {
        camera.update();

        if is_key_pressed(KeyCode::G) {
            params.show_grooves = !params.show_grooves;
            // Starting a new generation supersedes the run in progress.
            run = Some(start_build(&tracker, &params));
            status = String::from("Rebuilding...");
        }

        if is_key_pressed(KeyCode::S) {
            status = match &model {
                Some(mesh) => match save_stl(mesh, OUTPUT_PATH) {
                    Ok(()) => format!("Saved {OUTPUT_PATH} ({} triangles)", mesh.triangle_count()),
                    Err(err) => format!("Export failed: {err:#}"),
                },
                None => String::from("Nothing to save yet"),
            };
        }

        // One boolean step per frame keeps the window responsive.
        if let Some(mut current) = run.take() {
            match current.step() {
                Some(progress) if !progress.is_complete() => run = Some(current),
                _ => {
                    if let Some(mesh) = current.finish() {
                        render_meshes = to_render_meshes(&mesh, MODEL_COLOR);
                        camera.target = mesh_center(&mesh);
                        status = format!("Done: {} triangles", mesh.triangle_count());
                        model = Some(mesh);
                    }
                }
            }
        }

        clear_background(Color::from_rgba(20, 20, 30, 255));
        set_camera(&camera.to_camera3d());

        for mesh in &render_meshes {
            draw_mesh(mesh);
        }
        draw_grid(20, 10.0, DARKGRAY, Color::from_rgba(40, 40, 50, 255));

        set_default_camera();

        let dims = params.dimensions();
        draw_text("Antenna Base Designer", 10.0, 25.0, 24.0, WHITE);
        let size = format!(
            "Height: {} mm | Diameter: {} mm",
            dims.total_height, dims.max_diameter
        );
        draw_text(&size, 10.0, 45.0, 18.0, GRAY);

        if let Some(current) = &run {
            let progress = current.progress();
            let label = format!(
                "{}% - {}",
                progress.percent(),
                current.next_label().unwrap_or("finishing")
            );
            draw_progress_bar(10.0, 60.0, 300.0, progress.fraction(), &label);
        } else {
            draw_text(&status, 10.0, 75.0, 18.0, LIGHTGRAY);
        }

        draw_text(
            "Drag mouse to rotate, scroll to zoom | G: toggle grooves | S: save STL",
            10.0,
            screen_height() - 30.0,
            16.0,
            DARKGRAY,
        );
        let fps = format!("FPS: {}", get_fps());
        draw_text(&fps, 10.0, screen_height() - 12.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
