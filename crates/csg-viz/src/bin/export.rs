//! Headless antenna-base export.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use bsp_csg::BuildTracker;
use bsp_csg::stl::write_binary_stl;
use clap::Parser;
use csg_viz::recipe::{
    BaseParams, CounterpoiseConnector, DEFAULT_BASE_DIAMETER, DEFAULT_BASE_HEIGHT,
    DEFAULT_COIL_DIAMETER, DEFAULT_COIL_HEIGHT, DEFAULT_GROOVE_PITCH, DEFAULT_POST_HEIGHT,
    DEFAULT_SEGMENTS, DEFAULT_WIRE_HOLE_DIAMETER, RadioConnector, ThreadType, antenna_base_recipe,
};
use indicatif::{ProgressBar, ProgressStyle};

const STL_HEADER: &str = "Antenna Base Designer - STL Export";
const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

#[derive(Parser)]
#[command(name = "csg-export", long_about = None)]
#[command(about = "Build the antenna base and write it as binary STL")]
struct Cli {
    /// Output STL file
    #[arg(short, long, value_name = "FILE", default_value = "antenna_base.stl")]
    output: PathBuf,

    /// Coil former diameter (mm)
    #[arg(long, default_value_t = DEFAULT_COIL_DIAMETER)]
    coil_diameter: f64,

    /// Coil former height (mm)
    #[arg(long, default_value_t = DEFAULT_COIL_HEIGHT)]
    coil_height: f64,

    /// Leave out the winding grooves
    #[arg(long)]
    no_grooves: bool,

    /// Winding groove pitch (mm)
    #[arg(long, default_value_t = DEFAULT_GROOVE_PITCH)]
    groove_pitch: f64,

    /// Base diameter (mm)
    #[arg(long, default_value_t = DEFAULT_BASE_DIAMETER)]
    base_diameter: f64,

    /// Base height (mm)
    #[arg(long, default_value_t = DEFAULT_BASE_HEIGHT)]
    base_height: f64,

    /// Radio connector
    #[arg(long, value_enum, default_value_t = RadioConnector::default())]
    radio: RadioConnector,

    /// Counterpoise connector
    #[arg(long, value_enum, default_value_t = CounterpoiseConnector::default())]
    counterpoise: CounterpoiseConnector,

    /// Whip mount thread
    #[arg(long, value_enum, default_value_t = ThreadType::default())]
    thread: ThreadType,

    /// Top post height (mm)
    #[arg(long, default_value_t = DEFAULT_POST_HEIGHT)]
    post_height: f64,

    /// Wire hole diameter (mm)
    #[arg(long, default_value_t = DEFAULT_WIRE_HOLE_DIAMETER)]
    wire_diameter: f64,

    /// Segments around round solids
    #[arg(long, default_value_t = DEFAULT_SEGMENTS)]
    segments: usize,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn params(&self) -> BaseParams {
        BaseParams {
            coil_diameter: self.coil_diameter,
            coil_height: self.coil_height,
            show_grooves: !self.no_grooves,
            groove_pitch: self.groove_pitch,
            base_diameter: self.base_diameter,
            base_height: self.base_height,
            radio_connector: self.radio,
            counterpoise_connector: self.counterpoise,
            thread: self.thread,
            post_height: self.post_height,
            wire_hole_diameter: self.wire_diameter,
            segments: self.segments,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let params = cli.params();
    let recipe = antenna_base_recipe(&params);

    let progress = if cli.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(recipe.len() as u64)
    };
    progress.set_style(
        ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)
            .context("invalid progress template")?
            .progress_chars("#>-"),
    );

    let tracker = BuildTracker::new();
    let mut run = tracker.start(recipe);
    while let Some(label) = run.next_label().map(str::to_owned) {
        progress.set_message(label);
        match run.next() {
            Some(step) => progress.set_position(step.step as u64),
            None => break,
        }
    }
    progress.finish_with_message("done");

    let Some(mesh) = run.finish() else {
        bail!("build was superseded before it finished");
    };

    let file = File::create(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;
    let mut writer = BufWriter::new(file);
    write_binary_stl(&mut writer, &mesh, STL_HEADER)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    let dims = params.dimensions();
    println!(
        "Wrote {} ({} triangles, {} mm tall, {} mm wide, {:.1} cm³)",
        cli.output.display(),
        mesh.triangle_count(),
        dims.total_height,
        dims.max_diameter,
        mesh.volume() / 1000.0
    );
    Ok(())
}
