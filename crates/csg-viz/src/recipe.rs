//! The antenna-base model: a loading-coil former on a connector base.
//!
//! The part is assembled from three additive solids (base, coil former, top
//! post) followed by thirteen cuts for the whip nut, wire channels and
//! connectors. Every length is in millimetres; Y points up and the base
//! rests on `y = 0`.

use bsp_csg::primitives::{centered_box, cylinder, cylinder_between, hex_prism, lathe};
use bsp_csg::{BuildStep, Position, Recipe, Vector};
use clap::ValueEnum;

/// Radial depth of each winding groove.
const GROOVE_DEPTH: f64 = 0.8;
/// Clearance added to the nut's across-flats size and thickness.
const NUT_CLEARANCE: f64 = 0.5;
/// Wall left around the nut pocket in the top post.
const POST_WALL: f64 = 4.0;
/// Depth of the recess for the connector body under the base.
const RECESS_DEPTH: f64 = 3.0;

// Defaults shared by `BaseParams::default` and the export CLI.
pub const DEFAULT_COIL_DIAMETER: f64 = 25.0;
pub const DEFAULT_COIL_HEIGHT: f64 = 60.0;
pub const DEFAULT_GROOVE_PITCH: f64 = 1.5;
pub const DEFAULT_BASE_DIAMETER: f64 = 44.0;
pub const DEFAULT_BASE_HEIGHT: f64 = 30.0;
pub const DEFAULT_POST_HEIGHT: f64 = 16.0;
pub const DEFAULT_WIRE_HOLE_DIAMETER: f64 = 3.5;
pub const DEFAULT_SEGMENTS: usize = 48;

/// Hex nut dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutSpec {
    pub across_flats: f64,
    pub thickness: f64,
    pub bore: f64,
}

/// Panel connector dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorSpec {
    pub hole_diameter: f64,
    /// Width and depth of the flat milled for the connector flange.
    pub flat: Option<(f64, f64)>,
}

/// Thread of the whip mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ThreadType {
    #[default]
    M10,
    M8,
}

impl ThreadType {
    pub fn nut(self) -> NutSpec {
        match self {
            ThreadType::M10 => NutSpec {
                across_flats: 17.0,
                thickness: 8.0,
                bore: 10.5,
            },
            ThreadType::M8 => NutSpec {
                across_flats: 13.0,
                thickness: 6.5,
                bore: 8.5,
            },
        }
    }
}

/// Connector towards the radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RadioConnector {
    #[default]
    Bnc,
    Sma,
}

impl RadioConnector {
    pub fn spec(self) -> ConnectorSpec {
        match self {
            RadioConnector::Bnc => ConnectorSpec {
                hole_diameter: 9.5,
                flat: Some((16.0, 3.0)),
            },
            RadioConnector::Sma => ConnectorSpec {
                hole_diameter: 6.5,
                flat: Some((12.0, 2.0)),
            },
        }
    }
}

/// Connector for the counterpoise wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CounterpoiseConnector {
    #[default]
    Banana,
    Binding,
}

impl CounterpoiseConnector {
    pub fn spec(self) -> ConnectorSpec {
        match self {
            CounterpoiseConnector::Banana => ConnectorSpec {
                hole_diameter: 4.2,
                flat: None,
            },
            CounterpoiseConnector::Binding => ConnectorSpec {
                hole_diameter: 8.0,
                flat: None,
            },
        }
    }
}

/// Overall size of the finished part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub total_height: f64,
    pub max_diameter: f64,
}

/// User-facing parameters of the antenna base.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseParams {
    pub coil_diameter: f64,
    pub coil_height: f64,
    pub show_grooves: bool,
    pub groove_pitch: f64,
    pub base_diameter: f64,
    pub base_height: f64,
    pub radio_connector: RadioConnector,
    pub counterpoise_connector: CounterpoiseConnector,
    pub thread: ThreadType,
    pub post_height: f64,
    pub wire_hole_diameter: f64,
    /// Segments around the large round solids. Bores use half, wire holes a
    /// third of this.
    pub segments: usize,
}

impl Default for BaseParams {
    fn default() -> Self {
        Self {
            coil_diameter: DEFAULT_COIL_DIAMETER,
            coil_height: DEFAULT_COIL_HEIGHT,
            show_grooves: true,
            groove_pitch: DEFAULT_GROOVE_PITCH,
            base_diameter: DEFAULT_BASE_DIAMETER,
            base_height: DEFAULT_BASE_HEIGHT,
            radio_connector: RadioConnector::default(),
            counterpoise_connector: CounterpoiseConnector::default(),
            thread: ThreadType::default(),
            post_height: DEFAULT_POST_HEIGHT,
            wire_hole_diameter: DEFAULT_WIRE_HOLE_DIAMETER,
            segments: DEFAULT_SEGMENTS,
        }
    }
}

impl BaseParams {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            total_height: self.base_height + self.coil_height + self.post_height,
            max_diameter: self.base_diameter,
        }
    }
}

/// Half profile `(radius, y)` of the coil former, starting and ending on
/// the axis.
pub fn coil_profile(params: &BaseParams) -> Vec<(f64, f64)> {
    let radius = params.coil_diameter / 2.0;
    let height = params.coil_height;
    let pitch = params.groove_pitch;

    let mut profile = vec![(0.0, 0.0)];
    let mut push = |point: (f64, f64)| {
        if profile.last() != Some(&point) {
            profile.push(point);
        }
    };

    if params.show_grooves && pitch > 0.0 {
        let grooves = (height / pitch).floor() as usize;
        let inner = radius - GROOVE_DEPTH;
        for i in 0..grooves {
            let y = i as f64 * pitch;
            push((radius, y));
            push((inner, y + pitch * 0.3));
            push((inner, y + pitch * 0.7));
            push((radius, y + pitch));
        }
    } else {
        push((radius, 0.0));
    }
    push((radius, height));
    push((0.0, height));
    profile
}

/// The sixteen boolean steps that assemble the antenna base.
pub fn antenna_base_recipe(params: &BaseParams) -> Recipe {
    let segments = params.segments.max(3);
    let bore_segments = (segments / 2).max(3);
    let wire_segments = (segments / 3).max(3);

    let nut = params.thread.nut();
    let nut_across_flats = nut.across_flats + NUT_CLEARANCE;
    let nut_thickness = nut.thickness + NUT_CLEARANCE;

    let radio = params.radio_connector.spec();
    let radio_radius = radio.hole_diameter / 2.0;
    let recess_radius = (radio.hole_diameter + 6.0) / 2.0;
    let (flat_width, flat_depth) = radio.flat.unwrap_or((14.0, 2.5));
    let flat_cutter = centered_box(
        flat_width + 8.0,
        params.base_height + 2.0,
        flat_depth * 2.0 + 4.0,
    );
    let counterpoise = params.counterpoise_connector.spec();

    let base_radius = params.base_diameter / 2.0;
    let coil_radius = params.coil_diameter / 2.0;
    let post_radius = nut_across_flats / 2.0 + POST_WALL;
    let coil_bottom = params.base_height;
    let coil_top = coil_bottom + params.coil_height;
    let post_top = coil_top + params.post_height;

    let wire_radius = params.wire_hole_diameter / 2.0;
    let wire_top_y = coil_top - 5.0;
    let wire_bottom_y = coil_bottom + 5.0;
    let solder_y = params.base_height / 2.0 + 3.0;
    let mid_y = params.base_height / 2.0;

    let up = |y: f64| Vector::new(0.0, y, 0.0);
    let wire =
        |from: Position, to: Position| cylinder_between(from, to, wire_radius, wire_segments);

    Recipe::new()
        .then(BuildStep::union(
            "base cylinder",
            cylinder(base_radius, params.base_height, segments),
        ))
        .then(BuildStep::union(
            "coil former",
            lathe(&coil_profile(params), segments)
                .translated(up(coil_bottom)),
        ))
        .then(BuildStep::union(
            "top post",
            cylinder(post_radius, params.post_height, segments)
                .translated(up(coil_top)),
        ))
        .then(BuildStep::subtract(
            "hex nut pocket",
            hex_prism(nut_across_flats, nut_thickness)
                .translated(up(post_top - nut_thickness)),
        ))
        .then(BuildStep::subtract(
            "nut bore",
            cylinder(nut.bore / 2.0, params.post_height + 10.0, bore_segments)
                .translated(up(coil_top - 5.0)),
        ))
        .then(BuildStep::subtract(
            "top wire hole",
            wire(
                Position::new(-coil_radius - 5.0, wire_top_y, 0.0),
                Position::new(coil_radius + 5.0, wire_top_y, 0.0),
            ),
        ))
        .then(BuildStep::subtract(
            "up channel",
            wire(
                Position::new(0.0, wire_top_y - 2.0, 0.0),
                Position::new(0.0, coil_top + 5.0, 0.0),
            ),
        ))
        .then(BuildStep::subtract(
            "bottom wire hole",
            wire(
                Position::new(-coil_radius - 5.0, wire_bottom_y, 0.0),
                Position::new(coil_radius + 5.0, wire_bottom_y, 0.0),
            ),
        ))
        .then(BuildStep::subtract(
            "down channel",
            wire(
                Position::new(0.0, wire_bottom_y + 2.0, 0.0),
                Position::new(0.0, -5.0, 0.0),
            ),
        ))
        .then(BuildStep::subtract(
            "solder channel",
            wire(
                Position::new(0.0, solder_y, 0.0),
                Position::new(0.0, solder_y, -base_radius - 5.0),
            ),
        ))
        .then(BuildStep::subtract(
            "connector flat",
            flat_cutter
                .translated(Vector::new(0.0, -1.0, base_radius - flat_depth)),
        ))
        .then(BuildStep::subtract(
            "radio connector hole",
            cylinder_between(
                Position::new(0.0, mid_y, -base_radius - 5.0),
                Position::new(0.0, mid_y, base_radius + 5.0),
                radio_radius,
                wire_segments,
            ),
        ))
        .then(BuildStep::subtract(
            "solder access",
            centered_box(24.0, params.base_height - 6.0, 14.0)
                .translated(Vector::new(0.0, 3.0, -(base_radius - 5.0))),
        ))
        .then(BuildStep::subtract(
            "counterpoise hole",
            cylinder_between(
                Position::new(-base_radius - 5.0, mid_y, 0.0),
                Position::new(base_radius + 5.0, mid_y, 0.0),
                counterpoise.hole_diameter / 2.0,
                wire_segments,
            ),
        ))
        .then(BuildStep::subtract(
            "bottom connector hole",
            cylinder(radio_radius, params.base_height + 10.0, bore_segments)
                .translated(up(-5.0)),
        ))
        .then(BuildStep::subtract(
            "bottom connector recess",
            cylinder(recess_radius, RECESS_DEPTH + 1.0, bore_segments)
                .translated(up(-0.5)),
        ))
}
