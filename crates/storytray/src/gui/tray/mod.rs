use std::f64::consts::PI;

pub mod model;
pub mod view;

pub use model::{Point, Tray, TrayGeometry};
pub use view::draw;

pub const RING_PADDING: f64 = 4.0; // space between avatar and border
pub const WINDOW_MARGIN: f64 = 8.0;
pub const GRADIENT_STEP: f64 = PI / 90.0; // 2° per stroked slice
pub const MAX_ARC_STROKES: usize = 360; // more arcs than this paint as one ring
