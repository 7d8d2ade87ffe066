use super::model::{Tray, TrayGeometry};
use super::{GRADIENT_STEP, MAX_ARC_STROKES};
use cairo::Context;
use ringlayout::{BorderPaint, RingShape};
use std::f64::consts::{PI, TAU};

/// One stroke of the border: start and signed sweep, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Slice {
    start: f64,
    sweep: f64,
}

/// Splits `sweep` radians from `start` into slices of at most
/// [`GRADIENT_STEP`]. Anything past one turn is dropped.
fn split(start: f64, sweep: f64) -> impl Iterator<Item = Slice> {
    let sweep = sweep.clamp(-TAU, TAU);
    let count = (sweep.abs() / GRADIENT_STEP).ceil().max(1.0) as usize;
    let step = sweep / count as f64;
    (0..count).map(move |i| Slice {
        start: start + step * i as f64,
        sweep: step,
    })
}

/// Cairo has no sweep gradient, so the border is stroked in short slices,
/// each in the gradient color at its midpoint.
///
/// Arcs whose sweeps add up to a full turn, or more than
/// [`MAX_ARC_STROKES`] arcs, are painted as one ring. A frame never strokes
/// more than `MAX_ARC_STROKES` plus one turn of slices.
fn slices(shape: &RingShape) -> Vec<Slice> {
    let arcs: Vec<(f64, f64)> = match shape {
        RingShape::Circle => return split(0.0, TAU).collect(),
        RingShape::Arcs(segments) => segments
            .iter()
            .map(|s| (s.start_radians(), s.sweep_radians()))
            .filter(|(_, sweep)| *sweep != 0.0 && sweep.is_finite())
            .collect(),
    };

    let covered: f64 = arcs.iter().map(|(_, sweep)| sweep.abs().min(TAU)).sum();
    if arcs.len() > MAX_ARC_STROKES || covered >= TAU {
        return split(0.0, TAU).collect();
    }

    arcs.into_iter()
        .flat_map(|(start, sweep)| split(start, sweep))
        .collect()
}

struct BorderRenderer<'a> {
    paint: &'a BorderPaint,
    geometry: &'a TrayGeometry,
}

impl<'a> BorderRenderer<'a> {
    fn new(paint: &'a BorderPaint, geometry: &'a TrayGeometry) -> Self {
        Self { paint, geometry }
    }

    fn draw(&self, cr: &Context) -> Result<(), cairo::Error> {
        cr.set_line_width(self.paint.stroke_width * self.geometry.scale);
        cr.set_line_cap(cairo::LineCap::Butt);

        slices(&self.paint.shape)
            .into_iter()
            .try_for_each(|slice| self.stroke(cr, slice))
    }

    fn stroke(&self, cr: &Context, slice: Slice) -> Result<(), cairo::Error> {
        let (cx, cy) = (self.geometry.center.x, self.geometry.center.y);
        let radius = self.geometry.ring_radius;
        let end = slice.start + slice.sweep;

        let (r, g, b, a) = self
            .paint
            .gradient
            .color_at(slice.start + slice.sweep / 2.0)
            .into_components();
        cr.set_source_rgba(r, g, b, a);
        cr.new_path();
        // negative sweeps come from the gap fallback
        if slice.sweep > 0.0 {
            cr.arc(cx, cy, radius, slice.start, end);
        } else {
            cr.arc_negative(cx, cy, radius, slice.start, end);
        }
        cr.stroke()
    }
}

pub fn draw(
    cr: &Context,
    tray: &Tray,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    let geometry = tray.geometry(width, height);
    draw_avatar(cr, &geometry, tray)?;

    match tray.state.border() {
        Ok(paint) => BorderRenderer::new(&paint, &geometry).draw(cr),
        Err(e) => {
            log::warn!("Skipping tray border: {}", e);
            Ok(())
        }
    }
}

fn draw_avatar(cr: &Context, geometry: &TrayGeometry, tray: &Tray) -> Result<(), cairo::Error> {
    let (r, g, b, a) = tray.avatar_color.into_components();
    cr.set_source_rgba(r, g, b, a);
    cr.new_path();
    cr.arc(
        geometry.center.x,
        geometry.center.y,
        geometry.avatar_radius,
        0.0,
        2.0 * PI,
    );
    cr.fill()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use ringlayout::layout;
    use std::time::Duration;

    fn render(tray: &Tray) -> cairo::ImageSurface {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 110, 110).unwrap();
        {
            let cr = Context::new(&surface).unwrap();
            draw(&cr, tray, 110.0, 110.0).unwrap();
        }
        surface
    }

    fn alpha_at(surface: &mut cairo::ImageSurface, x: usize, y: usize) -> u8 {
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        // ARGB32 is native-endian, alpha is the high byte
        let offset = y * stride + x * 4;
        let pixel = u32::from_ne_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]);
        (pixel >> 24) as u8
    }

    #[test]
    fn test_segmented_ring_leaves_gaps() {
        let config = Config {
            segments: 4,
            gap_degrees: 20.0,
            ..Config::default()
        };
        let tray = Tray::from_config(&config).unwrap();
        let mut surface = render(&tray);

        // ring radius 45.5 around (55, 55), arcs of 70°
        // 0° starts a segment, 70°..90° is a gap
        assert!(alpha_at(&mut surface, 100, 55) > 0);
        // 80°, middle of the first gap
        assert_eq!(alpha_at(&mut surface, 62, 99), 0);
        // avatar center
        assert_eq!(alpha_at(&mut surface, 55, 55), 255);
    }

    #[test]
    fn test_loading_ring_is_drawn() {
        let mut tray = Tray::from_config(&Config::default()).unwrap();
        tray.state.start_loading();
        tray.state.tick(Duration::from_millis(100));
        let mut surface = render(&tray);
        assert!(alpha_at(&mut surface, 55, 100) > 0);
    }

    #[test]
    fn test_negative_fallback_arcs_are_drawn_backwards() {
        // 2 * 720° of gaps, fallback arcs of -0.5°
        let config = Config {
            segments: 2,
            gap_degrees: 720.0,
            ..Config::default()
        };
        let tray = Tray::from_config(&config).unwrap();
        let mut surface = render(&tray);

        // just above the 0° axis is painted, just below is not
        assert!(alpha_at(&mut surface, 100, 54) > 0);
        assert_eq!(alpha_at(&mut surface, 100, 56), 0);

        let slices = slices(&RingShape::Arcs(layout(2, 720.0).unwrap()));
        assert_eq!(slices.len(), 2);
        assert!(slices.iter().all(|s| s.sweep < 0.0));
    }

    #[test]
    fn test_full_turn_of_arcs_paints_one_ring() {
        // 720 * 0.5° fills the circle, fallback arcs are 719°
        let shape = RingShape::Arcs(layout(720, 0.5).unwrap());
        assert_eq!(slices(&shape), slices(&RingShape::Circle));
        assert_eq!(slices(&RingShape::Circle).len(), 180);
    }

    #[test]
    fn test_many_small_arcs_paint_one_ring() {
        // 1000 arcs of 0.18° with 0.18° gaps only cover half the circle
        let shape = RingShape::Arcs(layout(1000, 0.18).unwrap());
        assert_eq!(slices(&shape).len(), 180);
    }

    #[test]
    fn test_stroke_count_is_bounded() {
        for (segments, gap) in [(2, 1.0), (12, 6.0), (MAX_ARC_STROKES, 0.5), (10, 40.0)] {
            let shape = RingShape::Arcs(layout(segments, gap).unwrap());
            let count = slices(&shape).len();
            assert!(count <= MAX_ARC_STROKES + 180, "{segments} arcs gave {count} slices");
        }
    }

    #[test]
    fn test_slices_follow_segments() {
        let shape = RingShape::Arcs(layout(4, 20.0).unwrap());
        let slices = slices(&shape);
        // 70° arcs in slices of at most 2°
        let per_arc = (70f64.to_radians() / GRADIENT_STEP).ceil() as usize;
        assert_eq!(slices.len(), 4 * per_arc);
        assert!((slices[per_arc].start - PI / 2.0).abs() < 1e-9);
        let covered: f64 = slices.iter().map(|s| s.sweep).sum();
        assert!((covered - 280f64.to_radians()).abs() < 1e-9);
    }
}
