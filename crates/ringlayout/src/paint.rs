//! Value descriptors for painting a tray border.
//!
//! Nothing here touches a drawing context; a renderer walks a
//! [`BorderPaint`] and strokes what it describes.

use crate::anim::Phase;
use crate::arc::{self, Segment};
use crate::color::faded_colors;
use crate::error::RingError;
use crate::ring::RingSpec;
use palette::{LinSrgba, Mix, Srgba};
use std::f64::consts::TAU;

/// Colors spread evenly over one turn, starting at `rotation` radians.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepGradient {
    pub colors: Vec<Srgba<f64>>,
    pub rotation: f64,
}

impl SweepGradient {
    pub fn new(colors: Vec<Srgba<f64>>, rotation: f64) -> Self {
        Self { colors, rotation }
    }

    /// Color of the gradient at `angle` radians.
    ///
    /// The last stop sits at the end of the turn and is not blended back
    /// into the first, so a visible seam stays at `rotation`.
    pub fn color_at(&self, angle: f64) -> Srgba<f64> {
        match self.colors.as_slice() {
            [] => Srgba::new(0.0, 0.0, 0.0, 0.0),
            [only] => *only,
            colors => {
                let t = ((angle - self.rotation) / TAU).rem_euclid(1.0);
                let position = t * (colors.len() - 1) as f64;
                let index = (position.floor() as usize).min(colors.len() - 2);
                let factor = (position - index as f64).clamp(0.0, 1.0);

                let from: LinSrgba<f64> = colors[index].into_linear();
                let to: LinSrgba<f64> = colors[index + 1].into_linear();
                Srgba::from_linear(from.mix(to, factor))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RingShape {
    Circle,
    Arcs(Vec<Segment>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BorderPaint {
    pub shape: RingShape,
    pub stroke_width: f64,
    pub gradient: SweepGradient,
}

/// Describes the border for `spec` at animation `phase`.
///
/// Colors are faded while `loading` and used as configured otherwise.
pub fn border_paint(
    spec: &RingSpec,
    phase: Phase,
    loading: bool,
) -> Result<BorderPaint, RingError> {
    spec.validate()?;

    let shape = if spec.is_solid() {
        RingShape::Circle
    } else {
        RingShape::Arcs(arc::layout(spec.segment_count, spec.gap_degrees)?)
    };

    let colors = if loading {
        faded_colors(&spec.colors)
    } else {
        spec.colors.clone()
    };

    Ok(BorderPaint {
        shape,
        stroke_width: spec.stroke_width,
        gradient: SweepGradient::new(colors, phase.radians()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::RingVariant;

    fn red() -> Srgba<f64> {
        Srgba::new(1.0, 0.0, 0.0, 1.0)
    }

    fn blue() -> Srgba<f64> {
        Srgba::new(0.0, 0.0, 1.0, 1.0)
    }

    fn assert_color_close(a: Srgba<f64>, b: Srgba<f64>) {
        let (ar, ag, ab, aa) = a.into_components();
        let (br, bg, bb, ba) = b.into_components();
        for (x, y) in [(ar, br), (ag, bg), (ab, bb), (aa, ba)] {
            assert!((x - y).abs() < 1e-6, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn test_gradient_endpoints() {
        let gradient = SweepGradient::new(vec![red(), blue()], 0.0);
        assert_color_close(gradient.color_at(0.0), red());
        assert_color_close(gradient.color_at(TAU - 1e-9), blue());
    }

    #[test]
    fn test_gradient_rotation_moves_start() {
        let gradient = SweepGradient::new(vec![red(), blue()], TAU / 4.0);
        assert_color_close(gradient.color_at(TAU / 4.0), red());
        assert_color_close(gradient.color_at(TAU / 4.0 - 1e-9), blue());
    }

    #[test]
    fn test_gradient_single_and_empty() {
        assert_color_close(SweepGradient::new(vec![red()], 1.0).color_at(3.0), red());
        assert_eq!(SweepGradient::new(Vec::new(), 0.0).color_at(0.0).alpha, 0.0);
    }

    #[test]
    fn test_single_segment_is_circle() {
        let paint = border_paint(&RingSpec::new(1, 10.0, 2.0), Phase::ZERO, false).unwrap();
        assert_eq!(paint.shape, RingShape::Circle);
    }

    #[test]
    fn test_gradient_variant_is_circle() {
        let spec = RingSpec::new(4, 10.0, 2.0).with_variant(RingVariant::Gradient);
        let paint = border_paint(&spec, Phase::ZERO, false).unwrap();
        assert_eq!(paint.shape, RingShape::Circle);
    }

    #[test]
    fn test_segmented_arcs() {
        let paint = border_paint(&RingSpec::new(4, 10.0, 2.0), Phase::ZERO, false).unwrap();
        let RingShape::Arcs(segments) = paint.shape else {
            panic!("expected arcs");
        };
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[2], Segment::new(180.0, 80.0));
        assert_eq!(paint.stroke_width, 2.0);
    }

    #[test]
    fn test_loading_fades_and_rotates() {
        let spec = RingSpec::new(3, 5.0, 2.0).with_colors(vec![red(), blue(), red()]);
        let phase = Phase::wrapping(0.5);

        let idle = border_paint(&spec, Phase::ZERO, false).unwrap();
        assert_eq!(idle.gradient.colors, spec.colors);
        assert_eq!(idle.gradient.rotation, 0.0);

        let loading = border_paint(&spec, phase, true).unwrap();
        assert_eq!(loading.gradient.colors, faded_colors(&spec.colors));
        assert!((loading.gradient.rotation - TAU / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_spec() {
        assert!(border_paint(&RingSpec::new(0, 5.0, 2.0), Phase::ZERO, false).is_err());
    }
}
