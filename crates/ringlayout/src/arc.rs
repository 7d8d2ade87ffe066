use crate::error::RingError;

pub const FULL_CIRCLE_DEGREES: f64 = 360.0;

/// One stroke of a segmented ring border, in degrees.
///
/// Angles follow the painter's convention: 0° points east and sweep grows
/// clockwise in screen space. They are never reduced modulo 360.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start_degree: f64,
    pub sweep_degree: f64,
}

impl Segment {
    pub fn new(start_degree: f64, sweep_degree: f64) -> Self {
        Self {
            start_degree,
            sweep_degree,
        }
    }

    pub fn end_degree(&self) -> f64 {
        self.start_degree + self.sweep_degree
    }

    pub fn start_radians(&self) -> f64 {
        self.start_degree.to_radians()
    }

    pub fn sweep_radians(&self) -> f64 {
        self.sweep_degree.to_radians()
    }
}

/// Angular length of every segment for `segment_count` arcs separated by
/// `gap_degrees`.
///
/// When the gaps eat the whole circle the length falls back to
/// `360 / gap_degrees - 1`. That value can be anything from huge to
/// negative; callers get it unchanged.
pub fn arc_length(segment_count: usize, gap_degrees: f64) -> Result<f64, RingError> {
    if segment_count < 1 {
        return Err(RingError::invalid("segment count must be at least 1"));
    }
    if !gap_degrees.is_finite() || gap_degrees < 0.0 {
        return Err(RingError::invalid(format!(
            "gap must be a finite, non-negative number of degrees (got {gap_degrees})"
        )));
    }

    let count = segment_count as f64;
    let total_gap = count * gap_degrees;
    let arc = (FULL_CIRCLE_DEGREES - total_gap) / count;
    if arc > 0.0 {
        return Ok(arc);
    }

    // fallback branch divides by the gap
    if gap_degrees == 0.0 {
        return Err(RingError::invalid(
            "gaps fill the circle and the fallback arc length needs a non-zero gap",
        ));
    }
    let fallback = FULL_CIRCLE_DEGREES / gap_degrees - 1.0;
    log::debug!(
        "{segment_count} segments with {gap_degrees}° gaps do not fit, falling back to {fallback}° arcs"
    );
    Ok(fallback)
}

/// Lays out `segment_count` arcs around the circle, starting at 0° and
/// leaving `gap_degrees` after each one.
pub fn layout(segment_count: usize, gap_degrees: f64) -> Result<Vec<Segment>, RingError> {
    let sweep = arc_length(segment_count, gap_degrees)?;
    let step = sweep + gap_degrees;

    Ok((0..segment_count)
        .scan(0.0_f64, |start, _| {
            let segment = Segment::new(*start, sweep);
            *start += step;
            Some(segment)
        })
        .collect())
}
