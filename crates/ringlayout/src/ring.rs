use crate::error::RingError;
use palette::Srgba;
use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum RingVariant {
    /// One arc per story, separated by gaps.
    #[default]
    #[strum(serialize = "segmented", serialize = "arcs")]
    Segmented,
    /// A single continuous stroke.
    #[strum(serialize = "gradient", serialize = "continuous")]
    Gradient,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RingSpec {
    pub segment_count: usize,
    pub gap_degrees: f64,
    pub stroke_width: f64,
    pub colors: Vec<Srgba<f64>>,
    pub variant: RingVariant,
}

impl RingSpec {
    pub fn new(segment_count: usize, gap_degrees: f64, stroke_width: f64) -> Self {
        Self {
            segment_count,
            gap_degrees,
            stroke_width,
            colors: default_colors(),
            variant: RingVariant::default(),
        }
    }

    pub fn with_colors(mut self, colors: Vec<Srgba<f64>>) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_variant(mut self, variant: RingVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Single story rings skip the arc layout and draw a plain circle.
    pub fn is_solid(&self) -> bool {
        self.variant == RingVariant::Gradient || self.segment_count == 1
    }

    pub fn validate(&self) -> Result<(), RingError> {
        if self.segment_count < 1 {
            return Err(RingError::invalid("segment count must be at least 1"));
        }
        if !self.gap_degrees.is_finite() || self.gap_degrees < 0.0 {
            return Err(RingError::invalid(format!(
                "gap must be a finite, non-negative number of degrees (got {})",
                self.gap_degrees
            )));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(RingError::invalid(format!(
                "stroke width must be positive (got {})",
                self.stroke_width
            )));
        }
        Ok(())
    }
}

/// Warm story-ring palette: yellow, orange, pink, purple.
pub fn default_colors() -> Vec<Srgba<f64>> {
    vec![
        Srgba::new(0.996, 0.855, 0.459, 1.0),
        Srgba::new(0.980, 0.494, 0.118, 1.0),
        Srgba::new(0.839, 0.161, 0.463, 1.0),
        Srgba::new(0.588, 0.184, 0.749, 1.0),
    ]
}
