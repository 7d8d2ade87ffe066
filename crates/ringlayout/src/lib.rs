//! Geometry and animation for segmented story-tray borders.

pub mod anim;
pub mod arc;
pub mod color;
pub mod error;
pub mod paint;
pub mod ring;
pub mod tray;

pub use anim::{AnimationState, Phase, RotationAnimator};
pub use arc::{Segment, layout};
pub use color::faded_colors;
pub use error::RingError;
pub use paint::{BorderPaint, RingShape, SweepGradient, border_paint};
pub use ring::{RingSpec, RingVariant};
pub use tray::TrayState;
