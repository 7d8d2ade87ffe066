use crate::anim::{Phase, RotationAnimator};
use crate::error::RingError;
use crate::paint::{self, BorderPaint};
use crate::ring::RingSpec;
use std::time::Duration;

pub const DEFAULT_ROTATION_PERIOD: Duration = Duration::from_millis(1500);

/// Everything a story tray keeps between frames.
///
/// The owner drives its lifecycle explicitly: [`TrayState::create`] when the
/// tray appears, [`TrayState::on_config_change`] when its ring settings
/// change and [`TrayState::destroy`] when it goes away.
#[derive(Debug)]
pub struct TrayState {
    spec: RingSpec,
    animator: RotationAnimator,
}

impl TrayState {
    pub fn create(spec: RingSpec, rotation_period: Duration) -> Result<Self, RingError> {
        spec.validate()?;
        let animator = RotationAnimator::new(rotation_period)?;
        log::debug!(
            "tray created with {} segment(s), {}° gaps",
            spec.segment_count,
            spec.gap_degrees
        );
        Ok(Self { spec, animator })
    }

    /// Swaps in a new ring. An invalid one is rejected and the current ring
    /// stays.
    pub fn on_config_change(&mut self, spec: RingSpec) -> Result<(), RingError> {
        if let Err(e) = spec.validate() {
            log::warn!("Keeping previous ring, new one is invalid: {}", e);
            return Err(e);
        }
        self.spec = spec;
        Ok(())
    }

    pub fn set_rotation_period(&mut self, period: Duration) -> Result<(), RingError> {
        self.animator.set_period(period)
    }

    pub fn destroy(mut self) {
        self.animator.stop();
        log::debug!("tray destroyed");
    }

    pub fn spec(&self) -> &RingSpec {
        &self.spec
    }

    pub fn animator_mut(&mut self) -> &mut RotationAnimator {
        &mut self.animator
    }

    pub fn phase(&self) -> Phase {
        self.animator.phase()
    }

    pub fn is_loading(&self) -> bool {
        self.animator.is_running()
    }

    pub fn start_loading(&mut self) {
        self.animator.start();
    }

    pub fn stop_loading(&mut self) {
        self.animator.stop();
    }

    pub fn toggle_loading(&mut self) {
        if self.is_loading() {
            self.stop_loading();
        } else {
            self.start_loading();
        }
    }

    /// Advances the rotation by one frame. Returns whether the border needs
    /// repainting, which is every frame while loading.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if !self.is_loading() {
            return false;
        }
        self.animator.advance(delta);
        true
    }

    pub fn border(&self) -> Result<BorderPaint, RingError> {
        paint::border_paint(&self.spec, self.phase(), self.is_loading())
    }
}
