use crate::error::RingError;
use derive_more::{Display, Into};
use std::f64::consts::TAU;
use std::fmt;
use std::time::Duration;

/// Normalized animation progress, always in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Display, Into)]
pub struct Phase(f64);

impl Phase {
    pub const ZERO: Phase = Phase(0.0);

    /// Wraps any finite value into `[0, 1)`.
    pub fn wrapping(value: f64) -> Self {
        let wrapped = value.rem_euclid(1.0);
        // rem_euclid can round up to exactly 1.0 for tiny negative inputs
        Self(if wrapped >= 1.0 { 0.0 } else { wrapped })
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Rotation of the sweep gradient for this phase.
    pub fn radians(&self) -> f64 {
        self.0 * TAU
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Idle,
    Running,
}

type Subscriber = Box<dyn FnMut(Phase)>;

/// Frame-driven phase generator for the rotating border gradient.
///
/// The host feeds it frame deltas through [`RotationAnimator::advance`]; it
/// never owns a timer. Subscribers are called once per advance while
/// running.
pub struct RotationAnimator {
    period: Duration,
    phase: Phase,
    state: AnimationState,
    subscribers: Vec<Subscriber>,
}

impl RotationAnimator {
    pub fn new(period: Duration) -> Result<Self, RingError> {
        if period.is_zero() {
            return Err(RingError::invalid("rotation period must be non-zero"));
        }
        Ok(Self {
            period,
            phase: Phase::ZERO,
            state: AnimationState::Idle,
            subscribers: Vec::new(),
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Changes the turn duration without resetting the current phase.
    pub fn set_period(&mut self, period: Duration) -> Result<(), RingError> {
        if period.is_zero() {
            return Err(RingError::invalid("rotation period must be non-zero"));
        }
        self.period = period;
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == AnimationState::Running
    }

    pub fn rotation(&self) -> f64 {
        self.phase.radians()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(Phase) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        log::debug!("rotation animator started ({:?} period)", self.period);
        self.phase = Phase::ZERO;
        self.state = AnimationState::Running;
    }

    pub fn stop(&mut self) {
        if self.is_running() {
            log::debug!("rotation animator stopped at phase {}", self.phase);
        }
        self.state = AnimationState::Idle;
        self.phase = Phase::ZERO;
    }

    /// Moves the phase forward by one frame of `delta`, wrapping at 1.
    pub fn advance(&mut self, delta: Duration) -> Phase {
        if !self.is_running() {
            return self.phase;
        }

        let progress = delta.as_secs_f64() / self.period.as_secs_f64();
        self.phase = Phase::wrapping(self.phase.value() + progress);

        let phase = self.phase;
        self.subscribers.iter_mut().for_each(|notify| notify(phase));
        phase
    }
}

impl fmt::Debug for RotationAnimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotationAnimator")
            .field("period", &self.period)
            .field("phase", &self.phase)
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
