//! Single-axis simulator.
//!
//! The `SimAxis` moves toward its target in fixed pulse steps, one step per
//! in-position poll. The step size follows the written velocity parameter.
//! "Settled" lags "in position" by a configurable number of polls, the way a
//! real drive reports positioning-finished after the move ends.

use tracing::trace;

/// Pulses moved per poll when no velocity profile was written yet.
const DEFAULT_STEP: i32 = 100;

/// Velocity parameter units per pulse of step.
const VELOCITY_PER_STEP_PULSE: i32 = 10;

/// Alarm behaviour on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmKind {
    /// Cleared by the next alarm reset.
    Transient,
    /// Survives every alarm reset.
    Sticky,
}

/// Simulated axis state.
#[derive(Debug, Clone)]
pub struct SimAxis {
    /// Current position [pulses].
    position: i32,
    /// Commanded position [pulses].
    target: i32,
    /// Last written velocity parameter.
    velocity: i32,
    /// Last written acceleration parameter.
    acceleration: i32,
    /// Servo enabled.
    servo_on: bool,
    /// Latched alarm, if any.
    alarm: Option<AlarmKind>,
    /// Polls spent at the target since arrival.
    dwell: u32,
    /// Polls at the target before "settled" is reported.
    settle_polls: u32,
    /// Origin search completed at least once.
    homed: bool,
}

impl SimAxis {
    /// Create an axis resting at `position` with the servo off.
    pub fn new(position: i32, settle_polls: u32) -> Self {
        Self {
            position,
            target: position,
            velocity: 0,
            acceleration: 0,
            servo_on: false,
            alarm: None,
            dwell: settle_polls,
            settle_polls,
            homed: false,
        }
    }

    /// Current position.
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Commanded position.
    pub fn target(&self) -> i32 {
        self.target
    }

    /// Last written (velocity, acceleration).
    pub fn profile(&self) -> (i32, i32) {
        (self.velocity, self.acceleration)
    }

    /// Whether an origin search has run.
    pub fn is_homed(&self) -> bool {
        self.homed
    }

    /// Servo state.
    pub fn servo_on(&self) -> bool {
        self.servo_on
    }

    /// Alarm state.
    pub fn has_alarm(&self) -> bool {
        self.alarm.is_some()
    }

    /// Latch an alarm. Motion stops where it is.
    pub fn raise_alarm(&mut self, kind: AlarmKind) {
        self.alarm = Some(kind);
    }

    /// Clear a transient alarm. Returns true if no alarm remains.
    pub fn reset_alarm(&mut self) -> bool {
        if self.alarm == Some(AlarmKind::Transient) {
            self.alarm = None;
        }
        self.alarm.is_none()
    }

    /// Enable or disable the servo.
    pub fn set_servo(&mut self, on: bool) {
        self.servo_on = on;
    }

    /// Store velocity/acceleration parameters.
    pub fn set_profile(&mut self, velocity: i32, acceleration: i32) {
        self.velocity = velocity;
        self.acceleration = acceleration;
    }

    /// Accept a new target. Rejected while the servo is off or an alarm is latched.
    pub fn command_move(&mut self, target: i32) -> bool {
        if !self.servo_on || self.alarm.is_some() {
            return false;
        }
        if target != self.target {
            self.target = target;
            self.dwell = 0;
        }
        true
    }

    /// Start an origin search toward pulse 0.
    pub fn command_home(&mut self) -> bool {
        if !self.command_move(0) {
            return false;
        }
        self.homed = true;
        true
    }

    /// Advance one poll and report whether the target is reached.
    pub fn poll_in_position(&mut self) -> bool {
        self.step();
        self.position == self.target
    }

    /// Whether the axis has dwelt at its target long enough.
    pub fn is_settled(&self) -> bool {
        self.position == self.target && self.dwell >= self.settle_polls
    }

    fn step(&mut self) {
        if self.position == self.target {
            self.dwell = self.dwell.saturating_add(1);
            return;
        }
        if !self.servo_on || self.alarm.is_some() {
            return;
        }

        let step = if self.velocity > 0 {
            (self.velocity / VELOCITY_PER_STEP_PULSE).max(1)
        } else {
            DEFAULT_STEP
        };
        let remaining = self.target - self.position;
        self.position += remaining.signum() * remaining.abs().min(step);
        self.dwell = 0;
        trace!("sim axis: pos={} target={}", self.position, self.target);
    }
}
