//! Motion cue engine.
//!
//! Pure mapping from a telemetry sample to a [`PulseVector`]. Nothing here
//! touches the driver or the store; the dispatcher calls it on a snapshot.
//!
//! | Index | Source | Pulse |
//! |-------|--------|-------|
//! | 0 | adjusted roll | `AdaptAngle(roll) / 0.00175` |
//! | 1 | angular velocity | `10000 − ω·10000/6` |
//! | 2 | adjusted pitch | `20000 − AdaptAngle(pitch) / 0.00175` |

use rig_common::consts::{
    ANGULAR_VELOCITY_LIMIT, AXIS_PITCH, AXIS_ROLL, AXIS_SHAKE, BAND_HIGH_MIN, BAND_LOW_MAX,
    BAND_SPLIT, DEGREES_PER_PULSE, FULL_TURN, HOME_PULSE, PITCH_PULSE_BASE,
    SENSITIVITY_HIGH_LIMIT, SENSITIVITY_LOW_LIMIT, VELOCITY_BOOST_GAIN,
};
use rig_common::controller::config::CueConfig;
use rig_common::types::{PulseVector, TelemetrySample};

/// Pulse span of the angular-velocity channel at full scale.
const SHAKE_PULSE_SPAN: f64 = 10_000.0;

/// Clamp angular velocity to `[-6, 6]` rad/s. NaN maps to zero.
#[inline]
pub fn clamp_angular_velocity(angular_velocity: f64) -> f64 {
    if angular_velocity.is_nan() {
        return 0.0;
    }
    angular_velocity.clamp(-ANGULAR_VELOCITY_LIMIT, ANGULAR_VELOCITY_LIMIT)
}

/// Apply sensitivity and clamp into the rig's travel bands.
///
/// Angles below 180° scale toward 0, angles above 300° scale toward 360,
/// the gap in between passes through. The result lands in
/// `[0, 17.5] ∪ [342.5, 360]`.
pub fn adjust_angle(raw: f64, sensitivity: f64) -> f64 {
    let scaled = if raw < SENSITIVITY_LOW_LIMIT {
        raw * sensitivity
    } else if raw > SENSITIVITY_HIGH_LIMIT {
        FULL_TURN - (FULL_TURN - raw) * sensitivity
    } else {
        raw
    };

    if scaled >= BAND_SPLIT {
        scaled.clamp(BAND_HIGH_MIN, FULL_TURN)
    } else {
        scaled.clamp(0.0, BAND_LOW_MAX)
    }
}

/// Map a banded angle onto a continuous `[0, 35]` travel range.
#[inline]
pub fn adapt_angle(angle: f64) -> f64 {
    if (0.0..=BAND_LOW_MAX).contains(&angle) {
        BAND_LOW_MAX - angle
    } else {
        FULL_TURN - angle + BAND_LOW_MAX
    }
}

/// Rounds to the nearest pulse rather than truncating toward zero, so
/// `21° / 0.00175` lands on 12000 exactly. The two differ by at most one pulse.
#[inline]
fn angle_to_pulses(angle: f64) -> i32 {
    (adapt_angle(angle) / DEGREES_PER_PULSE).round() as i32
}

/// Compute the pulse targets for one sample.
pub fn compute_pulses(sample: &TelemetrySample, config: &CueConfig) -> PulseVector {
    let angular_velocity = clamp_angular_velocity(sample.angular_velocity_y);
    let roll = adjust_angle(sample.roll, config.sensitivity);
    let pitch = adjust_angle(sample.pitch, config.sensitivity);

    let mut pulses = PulseVector::HOME;
    pulses[AXIS_ROLL] = angle_to_pulses(roll);
    pulses[AXIS_SHAKE] = (f64::from(HOME_PULSE)
        - angular_velocity * SHAKE_PULSE_SPAN / ANGULAR_VELOCITY_LIMIT)
        .round() as i32;
    pulses[AXIS_PITCH] = PITCH_PULSE_BASE - angle_to_pulses(pitch);
    pulses
}

/// Forward lean injected on acceleration.
///
/// Tracks the highest velocity seen so far; only a new high adds
/// `(v − last) · 5000` pulses to the roll index.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VelocityBoost {
    last_velocity: f64,
}

impl VelocityBoost {
    pub const fn new() -> Self {
        Self { last_velocity: 0.0 }
    }

    /// Last velocity that triggered a boost.
    pub const fn last_velocity(&self) -> f64 {
        self.last_velocity
    }

    /// Apply the boost to `pulses`. Returns the pulses added.
    pub fn apply(&mut self, pulses: &mut PulseVector, velocity: f64) -> i32 {
        if velocity <= self.last_velocity {
            return 0;
        }
        let boost = ((velocity - self.last_velocity) * VELOCITY_BOOST_GAIN).round() as i32;
        pulses[AXIS_ROLL] = pulses[AXIS_ROLL].saturating_add(boost);
        self.last_velocity = velocity;
        boost
    }
}
