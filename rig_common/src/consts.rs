//! Platform constants for the 3-axis motion rig.
//!
//! Single source of truth for axis topology, pulse geometry and the numeric
//! limits of the cueing math. Imported by all crates.

use static_assertions::const_assert;

/// Number of physical axes on the platform.
pub const AXIS_COUNT: usize = 3;

/// PulseVector index driven by the roll channel.
pub const AXIS_ROLL: usize = 0;

/// PulseVector index driven by angular velocity (dedicated shake axis).
pub const AXIS_SHAKE: usize = 1;

/// PulseVector index driven by the pitch channel.
pub const AXIS_PITCH: usize = 2;

/// Physical axis commanded by the shake sequence.
pub const SHAKE_PHYSICAL_AXIS: usize = 1;

/// Neutral pulse position, used for startup and for the safe home on shutdown.
pub const HOME_PULSE: i32 = 10_000;

/// Baseline for the pitch pulse (`pitch = PITCH_PULSE_BASE - adapted / DEGREES_PER_PULSE`).
pub const PITCH_PULSE_BASE: i32 = 20_000;

/// Degrees of adapted angle per actuator pulse.
pub const DEGREES_PER_PULSE: f64 = 0.00175;

/// Angular velocity saturation [rad/s].
pub const ANGULAR_VELOCITY_LIMIT: f64 = 6.0;

/// Pulses added per unit of velocity increase (forward-lean boost).
pub const VELOCITY_BOOST_GAIN: f64 = 5000.0;

/// Upper edge of the low adjusted-angle band [deg].
pub const BAND_LOW_MAX: f64 = 17.5;

/// Lower edge of the high adjusted-angle band [deg].
pub const BAND_HIGH_MIN: f64 = 342.5;

/// Angles at or above this value clamp into the high band [deg].
pub const BAND_SPLIT: f64 = 270.0;

/// Angles below this value are rescaled by the sensitivity coefficient [deg].
pub const SENSITIVITY_LOW_LIMIT: f64 = 180.0;

/// Angles above this value are rescaled symmetrically around 360 [deg].
pub const SENSITIVITY_HIGH_LIMIT: f64 = 300.0;

/// Full turn [deg].
pub const FULL_TURN: f64 = 360.0;

/// Homing mode passed to the driver's origin move.
pub const DEFAULT_HOME_MODE: u8 = 0x8;

/// Default telemetry period in milliseconds (50 Hz producer).
pub const TELEMETRY_PERIOD_MS: u64 = 20;

/// Number of comma-separated fields in a telemetry record.
pub const TELEMETRY_FIELD_COUNT: usize = 5;

const_assert!(AXIS_ROLL < AXIS_COUNT);
const_assert!(AXIS_SHAKE < AXIS_COUNT);
const_assert!(AXIS_PITCH < AXIS_COUNT);
const_assert!(SHAKE_PHYSICAL_AXIS < AXIS_COUNT);
const_assert!(HOME_PULSE > 0 && HOME_PULSE < PITCH_PULSE_BASE);
