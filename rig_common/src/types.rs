//! Telemetry and motion types.
//!
//! This module defines the data exchanged between the telemetry side and
//! the actuator side of the controller:
//! - `TelemetrySample` - Latest normalized vehicle state
//! - `PulseVector` - Per-axis target pulse positions
//! - `ShakeOrder` / `ShakePosition` - Vibration overlay requests
//! - `AxisHealth` - Result of alarm supervision for one axis

use crate::consts::{AXIS_COUNT, FULL_TURN, HOME_PULSE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Latest normalized telemetry snapshot.
///
/// Angles are kept in `[0, 360)`; the ingestor guarantees this by wrapping
/// every value it writes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Pitch [deg].
    pub pitch: f64,
    /// Yaw [deg].
    pub yaw: f64,
    /// Roll [deg].
    pub roll: f64,
    /// Angular velocity around the vertical axis [rad/s].
    pub angular_velocity_y: f64,
    /// Scaled velocity magnitude (simulator units).
    pub velocity: f64,
}

impl TelemetrySample {
    /// Build a sample from already-normalized values.
    pub const fn new(pitch: f64, yaw: f64, roll: f64, angular_velocity_y: f64, velocity: f64) -> Self {
        Self {
            pitch,
            yaw,
            roll,
            angular_velocity_y,
            velocity,
        }
    }
}

/// Wrap any finite angle into `[0, 360)`.
pub fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(FULL_TURN);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= FULL_TURN { 0.0 } else { wrapped }
}

/// Target pulse positions, one per PulseVector index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PulseVector(pub [i32; AXIS_COUNT]);

impl PulseVector {
    /// All axes at the neutral home pulse.
    pub const HOME: Self = Self([HOME_PULSE; AXIS_COUNT]);

    /// Underlying array.
    #[inline]
    pub const fn as_array(&self) -> &[i32; AXIS_COUNT] {
        &self.0
    }
}

impl Default for PulseVector {
    fn default() -> Self {
        Self::HOME
    }
}

impl Index<usize> for PulseVector {
    type Output = i32;

    fn index(&self, index: usize) -> &i32 {
        &self.0[index]
    }
}

impl IndexMut<usize> for PulseVector {
    fn index_mut(&mut self, index: usize) -> &mut i32 {
        &mut self.0[index]
    }
}

/// Where a shake takes place on the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShakePosition {
    /// Front wheels.
    Front,
    /// Rear wheels. Currently produces no actuator motion.
    Rear,
    /// Front and rear.
    Both,
}

impl ShakePosition {
    /// Whether this position drives the front oscillation.
    #[inline]
    pub const fn includes_front(&self) -> bool {
        matches!(self, Self::Front | Self::Both)
    }

    /// Whether this position asks for a rear oscillation.
    #[inline]
    pub const fn includes_rear(&self) -> bool {
        matches!(self, Self::Rear | Self::Both)
    }
}

impl fmt::Display for ShakePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Front => f.write_str("front"),
            Self::Rear => f.write_str("rear"),
            Self::Both => f.write_str("both"),
        }
    }
}

/// A queued vibration request. Consumed exactly once by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShakeOrder {
    /// Where to shake.
    pub position: ShakePosition,
    /// Shake the driver's left side. Side selection is not applied yet.
    pub shake_left: bool,
    /// Shake the driver's right side. Side selection is not applied yet.
    pub shake_right: bool,
}

impl ShakeOrder {
    /// Order shaking both sides.
    pub const fn new(position: ShakePosition) -> Self {
        Self {
            position,
            shake_left: true,
            shake_right: true,
        }
    }
}

/// Health of one axis as reported by the alarm recovery monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AxisHealth {
    /// No alarm present.
    #[default]
    Ok,
    /// Alarm flag observed, recovery not yet started.
    Alarmed,
    /// Servo disabled and alarm reset in progress.
    Recovering,
    /// Alarm persisted after reset.
    Failed,
}

impl AxisHealth {
    /// Whether the axis can take motion commands.
    #[inline]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}
