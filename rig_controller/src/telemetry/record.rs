//! Telemetry record parsing and normalisation.
//!
//! A record is five comma-separated numbers in the order
//! `pitch, yaw, roll, angular_velocity_y, velocity`. Angles arrive in degrees
//! with the game's sign convention, angular velocity in degrees per second.

use super::TelemetryError;
use rig_common::consts::TELEMETRY_FIELD_COUNT;
use rig_common::types::{wrap_degrees, TelemetrySample};

const FIELD_NAMES: [&str; TELEMETRY_FIELD_COUNT] =
    ["pitch", "yaw", "roll", "angular_velocity_y", "velocity"];

/// One record as produced by the game, before normalisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawRecord {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
    /// Degrees per second.
    pub angular_velocity_y: f64,
    pub velocity: f64,
}

/// Parse one record line.
///
/// Fields beyond the fifth are ignored.
///
/// # Errors
/// `Incomplete` for fewer than five fields, `Malformed` for a field that is
/// not a finite number.
pub fn parse_record(line: &str) -> Result<RawRecord, TelemetryError> {
    let line = line.trim();
    let fields: Vec<&str> = if line.is_empty() {
        Vec::new()
    } else {
        line.split(',').map(str::trim).collect()
    };

    if fields.len() < TELEMETRY_FIELD_COUNT {
        return Err(TelemetryError::Incomplete {
            found: fields.len(),
        });
    }

    let mut values = [0.0f64; TELEMETRY_FIELD_COUNT];
    for (slot, (name, text)) in values
        .iter_mut()
        .zip(FIELD_NAMES.iter().zip(fields.iter()))
    {
        *slot = text
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| TelemetryError::Malformed {
                field: *name,
                value: (*text).to_string(),
            })?;
    }

    let [pitch, yaw, roll, angular_velocity_y, velocity] = values;
    Ok(RawRecord {
        pitch,
        yaw,
        roll,
        angular_velocity_y,
        velocity,
    })
}

/// Convert a raw record into the controller's frame.
///
/// Angular velocity goes to rad/s, each angle is negated and wrapped into
/// `[0, 360)`, velocity is multiplied by `velocity_scale`.
pub fn normalize(raw: &RawRecord, velocity_scale: f64) -> TelemetrySample {
    TelemetrySample {
        pitch: wrap_degrees(-raw.pitch),
        yaw: wrap_degrees(-raw.yaw),
        roll: wrap_degrees(-raw.roll),
        angular_velocity_y: raw.angular_velocity_y.to_radians(),
        velocity: (raw.velocity * velocity_scale).max(0.0),
    }
}
