//! Actuator connection and status types.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection state reported by an actuator driver.
///
/// Ordered: a driver progresses `NotPresent → Initial → Opening → Running`,
/// with `InitError` reachable from `Initial`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum ConnectionState {
    /// No device answers on the requested port.
    #[default]
    NotPresent = 0,
    /// Port opened, bus not initialised yet.
    Initial = 1,
    /// Bus initialisation failed; may succeed on retry.
    InitError = 2,
    /// Bus initialised, waiting for the controller to come up.
    Opening = 3,
    /// Ready for motion commands.
    Running = 4,
}

impl ConnectionState {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::NotPresent),
            1 => Some(Self::Initial),
            2 => Some(Self::InitError),
            3 => Some(Self::Opening),
            4 => Some(Self::Running),
            _ => None,
        }
    }

    /// Returns true once commands can be issued.
    #[inline]
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotPresent => "not-present",
            Self::Initial => "initial",
            Self::InitError => "init-error",
            Self::Opening => "opening",
            Self::Running => "running",
        };
        f.write_str(s)
    }
}

bitflags! {
    /// Per-axis status word assembled from the driver's status queries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AxisStatusFlags: u8 {
        /// Commanded position reached.
        const IN_POSITION = 0x01;
        /// Positioning finished and settled.
        const SETTLED     = 0x02;
        /// Alarm latched in the drive.
        const ALARM       = 0x04;
        /// Servo enabled.
        const SERVO_ON    = 0x08;
    }
}

impl AxisStatusFlags {
    /// Flags that together mean a commanded move has physically completed.
    pub const MOTION_DONE: Self =
        Self::from_bits_truncate(Self::IN_POSITION.bits() | Self::SETTLED.bits());

    /// Returns true when the last move completed.
    #[inline]
    pub const fn motion_done(&self) -> bool {
        self.contains(Self::MOTION_DONE)
    }
}

impl Default for AxisStatusFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Driver command names, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverCommand {
    MoveAbsolute,
    Home,
    SetVelocityProfile,
    ResetAlarm,
    ServoOn,
    ServoOff,
}

impl fmt::Display for DriverCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MoveAbsolute => "move_absolute",
            Self::Home => "home",
            Self::SetVelocityProfile => "set_velocity_profile",
            Self::ResetAlarm => "reset_alarm",
            Self::ServoOn => "servo_on",
            Self::ServoOff => "servo_off",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_state_roundtrip_u8() {
        for v in 0..=4u8 {
            let s = ConnectionState::from_u8(v).unwrap();
            assert_eq!(s as u8, v);
        }
        assert_eq!(ConnectionState::from_u8(5), None);
    }

    #[test]
    fn connection_state_ordering() {
        assert!(ConnectionState::Opening < ConnectionState::Running);
        assert!(ConnectionState::NotPresent < ConnectionState::Opening);
        assert!(ConnectionState::Running.is_running());
        assert!(!ConnectionState::Opening.is_running());
    }

    #[test]
    fn motion_done_requires_both_flags() {
        assert!(!AxisStatusFlags::IN_POSITION.motion_done());
        assert!(!AxisStatusFlags::SETTLED.motion_done());
        assert!((AxisStatusFlags::IN_POSITION | AxisStatusFlags::SETTLED).motion_done());
        assert!(AxisStatusFlags::all().motion_done());
    }

    #[test]
    fn driver_command_display() {
        assert_eq!(DriverCommand::ResetAlarm.to_string(), "reset_alarm");
        assert_eq!(ConnectionState::InitError.to_string(), "init-error");
    }
}
