//! Actuator driver trait and error types.
//!
//! This module defines:
//! - `ActuatorDriver` trait - Interface the controller drives the platform through
//! - `ActuatorError` enum - Error types for driver operations
//! - `DriverFactory` type alias - Factory function type

use crate::actuator::types::{AxisStatusFlags, ConnectionState, DriverCommand};
use thiserror::Error;

/// Error types for actuator operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActuatorError {
    /// No connection to the motor controller
    #[error("Actuator not connected")]
    NotConnected,

    /// Axis index outside the platform topology
    #[error("Invalid axis index: {0}")]
    InvalidAxis(usize),

    /// The motor controller refused or failed a command
    #[error("Command {command} rejected on axis {axis}")]
    CommandRejected {
        /// Axis the command targeted
        axis: usize,
        /// Command that failed
        command: DriverCommand,
    },

    /// Serial communication error
    #[error("Communication error: {0}")]
    Communication(String),
}

/// Factory function type for creating driver instances.
pub type DriverFactory = fn() -> Box<dyn ActuatorDriver>;

/// Interface to the motor controller of the platform.
///
/// The controller owns exactly one driver instance. It is connected during
/// startup, driven from the dispatcher thread only, and disconnected after the
/// safe-home sequence at shutdown.
///
/// # Lifecycle
///
/// 1. `connect()` - Open the channel on a port, retried by the caller
/// 2. motion / parameter / status calls - From a single thread at a time
/// 3. `disconnect()` - Release the channel
///
/// Commands return `Ok(())` when the motor controller acknowledged them.
/// Status queries return `false` when the flag is clear or the query failed.
pub trait ActuatorDriver: Send {
    /// Returns the driver's unique identifier (e.g., "simulation").
    fn name(&self) -> &'static str;

    /// Names of the ports this driver can try to connect on.
    fn available_ports(&self) -> Vec<String>;

    /// Try to open the channel on `port`, retrying bus initialisation up to
    /// `retry_budget` times. Returns the resulting connection state.
    fn connect(&mut self, port: &str, retry_budget: u32) -> ConnectionState;

    /// Current connection state.
    fn state(&self) -> ConnectionState;

    /// Close the channel.
    fn disconnect(&mut self);

    /// Move `axis` to an absolute pulse position.
    fn move_absolute(&mut self, axis: usize, pulse: i32) -> Result<(), ActuatorError>;

    /// Run the origin search on `axis`.
    fn home(&mut self, axis: usize, mode: u8) -> Result<(), ActuatorError>;

    /// Write velocity and acceleration parameters for `axis`.
    fn set_velocity_profile(
        &mut self,
        axis: usize,
        velocity: i32,
        acceleration: i32,
    ) -> Result<(), ActuatorError>;

    /// Commanded position reached.
    fn is_in_position(&mut self, axis: usize) -> bool;

    /// Positioning finished ("Pfin").
    fn is_settled(&mut self, axis: usize) -> bool;

    /// Alarm latched.
    fn has_alarm(&mut self, axis: usize) -> bool;

    /// Servo enabled.
    fn is_servo_on(&mut self, axis: usize) -> bool;

    /// Clear a latched alarm.
    fn reset_alarm(&mut self, axis: usize) -> Result<(), ActuatorError>;

    /// Enable the servo.
    fn servo_on(&mut self, axis: usize) -> Result<(), ActuatorError>;

    /// Disable the servo.
    fn servo_off(&mut self, axis: usize) -> Result<(), ActuatorError>;

    /// Collect all status flags of `axis` in one word.
    fn status(&mut self, axis: usize) -> AxisStatusFlags {
        let mut flags = AxisStatusFlags::empty();
        flags.set(AxisStatusFlags::IN_POSITION, self.is_in_position(axis));
        flags.set(AxisStatusFlags::SETTLED, self.is_settled(axis));
        flags.set(AxisStatusFlags::ALARM, self.has_alarm(axis));
        flags.set(AxisStatusFlags::SERVO_ON, self.is_servo_on(axis));
        flags
    }

    /// Whether the last commanded move on `axis` has physically completed.
    fn motion_done(&mut self, axis: usize) -> bool {
        self.is_in_position(axis) && self.is_settled(axis)
    }
}
