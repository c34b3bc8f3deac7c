//! Prelude module for common re-exports.
//!
//! ```rust
//! use rig_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};
pub use crate::controller::config::ControllerConfig;

// ─── Actuator ───────────────────────────────────────────────────────
pub use crate::actuator::{
    ActuatorDriver, ActuatorError, AxisStatusFlags, ConnectionState, DriverFactory,
};

// ─── Motion Types ───────────────────────────────────────────────────
pub use crate::types::{AxisHealth, PulseVector, ShakeOrder, ShakePosition, TelemetrySample};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{AXIS_COUNT, AXIS_PITCH, AXIS_ROLL, AXIS_SHAKE, HOME_PULSE};
