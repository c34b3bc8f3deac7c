//! Actuator driver interface.
//!
//! Contains the trait every actuator backend implements, its error type,
//! the connection state machine values and per-axis status flags.
//!
//! # Submodules
//!
//! - [`driver`] - `ActuatorDriver` trait, `ActuatorError`, `DriverFactory`
//! - [`types`] - `ConnectionState`, `AxisStatusFlags`, `DriverCommand`

pub mod driver;
pub mod types;

pub use driver::{ActuatorDriver, ActuatorError, DriverFactory};
pub use types::{AxisStatusFlags, ConnectionState, DriverCommand};
