//! Actuator driver implementations.
//!
//! - [`simulation`] - Software simulation driver for development and testing
//!
//! # Adding New Drivers
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement the `ActuatorDriver` trait from `rig_common::actuator::driver`
//! 3. Register the driver in `register_builtin_drivers()`

pub mod simulation;

use crate::driver_registry::DriverRegistry;

/// Register all built-in drivers into `registry`.
pub fn register_builtin_drivers(registry: &mut DriverRegistry) {
    registry.register("simulation", simulation::create_driver);
}
