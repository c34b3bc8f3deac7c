//! Simulation driver module.
//!
//! Software stand-in for the motor controller, for development and testing
//! without the rig attached.

mod axis;
mod driver;

pub use axis::{AlarmKind, SimAxis};
pub use driver::SimulationDriver;

use rig_common::actuator::ActuatorDriver;

/// Factory function to create a simulation driver instance.
pub fn create_driver() -> Box<dyn ActuatorDriver> {
    Box::new(SimulationDriver::new())
}
