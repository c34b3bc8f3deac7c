//! # Rig Controller Library
//!
//! Motion cueing core for a 3-axis simulator seat rig. Telemetry arrives from
//! a game at a fixed rate, is mapped to actuator pulse targets, and is
//! dispatched to the rig through an `ActuatorDriver`.
//!
//! ## Threads
//!
//! 1. **Sampler** reads the telemetry channel every tick and publishes the
//!    newest sample into the shared [`telemetry::TelemetryStore`].
//! 2. **Dispatcher** waits on the store's ready signal, computes pulses with
//!    the [`cue`] engine, runs queued shake effects and issues gated moves.
//!
//! The store and the shake queue share one lock that is never held across a
//! driver call. Shutdown is cooperative: both loops watch one running flag and
//! the axes are parked at the home pulse before the driver is released.

pub mod config;
pub mod controller;
pub mod cue;
pub mod dispatch;
pub mod error;
pub mod poll;
pub mod safety;
pub mod sampler;
pub mod shake;
pub mod startup;
pub mod telemetry;

pub use controller::{MotionController, RunSummary};
pub use error::ControllerError;
