//! # Rig HAL Library
//!
//! Actuator driver layer with a pluggable driver architecture.
//!
//! Drivers implement the `ActuatorDriver` trait defined in
//! `rig_common::actuator::driver`. The controller picks one by name from the
//! [`DriverRegistry`], connects it with [`connect::connect_any`] and owns it
//! for the rest of the process.
//!
//! # Module Structure
//!
//! - [`connect`] - Port scan with per-port retry policy
//! - [`driver_registry`] - Driver factory registration
//! - [`drivers`] - Driver implementations
//! - [`error`] - `HalError`
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         rig_hal                              │
//! │  ┌────────────────┐    ┌───────────┐    ┌─────────────────┐  │
//! │  │ DriverRegistry │───►│ connect   │───►│ ActuatorDriver  │  │
//! │  │ (name→factory) │    │ (ports)   │    │ (trait object)  │  │
//! │  └────────────────┘    └───────────┘    └─────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]

pub mod connect;
pub mod driver_registry;
pub mod drivers;
pub mod error;

pub use crate::connect::connect_any;
pub use crate::driver_registry::DriverRegistry;
pub use crate::error::HalError;
