//! Rig Common Library
//!
//! This crate provides the shared vocabulary of the motion rig workspace:
//! telemetry and pulse types, the actuator driver interface, and the
//! controller configuration with its TOML loader.
//!
//! # Module Structure
//!
//! - [`consts`] - Platform constants (axis count, pulse geometry, limits)
//! - [`types`] - Telemetry sample, pulse vector, shake orders, axis health
//! - [`actuator`] - `ActuatorDriver` trait, connection state, driver errors
//! - [`config`] - Configuration loading traits and types
//! - [`controller`] - Controller tunables and their validation
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```toml
//! [dependencies]
//! rig_common = { workspace = true }
//! ```
//!
//! ```rust
//! use rig_common::prelude::*;
//! ```

pub mod actuator;
pub mod config;
pub mod consts;
pub mod controller;
pub mod prelude;
pub mod types;
