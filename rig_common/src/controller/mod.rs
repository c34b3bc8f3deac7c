//! Controller-side shared definitions.
//!
//! - [`config`] - `ControllerConfig` and its sections, with defaults and bounds

pub mod config;

pub use config::{
    ControllerConfig, CueConfig, DispatchConfig, DriverConfig, MotionProfile, RecoveryConfig,
    ShakeConfig, StartupConfig, TelemetryConfig,
};
