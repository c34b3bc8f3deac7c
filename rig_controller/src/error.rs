//! Controller error type.
//!
//! Only fatal conditions surface as `ControllerError`. Per-axis alarms, short
//! telemetry records and rejected motion commands are handled where they occur.

use crate::telemetry::TelemetryError;
use rig_common::actuator::ActuatorError;
use rig_common::config::ConfigError;
use rig_hal::HalError;
use thiserror::Error;

/// Fatal controller errors.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Driver lookup or connection failed.
    #[error("Actuator error: {0}")]
    Hal(#[from] HalError),

    /// The telemetry channel disappeared.
    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    /// An axis kept its alarm through the startup check.
    #[error("Axis {0} failed alarm recovery during initialization")]
    AxisInitFailed(usize),

    /// A startup or shutdown wait ran out of polls.
    #[error("Axes did not finish {stage} in time")]
    MotionTimeout {
        /// Sequence step that was waiting
        stage: &'static str,
    },

    /// A driver command failed during a sequence that cannot continue without it.
    #[error("Actuator command failed during {stage}: {source}")]
    Command {
        /// Sequence step that issued the command
        stage: &'static str,
        /// Driver error
        #[source]
        source: ActuatorError,
    },

    /// Shutdown was requested while a sequence was still running.
    #[error("Shutdown requested during {0}")]
    Cancelled(&'static str),

    /// A worker thread panicked.
    #[error("{0} thread panicked")]
    ThreadPanicked(&'static str),

    /// Thread spawn failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Signal handler installation failed.
    #[error("Signal handler error: {0}")]
    Signal(#[from] ctrlc::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn display_names_the_failing_stage() {
        let err = ControllerError::MotionTimeout { stage: "homing" };
        assert_eq!(err.to_string(), "Axes did not finish homing in time");

        let err = ControllerError::AxisInitFailed(2);
        assert!(err.to_string().contains("Axis 2"));
    }

    #[test]
    fn telemetry_error_converts() {
        let err: ControllerError =
            TelemetryError::ChannelMissing(PathBuf::from("pipe.csv")).into();
        assert!(matches!(err, ControllerError::Telemetry(_)));
        assert!(err.to_string().contains("pipe.csv"));
    }
}
