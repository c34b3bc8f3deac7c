//! Error types for driver selection and connection.

use rig_common::actuator::ConnectionState;
use thiserror::Error;

/// Error types for HAL operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HalError {
    /// Driver not found in the registry
    #[error("Driver not found: {0}")]
    DriverNotFound(String),

    /// Neither the config nor the driver lists any port
    #[error("No ports available to connect on")]
    NoPorts,

    /// Every port was tried without reaching `Running`
    #[error("Actuator did not reach running state on {ports_tried} port(s) (last state: {last_state})")]
    ConnectFailed {
        /// Number of ports tried
        ports_tried: usize,
        /// State reported by the last connect attempt
        last_state: ConnectionState,
    },
}
