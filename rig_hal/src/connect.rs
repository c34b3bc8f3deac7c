//! Port scan connection routine.
//!
//! Walks the candidate ports in order until the driver reports `Running`:
//! - `NotPresent` moves on to the next port immediately.
//! - `InitError` (and a bus stuck in `Initial`/`Opening`) retries the same
//!   port until `init_error_tries` attempts were spent, then moves on.
//!
//! Not reaching `Running` on any port is fatal for the controller.

use crate::error::HalError;
use rig_common::actuator::{ActuatorDriver, ConnectionState};
use rig_common::controller::config::DriverConfig;
use tracing::{debug, info, warn};

/// Connect `driver` on the first port that comes up.
///
/// Ports come from `policy.ports`, or from the driver when that list is empty.
/// Returns the name of the port the driver is running on.
///
/// # Errors
/// `HalError::NoPorts` when there is nothing to try, `HalError::ConnectFailed`
/// when every port was exhausted.
pub fn connect_any(
    driver: &mut dyn ActuatorDriver,
    policy: &DriverConfig,
) -> Result<String, HalError> {
    let ports = if policy.ports.is_empty() {
        driver.available_ports()
    } else {
        policy.ports.clone()
    };

    if ports.is_empty() {
        return Err(HalError::NoPorts);
    }

    let mut last_state = ConnectionState::NotPresent;

    for port in &ports {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            let state = driver.connect(port, policy.retry_budget);
            last_state = state;
            debug!("Connect attempt {} on {}: {}", attempts, port, state);

            match state {
                ConnectionState::Running => {
                    info!("Actuator running on {} (driver '{}')", port, driver.name());
                    return Ok(port.clone());
                }
                ConnectionState::NotPresent => {
                    debug!("No device on {}", port);
                    break;
                }
                ConnectionState::InitError | ConnectionState::Initial | ConnectionState::Opening => {
                    if attempts >= policy.init_error_tries {
                        warn!(
                            "Giving up on {} after {} attempts (last state: {})",
                            port, attempts, state
                        );
                        break;
                    }
                }
            }
        }
    }

    Err(HalError::ConnectFailed {
        ports_tried: ports.len(),
        last_state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::simulation::SimulationDriver;

    fn policy(ports: &[&str], init_error_tries: u32) -> DriverConfig {
        DriverConfig {
            ports: ports.iter().map(|p| p.to_string()).collect(),
            init_error_tries,
            ..DriverConfig::default()
        }
    }

    #[test]
    fn skips_absent_ports() {
        let mut drv = SimulationDriver::new().with_ports(&["com1", "com2", "com3"], "com3");
        let port = connect_any(&mut drv, &policy(&[], 5)).unwrap();
        assert_eq!(port, "com3");
        assert!(drv.state().is_running());
        assert_eq!(drv.connect_attempts(), 3);
    }

    #[test]
    fn retries_init_errors_on_same_port() {
        let mut drv = SimulationDriver::new().with_init_failures(3);
        let port = connect_any(&mut drv, &policy(&[], 5)).unwrap();
        assert_eq!(port, "sim0");
        assert_eq!(drv.connect_attempts(), 4);
    }

    #[test]
    fn gives_up_after_init_error_budget() {
        let mut drv = SimulationDriver::new().with_init_failures(10);
        let err = connect_any(&mut drv, &policy(&[], 5)).unwrap_err();
        assert_eq!(
            err,
            HalError::ConnectFailed {
                ports_tried: 1,
                last_state: ConnectionState::InitError,
            }
        );
        assert_eq!(drv.connect_attempts(), 5);
    }

    #[test]
    fn configured_ports_override_driver_ports() {
        let mut drv = SimulationDriver::new().with_ports(&["com1", "com2"], "com2");
        let err = connect_any(&mut drv, &policy(&["com1"], 5)).unwrap_err();
        assert!(matches!(
            err,
            HalError::ConnectFailed {
                ports_tried: 1,
                last_state: ConnectionState::NotPresent
            }
        ));
    }

    #[test]
    fn no_ports_is_an_error() {
        let mut drv = SimulationDriver::new().with_ports(&[], "none");
        assert_eq!(
            connect_any(&mut drv, &policy(&[], 5)),
            Err(HalError::NoPorts)
        );
    }
}
