//! Startup homing and shutdown parking.
//!
//! Startup brings every axis to the home pulse one at a time:
//! servo on → origin search → homing profile → move to home pulse, waiting for
//! all axes to finish after each step. Shutdown parks every axis at the home
//! pulse before the driver is released.

use crate::error::ControllerError;
use crate::poll::{await_condition, PollOutcome, PollPolicy};
use crate::safety::AlarmRecoveryMonitor;
use rig_common::actuator::ActuatorDriver;
use rig_common::consts::AXIS_COUNT;
use rig_common::controller::config::ControllerConfig;
use rig_common::types::PulseVector;
use std::sync::atomic::AtomicBool;
use tracing::{debug, info, warn};

fn policy(config: &ControllerConfig) -> PollPolicy {
    PollPolicy::new(config.startup.poll_interval(), config.startup.max_polls)
}

/// Wait until every axis is in position and settled, running alarm recovery
/// on each axis between polls.
fn wait_all_axes(
    driver: &mut dyn ActuatorDriver,
    monitor: &mut AlarmRecoveryMonitor,
    policy: PollPolicy,
    running: &AtomicBool,
    stage: &'static str,
) -> Result<(), ControllerError> {
    let outcome = await_condition(
        || {
            if (0..AXIS_COUNT).all(|axis| driver.motion_done(axis)) {
                return true;
            }
            monitor.check_all(&mut *driver);
            false
        },
        policy,
        running,
    );

    match outcome {
        PollOutcome::Satisfied { attempts } => {
            debug!("All axes done after {} ({} polls)", stage, attempts);
            Ok(())
        }
        PollOutcome::TimedOut => Err(ControllerError::MotionTimeout { stage }),
        PollOutcome::Cancelled => Err(ControllerError::Cancelled(stage)),
    }
}

fn command(
    stage: &'static str,
    result: Result<(), rig_common::actuator::ActuatorError>,
) -> Result<(), ControllerError> {
    result.map_err(|source| ControllerError::Command { stage, source })
}

/// Home every axis and park it at the home pulse.
///
/// Returns the pulse memory the dispatcher starts from.
///
/// # Errors
/// - `AxisInitFailed` when an axis keeps its alarm through the first check.
/// - `MotionTimeout` when a wait runs out of polls.
/// - `Command` when the driver rejects a sequence command.
/// - `Cancelled` when shutdown is requested mid-sequence.
pub fn initialize_axes(
    driver: &mut dyn ActuatorDriver,
    monitor: &mut AlarmRecoveryMonitor,
    config: &ControllerConfig,
    running: &AtomicBool,
) -> Result<PulseVector, ControllerError> {
    for axis in 0..AXIS_COUNT {
        if !monitor.check_and_fix(driver, axis) {
            return Err(ControllerError::AxisInitFailed(axis));
        }
    }

    let policy = policy(config);
    let home_pulse = config.dispatch.home_pulse;

    for axis in 0..AXIS_COUNT {
        info!("Homing axis {}", axis);
        command("servo on", driver.servo_on(axis))?;
        command("homing", driver.home(axis, config.recovery.home_mode))?;
        wait_all_axes(driver, monitor, policy, running, "homing")?;

        command(
            "homing profile",
            driver.set_velocity_profile(
                axis,
                config.startup.homing_velocity,
                config.startup.homing_accel[axis],
            ),
        )?;
        wait_all_axes(driver, monitor, policy, running, "homing profile")?;

        command("centering", driver.move_absolute(axis, home_pulse))?;
        wait_all_axes(driver, monitor, policy, running, "centering")?;
        info!("Axis {} at home pulse {}", axis, home_pulse);
    }

    let profile = config.dispatch.normal_profile;
    for axis in 0..AXIS_COUNT {
        command(
            "normal profile",
            driver.set_velocity_profile(axis, profile.velocity, profile.acceleration(axis)),
        )?;
    }

    info!("All axes homed");
    Ok(PulseVector([home_pulse; AXIS_COUNT]))
}

/// Move every axis to the home pulse and wait for it to settle.
///
/// Skipped when the driver is not running. Runs to completion or until the
/// poll budget is spent; the shutdown flag is not consulted. Returns true if
/// every axis reported done.
pub fn park_axes(driver: &mut dyn ActuatorDriver, config: &ControllerConfig) -> bool {
    if !driver.state().is_running() {
        warn!("Driver not running ({}), skipping safe home", driver.state());
        return false;
    }

    let home_pulse = config.dispatch.home_pulse;
    info!("Parking axes at home pulse {}", home_pulse);
    for axis in 0..AXIS_COUNT {
        if let Err(e) = driver.move_absolute(axis, home_pulse) {
            warn!("Park move failed on axis {}: {}", axis, e);
        }
    }

    let keep_waiting = AtomicBool::new(true);
    let outcome = await_condition(
        || (0..AXIS_COUNT).all(|axis| driver.motion_done(axis)),
        policy(config),
        &keep_waiting,
    );
    if outcome.is_satisfied() {
        info!("Axes parked");
        true
    } else {
        warn!("Axes did not reach home before the park timeout");
        false
    }
}
