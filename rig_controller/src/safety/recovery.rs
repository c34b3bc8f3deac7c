//! Alarm recovery sequence.
//!
//! When a drive reports an alarm:
//! 1. Servo off, wait `servo_settle`.
//! 2. Reset the alarm.
//! 3. Servo back on regardless of the outcome.
//! 4. If the alarm cleared: re-home, wait `rehome_settle` before and after.
//!
//! `Ok → Alarmed → Recovering → Ok | Failed`. A `Failed` axis is retried the
//! next time the monitor is invoked for it.

use rig_common::actuator::ActuatorDriver;
use rig_common::consts::AXIS_COUNT;
use rig_common::controller::config::RecoveryConfig;
use rig_common::types::AxisHealth;
use std::thread;
use tracing::{debug, error, info, warn};

/// Per-axis alarm recovery state machine.
#[derive(Debug)]
pub struct AlarmRecoveryMonitor {
    config: RecoveryConfig,
    health: [AxisHealth; AXIS_COUNT],
    /// Alarms cleared since creation.
    recoveries: u64,
    /// Alarms that survived a reset since creation.
    failures: u64,
}

impl AlarmRecoveryMonitor {
    /// Create a monitor with every axis `Ok`.
    pub const fn new(config: RecoveryConfig) -> Self {
        Self {
            config,
            health: [AxisHealth::Ok; AXIS_COUNT],
            recoveries: 0,
            failures: 0,
        }
    }

    /// Health of `axis` after the last check. Unknown axes report `Failed`.
    #[inline]
    pub fn health(&self, axis: usize) -> AxisHealth {
        self.health.get(axis).copied().unwrap_or(AxisHealth::Failed)
    }

    /// Health of every axis.
    #[inline]
    pub const fn healths(&self) -> [AxisHealth; AXIS_COUNT] {
        self.health
    }

    /// Whether every axis is `Ok`.
    pub fn all_ok(&self) -> bool {
        self.health.iter().all(AxisHealth::is_ok)
    }

    pub const fn recoveries(&self) -> u64 {
        self.recoveries
    }

    pub const fn failures(&self) -> u64 {
        self.failures
    }

    /// Check `axis` for an alarm and run the recovery sequence if one is set.
    ///
    /// Blocks for the configured settle delays. Returns true iff the axis ends
    /// `Ok`, including when no alarm was present.
    pub fn check_and_fix(&mut self, driver: &mut dyn ActuatorDriver, axis: usize) -> bool {
        if axis >= AXIS_COUNT {
            warn!("Alarm check requested for unknown axis {}", axis);
            return false;
        }

        if !driver.has_alarm(axis) {
            if !self.health[axis].is_ok() {
                info!("Axis {} alarm no longer reported", axis);
            }
            self.health[axis] = AxisHealth::Ok;
            return true;
        }

        self.health[axis] = AxisHealth::Alarmed;
        warn!("Alarm on axis {}, starting recovery", axis);

        if let Err(e) = driver.servo_off(axis) {
            warn!("Servo off failed on axis {}: {}", axis, e);
        }
        thread::sleep(self.config.servo_settle());

        self.health[axis] = AxisHealth::Recovering;
        let reset_accepted = match driver.reset_alarm(axis) {
            Ok(()) => true,
            Err(e) => {
                warn!("Alarm reset rejected on axis {}: {}", axis, e);
                false
            }
        };
        let cleared = reset_accepted && !driver.has_alarm(axis);

        if let Err(e) = driver.servo_on(axis) {
            warn!("Servo on failed on axis {}: {}", axis, e);
        }

        if !cleared {
            self.health[axis] = AxisHealth::Failed;
            self.failures += 1;
            error!("Alarm persists on axis {} after reset", axis);
            return false;
        }

        thread::sleep(self.config.rehome_settle());
        if let Err(e) = driver.home(axis, self.config.home_mode) {
            warn!("Re-home failed on axis {}: {}", axis, e);
        }
        thread::sleep(self.config.rehome_settle());

        self.health[axis] = AxisHealth::Ok;
        self.recoveries += 1;
        info!("Alarm cleared on axis {}", axis);
        debug!("Recovery totals: {} cleared, {} failed", self.recoveries, self.failures);
        true
    }

    /// Run [`Self::check_and_fix`] on every axis. Returns true iff all end `Ok`.
    pub fn check_all(&mut self, driver: &mut dyn ActuatorDriver) -> bool {
        let mut all_ok = true;
        for axis in 0..AXIS_COUNT {
            all_ok &= self.check_and_fix(driver, axis);
        }
        all_ok
    }
}
