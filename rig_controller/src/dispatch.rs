//! Actuator command dispatcher.
//!
//! One cycle per ready signal:
//! 1. Take the newest sample from the store (the store clears the signal).
//! 2. Compute pulses with the cue engine.
//! 3. Run one eligible shake order with the shake profile, then restore the
//!    normal profile; otherwise just write the normal profile.
//! 4. Apply the velocity boost to the roll index.
//! 5. Issue threshold-gated moves for indices 0 and 2 through the alternating
//!    axis selector, then run alarm recovery on axes 0 and 2 by index.
//!
//! The dispatcher owns the driver for the whole run and hands it back on exit
//! so the caller can park the rig.

use crate::cue::{compute_pulses, VelocityBoost};
use crate::safety::AlarmRecoveryMonitor;
use crate::shake::{ShakeOutcome, ShakeSequencer};
use crate::telemetry::TelemetryStore;
use rig_common::actuator::ActuatorDriver;
use rig_common::consts::{AXIS_COUNT, AXIS_PITCH, AXIS_ROLL, AXIS_SHAKE};
use rig_common::controller::config::{ControllerConfig, CueConfig, DispatchConfig, MotionProfile};
use rig_common::types::{PulseVector, TelemetrySample};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// How long one wait on the ready signal lasts before the running flag is re-checked.
pub const WAIT_SLICE: Duration = Duration::from_millis(100);

/// PulseVector indices dispatched through the axis selector, in order.
const SELECTED_INDICES: [usize; 2] = [AXIS_ROLL, AXIS_PITCH];

/// Physical axis the selector addresses first in every cycle.
const FIRST_SELECTED_AXIS: usize = 1;

/// Cycles between debug stat lines.
const STATS_LOG_INTERVAL: u64 = 500;

/// A move issued in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisMove {
    /// PulseVector index the target came from.
    pub index: usize,
    /// Physical axis commanded.
    pub axis: usize,
    pub pulse: i32,
}

/// What one dispatch cycle did.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CycleReport {
    /// Pulses after the velocity boost.
    pub pulses: PulseVector,
    /// Pulses added to the roll index by the boost.
    pub boost: i32,
    /// Shake executed this cycle, if any.
    pub shake: Option<ShakeOutcome>,
    /// Moves issued through the selector.
    pub moves: Vec<AxisMove>,
    /// Physical axes whose alarm check did not end `Ok`.
    pub failed_axes: Vec<usize>,
}

/// Dispatcher counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchStats {
    pub cycles: u64,
    pub moves: u64,
    pub shakes: u64,
    pub rejected_commands: u64,
    pub recovery_failures: u64,
}

/// Owns the driver and turns samples into actuator commands.
pub struct Dispatcher {
    driver: Box<dyn ActuatorDriver>,
    store: Arc<TelemetryStore>,
    running: Arc<AtomicBool>,
    cue: CueConfig,
    dispatch: DispatchConfig,
    min_shake_velocity: f64,
    shake: ShakeSequencer,
    monitor: AlarmRecoveryMonitor,
    boost: VelocityBoost,
    previous: PulseVector,
    stats: DispatchStats,
}

impl Dispatcher {
    /// Create a dispatcher.
    ///
    /// `previous` is the pulse memory the startup sequence left the axes at.
    pub fn new(
        driver: Box<dyn ActuatorDriver>,
        store: Arc<TelemetryStore>,
        running: Arc<AtomicBool>,
        config: &ControllerConfig,
        monitor: AlarmRecoveryMonitor,
        previous: PulseVector,
    ) -> Self {
        Self {
            driver,
            store,
            running,
            cue: config.cue,
            dispatch: config.dispatch,
            min_shake_velocity: config.shake.min_velocity,
            shake: ShakeSequencer::new(config.shake),
            monitor,
            boost: VelocityBoost::new(),
            previous,
            stats: DispatchStats::default(),
        }
    }

    pub const fn stats(&self) -> DispatchStats {
        self.stats
    }

    pub const fn previous_pulses(&self) -> PulseVector {
        self.previous
    }

    pub const fn monitor(&self) -> &AlarmRecoveryMonitor {
        &self.monitor
    }

    pub fn driver_mut(&mut self) -> &mut dyn ActuatorDriver {
        self.driver.as_mut()
    }

    /// Give the driver back.
    pub fn into_driver(self) -> Box<dyn ActuatorDriver> {
        self.driver
    }

    /// Run cycles until the running flag clears.
    pub fn run(mut self) -> (Box<dyn ActuatorDriver>, DispatchStats) {
        info!("Dispatcher started (threshold {} pulses)", self.dispatch.pulse_threshold);

        while self.running.load(Ordering::Acquire) {
            let Some(sample) = self.store.wait_ready(&self.running, WAIT_SLICE) else {
                break;
            };
            self.run_cycle(&sample);

            if self.stats.cycles % STATS_LOG_INTERVAL == 0 {
                debug!(
                    "Dispatch: {} cycles, {} moves, {} shakes, {} rejected, {} recovery failures",
                    self.stats.cycles,
                    self.stats.moves,
                    self.stats.shakes,
                    self.stats.rejected_commands,
                    self.stats.recovery_failures
                );
            }
        }

        info!(
            "Dispatcher stopped after {} cycles ({} moves, {} shakes)",
            self.stats.cycles, self.stats.moves, self.stats.shakes
        );
        (self.driver, self.stats)
    }

    /// Process one sample.
    pub fn run_cycle(&mut self, sample: &TelemetrySample) -> CycleReport {
        self.stats.cycles += 1;
        let mut report = CycleReport {
            pulses: compute_pulses(sample, &self.cue),
            ..CycleReport::default()
        };

        let eligible = sample.velocity >= self.min_shake_velocity;
        let order = self.store.take_shake_if(eligible);
        match order {
            Some(order) => {
                self.write_profile(self.dispatch.shake_profile);
                let outcome = self.shake.execute(
                    self.driver.as_mut(),
                    &order,
                    report.pulses[AXIS_SHAKE],
                    sample.velocity,
                    &self.running,
                );
                self.stats.shakes += 1;
                self.write_profile(self.dispatch.normal_profile);
                report.shake = Some(outcome);
            }
            None => self.write_profile(self.dispatch.normal_profile),
        }

        report.boost = self.boost.apply(&mut report.pulses, sample.velocity);

        let mut selector = FIRST_SELECTED_AXIS;
        for index in SELECTED_INDICES {
            let axis = selector;
            let pulse = report.pulses[index];

            if (pulse - self.previous[index]).abs() >= self.dispatch.pulse_threshold {
                match self.driver.move_absolute(axis, pulse) {
                    Ok(()) => {
                        trace!("Index {} -> axis {}: {}", index, axis, pulse);
                        self.stats.moves += 1;
                    }
                    Err(e) => {
                        warn!("Move to {} on axis {} failed: {}", pulse, axis, e);
                        self.stats.rejected_commands += 1;
                    }
                }
                report.moves.push(AxisMove { index, axis, pulse });
                self.previous[index] = pulse;
                selector = (selector + 2) % AXIS_COUNT;
            }

            // Supervision follows the index so axes 0 and 2 are checked every cycle.
            if !self.monitor.check_and_fix(self.driver.as_mut(), index) {
                self.stats.recovery_failures += 1;
                report.failed_axes.push(index);
            }
        }

        report
    }

    fn write_profile(&mut self, profile: MotionProfile) {
        for axis in 0..AXIS_COUNT {
            let acceleration = profile.acceleration(axis);
            if let Err(e) = self
                .driver
                .set_velocity_profile(axis, profile.velocity, acceleration)
            {
                warn!("Velocity profile write failed on axis {}: {}", axis, e);
                self.stats.rejected_commands += 1;
            }
        }
    }
}
