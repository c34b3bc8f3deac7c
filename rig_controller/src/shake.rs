//! Shake effect sequence.
//!
//! A shake oscillates the shake axis around its current baseline pulse:
//! `baseline − offset`, wait for in-position + settled, negate the offset,
//! repeat `pulse_count` times. The offset grows with the square of velocity.

use crate::poll::{await_condition, PollOutcome, PollPolicy};
use rig_common::actuator::ActuatorDriver;
use rig_common::consts::SHAKE_PHYSICAL_AXIS;
use rig_common::controller::config::ShakeConfig;
use rig_common::types::ShakeOrder;
use std::sync::atomic::AtomicBool;
use tracing::{debug, info, warn};

/// Oscillation amplitude for `velocity`: `v²` bounded to `[min_offset, max_offset]`.
pub fn shake_offset(velocity: f64, config: &ShakeConfig) -> i32 {
    let squared = velocity * velocity;
    squared
        .min(f64::from(config.max_offset))
        .max(f64::from(config.min_offset)) as i32
}

/// Result of one shake order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShakeOutcome {
    /// Moves issued on the shake axis.
    pub moves: u32,
    /// Every move reported done within the poll budget.
    pub completed: bool,
}

/// Executes shake orders against the driver.
#[derive(Debug, Clone, Copy)]
pub struct ShakeSequencer {
    config: ShakeConfig,
}

impl ShakeSequencer {
    pub const fn new(config: ShakeConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &ShakeConfig {
        &self.config
    }

    fn policy(&self) -> PollPolicy {
        PollPolicy::new(self.config.poll_interval(), self.config.max_polls)
    }

    /// Run `order` synchronously. Blocks until every oscillation finished,
    /// a wait timed out, or `running` went false.
    pub fn execute(
        &self,
        driver: &mut dyn ActuatorDriver,
        order: &ShakeOrder,
        baseline: i32,
        velocity: f64,
        running: &AtomicBool,
    ) -> ShakeOutcome {
        let mut offset = shake_offset(velocity, &self.config);
        let mut outcome = ShakeOutcome {
            moves: 0,
            completed: true,
        };

        info!(
            "Shake {} at velocity {:.1}: offset {} around {}",
            order.position, velocity, offset, baseline
        );

        if order.position.includes_front() {
            for _ in 0..self.config.pulse_count {
                let target = baseline - offset;
                if let Err(e) = driver.move_absolute(SHAKE_PHYSICAL_AXIS, target) {
                    warn!("Shake move to {} failed: {}", target, e);
                    outcome.completed = false;
                    break;
                }
                outcome.moves += 1;

                match await_condition(
                    || driver.motion_done(SHAKE_PHYSICAL_AXIS),
                    self.policy(),
                    running,
                ) {
                    PollOutcome::Satisfied { .. } => {}
                    PollOutcome::TimedOut => {
                        warn!("Shake axis did not settle at {}", target);
                        outcome.completed = false;
                        break;
                    }
                    PollOutcome::Cancelled => {
                        debug!("Shake interrupted by shutdown");
                        outcome.completed = false;
                        break;
                    }
                }
                offset = -offset;
            }
        }

        if order.position.includes_rear() {
            debug!("Rear shake oscillation is disabled");
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ShakeConfig {
        ShakeConfig::default()
    }

    #[test]
    fn offset_is_velocity_squared_capped() {
        let cfg = config();
        assert_eq!(shake_offset(10.0, &cfg), 100);
        assert_eq!(shake_offset(20.0, &cfg), 200);
        assert_eq!(shake_offset(0.0, &cfg), 0);
        assert_eq!(shake_offset(-3.0, &cfg), 9);
    }

    #[test]
    fn offset_respects_minimum() {
        let cfg = ShakeConfig {
            min_offset: 50,
            ..config()
        };
        assert_eq!(shake_offset(1.0, &cfg), 50);
        assert_eq!(shake_offset(10.0, &cfg), 100);
    }
}
