//! Shared test fixtures: a recording actuator driver and fast configurations.

#![allow(dead_code)]

use parking_lot::Mutex;
use rig_common::actuator::{ActuatorDriver, ActuatorError, ConnectionState};
use rig_common::consts::{AXIS_COUNT, HOME_PULSE};
use rig_common::controller::config::ControllerConfig;
use std::sync::Arc;

/// One driver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Connect,
    Disconnect,
    Move { axis: usize, pulse: i32 },
    Home { axis: usize, mode: u8 },
    Profile { axis: usize, velocity: i32, acceleration: i32 },
    InPositionPoll { axis: usize },
    ResetAlarm { axis: usize },
    ServoOn { axis: usize },
    ServoOff { axis: usize },
}

#[derive(Debug)]
struct Inner {
    calls: Vec<Call>,
    state: ConnectionState,
    position: [i32; AXIS_COUNT],
    /// In-position polls left before the current move reports done.
    pending_polls: [u32; AXIS_COUNT],
    polls_per_move: u32,
    alarm: [bool; AXIS_COUNT],
    alarm_clears_on_reset: [bool; AXIS_COUNT],
    servo: [bool; AXIS_COUNT],
    never_done: bool,
}

/// Driver that records every call and completes moves after a fixed number of polls.
pub struct RecordingDriver {
    inner: Arc<Mutex<Inner>>,
}

/// Inspection handle that outlives the boxed driver.
#[derive(Clone)]
pub struct Recorder {
    inner: Arc<Mutex<Inner>>,
}

impl RecordingDriver {
    /// Connected driver, servos on, every axis at the home pulse, moves done on the first poll.
    pub fn new() -> (Self, Recorder) {
        let inner = Arc::new(Mutex::new(Inner {
            calls: Vec::new(),
            state: ConnectionState::Running,
            position: [HOME_PULSE; AXIS_COUNT],
            pending_polls: [0; AXIS_COUNT],
            polls_per_move: 0,
            alarm: [false; AXIS_COUNT],
            alarm_clears_on_reset: [true; AXIS_COUNT],
            servo: [true; AXIS_COUNT],
            never_done: false,
        }));
        (
            Self {
                inner: Arc::clone(&inner),
            },
            Recorder { inner },
        )
    }
}

impl Recorder {
    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().calls.clone()
    }

    pub fn clear(&self) {
        self.inner.lock().calls.clear();
    }

    /// Moves issued, in order, as (axis, pulse).
    pub fn moves(&self) -> Vec<(usize, i32)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Move { axis, pulse } => Some((axis, pulse)),
                _ => None,
            })
            .collect()
    }

    pub fn resets(&self) -> Vec<usize> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::ResetAlarm { axis } => Some(axis),
                _ => None,
            })
            .collect()
    }

    pub fn profiles(&self) -> Vec<(usize, i32, i32)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Profile {
                    axis,
                    velocity,
                    acceleration,
                } => Some((axis, velocity, acceleration)),
                _ => None,
            })
            .collect()
    }

    pub fn position(&self, axis: usize) -> i32 {
        self.inner.lock().position[axis]
    }

    pub fn servo(&self, axis: usize) -> bool {
        self.inner.lock().servo[axis]
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.lock().state
    }

    /// Latch an alarm; `clears_on_reset` decides whether a reset removes it.
    pub fn raise_alarm(&self, axis: usize, clears_on_reset: bool) {
        let mut inner = self.inner.lock();
        inner.alarm[axis] = true;
        inner.alarm_clears_on_reset[axis] = clears_on_reset;
    }

    /// Polls each move needs before it reports done.
    pub fn set_polls_per_move(&self, polls: u32) {
        self.inner.lock().polls_per_move = polls;
    }

    /// Make every move hang forever.
    pub fn set_never_done(&self) {
        self.inner.lock().never_done = true;
    }

    pub fn set_state(&self, state: ConnectionState) {
        self.inner.lock().state = state;
    }
}

impl ActuatorDriver for RecordingDriver {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn available_ports(&self) -> Vec<String> {
        vec!["rec0".to_string()]
    }

    fn connect(&mut self, _port: &str, _retry_budget: u32) -> ConnectionState {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::Connect);
        inner.state = ConnectionState::Running;
        inner.state
    }

    fn state(&self) -> ConnectionState {
        self.inner.lock().state
    }

    fn disconnect(&mut self) {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::Disconnect);
        inner.state = ConnectionState::NotPresent;
    }

    fn move_absolute(&mut self, axis: usize, pulse: i32) -> Result<(), ActuatorError> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::Move { axis, pulse });
        if inner.alarm[axis] {
            return Err(ActuatorError::CommandRejected {
                axis,
                command: rig_common::actuator::DriverCommand::MoveAbsolute,
            });
        }
        inner.position[axis] = pulse;
        inner.pending_polls[axis] = inner.polls_per_move;
        Ok(())
    }

    fn home(&mut self, axis: usize, mode: u8) -> Result<(), ActuatorError> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::Home { axis, mode });
        inner.position[axis] = 0;
        inner.pending_polls[axis] = inner.polls_per_move;
        Ok(())
    }

    fn set_velocity_profile(
        &mut self,
        axis: usize,
        velocity: i32,
        acceleration: i32,
    ) -> Result<(), ActuatorError> {
        self.inner.lock().calls.push(Call::Profile {
            axis,
            velocity,
            acceleration,
        });
        Ok(())
    }

    fn is_in_position(&mut self, axis: usize) -> bool {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::InPositionPoll { axis });
        if inner.never_done {
            return false;
        }
        if inner.pending_polls[axis] > 0 {
            inner.pending_polls[axis] -= 1;
            return false;
        }
        true
    }

    fn is_settled(&mut self, _axis: usize) -> bool {
        true
    }

    fn has_alarm(&mut self, axis: usize) -> bool {
        self.inner.lock().alarm[axis]
    }

    fn is_servo_on(&mut self, axis: usize) -> bool {
        self.inner.lock().servo[axis]
    }

    fn reset_alarm(&mut self, axis: usize) -> Result<(), ActuatorError> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::ResetAlarm { axis });
        if inner.alarm_clears_on_reset[axis] {
            inner.alarm[axis] = false;
        }
        Ok(())
    }

    fn servo_on(&mut self, axis: usize) -> Result<(), ActuatorError> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::ServoOn { axis });
        inner.servo[axis] = true;
        Ok(())
    }

    fn servo_off(&mut self, axis: usize) -> Result<(), ActuatorError> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::ServoOff { axis });
        inner.servo[axis] = false;
        Ok(())
    }
}

/// Default configuration with every sleep set to zero.
pub fn fast_config() -> ControllerConfig {
    let mut config = ControllerConfig::with_service_name("rig_test");
    config.telemetry.period_ms = 1;
    config.shake.poll_interval_ms = 0;
    config.shake.max_polls = 50;
    config.recovery.servo_settle_ms = 0;
    config.recovery.rehome_settle_ms = 0;
    config.startup.poll_interval_ms = 0;
    config.startup.max_polls = 500;
    config
}
