//! Simulation driver implementation.
//!
//! The `SimulationDriver` implements `ActuatorDriver` on top of three
//! `SimAxis` instances and a small connection state machine, so the whole
//! controller can run (and be tested) without the rig attached.

use super::axis::{AlarmKind, SimAxis};
use rig_common::actuator::types::DriverCommand;
use rig_common::actuator::{ActuatorDriver, ActuatorError, ConnectionState};
use rig_common::consts::{AXIS_COUNT, HOME_PULSE};
use tracing::{debug, info, warn};

/// Simulation driver implementing the `ActuatorDriver` trait.
pub struct SimulationDriver {
    /// Ports reported by `available_ports()`
    ports: Vec<String>,
    /// The one port a device answers on
    live_port: String,
    /// Current connection state
    state: ConnectionState,
    /// Connect calls that will still end in `InitError`
    pending_init_failures: u32,
    /// State polls the bus stays in `Opening`
    opening_polls: u32,
    /// Total connect calls
    connect_attempts: u32,
    /// Axis simulators
    axes: [SimAxis; AXIS_COUNT],
}

impl SimulationDriver {
    /// Create a simulation driver with one port (`sim0`) and all axes at the home pulse.
    pub fn new() -> Self {
        Self {
            ports: vec!["sim0".to_string()],
            live_port: "sim0".to_string(),
            state: ConnectionState::NotPresent,
            pending_init_failures: 0,
            opening_polls: 0,
            connect_attempts: 0,
            axes: std::array::from_fn(|_| SimAxis::new(HOME_PULSE, 1)),
        }
    }

    /// Replace the port list. Only `live` answers.
    pub fn with_ports(mut self, ports: &[&str], live: &str) -> Self {
        self.ports = ports.iter().map(|p| p.to_string()).collect();
        self.live_port = live.to_string();
        self
    }

    /// Fail the first `count` connect calls on the live port with `InitError`.
    pub fn with_init_failures(mut self, count: u32) -> Self {
        self.pending_init_failures = count;
        self
    }

    /// Keep the bus in `Opening` for `polls` state polls after initialisation.
    pub fn with_opening_polls(mut self, polls: u32) -> Self {
        self.opening_polls = polls;
        self
    }

    /// Polls an axis must dwell at its target before reporting settled.
    pub fn with_settle_polls(mut self, polls: u32) -> Self {
        for axis in &mut self.axes {
            *axis = SimAxis::new(axis.position(), polls);
        }
        self
    }

    /// Latch an alarm on `axis`.
    pub fn inject_alarm(&mut self, axis: usize, kind: AlarmKind) {
        if let Some(sim) = self.axes.get_mut(axis) {
            warn!("Simulated alarm ({:?}) on axis {}", kind, axis);
            sim.raise_alarm(kind);
        }
    }

    /// Simulated axis, for inspection.
    pub fn axis(&self, axis: usize) -> Option<&SimAxis> {
        self.axes.get(axis)
    }

    /// Number of connect calls so far.
    pub fn connect_attempts(&self) -> u32 {
        self.connect_attempts
    }

    fn running_axis(&mut self, axis: usize) -> Result<&mut SimAxis, ActuatorError> {
        if !self.state.is_running() {
            return Err(ActuatorError::NotConnected);
        }
        self.axes
            .get_mut(axis)
            .ok_or(ActuatorError::InvalidAxis(axis))
    }

    fn query(&mut self, axis: usize, f: impl FnOnce(&mut SimAxis) -> bool) -> bool {
        match self.running_axis(axis) {
            Ok(sim) => f(sim),
            Err(_) => false,
        }
    }
}

impl Default for SimulationDriver {
    fn default() -> Self {
        Self::new()
    }
}

fn accepted(ok: bool, axis: usize, command: DriverCommand) -> Result<(), ActuatorError> {
    if ok {
        Ok(())
    } else {
        Err(ActuatorError::CommandRejected { axis, command })
    }
}

impl ActuatorDriver for SimulationDriver {
    fn name(&self) -> &'static str {
        "simulation"
    }

    fn available_ports(&self) -> Vec<String> {
        self.ports.clone()
    }

    fn connect(&mut self, port: &str, retry_budget: u32) -> ConnectionState {
        self.connect_attempts += 1;

        if port != self.live_port || !self.ports.iter().any(|p| p == port) {
            self.state = ConnectionState::NotPresent;
            return self.state;
        }

        if self.pending_init_failures > 0 {
            self.pending_init_failures -= 1;
            self.state = ConnectionState::InitError;
            debug!("Simulated init error on {}", port);
            return self.state;
        }

        self.state = ConnectionState::Opening;
        let waited = self.opening_polls.min(retry_budget);
        self.opening_polls -= waited;
        if self.opening_polls == 0 {
            self.state = ConnectionState::Running;
            info!("Simulation driver running on {}", port);
        }
        self.state
    }

    fn state(&self) -> ConnectionState {
        self.state
    }

    fn disconnect(&mut self) {
        info!("Simulation driver disconnected");
        self.state = ConnectionState::NotPresent;
    }

    fn move_absolute(&mut self, axis: usize, pulse: i32) -> Result<(), ActuatorError> {
        let ok = self.running_axis(axis)?.command_move(pulse);
        accepted(ok, axis, DriverCommand::MoveAbsolute)
    }

    fn home(&mut self, axis: usize, mode: u8) -> Result<(), ActuatorError> {
        debug!("Simulated home on axis {} (mode {:#x})", axis, mode);
        let ok = self.running_axis(axis)?.command_home();
        accepted(ok, axis, DriverCommand::Home)
    }

    fn set_velocity_profile(
        &mut self,
        axis: usize,
        velocity: i32,
        acceleration: i32,
    ) -> Result<(), ActuatorError> {
        self.running_axis(axis)?.set_profile(velocity, acceleration);
        Ok(())
    }

    fn is_in_position(&mut self, axis: usize) -> bool {
        self.query(axis, |sim| sim.poll_in_position())
    }

    fn is_settled(&mut self, axis: usize) -> bool {
        self.query(axis, |sim| sim.is_settled())
    }

    fn has_alarm(&mut self, axis: usize) -> bool {
        self.query(axis, |sim| sim.has_alarm())
    }

    fn is_servo_on(&mut self, axis: usize) -> bool {
        self.query(axis, |sim| sim.servo_on())
    }

    fn reset_alarm(&mut self, axis: usize) -> Result<(), ActuatorError> {
        // The drive acknowledges the reset even when the alarm cause persists.
        self.running_axis(axis)?.reset_alarm();
        Ok(())
    }

    fn servo_on(&mut self, axis: usize) -> Result<(), ActuatorError> {
        self.running_axis(axis)?.set_servo(true);
        Ok(())
    }

    fn servo_off(&mut self, axis: usize) -> Result<(), ActuatorError> {
        self.running_axis(axis)?.set_servo(false);
        Ok(())
    }
}
