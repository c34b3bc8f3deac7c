//! Configuration structures for the motion cueing controller.
//!
//! All config types use `serde::Deserialize` for TOML loading.
//! Every section and field carries a default, so only `[shared]` is
//! mandatory. Numeric parameters are range-checked by `validate()`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{ConfigError, SharedConfig};
use crate::consts::{AXIS_COUNT, DEFAULT_HOME_MODE, HOME_PULSE, SHAKE_PHYSICAL_AXIS, TELEMETRY_PERIOD_MS};

// ─── Bounds ─────────────────────────────────────────────────────────

/// Telemetry period bounds [ms].
pub const PERIOD_MS_MIN: u64 = 1;
pub const PERIOD_MS_MAX: u64 = 1000;

/// Maximum shake oscillations per order.
pub const SHAKE_PULSE_COUNT_MAX: u32 = 1000;

// ─── Top-Level Config ───────────────────────────────────────────────

/// Top-level controller configuration.
///
/// Loaded from TOML at startup and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Service name and log level.
    pub shared: SharedConfig,
    /// Telemetry channel.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// Motion cue engine tunables.
    #[serde(default)]
    pub cue: CueConfig,
    /// Dispatcher gating and velocity profiles.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Shake overlay.
    #[serde(default)]
    pub shake: ShakeConfig,
    /// Alarm recovery timings.
    #[serde(default)]
    pub recovery: RecoveryConfig,
    /// Startup homing sequence.
    #[serde(default)]
    pub startup: StartupConfig,
    /// Actuator driver selection and connection.
    #[serde(default)]
    pub driver: DriverConfig,
}

impl ControllerConfig {
    /// Configuration with all defaults and the given service name.
    pub fn with_service_name(name: &str) -> Self {
        Self {
            shared: SharedConfig {
                log_level: Default::default(),
                service_name: name.to_string(),
            },
            telemetry: TelemetryConfig::default(),
            cue: CueConfig::default(),
            dispatch: DispatchConfig::default(),
            shake: ShakeConfig::default(),
            recovery: RecoveryConfig::default(),
            startup: StartupConfig::default(),
            driver: DriverConfig::default(),
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.telemetry.validate().map_err(ConfigError::ValidationError)?;
        self.cue.validate().map_err(ConfigError::ValidationError)?;
        self.dispatch.validate().map_err(ConfigError::ValidationError)?;
        self.shake.validate().map_err(ConfigError::ValidationError)?;
        self.startup.validate().map_err(ConfigError::ValidationError)?;
        self.driver.validate().map_err(ConfigError::ValidationError)?;
        Ok(())
    }
}

// ─── Telemetry ──────────────────────────────────────────────────────

/// Telemetry channel configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// CSV file written by the simulation process.
    #[serde(default = "default_telemetry_path")]
    pub path: PathBuf,
    /// Sampling period [ms].
    #[serde(default = "default_period_ms")]
    pub period_ms: u64,
    /// Multiplier applied to the raw velocity field.
    #[serde(default = "default_velocity_scale")]
    pub velocity_scale: f64,
}

fn default_telemetry_path() -> PathBuf {
    PathBuf::from("MOTION_DATA_PIPE.csv")
}
fn default_period_ms() -> u64 {
    TELEMETRY_PERIOD_MS
}
fn default_velocity_scale() -> f64 {
    5.0
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            path: default_telemetry_path(),
            period_ms: default_period_ms(),
            velocity_scale: default_velocity_scale(),
        }
    }
}

impl TelemetryConfig {
    /// Sampling period as a `Duration`.
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.period_ms < PERIOD_MS_MIN || self.period_ms > PERIOD_MS_MAX {
            return Err(format!(
                "telemetry.period_ms {} out of range [{}, {}]",
                self.period_ms, PERIOD_MS_MIN, PERIOD_MS_MAX
            ));
        }
        if !(self.velocity_scale.is_finite() && self.velocity_scale > 0.0) {
            return Err(format!(
                "telemetry.velocity_scale {} must be positive",
                self.velocity_scale
            ));
        }
        Ok(())
    }
}

// ─── Cue Engine ─────────────────────────────────────────────────────

/// Motion cue engine tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CueConfig {
    /// Sensitivity coefficient applied to near-neutral angles, in `(0, 1]`.
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,
}

fn default_sensitivity() -> f64 {
    0.7
}

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
        }
    }
}

impl CueConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.sensitivity > 0.0 && self.sensitivity <= 1.0) {
            return Err(format!(
                "cue.sensitivity {} out of range (0, 1]",
                self.sensitivity
            ));
        }
        Ok(())
    }
}

// ─── Dispatcher ─────────────────────────────────────────────────────

/// Velocity/acceleration parameters written to the axes.
///
/// The shake axis gets its own acceleration; the two angle axes share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionProfile {
    /// Velocity parameter for all axes.
    #[serde(default = "default_profile_velocity")]
    pub velocity: i32,
    /// Acceleration of the shake axis.
    #[serde(default = "default_shake_axis_accel")]
    pub shake_axis_accel: i32,
    /// Acceleration of the other axes.
    #[serde(default = "default_other_axis_accel")]
    pub other_axis_accel: i32,
}

fn default_profile_velocity() -> i32 {
    2000
}
fn default_shake_axis_accel() -> i32 {
    30
}
fn default_other_axis_accel() -> i32 {
    100
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self {
            velocity: default_profile_velocity(),
            shake_axis_accel: default_shake_axis_accel(),
            other_axis_accel: default_other_axis_accel(),
        }
    }
}

impl MotionProfile {
    /// Acceleration for a physical axis.
    #[inline]
    pub const fn acceleration(&self, axis: usize) -> i32 {
        if axis == SHAKE_PHYSICAL_AXIS {
            self.shake_axis_accel
        } else {
            self.other_axis_accel
        }
    }

    fn validate(&self, section: &str) -> Result<(), String> {
        if self.velocity <= 0 || self.shake_axis_accel <= 0 || self.other_axis_accel <= 0 {
            return Err(format!(
                "{section}: velocity and accelerations must be positive ({self:?})"
            ));
        }
        Ok(())
    }
}

/// Dispatcher configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Minimum pulse change that triggers a move command.
    #[serde(default = "default_pulse_threshold")]
    pub pulse_threshold: i32,
    /// Neutral pulse for startup and shutdown.
    #[serde(default = "default_home_pulse")]
    pub home_pulse: i32,
    /// Profile used by normal cueing.
    #[serde(default)]
    pub normal_profile: MotionProfile,
    /// Profile used while a shake sequence runs.
    #[serde(default)]
    pub shake_profile: MotionProfile,
}

fn default_pulse_threshold() -> i32 {
    20
}
fn default_home_pulse() -> i32 {
    HOME_PULSE
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            pulse_threshold: default_pulse_threshold(),
            home_pulse: default_home_pulse(),
            normal_profile: MotionProfile::default(),
            shake_profile: MotionProfile::default(),
        }
    }
}

impl DispatchConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.pulse_threshold < 0 {
            return Err(format!(
                "dispatch.pulse_threshold {} must be >= 0",
                self.pulse_threshold
            ));
        }
        if self.home_pulse < 0 {
            return Err(format!(
                "dispatch.home_pulse {} must be >= 0",
                self.home_pulse
            ));
        }
        self.normal_profile.validate("dispatch.normal_profile")?;
        self.shake_profile.validate("dispatch.shake_profile")
    }
}

// ─── Shake ──────────────────────────────────────────────────────────

/// Shake overlay configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShakeConfig {
    /// Lower clamp of the oscillation offset [pulses].
    #[serde(default)]
    pub min_offset: i32,
    /// Upper clamp of the oscillation offset [pulses].
    #[serde(default = "default_max_offset")]
    pub max_offset: i32,
    /// Number of back-and-forth moves per order.
    #[serde(default = "default_pulse_count")]
    pub pulse_count: u32,
    /// Orders wait in the queue while the vehicle is slower than this.
    #[serde(default)]
    pub min_velocity: f64,
    /// Sleep between motion-complete polls [ms].
    #[serde(default = "default_shake_poll_ms")]
    pub poll_interval_ms: u64,
    /// Polls before a single shake move is abandoned.
    #[serde(default = "default_shake_max_polls")]
    pub max_polls: u32,
}

fn default_max_offset() -> i32 {
    200
}
fn default_pulse_count() -> u32 {
    4
}
fn default_shake_poll_ms() -> u64 {
    5
}
fn default_shake_max_polls() -> u32 {
    2000
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            min_offset: 0,
            max_offset: default_max_offset(),
            pulse_count: default_pulse_count(),
            min_velocity: 0.0,
            poll_interval_ms: default_shake_poll_ms(),
            max_polls: default_shake_max_polls(),
        }
    }
}

impl ShakeConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.min_offset < 0 || self.min_offset > self.max_offset {
            return Err(format!(
                "shake offsets must satisfy 0 <= min_offset ({}) <= max_offset ({})",
                self.min_offset, self.max_offset
            ));
        }
        if self.pulse_count > SHAKE_PULSE_COUNT_MAX {
            return Err(format!(
                "shake.pulse_count {} exceeds {}",
                self.pulse_count, SHAKE_PULSE_COUNT_MAX
            ));
        }
        if !self.min_velocity.is_finite() || self.min_velocity < 0.0 {
            return Err(format!(
                "shake.min_velocity {} must be >= 0",
                self.min_velocity
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err("shake.poll_interval_ms must be >= 1".to_string());
        }
        if self.max_polls == 0 {
            return Err("shake.max_polls must be >= 1".to_string());
        }
        Ok(())
    }
}

// ─── Recovery ───────────────────────────────────────────────────────

/// Alarm recovery timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Wait after servo off before the alarm reset [ms].
    #[serde(default = "default_servo_settle_ms")]
    pub servo_settle_ms: u64,
    /// Wait after servo on and after re-homing [ms].
    #[serde(default = "default_rehome_settle_ms")]
    pub rehome_settle_ms: u64,
    /// Homing mode for the re-home move.
    #[serde(default = "default_home_mode")]
    pub home_mode: u8,
}

fn default_servo_settle_ms() -> u64 {
    50
}
fn default_rehome_settle_ms() -> u64 {
    500
}
fn default_home_mode() -> u8 {
    DEFAULT_HOME_MODE
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            servo_settle_ms: default_servo_settle_ms(),
            rehome_settle_ms: default_rehome_settle_ms(),
            home_mode: default_home_mode(),
        }
    }
}

impl RecoveryConfig {
    pub fn servo_settle(&self) -> Duration {
        Duration::from_millis(self.servo_settle_ms)
    }

    pub fn rehome_settle(&self) -> Duration {
        Duration::from_millis(self.rehome_settle_ms)
    }
}

// ─── Startup ────────────────────────────────────────────────────────

/// Startup homing sequence configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupConfig {
    /// Velocity written to each axis right after homing.
    #[serde(default = "default_homing_velocity")]
    pub homing_velocity: i32,
    /// Per-axis acceleration written right after homing.
    #[serde(default = "default_homing_accel")]
    pub homing_accel: [i32; AXIS_COUNT],
    /// Sleep between motion-complete polls [ms].
    #[serde(default = "default_startup_poll_ms")]
    pub poll_interval_ms: u64,
    /// Polls before a startup wait is declared failed.
    #[serde(default = "default_startup_max_polls")]
    pub max_polls: u32,
}

fn default_homing_velocity() -> i32 {
    1500
}
fn default_homing_accel() -> [i32; AXIS_COUNT] {
    [10, 10, 20]
}
fn default_startup_poll_ms() -> u64 {
    10
}
fn default_startup_max_polls() -> u32 {
    3000
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            homing_velocity: default_homing_velocity(),
            homing_accel: default_homing_accel(),
            poll_interval_ms: default_startup_poll_ms(),
            max_polls: default_startup_max_polls(),
        }
    }
}

impl StartupConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.homing_velocity <= 0 || self.homing_accel.iter().any(|&a| a <= 0) {
            return Err(format!(
                "startup homing profile must be positive (velocity {}, accel {:?})",
                self.homing_velocity, self.homing_accel
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err("startup.poll_interval_ms must be >= 1".to_string());
        }
        if self.max_polls == 0 {
            return Err("startup.max_polls must be >= 1".to_string());
        }
        Ok(())
    }
}

// ─── Driver ─────────────────────────────────────────────────────────

/// Actuator driver selection and connection policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Registered driver name.
    #[serde(default = "default_driver_name")]
    pub name: String,
    /// Ports to try, in order. Empty means every port the driver reports.
    #[serde(default)]
    pub ports: Vec<String>,
    /// Bus initialisation retries passed to each connect call.
    #[serde(default = "default_retry_budget")]
    pub retry_budget: u32,
    /// Connect calls per port that may end in `InitError` before moving on.
    #[serde(default = "default_init_error_tries")]
    pub init_error_tries: u32,
}

fn default_driver_name() -> String {
    "simulation".to_string()
}
fn default_retry_budget() -> u32 {
    3
}
fn default_init_error_tries() -> u32 {
    5
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            name: default_driver_name(),
            ports: Vec::new(),
            retry_budget: default_retry_budget(),
            init_error_tries: default_init_error_tries(),
        }
    }
}

impl DriverConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("driver.name cannot be empty".to_string());
        }
        if self.retry_budget == 0 || self.init_error_tries == 0 {
            return Err(format!(
                "driver.retry_budget ({}) and driver.init_error_tries ({}) must be >= 1",
                self.retry_budget, self.init_error_tries
            ));
        }
        Ok(())
    }
}
