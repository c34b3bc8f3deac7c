//! Controller config file tests.
//!
//! Loads full `controller.toml` files from disk through `ConfigLoader`
//! and checks defaults, overrides and bounds validation.

use rig_common::config::{ConfigError, ConfigLoader, LogLevel};
use rig_common::controller::config::ControllerConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write `content` as controller.toml in `dir`.
fn write_controller_toml(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("controller.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn full_file_round_trips_every_section() {
    let dir = TempDir::new().unwrap();
    let path = write_controller_toml(
        dir.path(),
        r#"
[shared]
service_name = "rig-bay-2"
log_level = "warn"

[telemetry]
path = "/tmp/motion.csv"
period_ms = 25
velocity_scale = 4.0

[cue]
sensitivity = 0.5

[dispatch]
pulse_threshold = 35
home_pulse = 9000

[dispatch.normal_profile]
velocity = 1800
shake_axis_accel = 25
other_axis_accel = 90

[dispatch.shake_profile]
velocity = 2500
shake_axis_accel = 60
other_axis_accel = 120

[shake]
min_offset = 10
max_offset = 150
pulse_count = 8
min_velocity = 2.0
poll_interval_ms = 3
max_polls = 500

[recovery]
servo_settle_ms = 20
rehome_settle_ms = 200
home_mode = 4

[startup]
homing_velocity = 1200
homing_accel = [8, 8, 16]
poll_interval_ms = 5
max_polls = 100

[driver]
name = "simulation"
ports = ["ttyUSB0", "ttyUSB1"]
retry_budget = 2
init_error_tries = 3
"#,
    );

    let cfg = ControllerConfig::load(&path).unwrap();
    cfg.validate().unwrap();

    assert_eq!(cfg.shared.service_name, "rig-bay-2");
    assert_eq!(cfg.shared.log_level, LogLevel::Warn);
    assert_eq!(cfg.telemetry.path, PathBuf::from("/tmp/motion.csv"));
    assert_eq!(cfg.telemetry.period_ms, 25);
    assert_eq!(cfg.cue.sensitivity, 0.5);
    assert_eq!(cfg.dispatch.pulse_threshold, 35);
    assert_eq!(cfg.dispatch.home_pulse, 9000);
    assert_eq!(cfg.dispatch.shake_profile.acceleration(1), 60);
    assert_eq!(cfg.dispatch.shake_profile.acceleration(2), 120);
    assert_eq!(cfg.shake.min_offset, 10);
    assert_eq!(cfg.shake.pulse_count, 8);
    assert_eq!(cfg.recovery.home_mode, 4);
    assert_eq!(cfg.startup.homing_accel, [8, 8, 16]);
    assert_eq!(cfg.driver.ports, vec!["ttyUSB0", "ttyUSB1"]);
    assert_eq!(cfg.driver.init_error_tries, 3);
}

#[test]
fn wrong_field_type_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_controller_toml(
        dir.path(),
        r#"
[shared]
service_name = "rig"

[shake]
pulse_count = "many"
"#,
    );
    assert!(matches!(
        ControllerConfig::load(&path),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn inverted_offsets_fail_validation() {
    let dir = TempDir::new().unwrap();
    let path = write_controller_toml(
        dir.path(),
        r#"
[shared]
service_name = "rig"

[shake]
min_offset = 250
max_offset = 200
"#,
    );
    let cfg = ControllerConfig::load(&path).unwrap();
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("min_offset"));
}

#[test]
fn sensitivity_above_one_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = write_controller_toml(
        dir.path(),
        "[shared]\nservice_name = \"rig\"\n\n[cue]\nsensitivity = 1.5\n",
    );
    let cfg = ControllerConfig::load(&path).unwrap();
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::ValidationError(_))
    ));
}

#[test]
fn missing_file_is_reported() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        ControllerConfig::load(&dir.path().join("absent.toml")),
        Err(ConfigError::FileNotFound)
    ));
}
