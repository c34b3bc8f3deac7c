//! Simulation driver integration tests.
//!
//! Drives the registry → connect → command path the controller uses at
//! startup, plus the alarm reset protocol, against the simulation driver.

use rig_common::actuator::{ActuatorDriver, AxisStatusFlags, ConnectionState};
use rig_common::consts::{AXIS_COUNT, HOME_PULSE};
use rig_common::controller::config::DriverConfig;
use rig_hal::drivers::simulation::{AlarmKind, SimulationDriver};
use rig_hal::{connect_any, DriverRegistry, HalError};

fn wait_done(driver: &mut dyn ActuatorDriver, axis: usize) -> usize {
    let mut polls = 0;
    while !driver.motion_done(axis) {
        polls += 1;
        assert!(polls < 1000, "axis {axis} never finished its move");
    }
    polls
}

#[test]
fn registry_driver_connects_and_homes_every_axis() {
    let registry = DriverRegistry::with_builtin_drivers();
    let mut driver = registry.create_driver("simulation").unwrap();
    let port = connect_any(driver.as_mut(), &DriverConfig::default()).unwrap();
    assert_eq!(port, "sim0");
    assert_eq!(driver.state(), ConnectionState::Running);

    for axis in 0..AXIS_COUNT {
        driver.servo_on(axis).unwrap();
        driver.home(axis, 0x8).unwrap();
        wait_done(driver.as_mut(), axis);
        driver.move_absolute(axis, HOME_PULSE).unwrap();
        wait_done(driver.as_mut(), axis);

        let status = driver.status(axis);
        assert!(status.contains(AxisStatusFlags::SERVO_ON));
        assert!(!status.contains(AxisStatusFlags::ALARM));
    }

    driver.disconnect();
    assert_eq!(driver.state(), ConnectionState::NotPresent);
}

#[test]
fn unknown_driver_name_fails() {
    let registry = DriverRegistry::with_builtin_drivers();
    assert!(matches!(
        registry.create_driver("termibus"),
        Err(HalError::DriverNotFound(name)) if name == "termibus"
    ));
}

#[test]
fn reset_protocol_clears_transient_alarm_only() {
    let mut driver = SimulationDriver::new();
    connect_any(&mut driver, &DriverConfig::default()).unwrap();

    driver.inject_alarm(0, AlarmKind::Transient);
    driver.inject_alarm(2, AlarmKind::Sticky);

    for axis in [0, 2] {
        assert!(driver.has_alarm(axis));
        driver.servo_off(axis).unwrap();
        driver.reset_alarm(axis).unwrap();
        driver.servo_on(axis).unwrap();
    }

    assert!(!driver.has_alarm(0));
    assert!(driver.has_alarm(2));
    assert!(driver.is_servo_on(2));
}

#[test]
fn faster_profile_finishes_in_fewer_polls() {
    let mut driver = SimulationDriver::new();
    connect_any(&mut driver, &DriverConfig::default()).unwrap();
    driver.servo_on(0).unwrap();
    driver.servo_on(2).unwrap();

    driver.set_velocity_profile(0, 500, 100).unwrap();
    driver.set_velocity_profile(2, 2000, 100).unwrap();
    driver.move_absolute(0, HOME_PULSE + 2000).unwrap();
    driver.move_absolute(2, HOME_PULSE + 2000).unwrap();

    let slow = wait_done(&mut driver, 0);
    let fast = wait_done(&mut driver, 2);
    assert!(fast < slow, "fast={fast} slow={slow}");
}
