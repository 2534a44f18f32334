//! Tests for full handle and registry lifecycle scenarios.

use motor_safety_test_helpers::prelude::*;
use motor_safety_watchdog::DEFAULT_SAFETY_EXPIRATION;
use motor_safety_watchdog::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

struct Rig {
    registry: SafetyRegistry,
    clock: Arc<ManualClock>,
    sink: Arc<RecordingSink>,
}

fn rig() -> Result<Rig, SafetyError> {
    let clock = Arc::new(ManualClock::new());
    let sink = Arc::new(RecordingSink::new());
    let registry = SafetyRegistry::builder()
        .clock(clock.clone())
        .diagnostic_sink(sink.clone())
        .build()?;
    Ok(Rig {
        registry,
        clock,
        sink,
    })
}

#[test]
fn test_new_handle_is_alive_and_disabled() -> TestResult {
    let rig = rig()?;
    let motor = MockMotor::new(&rig.registry, "PWM 1");

    assert!(motor.is_alive());
    assert!(!motor.is_safety_enabled());
    assert_eq!(motor.expiration(), DEFAULT_SAFETY_EXPIRATION);
    assert_eq!(motor.safety_status(), SafetyStatus::Disabled);
    assert_eq!(rig.registry.len(), 1);
    Ok(())
}

#[test]
fn test_full_motor_lifecycle() -> TestResult {
    let rig = rig()?;
    let motor = MockMotor::new(&rig.registry, "Talon SRX 2");

    // 1. Enable and drive
    motor.set_safety_enabled(true);
    motor.set(true);
    assert_eq!(motor.safety_status(), SafetyStatus::Alive);

    // 2. Stop updating past the deadline
    rig.clock.advance(ms(150));
    assert!(!motor.is_alive());
    assert_eq!(motor.safety_status(), SafetyStatus::Expired);

    // 3. Sweep stops the motor
    let report = rig.registry.sweep_all();
    assert_eq!(report.stopped, 1);
    assert!(!motor.output().is_running());
    assert_eq!(motor.safety_status(), SafetyStatus::Stopped);
    assert_eq!(
        rig.sink.last().as_deref(),
        Some("Talon SRX 2... Output not updated often enough.")
    );

    // 4. Feeding again recovers
    motor.set(true);
    assert_eq!(motor.safety_status(), SafetyStatus::Alive);
    assert_eq!(rig.registry.sweep_all().stopped, 0);

    // 5. Disabling makes it inert
    motor.set_safety_enabled(false);
    rig.clock.advance(Duration::from_secs(10));
    assert!(motor.is_alive());
    assert_eq!(rig.registry.sweep_all().stopped, 0);

    let metrics = motor.safety_handle().metrics();
    assert_eq!(metrics.feed_count, 2);
    assert_eq!(metrics.timeout_count, 1);
    Ok(())
}

#[test]
fn test_stop_repeats_while_expired() -> TestResult {
    let rig = rig()?;
    let motor = MockMotor::new(&rig.registry, "Relay ID 0");
    motor.set_safety_enabled(true);
    motor.feed();
    rig.clock.advance(ms(100));

    assert!(motor.safety_handle().check());
    assert!(motor.safety_handle().check());
    rig.registry.sweep_all();

    assert_eq!(motor.stop_count(), 3);
    assert_eq!(rig.sink.count(), 3);
    Ok(())
}

#[test]
fn test_deadline_is_exclusive() -> TestResult {
    let rig = rig()?;
    let motor = MockMotor::new(&rig.registry, "Victor 5");
    motor.set_safety_enabled(true);
    motor.feed();

    rig.clock.advance(ms(99));
    assert!(motor.is_alive());
    assert!(!motor.safety_handle().check());

    rig.clock.advance(ms(1));
    assert!(!motor.is_alive());
    assert!(motor.safety_handle().check());
    Ok(())
}

#[test]
fn test_dropped_motor_leaves_registry() -> TestResult {
    let rig = rig()?;
    let motor = MockMotor::new(&rig.registry, "Jaguar 3");
    motor.set_safety_enabled(true);
    let id = motor.safety_handle().id();
    assert!(rig.registry.contains(id));

    drop(motor);
    assert!(!rig.registry.contains(id));

    rig.clock.advance(Duration::from_secs(1));
    let report = rig.registry.sweep_all();
    assert_eq!(report.checked, 0);
    assert_eq!(rig.sink.count(), 0);
    Ok(())
}

#[test]
fn test_feed_before_sweep_is_observed() -> TestResult {
    let rig = rig()?;
    let motor = MockMotor::new(&rig.registry, "Spark 6");
    motor.set_safety_enabled(true);

    for _ in 0..10 {
        rig.clock.advance(ms(90));
        motor.feed();
        assert_eq!(rig.registry.sweep_all().stopped, 0);
    }
    assert_eq!(motor.stop_count(), 0);
    Ok(())
}

#[test]
fn test_stop_may_feed_its_own_handle() -> TestResult {
    let rig = rig()?;
    let motor = MockMotor::refeeding(&rig.registry, "Self-feeding PWM");
    motor.set_safety_enabled(true);
    rig.clock.advance(ms(500));

    let report = rig.registry.sweep_all();
    assert_eq!(report.stopped, 1);
    assert_eq!(motor.stop_count(), 1);
    assert_eq!(motor.safety_status(), SafetyStatus::Alive);
    Ok(())
}

#[test]
fn test_registry_clock_is_injected() -> TestResult {
    let rig = rig()?;
    rig.clock.advance(ms(42));
    assert_eq!(rig.registry.clock().now(), ms(42));
    assert_eq!(rig.registry.now(), ms(42));
    Ok(())
}

#[test]
fn test_default_expiration_from_config() -> TestResult {
    let config = SafetyConfig::builder()
        .default_expiration(ms(250))
        .sweep_period(ms(10))
        .build()?;
    let registry = SafetyRegistry::new(config)?;
    let motor = MockMotor::new(&registry, "PWM 7");
    assert_eq!(motor.expiration(), ms(250));
    Ok(())
}

#[test]
fn test_driver_enforces_deadline() -> TestResult {
    let clock = Arc::new(ManualClock::new());
    let config = SafetyConfig::builder().sweep_period(ms(1)).build()?;
    let registry = SafetyRegistry::builder()
        .config(config)
        .clock(clock.clone())
        .build()?;
    let motor = MockMotor::new(&registry, "Driven PWM");
    motor.set_safety_enabled(true);
    motor.set(true);

    let driver = SweepDriver::spawn(registry)?;
    clock.advance(ms(200));

    let deadline = Instant::now() + Duration::from_secs(5);
    while motor.stop_count() == 0 && Instant::now() < deadline {
        thread::sleep(ms(1));
    }
    assert!(motor.stop_count() > 0);
    assert!(!motor.output().is_running());

    driver.shutdown()?;
    Ok(())
}
