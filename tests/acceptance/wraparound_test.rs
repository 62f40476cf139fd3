//! Clock wraparound and stall acceptance tests.
//!
//! # Acceptance Criteria
//!
//! - Elapsed time is computed with wrapping subtraction in the clock's width
//! - A clock wrap neither skips nor adds a fire
//! - After a stall exactly one fire occurs; missed intervals are not replayed

use super::common::sim_relay;
use diag_common::config::RelayConfig;
use diag_hal::clock::SimulatedClock;
use diag_hal::output::SimulatedOutput;
use diag_monitor::{PeriodicMonitor, TickResult};
use diag_runtime::{DiagEvent, Diagnostic, Poll, RecordingReporter, RelayDiagnostic, Runner};

#[test]
fn test_eight_bit_clock_wrap() {
    let mut monitor = PeriodicMonitor::<u8, bool>::new(20, 10).unwrap();

    assert!(monitor.tick(250, || false).is_fired());
    // (10 - 250) mod 256 = 16 < 20
    assert_eq!(monitor.tick(10, || true), TickResult::Idle);
    // (20 - 250) mod 256 = 26 >= 20
    assert!(matches!(
        monitor.tick(20, || true),
        TickResult::Fired {
            changed: true,
            cycle_count: 2,
            elapsed: Some(26),
            ..
        }
    ));
}

#[test]
fn test_millis_counter_wrap_keeps_cadence() {
    let config = RelayConfig::default();
    let (mut clock, mut diag) = sim_relay(&config, u32::MAX - 3_000);

    let summary = Runner::new(config.idle_sleep)
        .max_fires(5)
        .run(&mut diag, &mut clock);

    assert_eq!(summary.fires, 5);
    assert_eq!(summary.iterations, 1 + 4 * 200);
    assert_eq!(summary.late_fires, 0);
    // Started 3001 ms before the wrap; five fires end 8000 ms later
    assert_eq!(diag.monitor().last_fire(), Some(4_999));
}

#[test]
fn test_sixteen_bit_clock_many_wraps() {
    let config = RelayConfig::default();
    let mut clock = SimulatedClock::<u16>::new(0);
    let mut diag = RelayDiagnostic::new(
        clock.clone(),
        SimulatedOutput::new(config.pin),
        &config,
        RecordingReporter::new(),
    )
    .unwrap();

    // 80 s of toggling wraps a 16-bit millisecond clock once
    let summary = Runner::new(config.idle_sleep)
        .max_fires(40)
        .run(&mut diag, &mut clock);

    assert_eq!(summary.fires, 40);
    assert_eq!(summary.iterations, 1 + 39 * 200);
    assert_eq!(summary.late_fires, 0);
}

#[test]
fn test_stall_fires_once() {
    let config = RelayConfig::default();
    let (clock, mut diag) = sim_relay(&config, 0);
    diag.setup();
    assert!(matches!(diag.poll(), Poll::Fired(_)));

    // Loop blocked for 30 intervals
    clock.advance(60_000);

    match diag.poll() {
        Poll::Fired(outcome) => {
            assert_eq!(outcome.cycle_count, 2);
            assert!(outcome.late);
        }
        Poll::Idle => panic!("expected a fire after the stall"),
    }
    assert_eq!(diag.poll(), Poll::Idle);

    clock.advance(1_999);
    assert_eq!(diag.poll(), Poll::Idle);
    clock.advance(1);
    assert!(matches!(diag.poll(), Poll::Fired(_)));

    assert_eq!(
        diag.reporter()
            .count(|e| matches!(e, DiagEvent::LateFire { .. })),
        1
    );
}
