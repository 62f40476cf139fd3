//! Relay-toggle acceptance tests.
//!
//! # Acceptance Criteria
//!
//! - Relay starts OFF and toggles once per interval
//! - Only the first toggle is not reported as a transition
//! - A progress summary appears every 10 toggles
//! - Active-LOW modules receive inverted levels

use super::common::{relay_progress, relay_toggles, sim_relay};
use diag_common::config::{RelayConfig, RelayPolarity};
use diag_runtime::{DiagEvent, Runner};

#[test]
fn test_relay_bench_run() {
    let config = RelayConfig::default();
    let (mut clock, mut diag) = sim_relay(&config, 0);

    let summary = Runner::new(config.idle_sleep)
        .max_fires(25)
        .run(&mut diag, &mut clock);

    assert_eq!(summary.fires, 25);
    assert_eq!(summary.transitions, 24);
    assert_eq!(summary.milestones, 2);
    assert_eq!(summary.late_fires, 0);
    // 2000 ms interval polled every 10 ms
    assert_eq!(summary.iterations, 1 + 24 * 200);

    let events = diag.reporter().events();
    assert_eq!(relay_progress(events), vec![10, 20]);

    let toggles = relay_toggles(events);
    assert_eq!(toggles.len(), 25);
    for (i, (secs, on)) in toggles.iter().enumerate() {
        assert_eq!(*secs, 2 * i as u64, "toggle {}", i);
        assert_eq!(*on, i % 2 == 0, "toggle {}", i);
    }

    // Setup OFF plus one write per toggle
    let writes = diag.output().inner().writes();
    assert_eq!(writes.len(), 26);
    assert!(!writes[0]);
}

#[test]
fn test_relay_three_fires() {
    let config = RelayConfig::default();
    let (mut clock, mut diag) = sim_relay(&config, 0);

    let summary = Runner::new(config.idle_sleep)
        .max_fires(3)
        .run(&mut diag, &mut clock);

    assert_eq!(diag.monitor().cycle_count(), 3);
    assert_eq!(summary.transitions, 2);
    assert_eq!(summary.milestones, 0);

    let changed: Vec<bool> = diag
        .reporter()
        .events()
        .iter()
        .filter_map(|e| match e {
            DiagEvent::RelaySwitched { changed, .. } => Some(*changed),
            _ => None,
        })
        .collect();
    assert_eq!(changed, vec![false, true, true]);
}

#[test]
fn test_relay_active_low_module() {
    let config = RelayConfig {
        polarity: RelayPolarity::ActiveLow,
        ..RelayConfig::default()
    };
    let (mut clock, mut diag) = sim_relay(&config, 0);

    Runner::new(config.idle_sleep)
        .max_fires(4)
        .run(&mut diag, &mut clock);

    // OFF, ON, OFF, ON, OFF as electrical levels of an active-LOW input
    assert_eq!(
        diag.output().inner().writes(),
        &[true, false, true, false, true]
    );
}

#[test]
fn test_relay_custom_cadence() {
    let config = RelayConfig {
        interval: std::time::Duration::from_millis(250),
        milestone_every: 3,
        ..RelayConfig::default()
    };
    let (mut clock, mut diag) = sim_relay(&config, 0);

    let summary = Runner::new(config.idle_sleep)
        .max_fires(9)
        .run(&mut diag, &mut clock);

    assert_eq!(summary.milestones, 3);
    assert_eq!(relay_progress(diag.reporter().events()), vec![3, 6, 9]);
}
