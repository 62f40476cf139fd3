//! Access point acceptance tests.
//!
//! # Acceptance Criteria
//!
//! - Chip identity and access point details are reported at setup
//! - Client count is polled once per interval and summarized every poll
//! - Connects and disconnects are told apart
//! - A refused access point is reported once and polling continues

use super::common::{client_counts, sim_access_point};
use diag_common::config::AccessPointConfig;
use diag_hal::clock::SimulatedClock;
use diag_hal::wireless::SimulatedAccessPoint;
use diag_runtime::{AccessPointDiagnostic, DiagEvent, JsonReporter, Runner};

#[test]
fn test_access_point_bench_run() {
    let config = AccessPointConfig::default();
    let radio = SimulatedAccessPoint::new([0, 0, 1, 1, 2, 1]);
    let (mut clock, mut diag) = sim_access_point(&config, radio, 0);

    let summary = Runner::new(config.idle_sleep)
        .max_fires(6)
        .run(&mut diag, &mut clock);

    assert!(diag.access_point_up());
    assert_eq!(summary.fires, 6);
    assert_eq!(summary.transitions, 3);
    assert_eq!(summary.milestones, 6);
    // 5000 ms interval polled every 100 ms
    assert_eq!(summary.iterations, 1 + 5 * 50);

    let events = diag.reporter().events();
    assert_eq!(client_counts(events), vec![0, 0, 1, 1, 2, 1]);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, DiagEvent::ClientConnected { .. }))
            .count(),
        2
    );
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, DiagEvent::ClientDisconnected { .. }))
            .count(),
        1
    );
    assert!(events.iter().any(|e| matches!(
        e,
        DiagEvent::AccessPointReady { ssid, .. } if ssid == "ESP8266-Test"
    )));
}

#[test]
fn test_access_point_refused() {
    let config = AccessPointConfig::default();
    let radio = SimulatedAccessPoint::new([2, 2]).failing_start();
    let (mut clock, mut diag) = sim_access_point(&config, radio, 0);

    let summary = Runner::new(config.idle_sleep)
        .max_fires(3)
        .run(&mut diag, &mut clock);

    assert!(!diag.access_point_up());
    assert_eq!(summary.fires, 3);
    assert_eq!(summary.transitions, 0);

    let events = diag.reporter().events();
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, DiagEvent::AccessPointFailed { .. }))
            .count(),
        1
    );
    assert_eq!(client_counts(events), vec![0, 0, 0]);
    assert!(events.iter().all(|e| !matches!(
        e,
        DiagEvent::AccessPointSummary {
            access_point_up: true,
            ..
        }
    )));
}

#[test]
fn test_access_point_json_report() {
    let config = AccessPointConfig::default();
    let mut json = JsonReporter::new(Vec::new());
    let mut clock = SimulatedClock::<u32>::new(0);

    {
        let mut diag = AccessPointDiagnostic::new(
            clock.clone(),
            SimulatedAccessPoint::new([1]),
            &config,
            &mut json,
        )
        .unwrap();
        Runner::new(config.idle_sleep)
            .max_fires(2)
            .run(&mut diag, &mut clock);
    }

    let output = String::from_utf8(json.into_inner()).unwrap();
    let kinds: Vec<String> = output
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            value["event"].as_str().unwrap().to_owned()
        })
        .collect();

    assert_eq!(
        kinds,
        vec![
            "chip_identified",
            "access_point_ready",
            "started",
            "client_count",
            "access_point_summary",
            "client_count",
            "access_point_summary",
        ]
    );
}
