//! Common utilities for acceptance tests.
//!
//! Provides helpers for:
//! - Building diagnostics wired to simulated collaborators
//! - Extracting event sequences from a recording reporter

#![allow(dead_code)] // Not every helper is used by every test module

use diag_common::config::{AccessPointConfig, RelayConfig};
use diag_hal::clock::SimulatedClock;
use diag_hal::output::SimulatedOutput;
use diag_hal::wireless::SimulatedAccessPoint;
use diag_runtime::{AccessPointDiagnostic, DiagEvent, RecordingReporter, RelayDiagnostic};

/// Relay diagnostic on a simulated 32-bit millisecond clock.
pub type SimRelay = RelayDiagnostic<SimulatedClock<u32>, SimulatedOutput, RecordingReporter>;

/// Access point diagnostic on a simulated 32-bit millisecond clock.
pub type SimAccessPoint =
    AccessPointDiagnostic<SimulatedClock<u32>, SimulatedAccessPoint, RecordingReporter>;

/// Build a relay diagnostic whose clock starts at `start`.
pub fn sim_relay(config: &RelayConfig, start: u32) -> (SimulatedClock<u32>, SimRelay) {
    let clock = SimulatedClock::new(start);
    let diag = RelayDiagnostic::new(
        clock.clone(),
        SimulatedOutput::new(config.pin),
        config,
        RecordingReporter::new(),
    )
    .expect("valid relay config");
    (clock, diag)
}

/// Build an access point diagnostic whose clock starts at `start`.
pub fn sim_access_point(
    config: &AccessPointConfig,
    radio: SimulatedAccessPoint,
    start: u32,
) -> (SimulatedClock<u32>, SimAccessPoint) {
    let clock = SimulatedClock::new(start);
    let diag = AccessPointDiagnostic::new(clock.clone(), radio, config, RecordingReporter::new())
        .expect("valid access point config");
    (clock, diag)
}

/// Cycle counts of every relay progress summary.
pub fn relay_progress(events: &[DiagEvent]) -> Vec<u64> {
    events
        .iter()
        .filter_map(|e| match e {
            DiagEvent::RelayProgress { cycle_count } => Some(*cycle_count),
            _ => None,
        })
        .collect()
}

/// `(uptime_secs, on)` of every relay toggle.
pub fn relay_toggles(events: &[DiagEvent]) -> Vec<(u64, bool)> {
    events
        .iter()
        .filter_map(|e| match e {
            DiagEvent::RelaySwitched {
                uptime_secs, on, ..
            } => Some((*uptime_secs, *on)),
            _ => None,
        })
        .collect()
}

/// Client counts of every access point poll.
pub fn client_counts(events: &[DiagEvent]) -> Vec<u32> {
    events
        .iter()
        .filter_map(|e| match e {
            DiagEvent::ClientCount { clients, .. } => Some(*clients),
            _ => None,
        })
        .collect()
}
