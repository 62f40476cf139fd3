//! Configuration-driven acceptance tests.
//!
//! # Acceptance Criteria
//!
//! - A bench TOML file configures both diagnostics
//! - Invalid values are rejected before any hardware is touched

use super::common::{client_counts, sim_access_point, sim_relay};
use diag_common::config::{ConfigError, DiagConfig, RelayPolarity};
use diag_hal::wireless::SimulatedAccessPoint;
use diag_runtime::Runner;
use std::io::Write;
use std::time::Duration;

const BENCH_TOML: &str = r#"
[relay]
interval = "1s"
milestone_every = 5
idle_sleep = "20ms"
polarity = "active_low"
pin = 4

[access_point]
ssid = "Greenhouse-Bench"
password = "filament-42"
interval = "2s"
milestone_every = 2
simulated_clients = [0, 1, 3, 3]
"#;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_bench_file_drives_both_diagnostics() {
    let file = write_config(BENCH_TOML);
    let config = DiagConfig::from_file(file.path()).unwrap();

    assert_eq!(config.relay.interval, Duration::from_secs(1));
    assert_eq!(config.relay.polarity, RelayPolarity::ActiveLow);

    let (mut clock, mut relay) = sim_relay(&config.relay, 0);
    let summary = Runner::new(config.relay.idle_sleep)
        .max_fires(10)
        .run(&mut relay, &mut clock);
    assert_eq!(summary.milestones, 2);
    assert_eq!(summary.iterations, 1 + 9 * 50);
    assert_eq!(relay.output().inner().pin(), 4);

    let ap = &config.access_point;
    let radio = SimulatedAccessPoint::new(ap.simulated_clients.iter().copied());
    let (mut clock, mut diag) = sim_access_point(ap, radio, 0);
    let summary = Runner::new(ap.idle_sleep)
        .max_fires(4)
        .run(&mut diag, &mut clock);

    assert_eq!(client_counts(diag.reporter().events()), vec![0, 1, 3, 3]);
    assert_eq!(summary.transitions, 2);
    assert_eq!(summary.milestones, 2);
}

#[test]
fn test_bench_file_rejects_short_password() {
    let file = write_config("[access_point]\npassword = \"abc\"\n");
    let err = DiagConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
}

#[test]
fn test_bench_file_rejects_zero_milestone() {
    let file = write_config("[relay]\nmilestone_every = 0\n");
    assert!(DiagConfig::from_file(file.path()).is_err());
}
