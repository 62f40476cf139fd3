//! Diagnostic events and the sinks that surface them.
//!
//! The driving loops never format text themselves; they hand a [`DiagEvent`]
//! to a [`Reporter`]. Three sinks are provided:
//! - [`TracingReporter`] - human-readable lines through `tracing`
//! - [`JsonReporter`] - one JSON object per line on any writer
//! - [`RecordingReporter`] - keeps events in memory for tests

use diag_common::config::RelayPolarity;
use diag_hal::wireless::{ChipInfo, MacAddress};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::net::Ipv4Addr;
use tracing::{info, warn};

/// Which bench diagnostic produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Relay-toggle diagnostic.
    Relay,
    /// Soft access-point diagnostic.
    AccessPoint,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Relay => write!(f, "relay"),
            DiagnosticKind::AccessPoint => write!(f, "access_point"),
        }
    }
}

/// Event emitted by a driving loop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DiagEvent {
    /// Setup finished; polling begins.
    Started {
        /// Diagnostic kind.
        diagnostic: DiagnosticKind,
        /// Polling interval in milliseconds.
        interval_ms: u64,
        /// Milestone period in fires.
        milestone_every: u32,
    },

    /// Relay pin driven to its initial OFF state.
    RelayInitialized {
        /// GPIO number.
        pin: u8,
        /// Module polarity.
        polarity: RelayPolarity,
    },

    /// Relay toggled.
    RelaySwitched {
        /// Clock reading in whole seconds.
        uptime_secs: u64,
        /// Logical relay state after the toggle.
        on: bool,
        /// Electrical level written (`true` = HIGH).
        level_high: bool,
        /// Fires so far.
        cycle_count: u64,
        /// State differs from the previous fire.
        changed: bool,
    },

    /// Relay progress summary.
    RelayProgress {
        /// Toggles completed.
        cycle_count: u64,
    },

    /// Chip identification.
    ChipIdentified(ChipInfo),

    /// Soft access point is broadcasting.
    AccessPointReady {
        /// Network name.
        ssid: String,
        /// Gateway address.
        address: Ipv4Addr,
        /// Access-point interface hardware address.
        mac: MacAddress,
    },

    /// Radio refused to start the access point.
    AccessPointFailed {
        /// Network name requested.
        ssid: String,
        /// Failure description.
        error: String,
    },

    /// Client count sampled.
    ClientCount {
        /// Clock reading in whole seconds.
        uptime_secs: u64,
        /// Stations associated.
        clients: u32,
        /// Fires so far.
        cycle_count: u64,
    },

    /// Client count rose.
    ClientConnected {
        /// Stations associated now.
        clients: u32,
        /// Stations associated at the previous fire.
        previous: u32,
    },

    /// Client count fell.
    ClientDisconnected {
        /// Stations associated now.
        clients: u32,
        /// Stations associated at the previous fire.
        previous: u32,
    },

    /// Access-point status summary.
    AccessPointSummary {
        /// Fires so far.
        cycle_count: u64,
        /// Network name.
        ssid: String,
        /// Gateway address.
        address: Ipv4Addr,
        /// Stations associated.
        clients: u32,
        /// Whether the access point came up during setup.
        access_point_up: bool,
    },

    /// A fire arrived more than two intervals after the previous one.
    LateFire {
        /// Diagnostic kind.
        diagnostic: DiagnosticKind,
        /// Milliseconds since the previous fire.
        elapsed_ms: u64,
        /// Configured interval in milliseconds.
        interval_ms: u64,
    },
}

/// Sink for diagnostic events.
pub trait Reporter {
    /// Surface one event.
    fn report(&mut self, event: &DiagEvent);
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn report(&mut self, event: &DiagEvent) {
        (**self).report(event);
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, event: &DiagEvent) {
        (**self).report(event);
    }
}

/// Writes events as human-readable log lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, event: &DiagEvent) {
        match event {
            DiagEvent::Started {
                diagnostic,
                interval_ms,
                milestone_every,
            } => info!(
                %diagnostic,
                interval_ms,
                milestone_every,
                "Diagnostic started"
            ),
            DiagEvent::RelayInitialized { pin, polarity } => info!(
                pin,
                ?polarity,
                "Relay pin initialized OFF; do not connect mains load while testing"
            ),
            DiagEvent::RelaySwitched {
                uptime_secs,
                on,
                level_high,
                cycle_count,
                ..
            } => info!(
                "{}s | {} ({}) | cycle {} | should hear CLICK",
                uptime_secs,
                if *on { "ON " } else { "OFF" },
                if *level_high { "HIGH" } else { "LOW" },
                cycle_count
            ),
            DiagEvent::RelayProgress { cycle_count } => info!(
                cycles = cycle_count,
                "Test progress: check relay LED changes state, audible click, contacts switch"
            ),
            DiagEvent::ChipIdentified(chip) => info!(
                chip_id = format_args!("{:X}", chip.chip_id),
                flash_chip_id = format_args!("{:X}", chip.flash_chip_id),
                flash_size = chip.flash_size,
                mac = %chip.mac,
                "Chip identified"
            ),
            DiagEvent::AccessPointReady { ssid, address, mac } => info!(
                %ssid,
                %address,
                %mac,
                "Access point created; connect and browse to http://{}",
                address
            ),
            DiagEvent::AccessPointFailed { ssid, error } => warn!(
                %ssid,
                %error,
                "Failed to create access point; try another SSID, a password of at least 8 characters, a reset, or a better power supply"
            ),
            DiagEvent::ClientCount {
                uptime_secs,
                clients,
                cycle_count,
            } => info!(uptime_secs, clients, cycle = cycle_count, "Access point status"),
            DiagEvent::ClientConnected { clients, previous } => {
                info!(clients, previous, "New client connected");
            }
            DiagEvent::ClientDisconnected { clients, previous } => {
                info!(clients, previous, "Client disconnected");
            }
            DiagEvent::AccessPointSummary {
                cycle_count,
                ssid,
                address,
                clients,
                access_point_up,
            } => info!(
                cycles = cycle_count,
                %ssid,
                %address,
                clients,
                access_point_up,
                "Network summary"
            ),
            DiagEvent::LateFire {
                diagnostic,
                elapsed_ms,
                interval_ms,
            } => warn!(
                %diagnostic,
                elapsed_ms,
                interval_ms,
                "Poll loop stalled; firing once without catching up"
            ),
        }
    }
}

/// Writes events as newline-delimited JSON.
#[derive(Debug)]
pub struct JsonReporter<W: Write> {
    writer: W,
}

impl<W: Write> JsonReporter<W> {
    /// Create a reporter writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, event: &DiagEvent) {
        let result = serde_json::to_writer(&mut self.writer, event)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"))
            .and_then(|()| self.writer.flush());
        if let Err(e) = result {
            warn!(error = %e, "Failed to write JSON report");
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    events: Vec<DiagEvent>,
}

impl RecordingReporter {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events, oldest first.
    pub fn events(&self) -> &[DiagEvent] {
        &self.events
    }

    /// Number of events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&DiagEvent) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(e)).count()
    }

    /// Drop recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Reporter for RecordingReporter {
    fn report(&mut self, event: &DiagEvent) {
        self.events.push(event.clone());
    }
}
