//! Soft access-point diagnostic.
//!
//! Reports the chip identity, asks the radio to start an access point, then
//! polls the connected-client count once per interval. A radio that refuses
//! the access point is reported once and polling continues anyway, since the
//! operator may be fixing power or wiring while the check runs.

use crate::report::{DiagEvent, DiagnosticKind, Reporter};
use crate::runner::{is_late, Diagnostic, FireOutcome, Poll};
use diag_common::config::AccessPointConfig;
use diag_common::error::{DiagError, DiagResult};
use diag_common::time::Timestamp;
use diag_hal::clock::Clock;
use diag_hal::wireless::WirelessStatusProvider;
use diag_monitor::{Direction, PeriodicMonitor, TickResult};
use tracing::{debug, info, warn};

/// Soft access-point bench check.
pub struct AccessPointDiagnostic<C: Clock, W, R> {
    clock: C,
    radio: W,
    reporter: R,
    monitor: PeriodicMonitor<C::Timestamp, u32>,
    ssid: String,
    password: String,
    access_point_up: bool,
}

impl<C, W, R> AccessPointDiagnostic<C, W, R>
where
    C: Clock,
    W: WirelessStatusProvider,
    R: Reporter,
{
    /// Create the diagnostic.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation or the interval
    /// does not fit in the clock's timestamp type.
    pub fn new(clock: C, radio: W, config: &AccessPointConfig, reporter: R) -> DiagResult<Self> {
        config.validate()?;
        let monitor = PeriodicMonitor::from_duration(config.interval, config.milestone_every)?;

        Ok(Self {
            clock,
            radio,
            reporter,
            monitor,
            ssid: config.ssid.clone(),
            password: config.password.clone(),
            access_point_up: false,
        })
    }

    /// Whether the radio accepted the access point during setup.
    pub fn access_point_up(&self) -> bool {
        self.access_point_up
    }

    /// Borrow the radio.
    pub fn radio(&self) -> &W {
        &self.radio
    }

    /// Borrow the reporter.
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Borrow the monitor.
    pub fn monitor(&self) -> &PeriodicMonitor<C::Timestamp, u32> {
        &self.monitor
    }
}

impl<C, W, R> Diagnostic for AccessPointDiagnostic<C, W, R>
where
    C: Clock,
    W: WirelessStatusProvider,
    R: Reporter,
{
    fn setup(&mut self) {
        self.reporter
            .report(&DiagEvent::ChipIdentified(self.radio.chip_info()));

        self.access_point_up = self.radio.start_access_point(&self.ssid, &self.password);
        if self.access_point_up {
            info!(ssid = %self.ssid, "Access point started");
            self.reporter.report(&DiagEvent::AccessPointReady {
                ssid: self.ssid.clone(),
                address: self.radio.ap_address(),
                mac: self.radio.ap_mac_address(),
            });
        } else {
            let error = DiagError::CollaboratorUnavailable(format!(
                "radio refused to start access point {:?}",
                self.ssid
            ));
            warn!(%error, "Continuing to poll without an access point");
            self.reporter.report(&DiagEvent::AccessPointFailed {
                ssid: self.ssid.clone(),
                error: error.to_string(),
            });
        }

        self.reporter.report(&DiagEvent::Started {
            diagnostic: DiagnosticKind::AccessPoint,
            interval_ms: self.monitor.interval().as_u64(),
            milestone_every: self.monitor.milestone_every(),
        });
    }

    fn poll(&mut self) -> Poll {
        let now = self.clock.now();
        let radio = &mut self.radio;

        let TickResult::Fired {
            changed,
            cycle_count,
            milestone_due,
            signal: clients,
            previous,
            elapsed,
        } = self.monitor.tick(now, || radio.connected_client_count())
        else {
            return Poll::Idle;
        };
        debug!(%now, clients, cycle = cycle_count, "Client count sampled");

        let interval = self.monitor.interval();
        let late = is_late(elapsed, interval);
        if let (true, Some(elapsed)) = (late, elapsed) {
            self.reporter.report(&DiagEvent::LateFire {
                diagnostic: DiagnosticKind::AccessPoint,
                elapsed_ms: elapsed.as_u64(),
                interval_ms: interval.as_u64(),
            });
        }

        self.reporter.report(&DiagEvent::ClientCount {
            uptime_secs: now.whole_secs(),
            clients,
            cycle_count,
        });

        if changed {
            if let Some(previous) = previous {
                match Direction::between(Some(&previous), &clients) {
                    Direction::Rising => self
                        .reporter
                        .report(&DiagEvent::ClientConnected { clients, previous }),
                    Direction::Falling => self
                        .reporter
                        .report(&DiagEvent::ClientDisconnected { clients, previous }),
                    Direction::Steady => {}
                }
            }
        }

        if milestone_due {
            self.reporter.report(&DiagEvent::AccessPointSummary {
                cycle_count,
                ssid: self.ssid.clone(),
                address: self.radio.ap_address(),
                clients,
                access_point_up: self.access_point_up,
            });
        }

        Poll::Fired(FireOutcome {
            cycle_count,
            changed,
            milestone_due,
            late,
        })
    }
}
