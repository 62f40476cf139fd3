//! Relay-toggle diagnostic.
//!
//! Drives the relay OFF at setup, then toggles it once per interval. Every
//! toggle is reported so the operator can match it against the audible click
//! and the module's LED; every `milestone_every` toggles a progress summary
//! reminds them what to check.

use crate::report::{DiagEvent, DiagnosticKind, Reporter};
use crate::runner::{is_late, Diagnostic, FireOutcome, Poll};
use diag_common::config::RelayConfig;
use diag_common::error::DiagResult;
use diag_common::time::Timestamp;
use diag_hal::clock::Clock;
use diag_hal::output::{DigitalOutputDriver, PolarityOutput};
use diag_monitor::{PeriodicMonitor, TickResult};
use tracing::{debug, info};

/// Relay-toggle bench check.
pub struct RelayDiagnostic<C: Clock, O, R> {
    clock: C,
    output: PolarityOutput<O>,
    reporter: R,
    monitor: PeriodicMonitor<C::Timestamp, bool>,
    pin: u8,
    relay_on: bool,
}

impl<C, O, R> RelayDiagnostic<C, O, R>
where
    C: Clock,
    O: DigitalOutputDriver,
    R: Reporter,
{
    /// Create the diagnostic for the relay wired to `pin`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured interval or milestone period is
    /// zero, or the interval does not fit in the clock's timestamp type.
    pub fn new(clock: C, pin: O, config: &RelayConfig, reporter: R) -> DiagResult<Self> {
        config.validate()?;
        let monitor = PeriodicMonitor::from_duration(config.interval, config.milestone_every)?;

        Ok(Self {
            clock,
            output: PolarityOutput::new(pin, config.polarity),
            reporter,
            monitor,
            pin: config.pin,
            relay_on: false,
        })
    }

    /// Logical relay state last commanded.
    pub fn relay_on(&self) -> bool {
        self.relay_on
    }

    /// Borrow the output driver.
    pub fn output(&self) -> &PolarityOutput<O> {
        &self.output
    }

    /// Borrow the reporter.
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Borrow the monitor.
    pub fn monitor(&self) -> &PeriodicMonitor<C::Timestamp, bool> {
        &self.monitor
    }
}

impl<C, O, R> Diagnostic for RelayDiagnostic<C, O, R>
where
    C: Clock,
    O: DigitalOutputDriver,
    R: Reporter,
{
    fn setup(&mut self) {
        self.relay_on = false;
        self.output.set_state(false);
        info!(pin = self.pin, polarity = ?self.output.polarity(), "Relay driven OFF");

        self.reporter.report(&DiagEvent::RelayInitialized {
            pin: self.pin,
            polarity: self.output.polarity(),
        });
        self.reporter.report(&DiagEvent::Started {
            diagnostic: DiagnosticKind::Relay,
            interval_ms: self.monitor.interval().as_u64(),
            milestone_every: self.monitor.milestone_every(),
        });
    }

    fn poll(&mut self) -> Poll {
        let now = self.clock.now();
        let next = !self.relay_on;

        let TickResult::Fired {
            changed,
            cycle_count,
            milestone_due,
            signal,
            elapsed,
            ..
        } = self.monitor.tick(now, || next)
        else {
            return Poll::Idle;
        };

        self.relay_on = signal;
        self.output.set_state(signal);
        let level_high = self.output.level().unwrap_or(signal);
        debug!(%now, on = signal, level_high, cycle = cycle_count, "Relay toggled");

        let interval = self.monitor.interval();
        let late = is_late(elapsed, interval);
        if let (true, Some(elapsed)) = (late, elapsed) {
            self.reporter.report(&DiagEvent::LateFire {
                diagnostic: DiagnosticKind::Relay,
                elapsed_ms: elapsed.as_u64(),
                interval_ms: interval.as_u64(),
            });
        }

        self.reporter.report(&DiagEvent::RelaySwitched {
            uptime_secs: now.whole_secs(),
            on: signal,
            level_high,
            cycle_count,
            changed,
        });

        if milestone_due {
            self.reporter
                .report(&DiagEvent::RelayProgress { cycle_count });
        }

        Poll::Fired(FireOutcome {
            cycle_count,
            changed,
            milestone_due,
            late,
        })
    }
}
