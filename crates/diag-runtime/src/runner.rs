//! Cooperative driving loop for a diagnostic.
//!
//! The runner repeats a simple cycle:
//! 1. Poll the diagnostic (which reads its clock and ticks its monitor)
//! 2. Record the outcome
//! 3. Idle for `idle_sleep` so the loop does not busy-spin
//!
//! There is no cancellation. With no limits configured the loop runs until
//! the process is stopped from outside, which is what a bench check needs.

use diag_common::time::Timestamp;
use diag_hal::clock::Idle;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// What a single poll did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// Interval not elapsed.
    Idle,
    /// Interval elapsed and the check ran.
    Fired(FireOutcome),
}

/// Summary of a fire, as seen by the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireOutcome {
    /// Fires so far.
    pub cycle_count: u64,
    /// Observed signal changed.
    pub changed: bool,
    /// Milestone summary emitted.
    pub milestone_due: bool,
    /// Fire arrived more than two intervals late.
    pub late: bool,
}

/// A bench check driven by [`Runner`].
pub trait Diagnostic {
    /// One-time bring-up before polling starts.
    fn setup(&mut self);

    /// Poll once; must return promptly.
    fn poll(&mut self) -> Poll;
}

/// Totals for a finished (bounded) run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Polls performed.
    pub iterations: u64,
    /// Polls that fired.
    pub fires: u64,
    /// Fires that detected a transition.
    pub transitions: u64,
    /// Fires that emitted a milestone.
    pub milestones: u64,
    /// Fires that arrived late.
    pub late_fires: u64,
}

impl RunSummary {
    fn record(&mut self, poll: Poll) {
        self.iterations += 1;
        if let Poll::Fired(outcome) = poll {
            self.fires += 1;
            self.transitions += u64::from(outcome.changed);
            self.milestones += u64::from(outcome.milestone_due);
            self.late_fires += u64::from(outcome.late);
        }
    }
}

/// Driving loop configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Runner {
    idle_sleep: Duration,
    max_fires: u64,
    max_iterations: u64,
}

impl Runner {
    /// Create an unbounded runner idling `idle_sleep` between polls.
    #[must_use]
    pub fn new(idle_sleep: Duration) -> Self {
        Self {
            idle_sleep,
            max_fires: 0,
            max_iterations: 0,
        }
    }

    /// Stop after this many fires (0 = unbounded).
    #[must_use]
    pub fn max_fires(mut self, max_fires: u64) -> Self {
        self.max_fires = max_fires;
        self
    }

    /// Stop after this many polls (0 = unbounded).
    #[must_use]
    pub fn max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Idle duration between polls.
    #[must_use]
    pub fn idle_sleep(&self) -> Duration {
        self.idle_sleep
    }

    /// Set up `diagnostic` and poll it until a limit is reached.
    ///
    /// Never returns when both limits are zero.
    pub fn run<D, I>(&self, diagnostic: &mut D, idle: &mut I) -> RunSummary
    where
        D: Diagnostic + ?Sized,
        I: Idle + ?Sized,
    {
        diagnostic.setup();
        info!(
            idle_sleep = ?self.idle_sleep,
            max_fires = self.max_fires,
            max_iterations = self.max_iterations,
            "Entering poll loop"
        );

        let mut summary = RunSummary::default();
        loop {
            if self.max_iterations > 0 && summary.iterations >= self.max_iterations {
                info!(iterations = summary.iterations, "Iteration limit reached");
                break;
            }

            let poll = diagnostic.poll();
            summary.record(poll);
            if let Poll::Fired(outcome) = poll {
                debug!(
                    cycle = outcome.cycle_count,
                    changed = outcome.changed,
                    milestone = outcome.milestone_due,
                    "Poll fired"
                );
            }

            if self.max_fires > 0 && summary.fires >= self.max_fires {
                info!(fires = summary.fires, "Fire limit reached");
                break;
            }

            idle.idle(self.idle_sleep);
        }

        info!(
            iterations = summary.iterations,
            fires = summary.fires,
            transitions = summary.transitions,
            milestones = summary.milestones,
            late_fires = summary.late_fires,
            "Poll loop finished"
        );
        summary
    }
}

/// Whether a fire `elapsed` ticks after the previous one counts as late.
pub(crate) fn is_late<T: Timestamp>(elapsed: Option<T>, interval: T) -> bool {
    elapsed.is_some_and(|e| e.as_u64() > interval.as_u64().saturating_mul(2))
}
