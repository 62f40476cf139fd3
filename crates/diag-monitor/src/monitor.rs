//! Periodic monitor driven by a free-running clock.
//!
//! The caller's loop invokes [`PeriodicMonitor::tick`] as often as it likes
//! with the current clock reading. The monitor decides whether the interval
//! has elapsed and, if so, samples the observed signal, detects a transition
//! against the previous sample, counts the cycle and flags milestones.
//!
//! # Timing Rules
//!
//! - Elapsed time is `now.wrapping_sub(last_fire)` in the clock's own width,
//!   so a wrap of the counter past its maximum still yields the small
//!   positive elapsed value.
//! - Each fire rebases on the actual fire time (`last_fire = now`), so after
//!   a stall exactly one fire occurs; missed intervals are not made up.
//! - A monitor that has never fired fires on its first tick, unless it was
//!   [armed](PeriodicMonitor::arm) first.

use crate::counter::CycleCounter;
use crate::edge::ChangeDetector;
use diag_common::error::{DiagError, DiagResult};
use diag_common::time::{millis_of, Timestamp};
use std::time::Duration;
use tracing::trace;

/// Outcome of a single [`PeriodicMonitor::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickResult<T, S> {
    /// Interval has not elapsed; nothing was sampled.
    Idle,
    /// Interval elapsed and the signal was sampled.
    Fired {
        /// Signal differs from the previous sample (never true on the first fire).
        changed: bool,
        /// Fires counted so far, including this one.
        cycle_count: u64,
        /// `cycle_count` is a multiple of the milestone period.
        milestone_due: bool,
        /// Sampled signal value.
        signal: S,
        /// Previous sample, `None` on the first fire.
        previous: Option<S>,
        /// Ticks since the previous fire, `None` on the first fire.
        elapsed: Option<T>,
    },
}

impl<T, S> TickResult<T, S> {
    /// Whether this tick fired.
    #[must_use]
    pub fn is_fired(&self) -> bool {
        matches!(self, Self::Fired { .. })
    }

    /// Whether this tick fired and detected a transition.
    #[must_use]
    pub fn changed(&self) -> bool {
        matches!(self, Self::Fired { changed: true, .. })
    }

    /// Whether this tick fired on a milestone.
    #[must_use]
    pub fn milestone_due(&self) -> bool {
        matches!(
            self,
            Self::Fired {
                milestone_due: true,
                ..
            }
        )
    }
}

/// Fixed-interval polling primitive with edge detection and milestone cadence.
///
/// `T` is the clock's timestamp type, `S` the sampled signal type.
///
/// # Example
///
/// ```
/// use diag_monitor::{PeriodicMonitor, TickResult};
///
/// // 8-bit clock wrapping at 255
/// let mut monitor = PeriodicMonitor::<u8, u32>::new(20, 10).unwrap();
///
/// assert!(monitor.tick(250, || 0).is_fired());
/// // (10 - 250) mod 256 = 16 < 20
/// assert_eq!(monitor.tick(10, || 0), TickResult::Idle);
/// // (20 - 250) mod 256 = 26 >= 20
/// assert!(monitor.tick(20, || 0).is_fired());
/// ```
#[derive(Debug, Clone)]
pub struct PeriodicMonitor<T, S> {
    /// Minimum ticks between fires.
    interval: T,
    /// Clock reading at the last fire; `None` until the first fire.
    last_fire: Option<T>,
    /// Fire counter and milestone cadence.
    counter: CycleCounter,
    /// Transition detection on the sampled signal.
    detector: ChangeDetector<S>,
}

impl<T: Timestamp, S: PartialEq + Clone> PeriodicMonitor<T, S> {
    /// Create a monitor firing every `interval` ticks with a milestone every
    /// `milestone_every` fires.
    ///
    /// # Errors
    ///
    /// Returns [`DiagError::Config`] if `interval` or `milestone_every` is zero.
    pub fn new(interval: T, milestone_every: u32) -> DiagResult<Self> {
        if interval == T::ZERO {
            return Err(DiagError::Config(
                "monitor interval must be greater than zero".into(),
            ));
        }
        Ok(Self {
            interval,
            last_fire: None,
            counter: CycleCounter::new(milestone_every)?,
            detector: ChangeDetector::new(),
        })
    }

    /// Create a monitor for a millisecond clock from a [`Duration`].
    ///
    /// Sub-millisecond remainders are truncated.
    ///
    /// # Errors
    ///
    /// Returns [`DiagError::Clock`] if the interval does not fit in `T`, or
    /// [`DiagError::Config`] if it truncates to zero or `milestone_every` is zero.
    pub fn from_duration(interval: Duration, milestone_every: u32) -> DiagResult<Self> {
        Self::new(millis_of(interval)?, milestone_every)
    }

    /// Poll the monitor with the current clock reading.
    ///
    /// `sample` is invoked exactly once if and only if the tick fires.
    pub fn tick<F>(&mut self, now: T, sample: F) -> TickResult<T, S>
    where
        F: FnOnce() -> S,
    {
        let elapsed = self.last_fire.map(|last| now.elapsed_since(last));
        if let Some(elapsed) = elapsed {
            if elapsed < self.interval {
                return TickResult::Idle;
            }
        }

        let signal = sample();
        let previous = self.detector.previous().cloned();
        let changed = self.detector.call(signal.clone());
        let (cycle_count, milestone_due) = self.counter.advance();
        self.last_fire = Some(now);

        trace!(
            %now,
            elapsed = ?elapsed,
            cycle_count,
            changed,
            milestone_due,
            "Monitor fired"
        );

        TickResult::Fired {
            changed,
            cycle_count,
            milestone_due,
            signal,
            previous,
            elapsed,
        }
    }

    /// Whether a tick at `now` would fire, without changing state.
    #[must_use]
    pub fn is_due(&self, now: T) -> bool {
        self.last_fire
            .map_or(true, |last| now.elapsed_since(last) >= self.interval)
    }

    /// Set the baseline to `now` without firing.
    ///
    /// The next fire happens once a full interval has elapsed from `now`.
    pub fn arm(&mut self, now: T) {
        self.last_fire = Some(now);
    }

    /// Forget the baseline, the previous sample and the cycle count.
    pub fn reset(&mut self) {
        self.last_fire = None;
        self.detector.reset();
        self.counter.reset();
    }

    /// Get the configured interval.
    #[must_use]
    pub fn interval(&self) -> T {
        self.interval
    }

    /// Get the milestone period.
    #[must_use]
    pub fn milestone_every(&self) -> u32 {
        self.counter.every()
    }

    /// Get the number of fires since construction or the last reset.
    #[must_use]
    pub fn cycle_count(&self) -> u64 {
        self.counter.count()
    }

    /// Get the clock reading at the last fire.
    #[must_use]
    pub fn last_fire(&self) -> Option<T> {
        self.last_fire
    }

    /// Get the last sampled signal.
    #[must_use]
    pub fn last_signal(&self) -> Option<&S> {
        self.detector.previous()
    }
}
