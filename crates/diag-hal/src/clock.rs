//! Free-running clocks and idle waits.
//!
//! All clocks count milliseconds in a fixed-width unsigned type and wrap at
//! its maximum, like a microcontroller `millis()` counter.

use diag_common::time::Timestamp;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of monotonic millisecond readings.
pub trait Clock {
    /// Reading type; wraps at its maximum.
    type Timestamp: Timestamp;

    /// Current reading.
    fn now(&self) -> Self::Timestamp;
}

/// Something the driving loop can wait on between polls.
pub trait Idle {
    /// Wait for roughly `duration`.
    fn idle(&mut self, duration: Duration);
}

/// Host clock: milliseconds since construction, truncated to 32 bits.
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
    offset: u32,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    /// Create a clock reading zero now.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a clock reading `offset` now.
    ///
    /// Starting close to `u32::MAX` makes the counter wrap within seconds.
    #[must_use]
    pub fn starting_at(offset: u32) -> Self {
        Self {
            start: Instant::now(),
            offset,
        }
    }
}

impl Clock for SystemClock {
    type Timestamp = u32;

    fn now(&self) -> u32 {
        let ms = u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX);
        u32::from_u64_truncating(ms).wrapping_add(self.offset)
    }
}

/// Idle by sleeping the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadIdle;

impl Idle for ThreadIdle {
    fn idle(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Manually advanced clock for tests and scripted runs.
///
/// Clones share the same reading, so one handle can be given to a diagnostic
/// as its [`Clock`] and another to the runner as its [`Idle`]: idling then
/// advances simulated time instead of sleeping.
#[derive(Debug, Clone)]
pub struct SimulatedClock<T: Timestamp> {
    now: Rc<Cell<T>>,
}

impl<T: Timestamp> SimulatedClock<T> {
    /// Create a clock reading `start`.
    #[must_use]
    pub fn new(start: T) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Set the reading.
    pub fn set(&self, now: T) {
        self.now.set(now);
    }

    /// Advance the reading by `ticks`, wrapping at the maximum.
    pub fn advance(&self, ticks: T) {
        self.now.set(self.now.get().wrapping_add(ticks));
    }

    /// Advance the reading by a duration in milliseconds, wrapping at the maximum.
    pub fn advance_by(&self, duration: Duration) {
        let ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self.advance(T::from_u64_truncating(ms));
    }
}

impl<T: Timestamp> Clock for SimulatedClock<T> {
    type Timestamp = T;

    fn now(&self) -> T {
        self.now.get()
    }
}

impl<T: Timestamp> Idle for SimulatedClock<T> {
    fn idle(&mut self, duration: Duration) {
        self.advance_by(duration);
    }
}
