//! Cycle counter with milestone cadence.

use diag_common::error::{DiagError, DiagResult};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Counts fires and flags every `every`-th one as a milestone.
///
/// # Example
///
/// ```
/// use diag_monitor::counter::CycleCounter;
///
/// let mut counter = CycleCounter::new(3).unwrap();
///
/// assert_eq!(counter.advance(), (1, false));
/// assert_eq!(counter.advance(), (2, false));
/// assert_eq!(counter.advance(), (3, true));
/// assert_eq!(counter.advance(), (4, false));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleCounter {
    /// Fires counted since construction or the last reset.
    count: u64,
    /// Milestone period.
    every: NonZeroU32,
}

impl CycleCounter {
    /// Create a counter that flags a milestone every `every` cycles.
    ///
    /// # Errors
    ///
    /// Returns [`DiagError::Config`] if `every` is zero.
    pub fn new(every: u32) -> DiagResult<Self> {
        let every = NonZeroU32::new(every).ok_or_else(|| {
            DiagError::Config("milestone period must be greater than zero".into())
        })?;
        Ok(Self { count: 0, every })
    }

    /// Count one cycle.
    ///
    /// # Returns
    ///
    /// A tuple of (new count, milestone due).
    pub fn advance(&mut self) -> (u64, bool) {
        self.count += 1;
        let due = self.count % u64::from(self.every.get()) == 0;
        (self.count, due)
    }

    /// Get the current count.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Get the milestone period.
    #[must_use]
    pub fn every(&self) -> u32 {
        self.every.get()
    }

    /// Reset the count to zero.
    pub fn reset(&mut self) {
        self.count = 0;
    }
}
