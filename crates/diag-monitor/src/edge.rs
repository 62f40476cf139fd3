//! Edge detection on sampled signals.
//!
//! - [`ChangeDetector`] - reports any change between consecutive samples
//! - [`Direction`] - classifies a change of an ordered signal as rising or falling
//!
//! Unlike a boolean R_TRIG, whose memory starts at FALSE, the detector starts
//! in an "unknown" state so that the first sample is never reported as a
//! transition, whatever its value.

use serde::{Deserialize, Serialize};

/// Change detector with an "unknown" initial sample.
///
/// # Example
///
/// ```
/// use diag_monitor::edge::ChangeDetector;
///
/// let mut detector = ChangeDetector::new();
///
/// // First sample - nothing to compare against
/// assert!(!detector.call(true));
///
/// // Same value - no change
/// assert!(!detector.call(true));
///
/// // Different value - change detected
/// assert!(detector.call(false));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeDetector<S> {
    /// Previous sample; `None` until the first sample arrives.
    last: Option<S>,
}

impl<S> Default for ChangeDetector<S> {
    fn default() -> Self {
        Self { last: None }
    }
}

impl<S: PartialEq + Clone> ChangeDetector<S> {
    /// Create a detector with no previous sample.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one sample.
    ///
    /// # Returns
    ///
    /// `true` if a previous sample exists and differs from `value`.
    pub fn call(&mut self, value: S) -> bool {
        let changed = self.last.as_ref().is_some_and(|last| *last != value);
        self.last = Some(value);
        changed
    }

    /// Get the previous sample (for diagnostics).
    #[must_use]
    pub fn previous(&self) -> Option<&S> {
        self.last.as_ref()
    }

    /// Forget the previous sample.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Direction of a change in an ordered signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Value increased.
    Rising,
    /// Value decreased.
    Falling,
    /// Value unchanged, or no previous value.
    Steady,
}

impl Direction {
    /// Classify the move from `previous` to `current`.
    #[must_use]
    pub fn between<S: PartialOrd>(previous: Option<&S>, current: &S) -> Self {
        match previous {
            Some(prev) if current > prev => Self::Rising,
            Some(prev) if current < prev => Self::Falling,
            _ => Self::Steady,
        }
    }
}
