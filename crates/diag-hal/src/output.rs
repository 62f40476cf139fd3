//! Digital output drivers for the relay signal pin.

use diag_common::config::RelayPolarity;
use tracing::debug;

/// Digital output abstraction.
///
/// For a raw pin driver `true` means HIGH. Wrap it in a [`PolarityOutput`] to
/// drive it with logical relay on/off instead.
pub trait DigitalOutputDriver {
    /// Drive the output.
    fn set_state(&mut self, on: bool);
}

/// Maps logical relay on/off onto the electrical level of the wrapped pin.
#[derive(Debug, Clone)]
pub struct PolarityOutput<O> {
    inner: O,
    polarity: RelayPolarity,
    level: Option<bool>,
}

impl<O: DigitalOutputDriver> PolarityOutput<O> {
    /// Wrap a pin driver.
    pub fn new(inner: O, polarity: RelayPolarity) -> Self {
        Self {
            inner,
            polarity,
            level: None,
        }
    }

    /// Configured polarity.
    pub fn polarity(&self) -> RelayPolarity {
        self.polarity
    }

    /// Last electrical level written (`true` = HIGH).
    pub fn level(&self) -> Option<bool> {
        self.level
    }

    /// Borrow the wrapped pin driver.
    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<O: DigitalOutputDriver> DigitalOutputDriver for PolarityOutput<O> {
    fn set_state(&mut self, on: bool) {
        let level = self.polarity.level_for(on);
        self.level = Some(level);
        self.inner.set_state(level);
    }
}

/// Simulated output pin that records every level written.
#[derive(Debug, Clone, Default)]
pub struct SimulatedOutput {
    pin: u8,
    writes: Vec<bool>,
}

impl SimulatedOutput {
    /// Create a simulated pin.
    pub fn new(pin: u8) -> Self {
        Self {
            pin,
            writes: Vec::new(),
        }
    }

    /// Pin number.
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Current level, `None` if never written.
    pub fn level(&self) -> Option<bool> {
        self.writes.last().copied()
    }

    /// Every level written, oldest first (for testing).
    pub fn writes(&self) -> &[bool] {
        &self.writes
    }
}

impl DigitalOutputDriver for SimulatedOutput {
    fn set_state(&mut self, on: bool) {
        debug!(pin = self.pin, level = if on { "HIGH" } else { "LOW" }, "Simulated pin write");
        self.writes.push(on);
    }
}
