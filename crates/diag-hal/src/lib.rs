//! Collaborator interfaces for the bench diagnostics.
//!
//! This crate provides:
//! - [`Clock`] and [`Idle`] for free-running millisecond time and idle waits
//! - [`DigitalOutputDriver`] for the relay signal pin, with [`PolarityOutput`]
//!   mapping logical on/off to the module's electrical polarity
//! - [`WirelessStatusProvider`] for soft access-point bring-up and client counts
//!
//! Each interface has a simulated implementation so the diagnostics can run
//! on a host and under test without hardware.

pub mod clock;
pub mod output;
pub mod wireless;

pub use clock::*;
pub use output::*;
pub use wireless::*;
