//! Acceptance tests for the bench diagnostics.
//!
//! These tests drive both diagnostics end to end with simulated clocks,
//! pins and radios:
//! - Relay toggle cadence, polarity and progress summaries
//! - Access point bring-up, client transitions and failure policy
//! - Clock wraparound and stall behavior of the driving loop

mod acceptance;
