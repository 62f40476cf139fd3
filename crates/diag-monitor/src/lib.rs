//! Non-blocking periodic monitor.
//!
//! This crate provides the timing/polling primitive shared by the bench
//! diagnostics:
//!
//! - **Monitor** ([`monitor`]): [`PeriodicMonitor`], fires at a fixed interval
//!   on a wraparound-safe clock
//! - **Edge detection** ([`edge`]): [`ChangeDetector`], [`Direction`]
//! - **Cycle counting** ([`counter`]): [`CycleCounter`], milestone cadence
//!
//! # Example
//!
//! ```
//! use diag_monitor::{PeriodicMonitor, TickResult};
//!
//! let mut monitor = PeriodicMonitor::<u32, bool>::new(2_000, 10).unwrap();
//!
//! // First tick fires and never reports a transition
//! let result = monitor.tick(0, || true);
//! assert!(matches!(result, TickResult::Fired { changed: false, cycle_count: 1, .. }));
//!
//! // Interval not yet elapsed
//! assert_eq!(monitor.tick(1_999, || false), TickResult::Idle);
//!
//! // Interval elapsed, signal changed
//! let result = monitor.tick(2_000, || false);
//! assert!(matches!(result, TickResult::Fired { changed: true, cycle_count: 2, .. }));
//! ```

pub mod counter;
pub mod edge;
pub mod monitor;

pub use counter::CycleCounter;
pub use edge::{ChangeDetector, Direction};
pub use monitor::{PeriodicMonitor, TickResult};
