#![doc = "Driving loops for the relay and access-point bench diagnostics."]

pub mod access_point;
pub mod relay;
pub mod report;
pub mod runner;

pub use access_point::AccessPointDiagnostic;
pub use relay::RelayDiagnostic;
pub use report::*;
pub use runner::{Diagnostic, FireOutcome, Poll, RunSummary, Runner};
