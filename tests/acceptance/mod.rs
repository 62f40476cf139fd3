//! End-to-end acceptance tests for the bench diagnostics.

mod access_point_test;
mod common;
mod config_test;
mod relay_test;
mod wraparound_test;
