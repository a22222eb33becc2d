//! VTOL CLI - command line callers of the feasibility engine.
//!
//! This crate provides the binaries:
//! - check_feasibility: evaluate one request and print the outcome as JSON
//! - feasibility_stress: run many random requests concurrently

pub mod config;
pub mod logging;
pub mod scenarios;
pub mod stress;

pub use config::Config;
pub use scenarios::{scenario_by_name, Scenario, SCENARIO_NAMES};
