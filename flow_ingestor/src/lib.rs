//! Fetch collaborators and the analysis run for `flow_signals`.
//!
//! Providers talk to the upstream HTTP APIs, the fetch boundary turns their
//! failures into empty data plus a [`fetch::FetchLog`] entry, and
//! [`runner::AnalysisRunner`] drives one sequential run end to end.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod fetch;
pub mod io;
pub mod models;
pub mod providers;
pub mod runner;
pub mod throttle;
