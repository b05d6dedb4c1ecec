//! Flow aggregation and signal derivation.
//!
//! Reconciles sparsely keyed per-ticker flow series (retail flow, small and
//! large options premium split call/put) into date-aligned signals and
//! computes the statistics every presentation view consumes: rolling
//! Z-scores, percentile rank, 5/21 moving-average ratio, coefficient of
//! variation and the activity / momentum classifications.
//!
//! Everything here is synchronous and free of I/O apart from
//! [`config::load_analysis_config_path`]. Fetching lives in the
//! `flow_ingestor` crate.

#![deny(missing_docs)]

pub mod classify;
pub mod combined;
pub mod comparison;
pub mod config;
pub mod error;
pub mod matcher;
pub mod models;
pub mod premium;
pub mod price;
pub mod reconcile;
pub mod report;
pub mod stats;

pub use error::FlowError;
