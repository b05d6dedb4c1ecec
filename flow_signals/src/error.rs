//! Contract violations raised by the engine.
//!
//! Missing data and degenerate statistics are never errors here: a ticker with
//! no matching keys becomes an empty series, and zero variance resolves to a
//! fixed fallback value inside [`crate::stats`].

use chrono::NaiveDate;
use thiserror::Error;

/// Errors for calls that break the engine's input contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    /// An analysis was requested for zero tickers.
    #[error("ticker list is empty")]
    EmptyTickerList,

    /// The requested range ends before it starts.
    #[error("invalid date range: to_date {to} is before from_date {from}")]
    InvalidDateRange {
        /// Inclusive start of the range.
        from: NaiveDate,
        /// Inclusive end of the range.
        to: NaiveDate,
    },

    /// A rolling window must cover at least one observation.
    #[error("invalid z-score window: {0}")]
    InvalidWindow(usize),

    /// A date string could not be parsed as `YYYY-MM-DD`.
    #[error("invalid date: {0}")]
    InvalidDate(String),
}
