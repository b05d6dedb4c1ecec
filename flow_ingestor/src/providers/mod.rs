//! Provider abstraction for the two upstream collaborators.
//!
//! - [`FlowDataProvider`]: retail flow and options premium, keyed by raw
//!   source key and date.
//! - [`PriceProvider`]: daily closing prices for one ticker.
//!
//! Both traits are async and object safe, so a runner can hold either a
//! concrete HTTP provider or an in-memory one in tests.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use flow_ingestor::models::request_params::{FlowRequestParams, OptionsRequestParams};
//! use flow_ingestor::providers::{FlowDataProvider, ProviderError};
//! use flow_signals::models::NamedSeries;
//!
//! struct Nothing;
//!
//! #[async_trait]
//! impl FlowDataProvider for Nothing {
//!     async fn fetch_retail(&self, _p: FlowRequestParams) -> Result<NamedSeries, ProviderError> {
//!         Ok(NamedSeries::new())
//!     }
//!     async fn fetch_options(&self, _p: OptionsRequestParams) -> Result<NamedSeries, ProviderError> {
//!         Ok(NamedSeries::new())
//!     }
//! }
//! ```

pub mod vandatrack;
pub mod yahoo;

use async_trait::async_trait;
use flow_signals::models::{DateSeries, NamedSeries};
use shared_utils::env::MissingEnvVarError;
use snafu::{Backtrace, Snafu};

use crate::models::request_params::{FlowRequestParams, OptionsRequestParams, PriceRequestParams};

/// Source of retail flow and options premium series.
#[async_trait]
pub trait FlowDataProvider: Send + Sync {
    /// Retail flow for one ticker, `raw key -> date -> value`.
    async fn fetch_retail(&self, params: FlowRequestParams) -> Result<NamedSeries, ProviderError>;

    /// Options premium for a ticker list, one side and one size bucket.
    async fn fetch_options(&self, params: OptionsRequestParams) -> Result<NamedSeries, ProviderError>;
}

/// Source of daily closing prices.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Date-ordered closes over the inclusive range.
    async fn fetch_closes(&self, params: PriceRequestParams) -> Result<DateSeries, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// The API token variable is unset or blank.
    #[snafu(display("Missing environment variable: {source}"), context(false))]
    MissingEnvVar {
        source: MissingEnvVarError,
        backtrace: Backtrace,
    },

    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"), context(false))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a provider implementation.
///
/// These never reach the analysis core: the fetch boundary turns them into
/// empty results and records the failure.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// Network failure or timeout.
    #[snafu(display("API request failed: {source}"), context(false))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// Non-success status or an error payload from the API.
    #[snafu(display("API error ({status}): {message}"))]
    Api {
        status: u16,
        message: String,
        backtrace: Backtrace,
    },

    /// The body was not the JSON shape we expect.
    #[snafu(display("Failed to decode response: {source}"))]
    Decode {
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// The request parameters were invalid for this provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },

    /// An error during provider configuration or initialization.
    #[snafu(display("Provider initialization error: {source}"), context(false))]
    Init {
        #[snafu(backtrace)]
        source: ProviderInitError,
    },
}
