use flow_signals::FlowError;
use thiserror::Error;

use crate::{io::sink::SinkError, providers::ProviderInitError};

/// The unified error type for the `flow_ingestor` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The analysis parameters break the engine's input contract.
    #[error("Invalid analysis parameters: {0}")]
    Contract(#[from] FlowError),

    /// A provider could not be constructed (missing token, client build).
    #[error("Provider error: {0}")]
    ProviderInit(#[from] ProviderInitError),

    /// An error originating from a report sink.
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// An error related to configuration.
    #[error("Configuration error: {0:#}")]
    Config(anyhow::Error),
}
