use std::path::PathBuf;

use async_trait::async_trait;
use snafu::{Backtrace, ResultExt, Snafu};
use tokio::io::AsyncWriteExt;

use crate::runner::RunOutput;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// The run output could not be serialized.
    #[snafu(display("Data conversion error: {source}"))]
    Conversion {
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// A generic I/O error.
    #[snafu(display("I/O error writing {}: {source}", path.display()))]
    Io {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },
}

#[async_trait]
pub trait ReportSink {
    /// The type of output returned after a successful write operation.
    ///
    /// A file sink returns the path it wrote; a stream sink returns nothing.
    type Output;

    /// Writes one run's report and fetch log to the destination.
    async fn write(&self, output: &RunOutput) -> Result<Self::Output, SinkError>;
}

/// Pretty JSON written to a file, replacing any previous content.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReportSink for JsonFileSink {
    type Output = PathBuf;

    async fn write(&self, output: &RunOutput) -> Result<PathBuf, SinkError> {
        let json = serde_json::to_vec_pretty(output).context(ConversionSnafu)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .context(IoSnafu { path: parent })?;
        }
        tokio::fs::write(&self.path, json)
            .await
            .context(IoSnafu { path: &self.path })?;
        Ok(self.path.clone())
    }
}

/// Pretty JSON written to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

#[async_trait]
impl ReportSink for StdoutSink {
    type Output = ();

    async fn write(&self, output: &RunOutput) -> Result<(), SinkError> {
        let mut json = serde_json::to_vec_pretty(output).context(ConversionSnafu)?;
        json.push(b'\n');
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(&json)
            .await
            .context(IoSnafu { path: "<stdout>" })?;
        stdout.flush().await.context(IoSnafu { path: "<stdout>" })
    }
}
