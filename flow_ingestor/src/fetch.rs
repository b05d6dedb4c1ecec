//! The fetch boundary.
//!
//! Upstream failures never reach the analysis core: [`fetch_or_empty`] turns
//! an `Err` into an empty result. Unlike a bare empty mapping, the outcome of
//! every call is also recorded in a [`FetchLog`], so a report can tell
//! "the API failed" apart from "the API answered with no activity".

use std::future::Future;

use serde::Serialize;
use tracing::{debug, warn};

/// Outcome of one upstream call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchRecord {
    /// What was fetched, e.g. `retail:AAPL` or `options:small:call`.
    pub source: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Ordered outcomes of every upstream call of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FetchLog(Vec<FetchRecord>);

impl FetchLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_ok(&mut self, source: impl Into<String>) {
        self.0.push(FetchRecord {
            source: source.into(),
            ok: true,
            error: None,
        });
    }

    pub fn record_failure(&mut self, source: impl Into<String>, error: impl ToString) {
        self.0.push(FetchRecord {
            source: source.into(),
            ok: false,
            error: Some(error.to_string()),
        });
    }

    pub fn records(&self) -> &[FetchRecord] {
        &self.0
    }

    pub fn failures(&self) -> impl Iterator<Item = &FetchRecord> {
        self.0.iter().filter(|r| !r.ok)
    }

    pub fn all_ok(&self) -> bool {
        self.0.iter().all(|r| r.ok)
    }
}

/// Await `fut`, log its outcome under `source`, and yield `T::default()` on error.
pub async fn fetch_or_empty<T, E, F>(log: &mut FetchLog, source: impl Into<String>, fut: F) -> T
where
    T: Default,
    E: std::fmt::Display,
    F: Future<Output = Result<T, E>>,
{
    let source = source.into();
    match fut.await {
        Ok(value) => {
            debug!(%source, "fetch succeeded");
            log.record_ok(source);
            value
        }
        Err(e) => {
            warn!(%source, error = %e, "fetch failed, continuing with empty data");
            log.record_failure(source, e);
            T::default()
        }
    }
}
