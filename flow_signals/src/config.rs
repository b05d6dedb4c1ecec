//! Analysis configuration: parsing, normalization and validation.
//!
//! An analysis is described by a small TOML document:
//!
//! ```toml
//! tickers = ["aapl", " msft ", "AAPL"]
//! from_date = "2024-01-01"
//! to_date = "2024-03-31"
//! z_score_window = 21
//! ```
//!
//! Normalization trims and upper-cases tickers, drops blank entries and
//! de-duplicates while preserving first-occurrence order. Validation then
//! enforces the engine's input contract (see [`FlowError`]).
//!
//! Entrypoints:
//! - Parse + normalize + validate from a TOML string: [`load_analysis_config_str`]
//! - Same from a file path: [`load_analysis_config_path`]
//! - Normalization alone: [`normalize_analysis_config`]

use std::collections::HashSet;

use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use toml::from_str;
use tracing::info;

use crate::{FlowError, stats::DEFAULT_Z_SCORE_WINDOW};

fn default_window() -> usize {
    DEFAULT_Z_SCORE_WINDOW
}

/// Tickers, inclusive date range and Z-score window of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Tickers to analyze, normalized to unique upper-case symbols.
    pub tickers: Vec<String>,
    /// Inclusive range start.
    pub from_date: NaiveDate,
    /// Inclusive range end.
    pub to_date: NaiveDate,
    /// Rolling Z-score window in observations (21 or 60 in practice).
    #[serde(default = "default_window")]
    pub z_score_window: usize,
}

impl AnalysisConfig {
    /// Check the contract: at least one ticker, `to_date >= from_date`, window > 0.
    pub fn validate(&self) -> Result<(), FlowError> {
        if self.tickers.is_empty() {
            return Err(FlowError::EmptyTickerList);
        }
        if self.to_date < self.from_date {
            return Err(FlowError::InvalidDateRange {
                from: self.from_date,
                to: self.to_date,
            });
        }
        if self.z_score_window == 0 {
            return Err(FlowError::InvalidWindow(self.z_score_window));
        }
        Ok(())
    }
}

/// Summary of changes performed during normalization.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizationReport {
    /// Tickers whose spelling changed when trimming / upper-casing.
    pub tickers_rewritten: usize,
    /// Entries dropped because they were blank after trimming.
    pub blank_tickers_dropped: usize,
    /// Duplicates removed after normalization.
    pub tickers_deduped: usize,
}

/// Normalize the ticker list in place.
pub fn normalize_analysis_config(cfg: &mut AnalysisConfig) -> NormalizationReport {
    let mut report = NormalizationReport::default();
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(cfg.tickers.len());

    for raw in std::mem::take(&mut cfg.tickers) {
        let ticker = raw.trim().to_uppercase();
        if ticker.is_empty() {
            report.blank_tickers_dropped += 1;
            continue;
        }
        if ticker != raw {
            report.tickers_rewritten += 1;
        }
        if seen.insert(ticker.clone()) {
            out.push(ticker);
        } else {
            report.tickers_deduped += 1;
        }
    }

    cfg.tickers = out;
    report
}

/// Parse, normalize and validate an analysis config from a TOML string.
pub fn load_analysis_config_str(toml_str: &str) -> anyhow::Result<(AnalysisConfig, NormalizationReport)> {
    let mut cfg: AnalysisConfig = from_str(toml_str).context("failed to parse analysis config TOML")?;
    let report = normalize_analysis_config(&mut cfg);
    cfg.validate().context("invalid analysis config")?;
    info!(tickers = cfg.tickers.len(), ?report, "loaded analysis config");
    Ok((cfg, report))
}

/// Read an analysis config file from disk; see [`load_analysis_config_str`].
pub fn load_analysis_config_path(
    path: impl AsRef<std::path::Path>,
) -> anyhow::Result<(AnalysisConfig, NormalizationReport)> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read analysis config {}", path.as_ref().display()))?;
    load_analysis_config_str(&text)
}
