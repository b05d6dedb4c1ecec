//! Run configuration: the analysis itself plus fetch and filter settings.
//!
//! ```toml
//! [analysis]
//! tickers = ["AAPL", "MSFT"]
//! from_date = "2024-01-01"
//! to_date = "2024-03-31"
//! z_score_window = 21
//!
//! [fetch]
//! timeout_secs = 30
//! call_spacing_ms = 500
//! token_env = "VANDATRACK_TOKEN"
//!
//! [filters]
//! transaction_type = "combined"
//! moneyness = "OTM"
//! ```
//!
//! `[fetch]` and `[filters]` are optional; every field has a default.

use std::time::Duration;

use anyhow::{Context, bail};
use flow_signals::config::{AnalysisConfig, NormalizationReport, normalize_analysis_config};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::filters::{Moneyness, TransactionType};

pub const DEFAULT_FLOW_URL: &str = "https://www.vandatrack.com/tickers/api/";
pub const DEFAULT_OPTIONS_URL: &str = "https://www.vandatrack.com/option/api/";
pub const DEFAULT_PRICE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart/";
pub const DEFAULT_TOKEN_ENV: &str = "VANDATRACK_TOKEN";

/// Whole-run configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub fetch: FetchSettings,
    #[serde(default)]
    pub filters: FilterSettings,
}

/// Endpoints, timeout, spacing and credentials of the upstream APIs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchSettings {
    pub flow_base_url: String,
    pub options_base_url: String,
    pub price_base_url: String,
    /// Per-call timeout.
    pub timeout_secs: u64,
    /// Minimum gap between consecutive flow API calls.
    pub call_spacing_ms: u64,
    /// Name of the environment variable holding the flow API token.
    pub token_env: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            flow_base_url: DEFAULT_FLOW_URL.to_string(),
            options_base_url: DEFAULT_OPTIONS_URL.to_string(),
            price_base_url: DEFAULT_PRICE_URL.to_string(),
            timeout_secs: 30,
            call_spacing_ms: 500,
            token_env: DEFAULT_TOKEN_ENV.to_string(),
        }
    }
}

impl FetchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn call_spacing(&self) -> Duration {
        Duration::from_millis(self.call_spacing_ms)
    }
}

/// Query filters applied to every flow request of the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSettings {
    pub transaction_type: TransactionType,
    pub moneyness: Moneyness,
}

/// Parse, normalize and validate a run config from a TOML string.
pub fn load_run_config_str(toml_str: &str) -> anyhow::Result<(RunConfig, NormalizationReport)> {
    let mut cfg: RunConfig = toml::from_str(toml_str).context("failed to parse run config TOML")?;
    let report = normalize_analysis_config(&mut cfg.analysis);
    cfg.analysis.validate().context("invalid [analysis] section")?;

    if cfg.fetch.timeout_secs == 0 {
        bail!("fetch.timeout_secs must be greater than zero");
    }
    for (name, url) in [
        ("flow_base_url", &cfg.fetch.flow_base_url),
        ("options_base_url", &cfg.fetch.options_base_url),
        ("price_base_url", &cfg.fetch.price_base_url),
    ] {
        if url.trim().is_empty() {
            bail!("fetch.{name} cannot be empty");
        }
    }

    info!(
        tickers = cfg.analysis.tickers.len(),
        window = cfg.analysis.z_score_window,
        ?report,
        "loaded run config"
    );
    Ok((cfg, report))
}

/// Read a run config file from disk; see [`load_run_config_str`].
pub fn load_run_config_path(
    path: impl AsRef<std::path::Path>,
) -> anyhow::Result<(RunConfig, NormalizationReport)> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read run config {}", path.as_ref().display()))?;
    load_run_config_str(&text)
}
