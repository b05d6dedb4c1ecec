//! Closing-price change over one week / one month, and the per-run price cache.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::models::DateSeries;

/// Trading days back for the one-week reference close (6th from last).
const ONE_WEEK_BACK: usize = 6;
/// Trading days back for the one-month reference close (22nd from last).
const ONE_MONTH_BACK: usize = 22;

/// Percent change of the latest close against earlier closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PriceChange {
    /// Latest vs. 6th-from-last close, `None` when unavailable.
    pub one_week_pct: Option<f64>,
    /// Latest vs. 22nd-from-last close, `None` when unavailable.
    pub one_month_pct: Option<f64>,
}

impl PriceChange {
    /// Compute from date-ordered closes.
    pub fn from_closes(closes: &DateSeries) -> Self {
        let prices = closes.values();
        if prices.len() < 2 {
            return Self::default();
        }
        Self {
            one_week_pct: pct_change_back(&prices, ONE_WEEK_BACK),
            one_month_pct: pct_change_back(&prices, ONE_MONTH_BACK),
        }
    }

    /// True when neither horizon could be computed.
    pub fn is_empty(&self) -> bool {
        self.one_week_pct.is_none() && self.one_month_pct.is_none()
    }
}

fn pct_change_back(prices: &[f64], back: usize) -> Option<f64> {
    let latest = *prices.last()?;
    let reference = *prices.get(prices.len().checked_sub(back)?)?;
    if reference == 0.0 {
        return None;
    }
    Some((latest - reference) / reference * 100.0)
}

/// Cache key: ticker and the inclusive date range fetched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PriceKey {
    /// Upper-cased ticker.
    pub ticker: String,
    /// Range start.
    pub from: NaiveDate,
    /// Range end.
    pub to: NaiveDate,
}

impl PriceKey {
    /// Key for `ticker` over `from..=to`.
    pub fn new(ticker: &str, from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            ticker: ticker.to_uppercase(),
            from,
            to,
        }
    }
}

/// Close prices looked up during one analysis run.
///
/// Write-once: the first non-empty entry for a key wins and is never replaced
/// or evicted. Empty results are not cached so a later call can retry.
#[derive(Debug, Default)]
pub struct PriceCache {
    entries: HashMap<PriceKey, DateSeries>,
}

impl PriceCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached closes for `key`.
    pub fn get(&self, key: &PriceKey) -> Option<&DateSeries> {
        self.entries.get(key)
    }

    /// Store `closes` under `key` unless empty or already present.
    ///
    /// Returns true if the entry was stored.
    pub fn insert(&mut self, key: PriceKey, closes: DateSeries) -> bool {
        if closes.is_empty() || self.entries.contains_key(&key) {
            return false;
        }
        debug!(ticker = %key.ticker, points = closes.len(), "cached closes");
        self.entries.insert(key, closes);
        true
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
