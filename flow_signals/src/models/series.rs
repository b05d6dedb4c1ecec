//! Typed replacements for the `ticker -> date -> value` dictionaries returned
//! by every upstream fetch.
//!
//! - [`DateSeries`] is one sparse per-date series, always iterated in date order.
//! - [`NamedSeries`] maps raw source keys (which may be composite, e.g.
//!   `"OTM_small_AAPL"`) to their [`DateSeries`]. Keys keep insertion order so
//!   reconciliation over them is deterministic.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{error::FlowError, models::records::FlowPoint};

/// Parse the date part of an upstream date string.
///
/// Upstream keys are ISO dates, occasionally with a time suffix
/// (`2024-01-02T00:00:00`); only the leading `YYYY-MM-DD` is used.
pub fn parse_iso_date(raw: &str) -> Result<NaiveDate, FlowError> {
    let trimmed = raw.trim();
    let head = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").map_err(|_| FlowError::InvalidDate(raw.to_string()))
}

/// A sparse, date-ordered series of signed values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateSeries(BTreeMap<NaiveDate, f64>);

impl DateSeries {
    /// Empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` to the entry for `date`, treating an absent date as zero.
    pub fn add(&mut self, date: NaiveDate, value: f64) {
        *self.0.entry(date).or_insert(0.0) += value;
    }

    /// Value on `date`, if present.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.0.get(&date).copied()
    }

    /// Value on `date`, zero when absent.
    pub fn get_or_zero(&self, date: NaiveDate) -> f64 {
        self.get(date).unwrap_or(0.0)
    }

    /// Number of dates present.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no date is present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.keys().copied()
    }

    /// Values in date order.
    pub fn values(&self) -> Vec<f64> {
        self.0.values().copied().collect()
    }

    /// `(date, value)` pairs in date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.0.iter().map(|(d, v)| (*d, *v))
    }

    /// Sum of all values.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Convert to date-ordered [`FlowPoint`]s for `ticker`.
    pub fn to_points(&self, ticker: &str) -> Vec<FlowPoint> {
        self.iter()
            .map(|(date, value)| FlowPoint {
                date,
                ticker: ticker.to_string(),
                value,
            })
            .collect()
    }
}

impl FromIterator<(NaiveDate, f64)> for DateSeries {
    /// Collects by accumulation: repeated dates are summed.
    fn from_iter<I: IntoIterator<Item = (NaiveDate, f64)>>(iter: I) -> Self {
        let mut out = DateSeries::new();
        for (date, value) in iter {
            out.add(date, value);
        }
        out
    }
}

/// Raw source key -> per-date values, as returned by an upstream fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamedSeries(IndexMap<String, DateSeries>);

/// Result of building a [`NamedSeries`] from raw string-dated input.
#[derive(Debug, Default)]
pub struct RawConversion {
    /// The converted series.
    pub series: NamedSeries,
    /// Number of date strings that could not be parsed and were skipped.
    pub skipped_dates: usize,
}

impl NamedSeries {
    /// Empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from string-dated raw entries, skipping dates that do not parse.
    pub fn from_raw<K, D, I>(entries: impl IntoIterator<Item = (K, I)>) -> RawConversion
    where
        K: Into<String>,
        D: AsRef<str>,
        I: IntoIterator<Item = (D, f64)>,
    {
        let mut conv = RawConversion::default();
        for (key, values) in entries {
            let series = conv.series.0.entry(key.into()).or_default();
            for (raw_date, value) in values {
                match parse_iso_date(raw_date.as_ref()) {
                    Ok(date) => series.add(date, value),
                    Err(_) => conv.skipped_dates += 1,
                }
            }
        }
        conv
    }

    /// Insert (or accumulate into) the series under `key`.
    pub fn insert(&mut self, key: impl Into<String>, series: DateSeries) {
        let slot = self.0.entry(key.into()).or_default();
        for (date, value) in series.iter() {
            slot.add(date, value);
        }
    }

    /// Accumulate `other` into `self` key by key and date by date.
    pub fn extend_from(&mut self, other: &NamedSeries) {
        for (key, series) in other.iter() {
            self.insert(key.to_string(), series.clone());
        }
    }

    /// Union of keys and dates of `self` and `other`, values summed.
    ///
    /// This is how a "combined" size bucket is built from the small and large
    /// bucket responses.
    pub fn merged(&self, other: &NamedSeries) -> NamedSeries {
        let mut out = self.clone();
        out.extend_from(other);
        out
    }

    /// Series stored under exactly `key`.
    pub fn get(&self, key: &str) -> Option<&DateSeries> {
        self.0.get(key)
    }

    /// `(raw key, series)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DateSeries)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of raw keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, DateSeries)> for NamedSeries {
    fn from_iter<I: IntoIterator<Item = (K, DateSeries)>>(iter: I) -> Self {
        let mut out = NamedSeries::new();
        for (key, series) in iter {
            out.insert(key, series);
        }
        out
    }
}
