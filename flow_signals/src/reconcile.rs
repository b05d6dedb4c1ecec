//! Series reconciliation: collapsing raw keyed series onto one ticker and
//! date-unioning several per-ticker series.
//!
//! The union is zero-filled. A ticker with options activity but no retail
//! activity on some day still gets a row for that day, carrying only its
//! options component; dates are never dropped because one input lacks them.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::{
    matcher::matches,
    models::{DateSeries, NamedSeries},
};

/// Sum every raw key matching `target_ticker`, across all `sources`, per date.
///
/// Returns an empty series when nothing matches; callers treat that as "no
/// data for this ticker" and skip it.
pub fn reconcile(sources: &[&NamedSeries], target_ticker: &str) -> DateSeries {
    let mut acc = DateSeries::new();
    let mut matched_keys = 0usize;

    for source in sources {
        for (raw_key, series) in source.iter() {
            if !matches(raw_key, target_ticker) {
                continue;
            }
            matched_keys += 1;
            for (date, value) in series.iter() {
                acc.add(date, value);
            }
        }
    }

    debug!(
        ticker = target_ticker,
        matched_keys,
        dates = acc.len(),
        "reconciled series"
    );
    acc
}

/// Single-source convenience over [`reconcile`].
pub fn reconcile_one(source: &NamedSeries, target_ticker: &str) -> DateSeries {
    reconcile(&[source], target_ticker)
}

/// Dates present in any of `inputs`, ascending.
pub fn union_dates(inputs: &[&DateSeries]) -> BTreeSet<NaiveDate> {
    inputs.iter().flat_map(|s| s.dates()).collect()
}

/// Apply `combine` per date over the union of all input dates.
///
/// `combine` receives one value per input, in input order, with zero
/// substituted where an input lacks the date.
pub fn reconcile_union<F>(inputs: &[&DateSeries], combine: F) -> DateSeries
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = DateSeries::new();
    let mut row = Vec::with_capacity(inputs.len());

    for date in union_dates(inputs) {
        row.clear();
        row.extend(inputs.iter().map(|s| s.get_or_zero(date)));
        out.add(date, combine(&row));
    }
    out
}

/// `combine` for [`reconcile_union`]: plain sum.
pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// `combine` for [`reconcile_union`]: first minus the rest.
pub fn subtract(values: &[f64]) -> f64 {
    match values.split_first() {
        Some((first, rest)) => rest.iter().fold(*first, |acc, v| acc - v),
        None => 0.0,
    }
}
