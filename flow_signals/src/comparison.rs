//! Retail flow vs options net premium, side by side in Z-score terms.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    classify::ActivityLevel,
    models::{DateSeries, NamedSeries},
    premium::net_premium_series,
    reconcile::{reconcile_one, union_dates},
    stats::{pearson, z_scores},
};

/// One date of a [`ZScoreComparison`]. Missing sides are zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    /// Calendar date.
    pub date: NaiveDate,
    /// Retail flow.
    pub retail_value: f64,
    /// Options net premium.
    pub options_value: f64,
    /// `retail_value + options_value`.
    pub combined_value: f64,
    /// Z-score of retail within the retail series.
    pub retail_z: f64,
    /// Z-score of options within the options series.
    pub options_z: f64,
    /// Z-score of the combined value sequence.
    pub combined_z: f64,
}

/// Retail vs options comparison for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZScoreComparison {
    /// Canonical ticker.
    pub ticker: String,
    /// Date-ordered rows over the union of both sides.
    pub rows: Vec<ComparisonRow>,
    /// Pearson correlation of the retail and options Z-score columns.
    pub correlation: Option<f64>,
    /// Activity of the last retail Z-score.
    pub retail_activity: ActivityLevel,
    /// Activity of the last options Z-score.
    pub options_activity: ActivityLevel,
    /// Activity of the last combined Z-score.
    pub combined_activity: ActivityLevel,
}

fn z_by_date(series: &DateSeries, window: Option<usize>) -> BTreeMap<NaiveDate, f64> {
    series
        .dates()
        .zip(z_scores(&series.values(), window))
        .collect()
}

/// Compare `ticker`'s retail flow against its options net premium.
///
/// Each side is scored within its own history before the outer join, the
/// combined column is scored after. `None` when either side has no data.
pub fn zscore_comparison(
    retail: &NamedSeries,
    options_call: &NamedSeries,
    options_put: &NamedSeries,
    ticker: &str,
    window: Option<usize>,
) -> Option<ZScoreComparison> {
    let retail = reconcile_one(retail, ticker);
    let options = net_premium_series(options_call, options_put, ticker).net;
    if retail.is_empty() || options.is_empty() {
        return None;
    }

    let retail_z = z_by_date(&retail, window);
    let options_z = z_by_date(&options, window);

    let mut rows: Vec<ComparisonRow> = union_dates(&[&retail, &options])
        .into_iter()
        .map(|date| {
            let retail_value = retail.get_or_zero(date);
            let options_value = options.get_or_zero(date);
            ComparisonRow {
                date,
                retail_value,
                options_value,
                combined_value: retail_value + options_value,
                retail_z: retail_z.get(&date).copied().unwrap_or(0.0),
                options_z: options_z.get(&date).copied().unwrap_or(0.0),
                combined_z: 0.0,
            }
        })
        .collect();

    let combined: Vec<f64> = rows.iter().map(|r| r.combined_value).collect();
    for (row, z) in rows.iter_mut().zip(z_scores(&combined, window)) {
        row.combined_z = z;
    }

    let rz: Vec<f64> = rows.iter().map(|r| r.retail_z).collect();
    let oz: Vec<f64> = rows.iter().map(|r| r.options_z).collect();
    let last = rows.last()?;

    Some(ZScoreComparison {
        ticker: ticker.to_string(),
        correlation: pearson(&rz, &oz),
        retail_activity: ActivityLevel::classify(last.retail_z),
        options_activity: ActivityLevel::classify(last.options_z),
        combined_activity: ActivityLevel::classify(last.combined_z),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_iso_date;

    fn named(key: &str, points: &[(&str, f64)]) -> NamedSeries {
        let s: DateSeries = points
            .iter()
            .map(|(d, v)| (parse_iso_date(d).unwrap(), *v))
            .collect();
        [(key, s)].into_iter().collect()
    }

    #[test]
    fn missing_side_yields_none() {
        let retail = named("AAPL", &[("2024-01-01", 1.0)]);
        let empty = NamedSeries::new();
        assert!(zscore_comparison(&retail, &empty, &empty, "AAPL", Some(21)).is_none());
        assert!(zscore_comparison(&empty, &retail, &empty, "AAPL", Some(21)).is_none());
    }

    #[test]
    fn outer_join_zero_fills() {
        let retail = named("AAPL", &[("2024-01-01", 10.0), ("2024-01-02", 20.0)]);
        let call = named("OTM_small_AAPL", &[("2024-01-02", 5.0), ("2024-01-03", 7.0)]);
        let put = named("OTM_small_AAPL", &[("2024-01-03", 1.0)]);

        let cmp = zscore_comparison(&retail, &call, &put, "AAPL", Some(21)).unwrap();
        assert_eq!(cmp.rows.len(), 3);

        let first = &cmp.rows[0];
        assert_eq!(first.options_value, 0.0);
        assert_eq!(first.options_z, 0.0);
        assert_eq!(first.combined_value, 10.0);

        let last = &cmp.rows[2];
        assert_eq!(last.retail_value, 0.0);
        assert_eq!(last.retail_z, 0.0);
        assert_eq!(last.options_value, 6.0);
        assert_eq!(last.combined_value, 6.0);
    }

    #[test]
    fn correlation_tracks_z_columns() {
        let retail = named("AAPL", &[("2024-01-01", 1.0), ("2024-01-02", 2.0), ("2024-01-03", 3.0)]);
        let call = named("AAPL", &[("2024-01-01", 10.0), ("2024-01-02", 20.0), ("2024-01-03", 30.0)]);
        let cmp = zscore_comparison(&retail, &call, &NamedSeries::new(), "AAPL", None).unwrap();
        assert!((cmp.correlation.unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(cmp.retail_activity, ActivityLevel::Elevated);
    }
}
