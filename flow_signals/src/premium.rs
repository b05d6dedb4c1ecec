//! Call-minus-put net premium per ticker.

use crate::{
    FlowError,
    models::{DateSeries, NamedSeries, NetPremiumRecord},
    reconcile::{reconcile_one, reconcile_union, subtract},
};

/// Reconciled call, put and net series for one ticker.
#[derive(Debug, Clone, Default)]
pub struct NetPremiumSeries {
    /// Reconciled call premium.
    pub call: DateSeries,
    /// Reconciled put premium.
    pub put: DateSeries,
    /// `call - put` over the union of both date sets.
    pub net: DateSeries,
}

/// Reconcile call and put independently for `ticker` and subtract them.
pub fn net_premium_series(call: &NamedSeries, put: &NamedSeries, ticker: &str) -> NetPremiumSeries {
    let call = reconcile_one(call, ticker);
    let put = reconcile_one(put, ticker);
    let net = reconcile_union(&[&call, &put], subtract);
    NetPremiumSeries { call, put, net }
}

/// Net premium records for every ticker in `tickers`.
///
/// Records are grouped by ticker in list order and date-ordered within a
/// ticker. Tickers with neither call nor put data contribute nothing.
///
/// # Errors
///
/// [`FlowError::EmptyTickerList`] when `tickers` is empty.
pub fn net_premium(
    call: &NamedSeries,
    put: &NamedSeries,
    tickers: &[String],
) -> Result<Vec<NetPremiumRecord>, FlowError> {
    if tickers.is_empty() {
        return Err(FlowError::EmptyTickerList);
    }
    let mut out = Vec::new();
    for ticker in tickers {
        let s = net_premium_series(call, put, ticker);
        out.extend(s.net.iter().map(|(date, value)| NetPremiumRecord {
            date,
            ticker: ticker.clone(),
            value,
            call_value: s.call.get_or_zero(date),
            put_value: s.put.get_or_zero(date),
        }));
    }
    Ok(out)
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
    fn net_is_call_minus_put_with_zero_fill() {
        let call = named("OTM_small_AAPL", &[("2024-01-01", 50.0), ("2024-01-02", 10.0)]);
        let put = named("OTM_small_AAPL", &[("2024-01-02", 30.0), ("2024-01-03", 5.0)]);
        let recs = net_premium(&call, &put, &["AAPL".to_string()]).unwrap();

        let values: Vec<(f64, f64, f64)> =
            recs.iter().map(|r| (r.value, r.call_value, r.put_value)).collect();
        assert_eq!(
            values,
            vec![(50.0, 50.0, 0.0), (-20.0, 10.0, 30.0), (-5.0, 0.0, 5.0)]
        );
    }

    #[test]
    fn ticker_without_options_contributes_nothing() {
        let call = named("AAPL", &[("2024-01-01", 1.0)]);
        let put = NamedSeries::new();
        let recs = net_premium(&call, &put, &["MSFT".to_string(), "AAPL".to_string()]).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].ticker, "AAPL");
    }

    #[test]
    fn empty_ticker_list_is_rejected() {
        let call = named("AAPL", &[("2024-01-01", 1.0)]);
        assert_eq!(
            net_premium(&call, &NamedSeries::new(), &[]).unwrap_err(),
            FlowError::EmptyTickerList
        );
    }
}
