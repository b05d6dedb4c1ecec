use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::NaiveDate;
use flow_ingestor::{
    config::FilterSettings,
    errors::Error,
    models::{
        filters::{OptionSide, SizeBucket, TransactionType},
        request_params::{FlowRequestParams, OptionsRequestParams, PriceRequestParams},
    },
    providers::{ApiSnafu, FlowDataProvider, PriceProvider, ProviderError},
    runner::AnalysisRunner,
};
use flow_signals::{
    FlowError,
    config::AnalysisConfig,
    models::{DateSeries, FlowLeg, FlowType, NamedSeries, parse_iso_date},
    report::TickerRow,
};

fn d(s: &str) -> NaiveDate {
    parse_iso_date(s).unwrap()
}

fn named(key: &str, points: &[(&str, f64)]) -> NamedSeries {
    let s: DateSeries = points.iter().map(|(x, v)| (d(x), *v)).collect();
    [(key, s)].into_iter().collect()
}

/// Serves the AAPL scenario.
#[derive(Default)]
struct ScriptedFlow {
    fail_large_put: bool,
}

#[async_trait]
impl FlowDataProvider for ScriptedFlow {
    async fn fetch_retail(&self, params: FlowRequestParams) -> Result<NamedSeries, ProviderError> {
        if params.ticker != "AAPL" {
            return Ok(NamedSeries::new());
        }
        Ok(match params.transaction_type {
            TransactionType::Combined => {
                named("AAPL", &[("2024-01-01", 100.0), ("2024-01-02", -50.0)])
            }
            TransactionType::Buy => named("AAPL", &[("2024-01-01", 160.0), ("2024-01-02", 40.0)]),
            TransactionType::Sell => named("AAPL", &[("2024-01-01", 60.0), ("2024-01-02", 90.0)]),
        })
    }

    async fn fetch_options(&self, params: OptionsRequestParams) -> Result<NamedSeries, ProviderError> {
        match (params.size, params.side) {
            (SizeBucket::Small, OptionSide::Call) => {
                Ok(named("OTM_small_AAPL", &[("2024-01-02", 30.0)]))
            }
            (SizeBucket::Large, OptionSide::Put) if self.fail_large_put => ApiSnafu {
                status: 503u16,
                message: "unavailable",
            }
            .fail(),
            (SizeBucket::Large, OptionSide::Put) => {
                Ok(named("OTM_large_AAPL", &[("2024-01-01", 20.0)]))
            }
            _ => Ok(NamedSeries::new()),
        }
    }
}

#[derive(Clone, Default)]
struct CountingPrices {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl PriceProvider for CountingPrices {
    async fn fetch_closes(&self, params: PriceRequestParams) -> Result<DateSeries, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if params.ticker == "AAPL" {
            Ok((0..6u64)
                .map(|i| (params.from_date + chrono::Days::new(i), 100.0 + i as f64))
                .collect())
        } else {
            Ok(DateSeries::new())
        }
    }
}

fn params(tickers: &[&str]) -> AnalysisConfig {
    AnalysisConfig {
        tickers: tickers.iter().map(|t| t.to_string()).collect(),
        from_date: d("2024-01-01"),
        to_date: d("2024-01-02"),
        z_score_window: 21,
    }
}

#[tokio::test]
async fn run_fetches_in_order_and_builds_report() {
    let mut runner = AnalysisRunner::new(
        ScriptedFlow::default(),
        CountingPrices::default(),
        FilterSettings::default(),
    );
    let out = runner.run(params(&["aapl", "msft"])).await.unwrap();

    let calls = runner_calls(&out);
    assert_eq!(
        calls,
        vec![
            "retail:AAPL",
            "retail:buy:AAPL",
            "retail:sell:AAPL",
            "retail:MSFT",
            "retail:buy:MSFT",
            "retail:sell:MSFT",
            "options:small:call",
            "options:small:put",
            "options:large:call",
            "options:large:put",
            "prices:AAPL",
            "prices:MSFT",
        ]
    );
    assert!(out.fetch_log.all_ok());

    let combined = out.report.section(FlowType::Combined).unwrap();
    let values: Vec<f64> = combined
        .row("AAPL")
        .and_then(TickerRow::analysis)
        .unwrap()
        .points
        .iter()
        .map(|p| p.value)
        .collect();
    assert_eq!(values, vec![80.0, -20.0]);
    assert!(matches!(combined.row("MSFT"), Some(TickerRow::NoData { .. })));

    let retail = out.report.section(FlowType::Retail).unwrap();
    let change = retail.row("AAPL").unwrap().analysis().unwrap().price_change;
    assert!(change.is_some_and(|c| c.one_week_pct.is_some()));

    let sell = out.report.leg(FlowLeg::RetailSell).unwrap();
    let sell_values: Vec<f64> = sell
        .row("AAPL")
        .and_then(TickerRow::analysis)
        .unwrap()
        .points
        .iter()
        .map(|p| p.value)
        .collect();
    assert_eq!(sell_values, vec![60.0, 90.0]);
    let small_call = out.report.leg(FlowLeg::SmallCall).unwrap();
    assert_eq!(small_call.populated(), 1);
}

#[tokio::test]
async fn single_side_retail_skips_buy_and_sell_calls() {
    let filters = FilterSettings {
        transaction_type: TransactionType::Buy,
        ..Default::default()
    };
    let mut runner = AnalysisRunner::new(ScriptedFlow::default(), CountingPrices::default(), filters);
    let out = runner.run(params(&["AAPL"])).await.unwrap();

    let calls = runner_calls(&out);
    assert_eq!(&calls[..2], &["retail:AAPL", "options:small:call"]);
    assert!(out.report.leg(FlowLeg::RetailBuy).is_none());
    assert_eq!(out.report.legs.len(), 4);

    // the single requested side is the retail view
    let retail = out.report.section(FlowType::Retail).unwrap();
    let latest = retail.row("AAPL").unwrap().analysis().unwrap().snapshot.latest_value;
    assert_eq!(latest, 40.0);
}

fn runner_calls(out: &flow_ingestor::runner::RunOutput) -> Vec<&str> {
    out.fetch_log.records().iter().map(|r| r.source.as_str()).collect()
}

#[tokio::test]
async fn failed_call_is_empty_but_recorded() {
    let flow = ScriptedFlow {
        fail_large_put: true,
        ..Default::default()
    };
    let mut runner = AnalysisRunner::new(flow, CountingPrices::default(), FilterSettings::default());
    let out = runner.run(params(&["AAPL"])).await.unwrap();

    let failures: Vec<&str> = out.fetch_log.failures().map(|r| r.source.as_str()).collect();
    assert_eq!(failures, vec!["options:large:put"]);

    let large = out.report.section(FlowType::OptionsLarge).unwrap();
    assert!(matches!(large.row("AAPL"), Some(TickerRow::NoData { .. })));
    // combined loses only the large component
    let combined = out.report.section(FlowType::Combined).unwrap();
    let first = &combined.breakdown[0];
    assert_eq!(first.combined_value, 100.0);
    assert_eq!(first.options_large_component, 0.0);
}

#[tokio::test]
async fn prices_are_cached_across_runs() {
    let prices = CountingPrices::default();
    let counter = prices.calls.clone();
    let mut runner = AnalysisRunner::new(ScriptedFlow::default(), prices, FilterSettings::default());

    runner.run(params(&["AAPL", "MSFT"])).await.unwrap();
    let out = runner.run(params(&["AAPL", "MSFT"])).await.unwrap();

    // AAPL cached after the first run; MSFT came back empty and is retried.
    assert_eq!(counter.load(Ordering::SeqCst), 3);
    assert_eq!(runner.price_cache().len(), 1);
    assert!(!runner_calls(&out).contains(&"prices:AAPL"));
}

#[tokio::test]
async fn contract_violation_is_an_error() {
    let mut runner = AnalysisRunner::new(
        ScriptedFlow::default(),
        CountingPrices::default(),
        FilterSettings::default(),
    );
    let mut p = params(&["AAPL"]);
    p.to_date = d("2023-12-31");
    let err = runner.run(p).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Contract(FlowError::InvalidDateRange { .. })
    ));
}
