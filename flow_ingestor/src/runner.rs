//! One analysis run: fetch everything sequentially, then aggregate.
//!
//! Call order is fixed: retail per ticker (when both sides are requested, the
//! combined, buy and sell series in turn), then small call, small put, large
//! call and large put for the whole list, then closes per ticker. Calls are
//! awaited one at a time; spacing between flow API calls is enforced by the
//! provider.

use std::collections::HashMap;

use flow_signals::{
    combined::FlowInputs,
    config::AnalysisConfig,
    models::{DateSeries, NamedSeries},
    price::{PriceCache, PriceKey},
    report::{FlowReport, ReportAggregator},
};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    config::FilterSettings,
    errors::Error,
    fetch::{FetchLog, fetch_or_empty},
    models::{
        filters::{OptionSide, SizeBucket, TransactionType},
        request_params::{FlowRequestParams, OptionsRequestParams, PriceRequestParams},
    },
    providers::{FlowDataProvider, PriceProvider},
};

/// The four options requests of a run, in call order.
const OPTIONS_LEGS: [(SizeBucket, OptionSide); 4] = [
    (SizeBucket::Small, OptionSide::Call),
    (SizeBucket::Small, OptionSide::Put),
    (SizeBucket::Large, OptionSide::Call),
    (SizeBucket::Large, OptionSide::Put),
];

/// Report plus the outcome of every upstream call that fed it.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutput {
    pub report: FlowReport,
    pub fetch_log: FetchLog,
}

pub struct AnalysisRunner<F, P> {
    flow: F,
    prices: P,
    filters: FilterSettings,
    cache: PriceCache,
}

impl<F, P> AnalysisRunner<F, P>
where
    F: FlowDataProvider,
    P: PriceProvider,
{
    pub fn new(flow: F, prices: P, filters: FilterSettings) -> Self {
        Self {
            flow,
            prices,
            filters,
            cache: PriceCache::new(),
        }
    }

    /// Prices cached so far; lives as long as the runner.
    pub fn price_cache(&self) -> &PriceCache {
        &self.cache
    }

    /// Fetch, reconcile and aggregate one analysis.
    ///
    /// # Errors
    ///
    /// Only contract violations in `params`. Upstream failures yield empty
    /// data and are recorded in [`RunOutput::fetch_log`].
    pub async fn run(&mut self, params: AnalysisConfig) -> Result<RunOutput, Error> {
        let aggregator = ReportAggregator::new(params)?;
        let cfg = aggregator.params().clone();
        let mut log = FetchLog::new();

        info!(
            tickers = ?cfg.tickers,
            from = %cfg.from_date,
            to = %cfg.to_date,
            window = cfg.z_score_window,
            "starting analysis run"
        );

        let mut inputs = FlowInputs::default();
        let both_sides = self.filters.transaction_type == TransactionType::Combined;
        if both_sides {
            inputs.retail_buy = Some(NamedSeries::new());
            inputs.retail_sell = Some(NamedSeries::new());
        }
        for ticker in &cfg.tickers {
            let request = FlowRequestParams {
                ticker: ticker.clone(),
                from_date: cfg.from_date,
                to_date: cfg.to_date,
                transaction_type: self.filters.transaction_type,
            };
            let series: NamedSeries = fetch_or_empty(
                &mut log,
                format!("retail:{ticker}"),
                self.flow.fetch_retail(request.clone()),
            )
            .await;
            inputs.retail.extend_from(&series);

            if !both_sides {
                continue;
            }
            for (side, slot) in [
                (TransactionType::Buy, &mut inputs.retail_buy),
                (TransactionType::Sell, &mut inputs.retail_sell),
            ] {
                let request = FlowRequestParams {
                    transaction_type: side,
                    ..request.clone()
                };
                let series: NamedSeries = fetch_or_empty(
                    &mut log,
                    format!("retail:{side}:{ticker}"),
                    self.flow.fetch_retail(request),
                )
                .await;
                if let Some(acc) = slot {
                    acc.extend_from(&series);
                }
            }
        }

        for (size, side) in OPTIONS_LEGS {
            let request = OptionsRequestParams {
                tickers: cfg.tickers.clone(),
                from_date: cfg.from_date,
                to_date: cfg.to_date,
                moneyness: self.filters.moneyness,
                side,
                size,
            };
            let series: NamedSeries =
                fetch_or_empty(&mut log, format!("options:{size}:{side}"), self.flow.fetch_options(request))
                    .await;
            let slot = match (size, side) {
                (SizeBucket::Small, OptionSide::Call) => &mut inputs.small_call,
                (SizeBucket::Small, OptionSide::Put) => &mut inputs.small_put,
                (_, OptionSide::Call) => &mut inputs.large_call,
                (_, OptionSide::Put) => &mut inputs.large_put,
            };
            *slot = series;
        }

        let mut closes: HashMap<String, DateSeries> = HashMap::with_capacity(cfg.tickers.len());
        for ticker in &cfg.tickers {
            let key = PriceKey::new(ticker, cfg.from_date, cfg.to_date);
            let series = match self.cache.get(&key) {
                Some(cached) => cached.clone(),
                None => {
                    let request = PriceRequestParams {
                        ticker: ticker.clone(),
                        from_date: cfg.from_date,
                        to_date: cfg.to_date,
                    };
                    let fetched: DateSeries = fetch_or_empty(
                        &mut log,
                        format!("prices:{ticker}"),
                        self.prices.fetch_closes(request),
                    )
                    .await;
                    self.cache.insert(key, fetched.clone());
                    fetched
                }
            };
            closes.insert(ticker.clone(), series);
        }

        let report = aggregator.aggregate(&inputs, &closes);
        let failures = log.failures().count();
        if failures > 0 {
            warn!(failures, "some upstream calls failed; affected series are empty");
        }
        if !report.has_data() {
            warn!("no flow data could be fetched for any ticker");
        }
        info!(calls = log.records().len(), failures, "analysis run finished");

        Ok(RunOutput {
            report,
            fetch_log: log,
        })
    }
}
