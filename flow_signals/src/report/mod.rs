//! Report assembly: reconciliation, statistics and classification composed
//! per ticker and per flow type.
//!
//! Every requested ticker appears in every section, either with its analysis
//! or with an explicit [`TickerRow::NoData`] marker. Identical inputs produce
//! identical reports; ticker order is the request order throughout.
//!
//! Next to the four net views, [`LegSection`]s analyse each options call and
//! put series on its own, plus the retail buy and sell sides when those were
//! fetched.

mod analysis;
mod bundle;
mod totals;

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

pub use analysis::TickerAnalysis;
pub use bundle::{ReportBundle, TickerBundle};
pub use totals::SizeTotals;

use crate::{
    FlowError,
    combined::{FlowInputs, TickerComponents},
    comparison::{ZScoreComparison, zscore_comparison},
    config::{AnalysisConfig, normalize_analysis_config},
    models::{CombinedFlowRecord, DateSeries, FlowLeg, FlowType},
    price::PriceChange,
};

/// One ticker's entry in a [`FlowSection`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TickerRow {
    /// No raw key matched the ticker for this flow type.
    NoData {
        /// Requested ticker.
        ticker: String,
    },
    /// Analysis of the ticker's series.
    Data(TickerAnalysis),
}

impl TickerRow {
    /// Ticker this row belongs to.
    pub fn ticker(&self) -> &str {
        match self {
            TickerRow::NoData { ticker } => ticker,
            TickerRow::Data(a) => &a.ticker,
        }
    }

    /// The analysis, if the ticker had data.
    pub fn analysis(&self) -> Option<&TickerAnalysis> {
        match self {
            TickerRow::NoData { .. } => None,
            TickerRow::Data(a) => Some(a),
        }
    }
}

/// All tickers' rows for one flow type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowSection {
    /// Which flow this section covers.
    pub flow_type: FlowType,
    /// Display title.
    pub title: &'static str,
    /// One row per requested ticker, in request order.
    pub rows: Vec<TickerRow>,
    /// Per-component breakdown; only populated for [`FlowType::Combined`].
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub breakdown: Vec<CombinedFlowRecord>,
}

impl FlowSection {
    fn new(flow_type: FlowType, capacity: usize) -> Self {
        Self {
            flow_type,
            title: flow_type.label(),
            rows: Vec::with_capacity(capacity),
            breakdown: Vec::new(),
        }
    }

    /// Row for `ticker` (exact match on the normalized symbol).
    pub fn row(&self, ticker: &str) -> Option<&TickerRow> {
        self.rows.iter().find(|r| r.ticker() == ticker)
    }

    /// Number of tickers with data in this section.
    pub fn populated(&self) -> usize {
        self.rows.iter().filter(|r| r.analysis().is_some()).count()
    }
}

/// All tickers' rows for one single-sided leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegSection {
    /// Which leg this section covers.
    pub leg: FlowLeg,
    /// Display title.
    pub title: &'static str,
    /// One row per requested ticker, in request order.
    pub rows: Vec<TickerRow>,
}

impl LegSection {
    fn new(leg: FlowLeg, capacity: usize) -> Self {
        Self {
            leg,
            title: leg.label(),
            rows: Vec::with_capacity(capacity),
        }
    }

    /// Row for `ticker`.
    pub fn row(&self, ticker: &str) -> Option<&TickerRow> {
        self.rows.iter().find(|r| r.ticker() == ticker)
    }

    /// Number of tickers with data in this leg.
    pub fn populated(&self) -> usize {
        self.rows.iter().filter(|r| r.analysis().is_some()).count()
    }
}

/// Everything a table or report renderer needs for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowReport {
    /// Normalized parameters the report was built with.
    pub params: AnalysisConfig,
    /// Retail, Options Small, Options Large, Combined, in that order.
    pub sections: Vec<FlowSection>,
    /// Single-sided legs in [`FlowLeg::ALL`] order; the retail legs only
    /// when they were fetched.
    pub legs: Vec<LegSection>,
    /// Options call/put totals per ticker, both size buckets.
    pub size_totals: IndexMap<String, SizeTotals>,
    /// Retail vs options (both buckets) comparison; `None` when either side
    /// had no data.
    pub comparisons: IndexMap<String, Option<ZScoreComparison>>,
}

impl FlowReport {
    /// Section for `flow_type`.
    pub fn section(&self, flow_type: FlowType) -> Option<&FlowSection> {
        self.sections.iter().find(|s| s.flow_type == flow_type)
    }

    /// Section for `leg`, if that leg was part of the run.
    pub fn leg(&self, leg: FlowLeg) -> Option<&LegSection> {
        self.legs.iter().find(|s| s.leg == leg)
    }

    /// True if at least one ticker had data in at least one section.
    pub fn has_data(&self) -> bool {
        self.sections.iter().any(|s| s.populated() > 0)
    }

    /// The four series per ticker, for embedding into a report document.
    pub fn bundle(&self) -> ReportBundle {
        ReportBundle::from_report(self)
    }
}

/// Builds [`FlowReport`]s for one validated set of analysis parameters.
#[derive(Debug, Clone)]
pub struct ReportAggregator {
    params: AnalysisConfig,
}

impl ReportAggregator {
    /// Normalize and validate `params`.
    ///
    /// # Errors
    ///
    /// [`FlowError`] when the ticker list is empty after normalization, the
    /// range is backwards or the window is zero.
    pub fn new(mut params: AnalysisConfig) -> Result<Self, FlowError> {
        normalize_analysis_config(&mut params);
        params.validate()?;
        Ok(Self { params })
    }

    /// Parameters in effect.
    pub fn params(&self) -> &AnalysisConfig {
        &self.params
    }

    /// Assemble the report from already-fetched raw series.
    ///
    /// `closes` maps a ticker (as normalized in the params) to its closing
    /// prices; tickers without an entry get no [`PriceChange`].
    pub fn aggregate(&self, inputs: &FlowInputs, closes: &HashMap<String, DateSeries>) -> FlowReport {
        let tickers = &self.params.tickers;
        let window = Some(self.params.z_score_window);

        let mut sections: Vec<FlowSection> = FlowType::ALL
            .iter()
            .map(|ft| FlowSection::new(*ft, tickers.len()))
            .collect();
        let mut legs: Vec<LegSection> = FlowLeg::ALL
            .iter()
            .filter(|leg| inputs.has_leg(**leg))
            .map(|leg| LegSection::new(*leg, tickers.len()))
            .collect();
        let mut size_totals = IndexMap::with_capacity(tickers.len());
        let mut comparisons = IndexMap::with_capacity(tickers.len());

        let options_call = inputs.small_call.merged(&inputs.large_call);
        let options_put = inputs.small_put.merged(&inputs.large_put);

        for ticker in tickers {
            let components = TickerComponents::reconcile(inputs, ticker);
            let price_change = closes
                .get(ticker)
                .map(PriceChange::from_closes)
                .filter(|c| !c.is_empty());

            let combined = components.combined();
            let series = [
                &components.retail,
                &components.small.net,
                &components.large.net,
                &combined,
            ];

            for (section, s) in sections.iter_mut().zip(series) {
                let row = match TickerAnalysis::build(ticker, s, window, price_change) {
                    Some(a) => TickerRow::Data(a),
                    None => {
                        warn!(ticker = %ticker, flow = %section.flow_type, "no data for ticker");
                        TickerRow::NoData {
                            ticker: ticker.clone(),
                        }
                    }
                };
                section.rows.push(row);
            }

            for section in legs.iter_mut() {
                let analysis = components
                    .leg(section.leg)
                    .and_then(|s| TickerAnalysis::build(ticker, s, window, price_change));
                let row = match analysis {
                    Some(a) => TickerRow::Data(a),
                    None => {
                        debug!(ticker = %ticker, leg = %section.leg, "no data for leg");
                        TickerRow::NoData {
                            ticker: ticker.clone(),
                        }
                    }
                };
                section.rows.push(row);
            }

            if let Some(section) = sections.last_mut() {
                section.breakdown.extend(components.records(ticker));
            }
            size_totals.insert(ticker.clone(), SizeTotals::from_components(&components));
            comparisons.insert(
                ticker.clone(),
                zscore_comparison(&inputs.retail, &options_call, &options_put, ticker, window),
            );
        }

        info!(
            tickers = tickers.len(),
            populated = ?sections.iter().map(FlowSection::populated).collect::<Vec<_>>(),
            "aggregated flow report"
        );

        FlowReport {
            params: self.params.clone(),
            sections,
            legs,
            size_totals,
            comparisons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NamedSeries, parse_iso_date};
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        parse_iso_date(s).unwrap()
    }

    fn named(key: &str, points: &[(&str, f64)]) -> NamedSeries {
        let s: DateSeries = points.iter().map(|(x, v)| (d(x), *v)).collect();
        [(key, s)].into_iter().collect()
    }

    fn params(tickers: &[&str]) -> AnalysisConfig {
        AnalysisConfig {
            tickers: tickers.iter().map(|t| t.to_string()).collect(),
            from_date: d("2024-01-01"),
            to_date: d("2024-01-31"),
            z_score_window: 21,
        }
    }

    #[test]
    fn rejects_contract_violations() {
        assert_eq!(
            ReportAggregator::new(params(&[" "])).unwrap_err(),
            FlowError::EmptyTickerList
        );
        let mut p = params(&["AAPL"]);
        p.z_score_window = 0;
        assert_eq!(ReportAggregator::new(p).unwrap_err(), FlowError::InvalidWindow(0));
    }

    #[test]
    fn every_ticker_gets_a_row_in_every_section() {
        let agg = ReportAggregator::new(params(&["aapl", "msft"])).unwrap();
        let inputs = FlowInputs {
            retail: named("AAPL", &[("2024-01-02", 5.0)]),
            ..Default::default()
        };
        let report = agg.aggregate(&inputs, &HashMap::new());

        assert_eq!(report.sections.len(), 4);
        for section in &report.sections {
            let tickers: Vec<&str> = section.rows.iter().map(TickerRow::ticker).collect();
            assert_eq!(tickers, vec!["AAPL", "MSFT"]);
        }
        let retail = report.section(FlowType::Retail).unwrap();
        assert!(retail.row("AAPL").unwrap().analysis().is_some());
        assert!(retail.row("MSFT").unwrap().analysis().is_none());
        assert_eq!(report.section(FlowType::OptionsSmall).unwrap().populated(), 0);
        assert_eq!(report.section(FlowType::Combined).unwrap().populated(), 1);
        assert!(report.has_data());
        assert_eq!(report.comparisons["AAPL"], None);
    }

    #[test]
    fn empty_inputs_report_no_data() {
        let agg = ReportAggregator::new(params(&["AAPL"])).unwrap();
        let report = agg.aggregate(&FlowInputs::default(), &HashMap::new());
        assert!(!report.has_data());
        assert!(report.section(FlowType::Combined).unwrap().breakdown.is_empty());
        assert_eq!(report.size_totals["AAPL"], SizeTotals::default());
    }

    #[test]
    fn price_change_attached_when_closes_present() {
        let agg = ReportAggregator::new(params(&["AAPL"])).unwrap();
        let inputs = FlowInputs {
            retail: named("AAPL", &[("2024-01-02", 5.0)]),
            ..Default::default()
        };
        let closes: DateSeries = (1..=6)
            .map(|i| (d("2024-01-01") + chrono::Days::new(i), 100.0 + i as f64))
            .collect();
        let mut by_ticker = HashMap::new();
        by_ticker.insert("AAPL".to_string(), closes);

        let report = agg.aggregate(&inputs, &by_ticker);
        let row = report.section(FlowType::Retail).unwrap().row("AAPL").unwrap();
        let change = row.analysis().unwrap().price_change.unwrap();
        assert!(change.one_week_pct.is_some());
        assert_eq!(change.one_month_pct, None);
    }

    #[test]
    fn legs_analyse_call_put_and_retail_sides() {
        let agg = ReportAggregator::new(params(&["AAPL"])).unwrap();
        let inputs = FlowInputs {
            retail: named("AAPL", &[("2024-01-02", 5.0)]),
            retail_buy: Some(named("AAPL", &[("2024-01-02", 9.0), ("2024-01-03", 4.0)])),
            retail_sell: Some(NamedSeries::new()),
            small_call: named("OTM_small_AAPL", &[("2024-01-02", 30.0)]),
            small_put: named("OTM_small_AAPL", &[("2024-01-02", 12.0)]),
            ..Default::default()
        };
        let report = agg.aggregate(&inputs, &HashMap::new());

        let legs: Vec<FlowLeg> = report.legs.iter().map(|s| s.leg).collect();
        assert_eq!(legs, FlowLeg::ALL.to_vec());

        let buy = report.leg(FlowLeg::RetailBuy).unwrap().row("AAPL").unwrap();
        assert_eq!(buy.analysis().unwrap().snapshot.sum, 13.0);
        assert!(report.leg(FlowLeg::RetailSell).unwrap().row("AAPL").unwrap().analysis().is_none());

        let call = report.leg(FlowLeg::SmallCall).unwrap().row("AAPL").unwrap();
        assert_eq!(call.analysis().unwrap().snapshot.latest_value, 30.0);
        let put = report.leg(FlowLeg::SmallPut).unwrap().row("AAPL").unwrap();
        assert_eq!(put.analysis().unwrap().snapshot.latest_value, 12.0);
        assert_eq!(report.leg(FlowLeg::LargeCall).unwrap().populated(), 0);

        // the net view is unchanged by the legs
        let net = report.section(FlowType::OptionsSmall).unwrap().row("AAPL").unwrap();
        assert_eq!(net.analysis().unwrap().snapshot.latest_value, 18.0);
    }

    #[test]
    fn retail_legs_absent_when_not_fetched() {
        let agg = ReportAggregator::new(params(&["AAPL"])).unwrap();
        let report = agg.aggregate(&FlowInputs::default(), &HashMap::new());
        assert_eq!(report.legs.len(), 4);
        assert!(report.leg(FlowLeg::RetailBuy).is_none());
        assert!(report.legs.iter().all(|s| s.rows.len() == 1));
    }

    #[test]
    fn aggregation_is_deterministic() {
        let agg = ReportAggregator::new(params(&["AAPL", "MSFT"])).unwrap();
        let inputs = FlowInputs {
            retail: named("AAPL", &[("2024-01-02", 5.0), ("2024-01-03", -1.25)]),
            small_call: named("OTM_small_MSFT", &[("2024-01-02", 3.5)]),
            large_put: named("OTM_large_AAPL", &[("2024-01-04", 0.75)]),
            ..Default::default()
        };
        let a = serde_json::to_string(&agg.aggregate(&inputs, &HashMap::new())).unwrap();
        let b = serde_json::to_string(&agg.aggregate(&inputs, &HashMap::new())).unwrap();
        assert_eq!(a, b);
    }
}
