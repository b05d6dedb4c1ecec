use indexmap::IndexMap;
use serde::Serialize;

use super::{FlowReport, TickerRow};
use crate::models::{FlowPoint, FlowType};

/// The four flow series of one ticker. Series without data are empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickerBundle {
    /// Retail flow.
    pub retail: Vec<FlowPoint>,
    /// Small-bucket net premium.
    pub options_small: Vec<FlowPoint>,
    /// Large-bucket net premium.
    pub options_large: Vec<FlowPoint>,
    /// Combined flow.
    pub combined: Vec<FlowPoint>,
}

impl TickerBundle {
    fn slot(&mut self, flow_type: FlowType) -> &mut Vec<FlowPoint> {
        match flow_type {
            FlowType::Retail => &mut self.retail,
            FlowType::OptionsSmall => &mut self.options_small,
            FlowType::OptionsLarge => &mut self.options_large,
            FlowType::Combined => &mut self.combined,
        }
    }
}

/// All tickers' [`TickerBundle`]s, keyed by ticker in request order.
///
/// Values are final numbers; formatting is left to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ReportBundle(pub IndexMap<String, TickerBundle>);

impl ReportBundle {
    pub(super) fn from_report(report: &FlowReport) -> Self {
        let mut out: IndexMap<String, TickerBundle> = report
            .params
            .tickers
            .iter()
            .map(|t| (t.clone(), TickerBundle::default()))
            .collect();

        for section in &report.sections {
            for row in &section.rows {
                if let TickerRow::Data(a) = row {
                    let bundle = out.entry(a.ticker.clone()).or_default();
                    bundle.slot(section.flow_type).clone_from(&a.points);
                }
            }
        }
        ReportBundle(out)
    }

    /// Bundle for `ticker`.
    pub fn get(&self, ticker: &str) -> Option<&TickerBundle> {
        self.0.get(ticker)
    }
}
