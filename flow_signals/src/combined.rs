//! Combined flow: retail + small net premium + large net premium.
//!
//! This is the "total market pressure" signal. Each component is reconciled
//! from the already-fetched raw series; nothing is re-fetched here.

use crate::{
    FlowError,
    models::{CombinedFlowRecord, DateSeries, FlowLeg, NamedSeries},
    premium::{NetPremiumSeries, net_premium_series},
    reconcile::{reconcile_one, reconcile_union, sum, union_dates},
};

/// The raw series a combined-flow computation consumes.
///
/// The retail buy and sell sides are optional: they are only fetched when
/// retail flow is requested for both sides, and they feed the per-leg views
/// but never the combined signal.
#[derive(Debug, Clone, Default)]
pub struct FlowInputs {
    /// Retail flow (single value per date, no call/put split).
    pub retail: NamedSeries,
    /// Retail buy-side flow, when fetched.
    pub retail_buy: Option<NamedSeries>,
    /// Retail sell-side flow, when fetched.
    pub retail_sell: Option<NamedSeries>,
    /// Small-bucket call premium.
    pub small_call: NamedSeries,
    /// Small-bucket put premium.
    pub small_put: NamedSeries,
    /// Large-bucket call premium.
    pub large_call: NamedSeries,
    /// Large-bucket put premium.
    pub large_put: NamedSeries,
}

impl FlowInputs {
    /// True when `leg` was fetched. Options legs always are.
    pub fn has_leg(&self, leg: FlowLeg) -> bool {
        match leg {
            FlowLeg::RetailBuy => self.retail_buy.is_some(),
            FlowLeg::RetailSell => self.retail_sell.is_some(),
            _ => true,
        }
    }
}

/// Reconciled components of the combined signal for one ticker.
#[derive(Debug, Clone, Default)]
pub struct TickerComponents {
    /// Reconciled retail flow.
    pub retail: DateSeries,
    /// Reconciled retail buy side, when fetched.
    pub retail_buy: Option<DateSeries>,
    /// Reconciled retail sell side, when fetched.
    pub retail_sell: Option<DateSeries>,
    /// Small-bucket call/put/net.
    pub small: NetPremiumSeries,
    /// Large-bucket call/put/net.
    pub large: NetPremiumSeries,
}

impl TickerComponents {
    /// Reconcile every component of `inputs` for `ticker`.
    pub fn reconcile(inputs: &FlowInputs, ticker: &str) -> Self {
        Self {
            retail: reconcile_one(&inputs.retail, ticker),
            retail_buy: inputs.retail_buy.as_ref().map(|s| reconcile_one(s, ticker)),
            retail_sell: inputs.retail_sell.as_ref().map(|s| reconcile_one(s, ticker)),
            small: net_premium_series(&inputs.small_call, &inputs.small_put, ticker),
            large: net_premium_series(&inputs.large_call, &inputs.large_put, ticker),
        }
    }

    /// The single-sided series for `leg`; `None` for a retail side that was
    /// not fetched.
    pub fn leg(&self, leg: FlowLeg) -> Option<&DateSeries> {
        match leg {
            FlowLeg::RetailBuy => self.retail_buy.as_ref(),
            FlowLeg::RetailSell => self.retail_sell.as_ref(),
            FlowLeg::SmallCall => Some(&self.small.call),
            FlowLeg::SmallPut => Some(&self.small.put),
            FlowLeg::LargeCall => Some(&self.large.call),
            FlowLeg::LargePut => Some(&self.large.put),
        }
    }

    /// Combined value per date over the union of the three component dates.
    pub fn combined(&self) -> DateSeries {
        reconcile_union(&[&self.retail, &self.small.net, &self.large.net], sum)
    }

    /// One record per date in the component union, date-ordered.
    pub fn records(&self, ticker: &str) -> Vec<CombinedFlowRecord> {
        union_dates(&[&self.retail, &self.small.net, &self.large.net])
            .into_iter()
            .map(|date| {
                let retail = self.retail.get_or_zero(date);
                let small = self.small.net.get_or_zero(date);
                let large = self.large.net.get_or_zero(date);
                CombinedFlowRecord {
                    date,
                    ticker: ticker.to_string(),
                    combined_value: retail + small + large,
                    retail_component: retail,
                    options_small_component: small,
                    options_large_component: large,
                }
            })
            .collect()
    }
}

/// Combined flow records for every ticker in `tickers`, grouped by ticker in
/// list order and date-ordered within a ticker.
///
/// # Errors
///
/// [`FlowError::EmptyTickerList`] when `tickers` is empty.
pub fn combined_flow(
    inputs: &FlowInputs,
    tickers: &[String],
) -> Result<Vec<CombinedFlowRecord>, FlowError> {
    if tickers.is_empty() {
        return Err(FlowError::EmptyTickerList);
    }
    Ok(tickers
        .iter()
        .flat_map(|ticker| TickerComponents::reconcile(inputs, ticker).records(ticker))
        .collect())
}
