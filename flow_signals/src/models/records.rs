//! Value records produced by the engine: per-date points, net premium and
//! combined-flow rows, the four report flow types and the single-sided legs.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observation of one flow series for one ticker.
///
/// At most one point exists per `(ticker, date)` within a named series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowPoint {
    /// Calendar date of the observation.
    pub date: NaiveDate,
    /// Canonical ticker symbol.
    pub ticker: String,
    /// Signed value in currency units.
    pub value: f64,
}

/// Call-minus-put net premium for one ticker on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetPremiumRecord {
    /// Calendar date.
    pub date: NaiveDate,
    /// Canonical ticker symbol.
    pub ticker: String,
    /// `call_value - put_value`.
    pub value: f64,
    /// Reconciled call premium (zero when the date had no call data).
    pub call_value: f64,
    /// Reconciled put premium (zero when the date had no put data).
    pub put_value: f64,
}

/// Retail + small net premium + large net premium for one ticker on one date.
///
/// `combined_value` is always the plain floating-point sum of the three
/// components, no rounding applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedFlowRecord {
    /// Calendar date.
    pub date: NaiveDate,
    /// Canonical ticker symbol.
    pub ticker: String,
    /// Sum of the three components.
    pub combined_value: f64,
    /// Retail flow on this date (zero when absent).
    pub retail_component: f64,
    /// Small-bucket options net premium (zero when absent).
    pub options_small_component: f64,
    /// Large-bucket options net premium (zero when absent).
    pub options_large_component: f64,
}

/// The four flow views every report covers, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowType {
    /// Retail stock order flow.
    Retail,
    /// Net premium of retail-sized (small) options trades.
    OptionsSmall,
    /// Net premium of institutional-sized (large) options trades.
    OptionsLarge,
    /// Retail + small net + large net.
    Combined,
}

impl FlowType {
    /// All flow types in report order.
    pub const ALL: [FlowType; 4] = [
        FlowType::Retail,
        FlowType::OptionsSmall,
        FlowType::OptionsLarge,
        FlowType::Combined,
    ];

    /// Human-readable label used for table titles.
    pub fn label(self) -> &'static str {
        match self {
            FlowType::Retail => "Retail",
            FlowType::OptionsSmall => "Options Small",
            FlowType::OptionsLarge => "Options Large",
            FlowType::Combined => "Combined",
        }
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One side of a flow view, analysed on its own next to the net views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowLeg {
    /// Retail buy-side flow.
    RetailBuy,
    /// Retail sell-side flow.
    RetailSell,
    /// Small-bucket call premium.
    SmallCall,
    /// Small-bucket put premium.
    SmallPut,
    /// Large-bucket call premium.
    LargeCall,
    /// Large-bucket put premium.
    LargePut,
}

impl FlowLeg {
    /// All legs in report order.
    pub const ALL: [FlowLeg; 6] = [
        FlowLeg::RetailBuy,
        FlowLeg::RetailSell,
        FlowLeg::SmallCall,
        FlowLeg::SmallPut,
        FlowLeg::LargeCall,
        FlowLeg::LargePut,
    ];

    /// Human-readable label used for table titles.
    pub fn label(self) -> &'static str {
        match self {
            FlowLeg::RetailBuy => "Retail Buy",
            FlowLeg::RetailSell => "Retail Sell",
            FlowLeg::SmallCall => "Options Small Call",
            FlowLeg::SmallPut => "Options Small Put",
            FlowLeg::LargeCall => "Options Large Call",
            FlowLeg::LargePut => "Options Large Put",
        }
    }

    /// True for the retail buy and sell legs.
    pub fn is_retail(self) -> bool {
        matches!(self, FlowLeg::RetailBuy | FlowLeg::RetailSell)
    }
}

impl fmt::Display for FlowLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
