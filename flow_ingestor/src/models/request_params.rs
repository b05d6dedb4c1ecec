use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::filters::{Moneyness, OptionSide, SizeBucket, TransactionType};

/// Parameters for one retail-flow request.
///
/// The flow API accepts a single ticker per retail request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRequestParams {
    pub ticker: String,
    /// Inclusive range start.
    pub from_date: NaiveDate,
    /// Inclusive range end.
    pub to_date: NaiveDate,
    pub transaction_type: TransactionType,
}

/// Parameters for one options-premium request over a ticker list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsRequestParams {
    pub tickers: Vec<String>,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub moneyness: Moneyness,
    pub side: OptionSide,
    /// [`SizeBucket::Combined`] is resolved by the provider into one request
    /// per concrete bucket.
    pub size: SizeBucket,
}

/// Parameters for a daily closing-price request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRequestParams {
    pub ticker: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}
