//! Query strings for the flow API. The auth token is appended at send time
//! and never appears here.

use crate::models::{
    filters::SizeBucket,
    request_params::{FlowRequestParams, OptionsRequestParams},
};

const DATE_FMT: &str = "%Y-%m-%d";

pub fn retail_query(params: &FlowRequestParams) -> Vec<(String, String)> {
    let mut q = vec![
        ("tickers".to_string(), params.ticker.clone()),
        ("from_date".to_string(), params.from_date.format(DATE_FMT).to_string()),
        ("to_date".to_string(), params.to_date.format(DATE_FMT).to_string()),
    ];
    if let Some(side) = params.transaction_type.as_query() {
        q.push(("type".to_string(), side.to_string()));
    }
    q
}

/// Query for one concrete size bucket; `tickers` is repeated per symbol.
pub fn options_query(params: &OptionsRequestParams, bucket: &'static str) -> Vec<(String, String)> {
    let mut q: Vec<(String, String)> = params
        .tickers
        .iter()
        .map(|t| ("tickers".to_string(), t.clone()))
        .collect();
    q.extend([
        ("saved_list".to_string(), "false".to_string()),
        ("from_date".to_string(), params.from_date.format(DATE_FMT).to_string()),
        ("to_date".to_string(), params.to_date.format(DATE_FMT).to_string()),
        ("moneyness".to_string(), params.moneyness.as_query().to_string()),
        ("callput".to_string(), params.side.as_query().to_string()),
        ("size".to_string(), bucket.to_string()),
    ]);
    q
}

/// Concrete bucket tokens to request for `size`.
pub fn bucket_tokens(size: SizeBucket) -> Vec<&'static str> {
    size.fetchable().iter().filter_map(|b| b.as_query()).collect()
}
