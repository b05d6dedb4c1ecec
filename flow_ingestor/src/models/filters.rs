//! Upstream query filters.
//!
//! Each enum renders to the exact query-string token the flow API expects via
//! [`as_query`](TransactionType::as_query) and deserializes from the same
//! lower-case token in config files.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Side of retail stock flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Buy,
    Sell,
    /// Net of buys and sells; sent without a `type` parameter.
    #[default]
    Combined,
}

impl TransactionType {
    /// Value of the `type` query parameter, `None` for [`TransactionType::Combined`].
    pub fn as_query(self) -> Option<&'static str> {
        match self {
            TransactionType::Buy => Some("buy"),
            TransactionType::Sell => Some("sell"),
            TransactionType::Combined => None,
        }
    }
}

/// Option moneyness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Moneyness {
    #[default]
    #[serde(rename = "OTM", alias = "otm")]
    Otm,
    #[serde(rename = "ITM", alias = "itm")]
    Itm,
    #[serde(rename = "ATM", alias = "atm")]
    Atm,
}

impl Moneyness {
    pub fn as_query(self) -> &'static str {
        match self {
            Moneyness::Otm => "OTM",
            Moneyness::Itm => "ITM",
            Moneyness::Atm => "ATM",
        }
    }
}

/// Trade size bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeBucket {
    Small,
    Large,
    /// Small and large fetched separately and merged per key and date.
    Combined,
}

impl SizeBucket {
    /// Buckets the API can be queried for directly.
    pub fn fetchable(self) -> &'static [SizeBucket] {
        match self {
            SizeBucket::Small => &[SizeBucket::Small],
            SizeBucket::Large => &[SizeBucket::Large],
            SizeBucket::Combined => &[SizeBucket::Small, SizeBucket::Large],
        }
    }

    /// Value of the `size` query parameter.
    ///
    /// `Combined` has no upstream token; use [`SizeBucket::fetchable`].
    pub fn as_query(self) -> Option<&'static str> {
        match self {
            SizeBucket::Small => Some("small"),
            SizeBucket::Large => Some("large"),
            SizeBucket::Combined => None,
        }
    }
}

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionSide {
    Call,
    Put,
}

impl OptionSide {
    pub fn as_query(self) -> &'static str {
        match self {
            OptionSide::Call => "call",
            OptionSide::Put => "put",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query().unwrap_or("combined"))
    }
}

impl fmt::Display for SizeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query().unwrap_or("combined"))
    }
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}
