//! Raw source key -> canonical ticker matching.
//!
//! Upstream responses key their series inconsistently: the bare symbol
//! (`"AAPL"`), a composite with a bucket prefix (`"OTM_small_AAPL"`), or a
//! symbol with a suffix (`"AAPL_calls"`). [`matches`] accepts a key when any
//! of these hold, compared case-insensitively:
//!
//! 1. the key equals the ticker;
//! 2. the ticker is a substring of the key;
//! 3. the segment after the key's last `_` equals the ticker;
//! 4. the key ends with `_TICKER` or starts with `TICKER_`.
//!
//! Rule 2 is deliberately loose and does not respect symbol boundaries: `"AA"`
//! matches `"AAPL"`. Several keys can match one ticker (one per size bucket,
//! say); reconciliation sums them rather than picking one.

/// True if `raw_key` refers to `target_ticker` under any of the module rules.
pub fn matches(raw_key: &str, target_ticker: &str) -> bool {
    let key = raw_key.to_uppercase();
    let target = target_ticker.to_uppercase();

    if key == target {
        return true;
    }
    if key.contains(&target) {
        return true;
    }
    if let Some((_, tail)) = key.rsplit_once('_') {
        if tail == target {
            return true;
        }
    }
    key.ends_with(&format!("_{target}")) || key.starts_with(&format!("{target}_"))
}
