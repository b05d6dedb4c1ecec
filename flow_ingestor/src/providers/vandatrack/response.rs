//! Decoding of flow API bodies.
//!
//! A successful body is a JSON object `{ raw_key: { "YYYY-MM-DD": number } }`.
//! Entries whose value is not an object are skipped, as are non-numeric
//! values. `null`, arrays and other non-object bodies decode to an empty
//! mapping.

use flow_signals::models::NamedSeries;
use indexmap::IndexMap;
use serde::{Deserialize, de::IgnoredAny};
use serde_json::Value;
use tracing::debug;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBody {
    Keyed(IndexMap<String, Value>),
    Other(IgnoredAny),
}

fn as_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn parse_named_series(body: &str) -> Result<NamedSeries, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(NamedSeries::new());
    }
    let keyed = match serde_json::from_str::<RawBody>(body)? {
        RawBody::Keyed(map) => map,
        RawBody::Other(_) => return Ok(NamedSeries::new()),
    };

    let mut skipped_keys = 0usize;
    let entries: Vec<(String, Vec<(String, f64)>)> = keyed
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Object(dates) => Some((
                key,
                dates
                    .iter()
                    .filter_map(|(d, v)| as_number(v).map(|n| (d.clone(), n)))
                    .collect(),
            )),
            _ => {
                skipped_keys += 1;
                None
            }
        })
        .collect();

    let conv = NamedSeries::from_raw(entries);
    debug!(
        keys = conv.series.len(),
        skipped_keys,
        skipped_dates = conv.skipped_dates,
        "decoded flow body"
    );
    Ok(conv.series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_signals::models::parse_iso_date;

    #[test]
    fn decodes_keyed_dates() {
        let body = r#"{
            "OTM_small_AAPL": {"2024-01-02": 1500.5, "2024-01-03": "-20"},
            "meta": "ignored",
            "MSFT": {"2024-01-02": null, "bad-date": 3}
        }"#;
        let s = parse_named_series(body).unwrap();
        assert_eq!(s.len(), 2);
        let aapl = s.get("OTM_small_AAPL").unwrap();
        assert_eq!(aapl.get(parse_iso_date("2024-01-02").unwrap()), Some(1500.5));
        assert_eq!(aapl.get(parse_iso_date("2024-01-03").unwrap()), Some(-20.0));
        assert!(s.get("MSFT").unwrap().is_empty());
        // insertion order kept
        let keys: Vec<&str> = s.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["OTM_small_AAPL", "MSFT"]);
    }

    #[test]
    fn non_object_bodies_are_empty() {
        for body in ["", "null", "[]", "{}", "\"nope\""] {
            assert!(parse_named_series(body).unwrap().is_empty(), "{body}");
        }
        assert!(parse_named_series("{not json").is_err());
    }
}
