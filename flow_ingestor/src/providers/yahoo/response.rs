use chrono::DateTime;
use flow_signals::models::DateSeries;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Deserialize, Debug)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Deserialize, Debug)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Deserialize, Debug)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

#[derive(Deserialize, Debug)]
pub struct Quote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

impl ChartResult {
    /// Closes keyed by UTC date; null closes are skipped.
    pub fn closes(&self) -> DateSeries {
        let Some(quote) = self.indicators.quote.first() else {
            return DateSeries::new();
        };
        self.timestamp
            .iter()
            .zip(&quote.close)
            .filter_map(|(ts, close)| {
                let close = (*close)?;
                let date = DateTime::from_timestamp(*ts, 0)?.date_naive();
                Some((date, close))
            })
            .collect()
    }
}
