//! Daily closing prices from the Yahoo Finance chart endpoint.

pub mod response;

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use flow_signals::models::DateSeries;
use reqwest::Client;
use snafu::ResultExt;
use tracing::debug;

use crate::{
    config::FetchSettings,
    models::request_params::PriceRequestParams,
    providers::{ApiSnafu, DecodeSnafu, PriceProvider, ProviderError, ProviderInitError, ValidationSnafu},
};

use self::response::ChartResponse;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; flow-report)";

pub struct YahooChartProvider {
    client: Client,
    base_url: String,
}

impl YahooChartProvider {
    pub fn new(settings: &FetchSettings) -> Result<Self, ProviderInitError> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: settings.price_base_url.clone(),
        })
    }

    fn url(&self, ticker: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), ticker)
    }
}

fn epoch_secs(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

#[async_trait]
impl PriceProvider for YahooChartProvider {
    async fn fetch_closes(&self, params: PriceRequestParams) -> Result<DateSeries, ProviderError> {
        if params.ticker.trim().is_empty() {
            return ValidationSnafu {
                message: "price request needs a ticker",
            }
            .fail();
        }
        // period2 is exclusive: include the whole of to_date.
        let end = params.to_date.checked_add_days(Days::new(1)).unwrap_or(params.to_date);
        let query = [
            ("period1", epoch_secs(params.from_date).to_string()),
            ("period2", epoch_secs(end).to_string()),
            ("interval", "1d".to_string()),
        ];

        let response = self.client.get(self.url(&params.ticker)).query(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return ApiSnafu {
                status: status.as_u16(),
                message,
            }
            .fail();
        }

        let body = response.text().await?;
        let chart: ChartResponse = serde_json::from_str(&body).context(DecodeSnafu)?;
        if let Some(err) = chart.chart.error {
            return ApiSnafu {
                status: status.as_u16(),
                message: format!("{}: {}", err.code, err.description),
            }
            .fail();
        }

        let closes = chart
            .chart
            .result
            .unwrap_or_default()
            .first()
            .map(|r| r.closes())
            .unwrap_or_default();
        debug!(ticker = %params.ticker, points = closes.len(), "price API call");
        Ok(closes)
    }
}
