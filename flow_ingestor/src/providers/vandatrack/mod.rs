//! HTTP provider for the VandaTrack retail-flow and options-premium API.

pub mod params;
pub mod response;

use async_trait::async_trait;
use flow_signals::models::NamedSeries;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::get_env_var;
use snafu::ResultExt;
use tracing::{debug, warn};

use crate::{
    config::FetchSettings,
    models::request_params::{FlowRequestParams, OptionsRequestParams},
    providers::{
        ApiSnafu, DecodeSnafu, FlowDataProvider, ProviderError, ProviderInitError, ValidationSnafu,
    },
    throttle::CallSpacer,
};

use self::{
    params::{bucket_tokens, options_query, retail_query},
    response::parse_named_series,
};

pub struct VandaTrackProvider {
    client: Client,
    token: SecretString,
    flow_url: String,
    options_url: String,
    spacer: CallSpacer,
}

impl VandaTrackProvider {
    /// Creates a provider from fetch settings.
    ///
    /// Reads the API token from the environment variable named by
    /// `settings.token_env`.
    pub fn new(settings: &FetchSettings) -> Result<Self, ProviderInitError> {
        let token = SecretString::new(get_env_var(&settings.token_env)?.into());
        Self::with_token(settings, token)
    }

    /// Creates a provider with an explicit token.
    pub fn with_token(settings: &FetchSettings, token: SecretString) -> Result<Self, ProviderInitError> {
        let client = Client::builder().timeout(settings.timeout()).build()?;
        Ok(Self {
            client,
            token,
            flow_url: settings.flow_base_url.clone(),
            options_url: settings.options_base_url.clone(),
            spacer: CallSpacer::new(settings.call_spacing()),
        })
    }

    /// One spaced request; the gap after it starts once the body is read.
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<NamedSeries, ProviderError> {
        self.spacer.space(self.request(url, query)).await
    }

    async fn request(&self, url: &str, query: &[(String, String)]) -> Result<NamedSeries, ProviderError> {
        let response = self
            .client
            .get(url)
            .query(&[("auth_token", self.token.expose_secret())])
            .query(query)
            .send()
            .await?;

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
        let series = parse_named_series(&body).context(DecodeSnafu)?;
        debug!(url, keys = series.len(), "flow API call");
        Ok(series)
    }
}

#[async_trait]
impl FlowDataProvider for VandaTrackProvider {
    async fn fetch_retail(&self, params: FlowRequestParams) -> Result<NamedSeries, ProviderError> {
        if params.ticker.trim().is_empty() {
            return ValidationSnafu {
                message: "retail request needs a ticker",
            }
            .fail();
        }
        self.get(&self.flow_url, &retail_query(&params)).await
    }

    async fn fetch_options(&self, params: OptionsRequestParams) -> Result<NamedSeries, ProviderError> {
        if params.tickers.is_empty() {
            return ValidationSnafu {
                message: "options request needs at least one ticker",
            }
            .fail();
        }

        // Combined size: one request per bucket, merged per key and date. A
        // failed bucket contributes nothing; only when every bucket fails is
        // the call an error.
        let buckets = bucket_tokens(params.size);
        let mut merged = NamedSeries::new();
        let mut last_error = None;
        let mut succeeded = 0usize;
        for &bucket in &buckets {
            match self.get(&self.options_url, &options_query(&params, bucket)).await {
                Ok(part) => {
                    merged.extend_from(&part);
                    succeeded += 1;
                }
                Err(e) => {
                    if buckets.len() > 1 {
                        warn!(
                            bucket,
                            side = %params.side,
                            error = %e,
                            "options bucket failed, merging the rest"
                        );
                    }
                    last_error = Some(e);
                }
            }
        }
        match last_error {
            Some(e) if succeeded == 0 => Err(e),
            _ => Ok(merged),
        }
    }
}
