use crate::core::rates::{RateError, RateProvider, RateTable};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

const LATEST_PATH: &str = "/api/latest.json";

/// Fetches the latest table from an Open Exchange Rates compatible endpoint.
pub struct OpenExchangeRatesProvider {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl OpenExchangeRatesProvider {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("fxtui/0.1")
            .timeout(timeout)
            .build()?;
        Ok(OpenExchangeRatesProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    timestamp: f64,
    base: Option<String>,
    rates: HashMap<String, f64>,
}

#[async_trait]
impl RateProvider for OpenExchangeRatesProvider {
    #[instrument(name = "LatestRatesFetch", skip(self))]
    async fn fetch_latest(&self) -> Result<RateTable, RateError> {
        let api_key = self.api_key.as_deref().ok_or(RateError::Config)?;

        let url = format!("{}{}", self.base_url, LATEST_PATH);
        debug!("Requesting latest rates from {}", url);

        let response = self
            .client
            .get(format!("{url}?app_id={api_key}"))
            .send()
            .await
            .map_err(RateError::Transport)?;

        if !response.status().is_success() {
            return Err(RateError::RemoteStatus(response.status().as_u16()));
        }

        let body = response.bytes().await.map_err(RateError::Transport)?;
        let data: LatestResponse =
            serde_json::from_slice(&body).map_err(|e| RateError::Decode(e.to_string()))?;

        let as_of = data
            .timestamp
            .is_finite()
            .then(|| Utc.timestamp_opt(data.timestamp.trunc() as i64, 0).single())
            .flatten();
        let base = data.base.as_deref().unwrap_or("USD");
        let table = RateTable::new(base, data.rates, as_of)
            .ok_or_else(|| RateError::Decode("response contained no usable rates".to_string()))?;

        debug!(entries = table.len(), base = table.base(), "Decoded latest rates");
        Ok(table)
    }
}
