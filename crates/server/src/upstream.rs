use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::ProxyError;
use crate::wire::{CoinListEntry, CoinPayload, MarketChart};

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Read-only view of the upstream market-data API.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Full coin catalog.
    async fn coin_list(&self) -> Result<Vec<CoinListEntry>, ProxyError>;

    /// Detail payload for one coin id.
    async fn coin(&self, id: &str) -> Result<CoinPayload, ProxyError>;

    /// Price series for `id` over the last `days` days, quoted in `currency`.
    async fn market_chart(&self, id: &str, currency: &str, days: u32) -> Result<MarketChart, ProxyError>;
}

/// `MarketDataSource` backed by the public CoinGecko v3 REST API.
pub struct CoinGeckoClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    pub fn new(base_url: &str, timeout: Duration, api_key: Option<String>) -> Result<Self, String> {
        let base_url = Url::parse(base_url).map_err(|e| format!("Invalid upstream base URL {}: {}", base_url, e))?;
        if base_url.cannot_be_a_base() {
            return Err(format!("Upstream base URL {} cannot carry a path", base_url));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self { client, base_url, api_key })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new(), so the segments are always writable
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, &str)], subject: &str) -> Result<T, ProxyError> {
        debug!("Upstream request: {}", url);

        let mut request = self.client.get(url).query(query).header("Accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        let response = request.send().await.map_err(translate_transport_error)?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            warn!("Upstream reports {} as unknown", subject);
            return Err(ProxyError::UpstreamNotFound(not_found_message(&body, subject)));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Upstream returned status {} for {}: {}", status, subject, body);
            let message = if body.trim().is_empty() { status.to_string() } else { body };
            return Err(ProxyError::UpstreamUnavailable {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<T>().await.map_err(translate_transport_error)
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    async fn coin_list(&self) -> Result<Vec<CoinListEntry>, ProxyError> {
        self.get_json(self.endpoint(&["coins", "list"]), &[], "coin list").await
    }

    async fn coin(&self, id: &str) -> Result<CoinPayload, ProxyError> {
        let query = [
            ("localization", "false"),
            ("tickers", "false"),
            ("community_data", "false"),
            ("developer_data", "false"),
        ];
        self.get_json(self.endpoint(&["coins", id]), &query, id).await
    }

    async fn market_chart(&self, id: &str, currency: &str, days: u32) -> Result<MarketChart, ProxyError> {
        let days = days.to_string();
        let query = [("vs_currency", currency), ("days", days.as_str())];
        self.get_json(self.endpoint(&["coins", id, "market_chart"]), &query, id).await
    }
}

fn translate_transport_error(e: reqwest::Error) -> ProxyError {
    if e.is_timeout() {
        warn!("Upstream request timed out: {}", e);
        ProxyError::timed_out()
    } else if e.is_decode() {
        warn!("Upstream sent an unreadable body: {}", e);
        ProxyError::UpstreamUnavailable {
            status: 502,
            message: format!("Invalid upstream response: {}", e),
        }
    } else {
        warn!("Upstream request failed: {}", e);
        ProxyError::transport(e)
    }
}

/// Prefers the upstream's own `{"error": "..."}` text when it sends one.
fn not_found_message(body: &str, subject: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("{} not found", subject))
}
