use serde::{Deserialize, Serialize};

use crate::proxy::CoinProxy;

pub struct AppState {
    pub proxy: CoinProxy,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Missing is treated like empty and rejected by the proxy.
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub days: Option<u32>,
    pub currency: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub cached_entries: usize,
}
