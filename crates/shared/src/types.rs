use serde::{Deserialize, Serialize};

// Output schema returned by the proxy. Field names are part of the HTTP contract.

/// One entry of the upstream coin catalog, as returned by a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinSummary {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

/// Market snapshot of a single coin, all amounts in one reference currency.
///
/// Every field is optional: an upstream payload that lacks a value yields
/// `null` for that field instead of failing the lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinDetail {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub price: Option<f64>,
    pub market_cap: Option<f64>,
    pub high_24h: Option<f64>,
    pub low_24h: Option<f64>,
    pub ath: Option<f64>,
    pub atl: Option<f64>,
    pub price_change_24h: Option<f64>,
    pub volume: Option<f64>,
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Milliseconds since the Unix epoch, as reported upstream.
    pub timestamp: i64,
    /// `None` where the upstream series has a gap.
    pub price: Option<f64>,
}
