use serde::Deserialize;
use std::collections::HashMap;

// Upstream (CoinGecko v3) payload shapes. Only the fields the proxy projects
// are declared; everything defaults when absent or null.

/// Per-currency amounts, e.g. `{"usd": 50000.0, "eur": 46000.0}`.
pub type CurrencyAmounts = HashMap<String, Option<f64>>;

/// Entry of `/coins/list`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoinListEntry {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
}

/// Body of `/coins/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoinPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub market_data: Option<MarketData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketData {
    #[serde(default)]
    pub current_price: Option<CurrencyAmounts>,
    #[serde(default)]
    pub market_cap: Option<CurrencyAmounts>,
    #[serde(default)]
    pub high_24h: Option<CurrencyAmounts>,
    #[serde(default)]
    pub low_24h: Option<CurrencyAmounts>,
    #[serde(default)]
    pub ath: Option<CurrencyAmounts>,
    #[serde(default)]
    pub atl: Option<CurrencyAmounts>,
    #[serde(default)]
    pub total_volume: Option<CurrencyAmounts>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
}

/// Body of `/coins/{id}/market_chart`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketChart {
    /// `[timestamp_ms, price]` pairs in upstream order. A gap in the series
    /// arrives as a `null` price and is kept.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub prices: Vec<(i64, Option<f64>)>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<(i64, Option<f64>)>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<(i64, Option<f64>)>>::deserialize(deserializer)?.unwrap_or_default())
}
