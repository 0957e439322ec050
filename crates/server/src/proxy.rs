use log::info;
use shared::{close_matches, CoinDetail, CoinSummary, PricePoint};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::TtlCache;
use crate::convert::{filter_catalog, project_detail, project_history};
use crate::error::ProxyError;
use crate::upstream::MarketDataSource;
use crate::wire::CoinListEntry;

/// History cache key: coin id, day range, quote currency.
type HistoryKey = (String, u32, String);

/// Cache slot holding the full upstream catalog.
const CATALOG_KEY: &str = "coin_list";

pub const DEFAULT_HISTORY_DAYS: u32 = 7;
pub const DEFAULT_CURRENCY: &str = "usd";

/// Minimum similarity for an autocomplete suggestion.
const SUGGEST_CUTOFF: f64 = 0.4;

#[derive(Debug, Clone)]
pub struct ProxySettings {
    pub catalog_ttl: Duration,
    pub detail_ttl: Duration,
    pub history_ttl: Duration,
    /// Currency every `CoinDetail` amount is quoted in.
    pub reference_currency: String,
    /// Upper bound on search and suggest results.
    pub result_limit: usize,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            catalog_ttl: Duration::from_secs(600),
            detail_ttl: Duration::from_secs(120),
            history_ttl: Duration::from_secs(600),
            reference_currency: DEFAULT_CURRENCY.to_string(),
            result_limit: 10,
        }
    }
}

/// Read-through caching proxy in front of a `MarketDataSource`.
///
/// Successful upstream results are reshaped and cached per request shape;
/// failures are returned to the caller and never cached.
pub struct CoinProxy {
    source: Arc<dyn MarketDataSource>,
    settings: ProxySettings,
    catalog: TtlCache<&'static str, Arc<Vec<CoinListEntry>>>,
    details: TtlCache<String, CoinDetail>,
    histories: TtlCache<HistoryKey, Vec<PricePoint>>,
}

fn normalize_query(query: &str) -> Result<String, ProxyError> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Err(ProxyError::InvalidRequest("Query parameter is required".to_string()));
    }
    Ok(query)
}

impl CoinProxy {
    pub fn new(source: Arc<dyn MarketDataSource>, settings: ProxySettings) -> Self {
        Self {
            source,
            settings,
            catalog: TtlCache::new("catalog"),
            details: TtlCache::new("detail"),
            histories: TtlCache::new("history"),
        }
    }

    async fn catalog(&self) -> Result<Arc<Vec<CoinListEntry>>, ProxyError> {
        self.catalog
            .get_or_fetch(CATALOG_KEY, self.settings.catalog_ttl, || async {
                let coins = self.source.coin_list().await?;
                info!("Fetched coin catalog with {} entries", coins.len());
                Ok::<_, ProxyError>(Arc::new(coins))
            })
            .await
    }

    /// Coins whose id contains `query`, case-insensitively, in catalog order.
    pub async fn search(&self, query: &str) -> Result<Vec<CoinSummary>, ProxyError> {
        let query = normalize_query(query)?;
        let catalog = self.catalog().await?;
        Ok(filter_catalog(&catalog, &query, self.settings.result_limit))
    }

    /// Catalog ids that look like `query`, best match first.
    pub async fn suggest(&self, query: &str) -> Result<Vec<String>, ProxyError> {
        let query = normalize_query(query)?;
        let catalog = self.catalog().await?;
        let ids = catalog.iter().map(|coin| coin.id.as_str());

        Ok(close_matches(&query, ids, self.settings.result_limit, SUGGEST_CUTOFF)
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    pub async fn get_detail(&self, id: &str) -> Result<CoinDetail, ProxyError> {
        self.details
            .get_or_fetch(id.to_string(), self.settings.detail_ttl, || async {
                let payload = self.source.coin(id).await?;
                Ok::<_, ProxyError>(project_detail(&payload, &self.settings.reference_currency))
            })
            .await
    }

    /// Price series for `id`; `days` defaults to 7 and `currency` to "usd".
    pub async fn get_history(&self, id: &str, days: Option<u32>, currency: Option<&str>) -> Result<Vec<PricePoint>, ProxyError> {
        let days = days.unwrap_or(DEFAULT_HISTORY_DAYS);
        let currency = currency
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        let key = (id.to_string(), days, currency.clone());

        self.histories
            .get_or_fetch(key, self.settings.history_ttl, || async {
                let chart = self.source.market_chart(id, &currency, days).await?;
                Ok::<_, ProxyError>(project_history(&chart))
            })
            .await
    }

    /// Drops expired entries from every cache.
    pub fn purge_expired(&self) -> usize {
        self.catalog.purge_expired() + self.details.purge_expired() + self.histories.purge_expired()
    }

    pub fn cached_entries(&self) -> usize {
        self.catalog.len() + self.details.len() + self.histories.len()
    }
}
