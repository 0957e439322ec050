use shared::{CoinDetail, CoinSummary, PricePoint};

use crate::wire::{CoinListEntry, CoinPayload, CurrencyAmounts, MarketChart};

/// Catalog entries whose id contains `query` (already lower-cased), in
/// catalog order, truncated to `limit`.
pub fn filter_catalog(catalog: &[CoinListEntry], query: &str, limit: usize) -> Vec<CoinSummary> {
    catalog
        .iter()
        .filter(|coin| coin.id.to_lowercase().contains(query))
        .take(limit)
        .map(|coin| CoinSummary {
            id: coin.id.clone(),
            symbol: coin.symbol.clone(),
            name: coin.name.clone(),
        })
        .collect()
}

fn amount(amounts: &Option<CurrencyAmounts>, currency: &str) -> Option<f64> {
    amounts.as_ref()?.get(currency).copied().flatten()
}

pub fn project_detail(payload: &CoinPayload, currency: &str) -> CoinDetail {
    let market = payload.market_data.clone().unwrap_or_default();

    CoinDetail {
        name: payload.name.clone(),
        symbol: payload.symbol.as_ref().map(|s| s.to_uppercase()),
        price: amount(&market.current_price, currency),
        market_cap: amount(&market.market_cap, currency),
        high_24h: amount(&market.high_24h, currency),
        low_24h: amount(&market.low_24h, currency),
        ath: amount(&market.ath, currency),
        atl: amount(&market.atl, currency),
        price_change_24h: market.price_change_percentage_24h,
        volume: amount(&market.total_volume, currency),
        last_updated: payload.last_updated.clone(),
    }
}

/// One point per upstream pair; order and count are kept as received.
pub fn project_history(chart: &MarketChart) -> Vec<PricePoint> {
    chart
        .prices
        .iter()
        .map(|&(timestamp, price)| PricePoint { timestamp, price })
        .collect()
}
