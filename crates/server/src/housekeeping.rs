use actix_web::web;
use log::{debug, info};
use std::time::Duration;
use tokio::time;

use crate::types::AppState;

/// Periodically drops expired cache entries so memory tracks the live set
/// rather than every key ever requested.
pub async fn purge_caches_periodically(state: web::Data<AppState>, every: Duration) {
    info!("Starting periodic cache purge every {}s", every.as_secs());
    let mut interval = time::interval(every);
    // the first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        let removed = state.proxy.purge_expired();
        if removed > 0 {
            info!("Purged {} expired cache entries", removed);
        } else {
            debug!("No expired cache entries to purge");
        }
    }
}
