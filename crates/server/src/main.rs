// Coin lookup server - read-through caching proxy in front of the CoinGecko API

use actix_web::{middleware, web, App, HttpServer};
use log::{info, warn};
use std::sync::Arc;

mod cache;
mod config;
mod convert;
mod error;
mod handlers;
mod housekeeping;
mod proxy;
mod types;
mod upstream;
mod wire;

use config::{load_env_file, ServerConfig};
use housekeeping::purge_caches_periodically;
use proxy::CoinProxy;
use types::AppState;
use upstream::CoinGeckoClient;

fn startup_error(message: String) -> std::io::Error {
    eprintln!("{}", message);
    std::io::Error::new(std::io::ErrorKind::Other, message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let env_file = load_env_file();

    let config = ServerConfig::load().map_err(|e| startup_error(format!("Failed to load server configuration: {}", e)))?;
    config.setup_logging();

    match env_file {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) => warn!("No {} loaded ({}), using process environment", config::ENV_FILE, e),
    }

    let upstream = CoinGeckoClient::new(
        &config.upstream_base_url,
        config.upstream_timeout(),
        config.upstream_api_key.clone(),
    )
    .map_err(startup_error)?;

    let settings = config.proxy_settings();
    info!(
        "Upstream {} (timeout {}s), TTLs catalog={}s detail={}s history={}s, currency {}",
        config.upstream_base_url,
        config.upstream_timeout_seconds,
        settings.catalog_ttl.as_secs(),
        settings.detail_ttl.as_secs(),
        settings.history_ttl.as_secs(),
        settings.reference_currency
    );

    let state = web::Data::new(AppState {
        proxy: CoinProxy::new(Arc::new(upstream), settings),
    });

    let state_clone = state.clone();
    let purge_interval = config.purge_interval();
    tokio::spawn(async move {
        purge_caches_periodically(state_clone, purge_interval).await;
    });

    info!("Starting coin lookup server on http://{}:{}", config.http_host, config.http_port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::DefaultHeaders::new().add(("Access-Control-Allow-Origin", "*")))
            .wrap(middleware::Logger::default())
            .configure(handlers::configure)
    })
    .bind((config.http_host.as_str(), config.http_port))?
    .run()
    .await
}
