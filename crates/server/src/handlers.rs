use actix_web::{get, web, HttpResponse};
use log::info;

use crate::error::ProxyError;
use crate::types::{AppState, HealthResponse, HistoryQuery, SearchQuery};

#[get("/search")]
pub async fn search_coins(
    query: web::Query<SearchQuery>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ProxyError> {
    let matches = data.proxy.search(&query.query).await?;
    Ok(HttpResponse::Ok().json(matches))
}

#[get("/suggest")]
pub async fn suggest_coins(
    query: web::Query<SearchQuery>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ProxyError> {
    let suggestions = data.proxy.suggest(&query.query).await?;
    Ok(HttpResponse::Ok().json(suggestions))
}

#[get("/crypto/{id}")]
pub async fn get_coin_detail(
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ProxyError> {
    let id = path.into_inner();
    info!("Detail request: {}", id);

    let detail = data.proxy.get_detail(&id).await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[get("/crypto/{id}/history")]
pub async fn get_coin_history(
    path: web::Path<String>,
    query: web::Query<HistoryQuery>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ProxyError> {
    let id = path.into_inner();
    info!("History request: {} days={:?} currency={:?}", id, query.days, query.currency);

    let history = data
        .proxy
        .get_history(&id, query.days, query.currency.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(history))
}

#[get("/health")]
pub async fn health_check(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
        cached_entries: data.proxy.cached_entries(),
    })
}

/// Registers every route on an actix `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(search_coins)
        .service(suggest_coins)
        .service(get_coin_history)
        .service(get_coin_detail)
        .service(health_check);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::tests::{FakeSource, BITCOIN_JSON};
    use crate::proxy::{CoinProxy, ProxySettings};
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn create_test_app_state(source: Arc<FakeSource>) -> web::Data<AppState> {
        web::Data::new(AppState {
            proxy: CoinProxy::new(source, ProxySettings::default()),
        })
    }

    fn seeded_source() -> Arc<FakeSource> {
        let source = Arc::new(FakeSource::with_catalog(&["bitcoin", "bitcoin-cash", "ethereum"]));
        source.add_coin("bitcoin", BITCOIN_JSON);
        source.add_chart("bitcoin", vec![(1704067200000, 42000.0), (1704070800000, 42100.0)]);
        source
    }

    #[actix_web::test]
    async fn test_search_endpoint() {
        let app = test::init_service(App::new().app_data(create_test_app_state(seeded_source())).configure(configure)).await;

        let req = test::TestRequest::get().uri("/search?query=Bitcoin").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let ids: Vec<&str> = body.as_array().unwrap().iter().map(|c| c["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["bitcoin", "bitcoin-cash"]);
        assert_eq!(body[0]["symbol"], "bit");
    }

    #[actix_web::test]
    async fn test_search_without_query_is_bad_request() {
        let app = test::init_service(App::new().app_data(create_test_app_state(seeded_source())).configure(configure)).await;

        for uri in ["/search", "/search?query=", "/search?query=%20%20"] {
            let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "uri: {}", uri);
            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "Query parameter is required");
        }
    }

    #[actix_web::test]
    async fn test_suggest_endpoint() {
        let app = test::init_service(App::new().app_data(create_test_app_state(seeded_source())).configure(configure)).await;

        let req = test::TestRequest::get().uri("/suggest?query=etherium").to_request();
        let body: Vec<String> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0], "ethereum");
    }

    #[actix_web::test]
    async fn test_detail_endpoint() {
        let app = test::init_service(App::new().app_data(create_test_app_state(seeded_source())).configure(configure)).await;

        let req = test::TestRequest::get().uri("/crypto/bitcoin").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["name"], "Bitcoin");
        assert_eq!(body["symbol"], "BTC");
        assert_eq!(body["price"], 50000.0);
        assert_eq!(body["price_change_24h"], 2.5);
        assert_eq!(body["last_updated"], "2024-01-01T00:00:00.000Z");
    }

    #[actix_web::test]
    async fn test_detail_not_found_is_rechecked() {
        let source = seeded_source();
        let app = test::init_service(App::new().app_data(create_test_app_state(source.clone())).configure(configure)).await;

        for _ in 0..2 {
            let resp = test::call_service(&app, test::TestRequest::get().uri("/crypto/doesnotexist").to_request()).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        }
        assert_eq!(source.coin_calls.load(Ordering::SeqCst), 2);
    }

    #[actix_web::test]
    async fn test_upstream_failure_status_is_forwarded() {
        let source = seeded_source();
        source.fail_with(Some(ProxyError::timed_out()));
        let app = test::init_service(App::new().app_data(create_test_app_state(source)).configure(configure)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/crypto/bitcoin").to_request()).await;
        assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Request timed out");
    }

    #[actix_web::test]
    async fn test_history_endpoint() {
        let source = seeded_source();
        let app = test::init_service(App::new().app_data(create_test_app_state(source.clone())).configure(configure)).await;

        let req = test::TestRequest::get().uri("/crypto/bitcoin/history?days=30&currency=EUR").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["timestamp"], 1704067200000i64);
        assert_eq!(body[1]["price"], 42100.0);
        assert_eq!(
            *source.last_chart_request.lock().unwrap(),
            Some(("bitcoin".to_string(), "eur".to_string(), 30))
        );
    }

    #[actix_web::test]
    async fn test_history_rejects_malformed_days() {
        let app = test::init_service(App::new().app_data(create_test_app_state(seeded_source())).configure(configure)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/crypto/bitcoin/history?days=-1").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_health_reports_cache_size() {
        let app = test::init_service(App::new().app_data(create_test_app_state(seeded_source())).configure(configure)).await;

        test::call_service(&app, test::TestRequest::get().uri("/crypto/bitcoin").to_request()).await;
        let body: serde_json::Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request()).await;

        assert_eq!(body["status"], "ok");
        assert_eq!(body["cached_entries"], 1);
        assert!(body["timestamp"].as_str().is_some());
    }
}
