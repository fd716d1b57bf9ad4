//! HTTP endpoints for the search service
//!
//! Two GET routes share the engine: `/api/search` is the lightweight
//! typeahead variant returning results plus suggestion chips, and `/search`
//! is the full listing variant with filters, sort overrides and facets.
//! Both respond with a JSON envelope; failures degrade to `success: false`
//! with a generic message rather than surfacing store internals.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Query,
    response::{IntoResponse, Json, Redirect, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::catalog::{Filters, Product, ProductStore};
use crate::error::{validate_query, AppError};
use crate::search::engine::{Facets, DEFAULT_SUGGEST_LIMIT};
use crate::search::{SearchEngine, SearchRequest, SortMode};

/// Query string of the typeahead endpoint
#[derive(Debug, Deserialize)]
pub struct QuickParams {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

/// Query string of the listing endpoint. Every value arrives as text and is
/// parsed leniently; an unparseable dimension is dropped, never an error.
#[derive(Debug, Deserialize)]
pub struct ListingParams {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub limit: Option<usize>,
}

/// JSON envelope of the typeahead endpoint
#[derive(Debug, Serialize)]
pub struct QuickSearchResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub query: String,
    pub results: Vec<Product>,
    pub count: usize,
    pub suggestions: Vec<String>,
}

impl QuickSearchResponse {
    fn failure(query: String, message: String) -> Self {
        Self {
            success: false,
            error: Some(message),
            query,
            results: Vec::new(),
            count: 0,
            suggestions: Vec::new(),
        }
    }
}

/// JSON envelope of the listing endpoint
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub query: String,
    pub sort: SortMode,
    pub filters: Filters,
    pub results: Vec<Product>,
    pub count: usize,
    pub used_fallback: bool,
    pub facets: Facets,
}

impl ListingResponse {
    fn failure(query: String, message: String) -> Self {
        Self {
            success: false,
            error: Some(message),
            query,
            sort: SortMode::default(),
            filters: Filters::default(),
            results: Vec::new(),
            count: 0,
            used_fallback: false,
            facets: Facets::default(),
        }
    }
}

const STORE_DOWN_MESSAGE: &str = "Search is temporarily unavailable";

/// Build the application router over a shared engine
pub fn router<S: ProductStore + 'static>(engine: Arc<SearchEngine<S>>) -> Router {
    let quick_engine = engine.clone();
    let quick_handler = move |Query(params): Query<QuickParams>| async move {
        Json(quick_search(&quick_engine, params))
    };

    let listing_handler = move |Query(params): Query<ListingParams>| async move {
        listing_search(&engine, params)
    };

    Router::new()
        .route("/api/search", get(quick_handler))
        .route("/search", get(listing_handler))
}

fn quick_search<S: ProductStore>(
    engine: &SearchEngine<S>,
    params: QuickParams,
) -> QuickSearchResponse {
    let raw = params.q.unwrap_or_default();
    if let Err(err) = validate_query(&raw) {
        return QuickSearchResponse::failure(raw, err.message());
    }

    let limit = params.limit.unwrap_or(DEFAULT_SUGGEST_LIMIT);
    match engine.quick_search(&raw, limit) {
        Ok(quick) => QuickSearchResponse {
            success: true,
            error: None,
            query: quick.query,
            results: quick.results,
            count: quick.count,
            suggestions: quick.suggestions,
        },
        Err(err) => {
            error!("typeahead search failed: {}", err);
            QuickSearchResponse::failure(raw, STORE_DOWN_MESSAGE.to_string())
        }
    }
}

fn listing_search<S: ProductStore>(
    engine: &SearchEngine<S>,
    params: ListingParams,
) -> Response {
    // A listing page without a term has nowhere to go but home
    let raw = match params.q.clone() {
        Some(q) if !q.trim().is_empty() => q,
        _ => return Redirect::to("/").into_response(),
    };

    if let Err(err) = validate_query(&raw) {
        return Json(ListingResponse::failure(raw, err.message())).into_response();
    }

    let request = SearchRequest {
        query: raw.clone(),
        sort: parse_sort(params.sort.as_deref()),
        filters: parse_filters(&params),
        limit: params.limit,
    };

    match engine.search(&request) {
        Ok(outcome) => Json(ListingResponse {
            success: true,
            error: None,
            query: outcome.query,
            sort: outcome.sort,
            filters: request.filters,
            results: outcome.results,
            count: outcome.count,
            used_fallback: outcome.used_fallback,
            facets: outcome.facets,
        })
        .into_response(),
        Err(err) => {
            error!("listing search failed: {}", err);
            Json(ListingResponse::failure(raw, STORE_DOWN_MESSAGE.to_string())).into_response()
        }
    }
}

/// Unknown sort names fall back to relevance
fn parse_sort(raw: Option<&str>) -> SortMode {
    raw.map(SortMode::parse).unwrap_or_default()
}

/// Assemble filters from raw query-string text. Prices that do not parse as
/// numbers are dropped; deeper sanitation (unknown categories, inverted
/// bounds) happens inside the engine.
fn parse_filters(params: &ListingParams) -> Filters {
    fn text(value: &Option<String>) -> Option<String> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn price(value: &Option<String>) -> Option<f64> {
        value
            .as_deref()
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
    }

    Filters {
        category: text(&params.category),
        brand: text(&params.brand),
        color: text(&params.color),
        price_min: price(&params.price_min),
        price_max: price(&params.price_max),
    }
}

/// Bind and serve until the process is stopped
pub async fn serve<S: ProductStore + 'static>(
    addr: SocketAddr,
    engine: Arc<SearchEngine<S>>,
) -> Result<(), AppError> {
    let app = router(engine);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("search service listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testutil::product;
    use crate::catalog::MemoryStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        let catalog = vec![
            product(1, "Marathon Pro", "Velocity", "running", "Red"),
            product(2, "Blaze Runner", "Velocity", "running", "Blue"),
            product(3, "City Walker", "CloudStep", "walking", "Black"),
        ];
        router(Arc::new(SearchEngine::new(MemoryStore::new(catalog))))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_api_search_returns_results() {
        let (status, body) = get_json(app(), "/api/search?q=running").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["count"].as_u64().unwrap() >= 2);
        assert!(body["suggestions"].as_array().unwrap().len() <= 4);
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_api_search_empty_query() {
        let (status, body) = get_json(app(), "/api/search?q=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 0);
        assert!(body["suggestions"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_api_search_missing_query_param() {
        let (status, body) = get_json(app(), "/api/search").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_api_search_rejects_overlong_query() {
        let uri = format!("/api/search?q={}", "a".repeat(201));
        let (status, body) = get_json(app(), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("200"));
    }

    #[tokio::test]
    async fn test_api_search_limit() {
        let (_, body) = get_json(app(), "/api/search?q=running&limit=1").await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_redirects_without_query() {
        let response = app()
            .oneshot(Request::builder().uri("/search").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/");
    }

    #[tokio::test]
    async fn test_search_redirects_on_blank_query() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/search?q=%20%20")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_search_listing_with_sort() {
        let (status, body) = get_json(app(), "/search?q=running&sort=price_low").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["sort"], "price_low");
        assert_eq!(body["used_fallback"], false);
        assert!(body["facets"]["categories"]
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c == "running"));
    }

    #[tokio::test]
    async fn test_search_unknown_sort_falls_back_to_relevance() {
        let (_, body) = get_json(app(), "/search?q=running&sort=bogus").await;
        assert_eq!(body["success"], true);
        assert_eq!(body["sort"], "relevance");
    }

    #[tokio::test]
    async fn test_search_invalid_price_filter_dropped() {
        let (_, body) = get_json(app(), "/search?q=running&price_min=abc").await;
        assert_eq!(body["success"], true);
        assert!(body["filters"]["price_min"].is_null());
        assert!(body["count"].as_u64().unwrap() >= 2);
    }

    #[tokio::test]
    async fn test_search_applies_color_filter() {
        let (_, body) = get_json(app(), "/search?q=running&color=Blue").await;
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["color"], "Blue");
    }

    #[tokio::test]
    async fn test_store_failure_degrades_gracefully() {
        struct FailingStore;
        impl ProductStore for FailingStore {
            fn candidates(
                &self,
                _: &crate::search::QueryPlan,
                _: &Filters,
            ) -> Result<Vec<Product>, crate::catalog::StoreError> {
                Err(crate::catalog::StoreError::Unavailable("down".to_string()))
            }
        }

        let app = router(Arc::new(SearchEngine::new(FailingStore)));
        let (status, body) = get_json(app.clone(), "/api/search?q=running").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], STORE_DOWN_MESSAGE);
        // Internals never leak into the payload
        assert!(!body["error"].as_str().unwrap().contains("down"));

        let (_, body) = get_json(app, "/search?q=running").await;
        assert_eq!(body["success"], false);
    }
}
