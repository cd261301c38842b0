// Router HTTP API implementation
// This file provides HTTP endpoints for route discovery, catalog listing,
// health and metrics
//
// Numan Thabit 2025 Nov

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router as AxumRouter,
};
use serde::Serialize;
use std::sync::Arc;

use crate::catalog::Token;
use crate::metrics;
use crate::router::request::RoutingRequest;
use crate::router::routes::{RouteErrorKind, RouteResult};
use crate::router::selector::RouteSelector;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenListResponse {
    pub chain_id: u64,
    pub tokens: Vec<Token>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Create the HTTP router with API endpoints
pub fn create_api_router(selector: Arc<RouteSelector>) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_text))
        .route("/api/v1/route", post(find_route))
        .route("/api/v1/tokens/:chain_id", get(list_tokens))
        .with_state(selector)
}

/// Health check endpoint
async fn health_check() -> StatusCode {
    StatusCode::OK
}

async fn metrics_text() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::render(),
    )
}

/// Route discovery endpoint. The body is a `RouteResult` whatever the status.
async fn find_route(
    State(selector): State<Arc<RouteSelector>>,
    payload: Result<Json<RoutingRequest>, JsonRejection>,
) -> (StatusCode, Json<RouteResult>) {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(RouteResult::failed(
                    RouteErrorKind::InvalidRequest,
                    rejection.body_text(),
                )),
            )
        }
    };

    let result = selector.route(&req).await;
    let status = match result.error_kind {
        None => StatusCode::OK,
        Some(RouteErrorKind::InvalidRequest) => StatusCode::BAD_REQUEST,
        Some(RouteErrorKind::NoRoute) => StatusCode::NOT_FOUND,
        Some(RouteErrorKind::Internal) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(result))
}

async fn list_tokens(
    State(selector): State<Arc<RouteSelector>>,
    Path(chain_id): Path<u64>,
) -> Result<Json<TokenListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let catalog = selector.catalog();
    if !catalog.supports_chain(chain_id) {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("unsupported chain {chain_id}"),
            }),
        ));
    }
    Ok(Json(TokenListResponse {
        chain_id,
        tokens: catalog.tokens_on(chain_id).to_vec(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::request::RoutingSettings;
    use crate::venues::mock::{test_catalog, ScriptedProvider, TAKER};
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(provider: ScriptedProvider) -> AxumRouter {
        let selector = RouteSelector::new(test_catalog(), Arc::new(provider), RoutingSettings::default());
        create_api_router(Arc::new(selector))
    }

    async fn post_route(app: AxumRouter, body: String) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/route")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn route_body(from: &str, to: &str, chain_id: u64) -> String {
        json!({
            "fromToken": from,
            "toToken": to,
            "fromAmount": "1000000000000000000",
            "fromAddress": TAKER,
            "chainId": chain_id,
        })
        .to_string()
    }

    #[tokio::test]
    async fn route_found_is_ok() {
        let app = app(ScriptedProvider::new().pool("ETH", "USDC", 3_000, 1));
        let (status, body) = post_route(app, route_body("ETH", "USDC", 1)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["route"]["totalHops"], 1);
        assert_eq!(body["route"]["confidence"], 95);
        assert_eq!(body["route"]["totalOutput"], "3000000000000000000000");
        assert_eq!(body["route"]["steps"][0]["fromToken"]["symbol"], "ETH");
    }

    #[tokio::test]
    async fn exhausted_search_is_not_found() {
        let (status, body) = post_route(app(ScriptedProvider::new()), route_body("TWC", "SHIB", 56)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["errorKind"], "no_route");
        assert!(body.get("route").is_none());
    }

    #[tokio::test]
    async fn invalid_request_is_bad_request() {
        let (status, body) = post_route(app(ScriptedProvider::new()), route_body("ETH", "USDC", 7)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errorKind"], "invalid_request");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (status, body) = post_route(app(ScriptedProvider::new()), "{\"fromToken\":".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["errorKind"], "invalid_request");
    }

    #[tokio::test]
    async fn lists_chain_tokens() {
        let response = app(ScriptedProvider::new())
            .oneshot(Request::builder().uri("/api/v1/tokens/56").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["chainId"], 56);
        assert_eq!(body["tokens"].as_array().unwrap().len(), 6);
        assert_eq!(body["tokens"][0]["symbol"], "TWC");

        let response = app(ScriptedProvider::new())
            .oneshot(Request::builder().uri("/api/v1/tokens/7").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_and_metrics() {
        let response = app(ScriptedProvider::new())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app(ScriptedProvider::new())
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
