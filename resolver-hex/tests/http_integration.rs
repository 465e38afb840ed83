//! Integration tests for the HTTP boundary.
//!
//! These tests drive the full router over an in-memory SQLite repository and
//! the built-in static rate table.

use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use exchange_rates::StaticRateProvider;
use http_body_util::BodyExt;
use resolver_hex::{ResolutionService, inbound::HttpServer};
use resolver_repo::SqliteRepo;
use resolver_types::{CurrencyListing, ExchangeQuote, ProviderError, RateProvider};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Helper to create a router over a fresh database.
async fn create_app() -> Router {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let service = ResolutionService::new(repo, StaticRateProvider::new());
    HttpServer::new(service).router()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_json(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Sends a request and returns the status with the decoded JSON body (Null if empty).
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn add_currency(app: &Router, symbol: &str) {
    let (status, _) = send(
        app,
        with_json(
            Method::POST,
            "/currencies",
            json!({"symbol": symbol, "description": ""}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_health() {
    let app = create_app().await;

    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let app = create_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_openapi_document() {
    let app = create_app().await;

    let (status, body) = send(&app, get("/api-docs/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/convert"].is_object());
}

// ─────────────────────────────────────────────────────────────────────────────
// Convert
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_convert_same_currency_is_no_edit() {
    let app = create_app().await;

    let (status, body) = send(&app, get("/convert?from=USD&to=usd&amount=100")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "from": "USD",
            "to": "USD",
            "original_amount": 100.0,
            "converted_amount": 100.0,
            "conversion_source": "no-edit"
        })
    );
}

#[tokio::test]
async fn test_convert_from_provider() {
    let app = create_app().await;

    let (status, body) = send(&app, get("/convert?from=USD&to=BRL&amount=10")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["conversion_source"], "exchange");
    assert!((body["converted_amount"].as_f64().unwrap() - 50.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_convert_served_from_stored_rate() {
    let app = create_app().await;
    add_currency(&app, "USD").await;
    add_currency(&app, "BRL").await;
    let (status, _) = send(
        &app,
        with_json(
            Method::POST,
            "/rates",
            json!({"from": "USD", "to": "BRL", "rate": 4.0}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, get("/convert?from=BRL&to=USD&amount=8")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["conversion_source"], "repo");
    assert!((body["converted_amount"].as_f64().unwrap() - 2.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_convert_invalid_amount() {
    let app = create_app().await;

    let (status, body) = send(&app, get("/convert?from=USD&to=BRL&amount=ten")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "amount is not a number");
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_convert_short_symbol() {
    let app = create_app().await;

    let (status, body) = send(&app, get("/convert?from=US&to=BRL&amount=1")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "currency symbol has to have 3 or more characters");
}

#[tokio::test]
async fn test_convert_declined_by_provider() {
    let app = create_app().await;

    let (status, body) = send(&app, get("/convert?from=USD&to=XYZ&amount=1")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 500);
}

// ─────────────────────────────────────────────────────────────────────────────
// Currencies
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_empty_repository_lists_provider_currencies() {
    let app = create_app().await;

    let (status, body) = send(&app, get("/currencies")).await;

    assert_eq!(status, StatusCode::OK);
    let currencies = body.as_array().unwrap();
    assert_eq!(currencies.len(), 8);
    assert!(currencies.iter().all(|c| c["source"] == "exchange"));
}

#[tokio::test]
async fn test_currency_lifecycle() {
    let app = create_app().await;

    add_currency(&app, "brl").await;
    add_currency(&app, "BRL").await;

    let (status, body) = send(&app, get("/currencies")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        with_json(
            Method::PUT,
            "/currencies/brl",
            json!({"description": "Brazilian Real"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "Brazilian Real");

    let (status, body) = send(&app, get("/currencies/BRL")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "BRL");
    assert_eq!(body["source"], "repo");

    let delete = Request::builder()
        .method(Method::DELETE)
        .uri("/currencies/BRL")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, delete).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, get("/currencies/BRL")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "currency not found");
}

#[tokio::test]
async fn test_update_unknown_currency() {
    let app = create_app().await;

    let (status, body) = send(
        &app,
        with_json(Method::PUT, "/currencies/XYZ", json!({"description": "x"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "currency not found");
}

// ─────────────────────────────────────────────────────────────────────────────
// Rates
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_rate_for_unknown_currency() {
    let app = create_app().await;
    add_currency(&app, "USD").await;

    let (status, body) = send(
        &app,
        with_json(
            Method::POST,
            "/rates",
            json!({"from": "USD", "to": "BRL", "rate": 5.0}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "currency not found");
}

#[tokio::test]
async fn test_rate_lifecycle() {
    let app = create_app().await;
    add_currency(&app, "USD").await;
    add_currency(&app, "BRL").await;

    let (status, _) = send(
        &app,
        with_json(
            Method::POST,
            "/rates",
            json!({"from": "USD", "to": "BRL", "rate": 5.0}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, get("/rates")).await;
    assert_eq!(status, StatusCode::OK);
    let rates = body.as_array().unwrap();
    assert_eq!(rates.len(), 2);
    let inverse = rates
        .iter()
        .find(|r| r["from"] == "BRL" && r["to"] == "USD")
        .unwrap();
    assert!((inverse["rate"].as_f64().unwrap() - 0.2).abs() < 1e-12);

    let (status, body) = send(
        &app,
        with_json(
            Method::PUT,
            "/rates",
            json!({"from": "USD", "to": "BRL", "rate": 4.0}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["rate"], 4.0);

    let (status, _) = send(
        &app,
        with_json(Method::DELETE, "/rates", json!({"from": "USD", "to": "BRL"})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, get("/rates")).await;
    assert!(body.as_array().unwrap().is_empty());

    let (status, body) = send(
        &app,
        with_json(Method::DELETE, "/rates", json!({"from": "USD", "to": "BRL"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "rate not found");
}

#[tokio::test]
async fn test_update_missing_rate() {
    let app = create_app().await;
    add_currency(&app, "USD").await;
    add_currency(&app, "BRL").await;

    let (status, body) = send(
        &app,
        with_json(
            Method::PUT,
            "/rates",
            json!({"from": "USD", "to": "BRL", "rate": 4.0}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "rate not found");
}

#[tokio::test]
async fn test_convert_overflowing_amount() {
    let app = create_app().await;

    let (status, body) = send(&app, get("/convert?from=BTC&to=USD&amount=1e308")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "converted amount is out of range");
}

#[tokio::test]
async fn test_create_rate_with_unrepresentable_inverse() {
    let app = create_app().await;
    add_currency(&app, "USD").await;
    add_currency(&app, "BRL").await;

    let (status, body) = send(
        &app,
        with_json(
            Method::POST,
            "/rates",
            json!({"from": "USD", "to": "BRL", "rate": 1e-310}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "rate has to be a positive number");

    let (_, body) = send(&app, get("/rates")).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_existing_rate() {
    let app = create_app().await;
    add_currency(&app, "USD").await;
    add_currency(&app, "BRL").await;
    let rate = json!({"from": "USD", "to": "BRL", "rate": 5.0});

    let (status, _) = send(&app, with_json(Method::POST, "/rates", rate.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, with_json(Method::POST, "/rates", rate)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "rate already exists");
}

#[tokio::test]
async fn test_long_symbols_are_accepted() {
    let app = create_app().await;
    let symbol = "SEVENTEENCHARSYMB";
    assert_eq!(symbol.len(), 17);

    add_currency(&app, symbol).await;

    let (status, body) = send(&app, get(&format!("/currencies/{symbol}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], symbol);
}

/// Provider that never answers within a test's patience.
struct StalledProvider;

#[async_trait]
impl RateProvider for StalledProvider {
    fn name(&self) -> &str {
        "stalled"
    }

    async fn get_currencies(&self) -> Result<CurrencyListing, ProviderError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(CurrencyListing::default())
    }

    async fn exchange(
        &self,
        _from: &str,
        _to: &str,
        _amount: f64,
    ) -> Result<ExchangeQuote, ProviderError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(ExchangeQuote::declined())
    }
}

#[tokio::test]
async fn test_slow_request_times_out() {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let app = HttpServer::new(ResolutionService::new(repo, StalledProvider))
        .with_request_timeout(Duration::from_millis(50))
        .router();

    let (status, _) = send(&app, get("/convert?from=USD&to=BRL&amount=1")).await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
}
