//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use resolver_types::domain::{ConversionRequest, ConversionResult, Currency, RatePair, Source};
use resolver_types::dto::{CurrencyRequest, RateRequest, RemoveRateRequest};
use utoipa::OpenApi;

// Dummy functions to generate path documentation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Convert an amount between two currencies
///
/// Same-currency requests are answered without a lookup (`no-edit`).
#[utoipa::path(
    get,
    path = "/convert",
    tag = "convert",
    params(ConversionRequest),
    responses(
        (status = 200, description = "Conversion result", body = ConversionResult),
        (status = 400, description = "Invalid symbol or amount", example = json!({"error": "amount is not a number", "code": 400})),
        (status = 500, description = "Repository or provider failure")
    )
)]
async fn convert() {}

/// List currencies
///
/// Falls back to the provider's list when no currency is stored.
#[utoipa::path(
    get,
    path = "/currencies",
    tag = "currencies",
    responses(
        (status = 200, description = "List of currencies", body = Vec<Currency>),
        (status = 500, description = "Repository or provider failure")
    )
)]
async fn list_currencies() {}

/// Add a currency (idempotent)
#[utoipa::path(
    post,
    path = "/currencies",
    tag = "currencies",
    request_body = CurrencyRequest,
    responses(
        (status = 201, description = "Currency stored", body = Currency),
        (status = 400, description = "Invalid symbol")
    )
)]
async fn add_currency() {}

/// Get currency by symbol
#[utoipa::path(
    get,
    path = "/currencies/{symbol}",
    tag = "currencies",
    params(
        ("symbol" = String, Path, description = "Currency symbol", example = "BRL")
    ),
    responses(
        (status = 200, description = "Currency details", body = Currency),
        (status = 400, description = "Invalid symbol or currency not found", example = json!({"error": "currency not found", "code": 400}))
    )
)]
async fn get_currency() {}

/// Update a currency description
#[utoipa::path(
    put,
    path = "/currencies/{symbol}",
    tag = "currencies",
    params(
        ("symbol" = String, Path, description = "Currency symbol", example = "BRL")
    ),
    request_body = CurrencyRequest,
    responses(
        (status = 200, description = "Currency updated", body = Currency),
        (status = 400, description = "Invalid symbol or currency not found")
    )
)]
async fn update_currency() {}

/// Remove a currency and every rate referencing it
#[utoipa::path(
    delete,
    path = "/currencies/{symbol}",
    tag = "currencies",
    params(
        ("symbol" = String, Path, description = "Currency symbol", example = "BRL")
    ),
    responses(
        (status = 204, description = "Currency removed"),
        (status = 400, description = "Invalid symbol or currency not found")
    )
)]
async fn remove_currency() {}

/// List rate pairs
#[utoipa::path(
    get,
    path = "/rates",
    tag = "rates",
    responses(
        (status = 200, description = "Stored rate pairs, both directions", body = Vec<RatePair>)
    )
)]
async fn list_rates() {}

/// Create a rate and its inverse
#[utoipa::path(
    post,
    path = "/rates",
    tag = "rates",
    request_body = RateRequest,
    responses(
        (status = 201, description = "Rate stored", body = RatePair),
        (status = 400, description = "Invalid rate or currency not found")
    )
)]
async fn create_rate() {}

/// Update a rate and its inverse
#[utoipa::path(
    put,
    path = "/rates",
    tag = "rates",
    request_body = RateRequest,
    responses(
        (status = 202, description = "Rate updated", body = RatePair),
        (status = 400, description = "Invalid rate or rate not found", example = json!({"error": "rate not found", "code": 400}))
    )
)]
async fn update_rate() {}

/// Remove a rate and its inverse
#[utoipa::path(
    delete,
    path = "/rates",
    tag = "rates",
    request_body = RemoveRateRequest,
    responses(
        (status = 204, description = "Rate removed"),
        (status = 400, description = "Invalid symbol or rate not found")
    )
)]
async fn remove_rate() {}

/// OpenAPI documentation for the Resolver API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Currency Resolver API",
        version = "1.0.0",
        description = "Currency conversion with a local rate store in front of a live exchange-rate provider.\n\nBusiness failures (invalid input, unknown currency or rate) are answered with `400`; repository and provider failures with `500`.",
        license(name = "MIT"),
    ),
    paths(
        health,
        convert,
        list_currencies,
        add_currency,
        get_currency,
        update_currency,
        remove_currency,
        list_rates,
        create_rate,
        update_rate,
        remove_rate,
    ),
    components(
        schemas(
            ConversionResult,
            Currency,
            CurrencyRequest,
            RatePair,
            RateRequest,
            RemoveRateRequest,
            Source,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "convert", description = "Currency conversion"),
        (name = "currencies", description = "Currency management"),
        (name = "rates", description = "Rate pair management"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_all_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/convert", "/currencies", "/currencies/{symbol}", "/rates"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
