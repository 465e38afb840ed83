//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use utoipa::OpenApi;

use resolver_types::{
    AppError, ConversionRequest, ConversionResult, CurrencyRepository, CurrencyRequest,
    RateProvider, RateRequest, RemoveRateRequest,
};

use crate::ResolutionService;
use crate::openapi::ApiDoc;

/// Application state shared across handlers.
pub struct AppState<R: CurrencyRepository, P: RateProvider> {
    pub service: ResolutionService<R, P>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Missing entities are reported as 400, not 404.
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!(error = %self.0, "Request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({
            "error": self.0.to_string(),
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Convert an amount between two currencies.
#[tracing::instrument(skip(state), fields(from = %req.from, to = %req.to))]
pub async fn convert<R: CurrencyRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    Query(req): Query<ConversionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (svc, should_convert) = req.into_service().map_err(AppError::from)?;

    if !should_convert {
        return Ok(Json(ConversionResult::no_edit(&svc)));
    }

    let result = state.service.convert(&svc).await?;
    Ok(Json(result))
}

// ─────────────────────────────────────────────────────────────────────────────
// Currencies
// ─────────────────────────────────────────────────────────────────────────────

/// List currencies.
#[tracing::instrument(skip(state))]
pub async fn list_currencies<R: CurrencyRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
) -> Result<impl IntoResponse, ApiError> {
    let currencies = state.service.get_currencies().await?;
    Ok(Json(currencies))
}

#[tracing::instrument(skip(state), fields(symbol = %req.symbol))]
pub async fn add_currency<R: CurrencyRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    Json(req): Json<CurrencyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let currency = state
        .service
        .add_currency(&req.symbol, &req.description)
        .await?;
    Ok((StatusCode::CREATED, Json(currency)))
}

/// Get currency by symbol.
#[tracing::instrument(skip(state), fields(symbol = %symbol))]
pub async fn get_currency<R: CurrencyRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    Path(symbol): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let currency = state.service.get_currency(&symbol).await?;
    Ok(Json(currency))
}

/// Update a currency description. The path symbol wins over the body.
#[tracing::instrument(skip(state, req), fields(symbol = %symbol))]
pub async fn update_currency<R: CurrencyRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    Path(symbol): Path<String>,
    Json(req): Json<CurrencyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let currency = state
        .service
        .update_currency(&symbol, &req.description)
        .await?;
    Ok(Json(currency))
}

#[tracing::instrument(skip(state), fields(symbol = %symbol))]
pub async fn remove_currency<R: CurrencyRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    Path(symbol): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.service.remove_currency(&symbol).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─────────────────────────────────────────────────────────────────────────────
// Rates
// ─────────────────────────────────────────────────────────────────────────────

/// List rate pairs, both directions included.
#[tracing::instrument(skip(state))]
pub async fn list_rates<R: CurrencyRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
) -> Result<impl IntoResponse, ApiError> {
    let rates = state.service.get_rates().await?;
    Ok(Json(rates))
}

#[tracing::instrument(skip(state), fields(from = %req.from, to = %req.to, rate = req.rate))]
pub async fn create_rate<R: CurrencyRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    Json(req): Json<RateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pair = state.service.create_rate(&req).await?;
    Ok((StatusCode::CREATED, Json(pair)))
}

#[tracing::instrument(skip(state), fields(from = %req.from, to = %req.to, rate = req.rate))]
pub async fn update_rate<R: CurrencyRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    Json(req): Json<RateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pair = state.service.update_rate(&req).await?;
    Ok((StatusCode::ACCEPTED, Json(pair)))
}

#[tracing::instrument(skip(state), fields(from = %req.from, to = %req.to))]
pub async fn remove_rate<R: CurrencyRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    Json(req): Json<RemoveRateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.service.remove_rate(&req.from, &req.to).await?;
    Ok(StatusCode::NO_CONTENT)
}
