//! Data Transfer Objects (DTOs) for request bodies.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::RatePair;
use crate::error::ValidationError;

/// Body for creating or updating a currency.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrencyRequest {
    /// Currency symbol (ignored on update, the path wins)
    #[serde(default)]
    #[schema(example = "BRL")]
    pub symbol: String,
    #[serde(default)]
    #[schema(example = "Brazilian Real")]
    pub description: String,
}

/// Body for creating or updating a rate pair.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RateRequest {
    #[schema(example = "USD")]
    pub from: String,
    #[schema(example = "BRL")]
    pub to: String,
    #[schema(example = 5.0)]
    pub rate: f64,
}

impl RateRequest {
    /// Validates symbols and rate, returning the normalised pair.
    pub fn check(&self) -> Result<RatePair, ValidationError> {
        RatePair::new(&self.from, &self.to, self.rate)
    }
}

/// Body identifying a rate pair to remove.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RemoveRateRequest {
    #[schema(example = "USD")]
    pub from: String,
    #[schema(example = "BRL")]
    pub to: String,
}
