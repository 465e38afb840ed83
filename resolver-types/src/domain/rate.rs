//! Directional exchange rate between two currencies.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::currency::{check_symbol, normalize_symbol};
use crate::error::ValidationError;

/// A directional (from → to) conversion multiplier.
///
/// Every stored pair has a mandatory inverse (`to → from` at `1 / rate`).
/// Repositories write and remove both directions as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RatePair {
    #[schema(example = "USD")]
    pub from: String,
    #[schema(example = "BRL")]
    pub to: String,
    /// Units of `to` received for one unit of `from`
    #[schema(example = 5.0)]
    pub rate: f64,
    /// When this rate was last written
    pub updated_at: DateTime<Utc>,
}

impl RatePair {
    /// Creates a validated pair stamped with the current time.
    pub fn new(from: &str, to: &str, rate: f64) -> Result<Self, ValidationError> {
        check_symbol(from)?;
        check_symbol(to)?;
        let from = normalize_symbol(from);
        let to = normalize_symbol(to);
        if from == to {
            return Err(ValidationError::IdenticalPair);
        }
        // The inverse must be a positive finite rate as well.
        if !rate.is_finite() || rate <= 0.0 || !(1.0 / rate).is_finite() {
            return Err(ValidationError::InvalidRate);
        }
        Ok(Self {
            from,
            to,
            rate,
            updated_at: Utc::now(),
        })
    }

    /// Reconstructs a pair from persisted fields (no validation).
    pub fn from_parts(from: String, to: String, rate: f64, updated_at: DateTime<Utc>) -> Self {
        Self {
            from,
            to,
            rate,
            updated_at,
        }
    }

    /// The reverse direction, with the reciprocal rate and the same timestamp.
    pub fn inverse(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
            rate: 1.0 / self.rate,
            updated_at: self.updated_at,
        }
    }

    /// Applies the rate to an amount of `from`.
    ///
    /// Fails when the product no longer fits in an `f64`.
    pub fn convert(&self, amount: f64) -> Result<f64, ValidationError> {
        checked_amount(amount * self.rate)
    }

    /// Whether the pair may still be trusted at `now`.
    ///
    /// Without a TTL a stored rate is trusted until it is explicitly updated.
    pub fn is_fresh(&self, ttl: Option<Duration>, now: DateTime<Utc>) -> bool {
        match ttl {
            Some(ttl) => now.signed_duration_since(self.updated_at) <= ttl,
            None => true,
        }
    }
}

/// Rejects converted amounts that overflowed to infinity or became NaN.
pub fn checked_amount(amount: f64) -> Result<f64, ValidationError> {
    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(ValidationError::AmountOutOfRange)
    }
}
