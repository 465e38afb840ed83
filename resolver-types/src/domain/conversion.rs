//! Conversion request/result types and the currency validator.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::currency::{Source, check_symbol_len, normalize_symbol};
use crate::error::ValidationError;

/// A conversion as received at the boundary, amount still unparsed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConversionRequest {
    /// Source currency symbol
    #[serde(default)]
    #[param(example = "USD")]
    pub from: String,
    /// Target currency symbol
    #[serde(default)]
    #[param(example = "BRL")]
    pub to: String,
    /// Amount of the source currency
    #[serde(default)]
    #[param(example = "10")]
    pub amount: String,
}

/// A validated conversion handed to the resolution service.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSvc {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

/// Outcome of a conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConversionResult {
    #[schema(example = "USD")]
    pub from: String,
    #[schema(example = "BRL")]
    pub to: String,
    #[schema(example = 10.0)]
    pub original_amount: f64,
    #[schema(example = 50.0)]
    pub converted_amount: f64,
    pub conversion_source: Source,
}

impl ConversionRequest {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount: amount.into(),
        }
    }

    /// Pure validation, no I/O.
    ///
    /// Both symbols follow the same length rule; the amount must parse as a
    /// finite floating-point number.
    pub fn check(&self) -> Result<(), ValidationError> {
        check_symbol_len(&self.from)?;
        check_symbol_len(&self.to)?;
        parse_amount(&self.amount)?;
        Ok(())
    }

    /// Builds the service-side request.
    ///
    /// The returned flag is `false` when both symbols are the same currency,
    /// in which case the caller answers with [`ConversionResult::no_edit`]
    /// instead of invoking the resolution service.
    pub fn into_service(self) -> Result<(ConversionSvc, bool), ValidationError> {
        self.check()?;
        let amount = parse_amount(&self.amount)?;
        let svc = ConversionSvc {
            from: normalize_symbol(&self.from),
            to: normalize_symbol(&self.to),
            amount,
        };
        let should_convert = svc.from != svc.to;
        Ok((svc, should_convert))
    }
}

fn parse_amount(amount: &str) -> Result<f64, ValidationError> {
    match amount.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ValidationError::AmountIsNotANumber),
    }
}

impl ConversionResult {
    /// Identity result for a same-currency request.
    pub fn no_edit(svc: &ConversionSvc) -> Self {
        Self::from_service(svc, svc.amount, Source::NoEdit)
    }

    pub fn from_service(svc: &ConversionSvc, converted_amount: f64, source: Source) -> Self {
        Self {
            from: svc.from.clone(),
            to: svc.to.clone(),
            original_amount: svc.amount,
            converted_amount,
            conversion_source: source,
        }
    }
}
