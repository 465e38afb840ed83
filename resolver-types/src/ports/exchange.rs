//! Rate provider port.
//!
//! Implementations can be HTTP clients against a vendor API, static tables, mocks, etc.
//! Vendor specifics (base URL, credentials) are configuration of the implementation.

use std::collections::BTreeMap;

use crate::error::ProviderError;

/// Currencies offered by a provider, keyed by symbol with their description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrencyListing {
    pub success: bool,
    pub symbols: BTreeMap<String, String>,
}

/// A live quote for a conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeQuote {
    pub converted_amount: f64,
    pub rate: f64,
    /// `false` when the provider answered but declined the request.
    pub success: bool,
}

impl ExchangeQuote {
    pub fn declined() -> Self {
        Self {
            converted_amount: 0.0,
            rate: 0.0,
            success: false,
        }
    }
}

/// Port trait for exchange rate providers.
///
/// A provider that responds with `success = false` returns `Ok` with the flag
/// cleared; `Err` is reserved for an unreachable or misbehaving provider.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync + 'static {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Lists every currency the provider can convert.
    async fn get_currencies(&self) -> Result<CurrencyListing, ProviderError>;

    /// Converts `amount` of `from` into `to` at the provider's current rate.
    async fn exchange(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<ExchangeQuote, ProviderError>;
}
