//! Built-in rate table for development and offline testing.

use std::collections::BTreeMap;

use resolver_types::{CurrencyListing, ExchangeQuote, ProviderError, RateProvider};

/// (symbol, description, value of one unit in USD)
const BASE_RATES: &[(&str, &str, f64)] = &[
    ("USD", "United States Dollar", 1.0),
    ("EUR", "Euro", 1.087),
    ("GBP", "British Pound Sterling", 1.266),
    ("INR", "Indian Rupee", 0.01203),
    ("BRL", "Brazilian Real", 0.2),
    ("JPY", "Japanese Yen", 0.0067),
    ("BTC", "Bitcoin", 65000.0),
    ("ETH", "Ethereum", 3200.0),
];

/// Rate provider answering from [`BASE_RATES`].
///
/// Unknown symbols are declined (`success = false`), never errors.
#[derive(Debug, Clone)]
pub struct StaticRateProvider {
    to_usd: BTreeMap<&'static str, (&'static str, f64)>,
}

impl StaticRateProvider {
    pub fn new() -> Self {
        Self {
            to_usd: BASE_RATES
                .iter()
                .map(|&(symbol, description, rate)| (symbol, (description, rate)))
                .collect(),
        }
    }

    /// Units of `to` per unit of `from`, if both are in the table.
    pub fn rate(&self, from: &str, to: &str) -> Option<f64> {
        let (_, from_usd) = self.to_usd.get(from)?;
        let (_, to_usd) = self.to_usd.get(to)?;
        Some(from_usd / to_usd)
    }
}

impl Default for StaticRateProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RateProvider for StaticRateProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn get_currencies(&self) -> Result<CurrencyListing, ProviderError> {
        Ok(CurrencyListing {
            success: true,
            symbols: self
                .to_usd
                .iter()
                .map(|(symbol, (description, _))| (symbol.to_string(), description.to_string()))
                .collect(),
        })
    }

    async fn exchange(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<ExchangeQuote, ProviderError> {
        Ok(match self.rate(from, to) {
            Some(rate) => ExchangeQuote {
                converted_amount: amount * rate,
                rate,
                success: true,
            },
            None => ExchangeQuote::declined(),
        })
    }
}
