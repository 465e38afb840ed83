//! Runtime selection between provider implementations.

use std::str::FromStr;

use resolver_types::{CurrencyListing, ExchangeQuote, ProviderError, RateProvider};

use crate::{ExchangeHostClient, ProviderConfig, StaticRateProvider};

/// Which provider implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    ExchangeHost,
    Static,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exchangerate-host" | "exchange" | "http" => Ok(ProviderKind::ExchangeHost),
            "static" => Ok(ProviderKind::Static),
            other => Err(format!("Unknown rate provider: {}", other)),
        }
    }
}

/// Provider wrapper that delegates to the implementation chosen at startup.
pub enum ConfiguredProvider {
    ExchangeHost(ExchangeHostClient),
    Static(StaticRateProvider),
}

impl ConfiguredProvider {
    pub fn build(kind: ProviderKind, config: ProviderConfig) -> Result<Self, ProviderError> {
        Ok(match kind {
            ProviderKind::ExchangeHost => Self::ExchangeHost(ExchangeHostClient::new(config)?),
            ProviderKind::Static => Self::Static(StaticRateProvider::new()),
        })
    }
}

#[async_trait::async_trait]
impl RateProvider for ConfiguredProvider {
    fn name(&self) -> &str {
        match self {
            Self::ExchangeHost(inner) => inner.name(),
            Self::Static(inner) => inner.name(),
        }
    }

    async fn get_currencies(&self) -> Result<CurrencyListing, ProviderError> {
        match self {
            Self::ExchangeHost(inner) => inner.get_currencies().await,
            Self::Static(inner) => inner.get_currencies().await,
        }
    }

    async fn exchange(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<ExchangeQuote, ProviderError> {
        match self {
            Self::ExchangeHost(inner) => inner.exchange(from, to, amount).await,
            Self::Static(inner) => inner.exchange(from, to, amount).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!(
            "exchangerate-host".parse::<ProviderKind>().unwrap(),
            ProviderKind::ExchangeHost
        );
        assert_eq!("STATIC".parse::<ProviderKind>().unwrap(), ProviderKind::Static);
        assert!("fixer".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_build_static() {
        let provider =
            ConfiguredProvider::build(ProviderKind::Static, ProviderConfig::default()).unwrap();
        assert_eq!(provider.name(), "static");
    }
}
