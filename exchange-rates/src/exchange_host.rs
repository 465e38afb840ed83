//! HTTP client for exchangerate.host / apilayer style rate APIs.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use resolver_types::{CurrencyListing, ExchangeQuote, ProviderError, RateProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.exchangerate.host";

const PROVIDER_NAME: &str = "exchangerate-host";

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Where the API key travels on each request.
///
/// exchangerate.host expects `?access_key=...`, apilayer expects an `apikey` header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Credential {
    #[default]
    None,
    Query { param: String, key: String },
    Header { name: String, key: String },
}

/// Provider client configuration.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub credential: Credential,
    pub timeout: Duration,
    /// Also merge the `/cryptocurrencies` listing into [`RateProvider::get_currencies`].
    pub include_crypto: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credential: Credential::None,
            timeout: Duration::from_secs(10),
            include_crypto: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SymbolsResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    symbols: BTreeMap<String, SymbolInfo>,
}

#[derive(Debug, Deserialize)]
struct SymbolInfo {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct CryptoResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    cryptocurrencies: BTreeMap<String, CryptoInfo>,
}

#[derive(Debug, Deserialize)]
struct CryptoInfo {
    symbol: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    info: ConvertInfo,
    result: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ConvertInfo {
    rate: Option<f64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// Rate provider backed by an exchangerate.host compatible HTTP API.
#[derive(Debug, Clone)]
pub struct ExchangeHostClient {
    base_url: String,
    credential: Credential,
    include_crypto: bool,
    http: Client,
}

impl ExchangeHostClient {
    /// Creates a client; the configured timeout applies to every request.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Unreachable(e.to_string()))?;
        Ok(Self::with_client(config, http))
    }

    /// Creates a client with a custom HTTP client.
    pub fn with_client(config: ProviderConfig, http: Client) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credential: config.credential,
            include_crypto: config.include_crypto,
            http,
        }
    }

    fn request(&self, path: &str) -> RequestBuilder {
        let req = self.http.get(format!("{}{}", self.base_url, path));
        match &self.credential {
            Credential::None => req,
            Credential::Query { param, key } => req.query(&[(param.as_str(), key.as_str())]),
            Credential::Header { name, key } => req.header(name.as_str(), key.as_str()),
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        req: RequestBuilder,
    ) -> Result<T, ProviderError> {
        let resp = req
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| {
                tracing::error!(provider = PROVIDER_NAME, operation, error = %e, "request failed");
                ProviderError::Unreachable(e.to_string())
            })?;

        let body = resp.text().await.map_err(|e| {
            tracing::error!(provider = PROVIDER_NAME, operation, error = %e, "reading body failed");
            ProviderError::Unreachable(e.to_string())
        })?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(provider = PROVIDER_NAME, operation, error = %e, "unexpected body");
            ProviderError::InvalidResponse(e.to_string())
        })
    }

    async fn fetch_crypto(&self) -> Result<Option<BTreeMap<String, String>>, ProviderError> {
        let crypto: CryptoResponse = self
            .fetch("get_currencies", self.request("/cryptocurrencies"))
            .await?;
        if !crypto.success {
            tracing::warn!(provider = PROVIDER_NAME, "cryptocurrencies declined");
            return Ok(None);
        }
        Ok(Some(
            crypto
                .cryptocurrencies
                .into_values()
                .map(|c| (c.symbol, c.name))
                .collect(),
        ))
    }
}

#[async_trait::async_trait]
impl RateProvider for ExchangeHostClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_currencies(&self) -> Result<CurrencyListing, ProviderError> {
        let symbols: SymbolsResponse = self
            .fetch("get_currencies", self.request("/symbols"))
            .await?;
        if !symbols.success {
            tracing::warn!(provider = PROVIDER_NAME, "symbols declined");
            return Ok(CurrencyListing::default());
        }

        let mut listing: BTreeMap<String, String> = symbols
            .symbols
            .into_iter()
            .map(|(code, info)| (code, info.description))
            .collect();

        if self.include_crypto {
            // Fiat descriptions win on collision.
            if let Some(crypto) = self.fetch_crypto().await? {
                for (symbol, name) in crypto {
                    listing.entry(symbol).or_insert(name);
                }
            }
        }

        tracing::debug!(provider = PROVIDER_NAME, count = listing.len(), "currencies fetched");
        Ok(CurrencyListing {
            success: true,
            symbols: listing,
        })
    }

    async fn exchange(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<ExchangeQuote, ProviderError> {
        let req = self.request("/convert").query(&[
            ("from", from.to_string()),
            ("to", to.to_string()),
            ("amount", amount.to_string()),
        ]);
        let conv: ConvertResponse = self.fetch("exchange", req).await?;

        if !conv.success {
            tracing::warn!(provider = PROVIDER_NAME, from, to, "convert declined");
            return Ok(ExchangeQuote::declined());
        }

        let converted_amount = conv.result.ok_or_else(|| {
            ProviderError::InvalidResponse("successful convert without result".into())
        })?;
        let rate = match conv.info.rate {
            Some(rate) => rate,
            None if amount != 0.0 => converted_amount / amount,
            None => 0.0,
        };

        Ok(ExchangeQuote {
            converted_amount,
            rate,
            success: true,
        })
    }
}
