//! # Resolver Client SDK
//!
//! A typed Rust client for the currency resolver API.

use resolver_types::{
    ConversionResult, Currency, CurrencyRequest, RatePair, RateRequest, RemoveRateRequest,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// True when the server answered `currency not found` or `rate not found`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 400, message } if message.ends_with("not found"))
    }
}

/// Resolver API client.
pub struct ResolverClient {
    base_url: String,
    http: Client,
}

impl ResolverClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self.http.get(self.url("/health")).send().await?;
        Ok(resp.status().is_success())
    }

    /// Converts `amount` of `from` into `to`.
    ///
    /// The amount is sent as given; the server rejects non-numeric input.
    pub async fn convert(
        &self,
        from: &str,
        to: &str,
        amount: &str,
    ) -> Result<ConversionResult, ClientError> {
        let req = self
            .http
            .get(self.url("/convert"))
            .query(&[("from", from), ("to", to), ("amount", amount)]);
        self.send(req).await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Currencies
    // ─────────────────────────────────────────────────────────────────────────────

    /// Lists currencies.
    pub async fn list_currencies(&self) -> Result<Vec<Currency>, ClientError> {
        self.send(self.http.get(self.url("/currencies"))).await
    }

    /// Adds a currency. Adding an existing symbol returns the stored record.
    pub async fn add_currency(
        &self,
        symbol: &str,
        description: &str,
    ) -> Result<Currency, ClientError> {
        let body = CurrencyRequest {
            symbol: symbol.to_string(),
            description: description.to_string(),
        };
        self.send(self.http.post(self.url("/currencies")).json(&body))
            .await
    }

    /// Gets a currency by symbol.
    pub async fn get_currency(&self, symbol: &str) -> Result<Currency, ClientError> {
        self.send(self.http.get(self.url(&format!("/currencies/{}", symbol))))
            .await
    }

    /// Updates a currency description.
    pub async fn update_currency(
        &self,
        symbol: &str,
        description: &str,
    ) -> Result<Currency, ClientError> {
        let body = CurrencyRequest {
            symbol: symbol.to_string(),
            description: description.to_string(),
        };
        let req = self
            .http
            .put(self.url(&format!("/currencies/{}", symbol)))
            .json(&body);
        self.send(req).await
    }

    /// Removes a currency and its rates.
    pub async fn remove_currency(&self, symbol: &str) -> Result<(), ClientError> {
        let req = self
            .http
            .delete(self.url(&format!("/currencies/{}", symbol)));
        self.send_empty(req).await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Rates
    // ─────────────────────────────────────────────────────────────────────────────

    /// Lists stored rate pairs, both directions included.
    pub async fn list_rates(&self) -> Result<Vec<RatePair>, ClientError> {
        self.send(self.http.get(self.url("/rates"))).await
    }

    /// Creates a rate and its inverse.
    pub async fn create_rate(
        &self,
        from: &str,
        to: &str,
        rate: f64,
    ) -> Result<RatePair, ClientError> {
        let body = rate_request(from, to, rate);
        self.send(self.http.post(self.url("/rates")).json(&body))
            .await
    }

    /// Updates a rate and its inverse.
    pub async fn update_rate(
        &self,
        from: &str,
        to: &str,
        rate: f64,
    ) -> Result<RatePair, ClientError> {
        let body = rate_request(from, to, rate);
        self.send(self.http.put(self.url("/rates")).json(&body))
            .await
    }

    /// Removes a rate and its inverse.
    pub async fn remove_rate(&self, from: &str, to: &str) -> Result<(), ClientError> {
        let body = RemoveRateRequest {
            from: from.to_string(),
            to: to.to_string(),
        };
        self.send_empty(self.http.delete(self.url("/rates")).json(&body))
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Transport
    // ─────────────────────────────────────────────────────────────────────────────

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let resp = self.checked(req).await?;
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn send_empty(&self, req: RequestBuilder) -> Result<(), ClientError> {
        self.checked(req).await?;
        Ok(())
    }

    async fn checked(&self, req: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or(body);
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn rate_request(from: &str, to: &str, rate: f64) -> RateRequest {
    RateRequest {
        from: from.to_string(),
        to: to.to_string(),
        rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ResolverClient::new("http://localhost:3000");
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let client = ResolverClient::new("http://localhost:3000/");
        assert_eq!(client.url("/rates"), "http://localhost:3000/rates");
    }

    #[test]
    fn test_not_found_detection() {
        let not_found = ClientError::Api {
            status: 400,
            message: "currency not found".into(),
        };
        let invalid = ClientError::Api {
            status: 400,
            message: "amount is not a number".into(),
        };
        assert!(not_found.is_not_found());
        assert!(!invalid.is_not_found());
    }
}
