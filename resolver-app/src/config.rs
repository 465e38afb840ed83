//! Configuration loading from environment.

use std::env;
use std::time::Duration;

use exchange_rates::{Credential, DEFAULT_BASE_URL, ProviderConfig, ProviderKind};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub provider_kind: ProviderKind,
    pub provider: ProviderConfig,
    pub rate_ttl: Option<Duration>,
    pub request_timeout: Duration,
    pub seed_on_startup: bool,
    pub log_format: LogFormat,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = var("PORT").unwrap_or_else(|| "3000".to_string()).parse()?;

        let database_url = var("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let provider_kind = var("RATE_PROVIDER")
            .unwrap_or_else(|| "exchangerate-host".to_string())
            .parse::<ProviderKind>()
            .map_err(anyhow::Error::msg)?;

        let credential = match var("RATE_PROVIDER_API_KEY").filter(|key| !key.is_empty()) {
            Some(key) => parse_credential(
                &var("RATE_PROVIDER_AUTH").unwrap_or_else(|| "query:access_key".to_string()),
                key,
            )?,
            None => Credential::None,
        };

        let provider = ProviderConfig {
            base_url: var("RATE_PROVIDER_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            credential,
            timeout: Duration::from_secs(parse_or(&var, "RATE_PROVIDER_TIMEOUT_SECS", 10)?),
            include_crypto: parse_or(&var, "RATE_PROVIDER_CRYPTO", false)?,
        };

        let rate_ttl = var("RATE_TTL_SECS")
            .map(|secs| secs.parse().map(Duration::from_secs))
            .transpose()?;

        let request_timeout = Duration::from_secs(parse_or(&var, "REQUEST_TIMEOUT_SECS", 30)?);
        let seed_on_startup = parse_or(&var, "SEED_ON_STARTUP", true)?;

        let log_format = match var("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            port,
            database_url,
            provider_kind,
            provider,
            rate_ttl,
            request_timeout,
            seed_on_startup,
            log_format,
        })
    }
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", key, e)),
        None => Ok(default),
    }
}

/// Parses `query:<param>` or `header:<name>`.
fn parse_credential(placement: &str, key: String) -> anyhow::Result<Credential> {
    match placement.split_once(':') {
        Some(("query", param)) if !param.is_empty() => Ok(Credential::Query {
            param: param.to_string(),
            key,
        }),
        Some(("header", name)) if !name.is_empty() => Ok(Credential::Header {
            name: name.to_string(),
            key,
        }),
        _ => anyhow::bail!(
            "Invalid RATE_PROVIDER_AUTH '{}': expected query:<param> or header:<name>",
            placement
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "sqlite::memory:")]).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.provider_kind, ProviderKind::ExchangeHost);
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.provider.credential, Credential::None);
        assert_eq!(config.provider.timeout, Duration::from_secs(10));
        assert!(!config.provider.include_crypto);
        assert_eq!(config.rate_ttl, None);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.seed_on_startup);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_database_url_required() {
        assert!(load(&[]).is_err());
    }

    #[test]
    fn test_api_key_defaults_to_query_credential() {
        let config = load(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("RATE_PROVIDER_API_KEY", "secret"),
        ])
        .unwrap();

        assert_eq!(
            config.provider.credential,
            Credential::Query {
                param: "access_key".into(),
                key: "secret".into()
            }
        );
    }

    #[test]
    fn test_header_credential_and_overrides() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/resolver"),
            ("PORT", "8080"),
            ("RATE_PROVIDER", "static"),
            ("RATE_PROVIDER_API_KEY", "secret"),
            ("RATE_PROVIDER_AUTH", "header:apikey"),
            ("RATE_PROVIDER_CRYPTO", "true"),
            ("RATE_TTL_SECS", "3600"),
            ("SEED_ON_STARTUP", "false"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.provider_kind, ProviderKind::Static);
        assert_eq!(
            config.provider.credential,
            Credential::Header {
                name: "apikey".into(),
                key: "secret".into()
            }
        );
        assert!(config.provider.include_crypto);
        assert_eq!(config.rate_ttl, Some(Duration::from_secs(3600)));
        assert!(!config.seed_on_startup);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(load(&[("DATABASE_URL", "x"), ("RATE_PROVIDER", "fixer")]).is_err());
        assert!(load(&[("DATABASE_URL", "x"), ("REQUEST_TIMEOUT_SECS", "soon")]).is_err());
        assert!(
            load(&[
                ("DATABASE_URL", "x"),
                ("RATE_PROVIDER_API_KEY", "k"),
                ("RATE_PROVIDER_AUTH", "cookie:k"),
            ])
            .is_err()
        );
    }
}
