//! Currency domain model and symbol validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::ValidationError;

/// Minimum number of characters in a currency symbol.
///
/// The currency universe is defined by the rate provider, so any symbol of
/// this length or longer is accepted rather than checked against a fixed list.
pub const SYMBOL_MIN_LEN: usize = 3;

/// Provenance marker for currencies and conversion results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    /// Identity conversion, the amount was returned untouched.
    NoEdit,
    /// Served from the local repository.
    #[default]
    Repo,
    /// Served by the live rate provider.
    Exchange,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::NoEdit => "no-edit",
            Source::Repo => "repo",
            Source::Exchange => "exchange",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no-edit" => Ok(Source::NoEdit),
            "repo" => Ok(Source::Repo),
            "exchange" => Ok(Source::Exchange),
            other => Err(format!("Unknown source: {}", other)),
        }
    }
}

/// Canonical form of a currency symbol: trimmed, ASCII uppercase.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}

/// Rejects symbols that are empty or shorter than [`SYMBOL_MIN_LEN`].
pub(crate) fn check_symbol_len(symbol: &str) -> Result<(), ValidationError> {
    if symbol.trim().chars().count() < SYMBOL_MIN_LEN {
        return Err(ValidationError::SymbolMinLen);
    }
    Ok(())
}

/// Like [`check_symbol_len`], but reports a missing symbol separately.
pub(crate) fn check_symbol(symbol: &str) -> Result<(), ValidationError> {
    if symbol.trim().is_empty() {
        return Err(ValidationError::EmptySymbol);
    }
    check_symbol_len(symbol)
}

/// Validates a bare symbol (e.g. a path parameter) and returns it normalised.
pub fn parse_symbol(symbol: &str) -> Result<String, ValidationError> {
    check_symbol(symbol)?;
    Ok(normalize_symbol(symbol))
}

/// A currency known to the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Currency {
    /// Unique symbol, at least three characters
    #[schema(example = "BRL")]
    pub symbol: String,
    /// Free text description
    #[serde(default)]
    #[schema(example = "Brazilian Real")]
    pub description: String,
    /// Where this record came from
    #[serde(default)]
    pub source: Source,
}

impl Currency {
    /// Creates a validated currency with a normalised symbol.
    pub fn new(
        symbol: &str,
        description: impl Into<String>,
        source: Source,
    ) -> Result<Self, ValidationError> {
        check_symbol(symbol)?;
        Ok(Self {
            symbol: normalize_symbol(symbol),
            description: description.into(),
            source,
        })
    }

    /// Reconstructs a currency from persisted fields (no validation).
    pub fn from_parts(symbol: String, description: String, source: Source) -> Self {
        Self {
            symbol,
            description,
            source,
        }
    }

    /// Validates the symbol of an already-built currency.
    pub fn check(&self) -> Result<(), ValidationError> {
        check_symbol(&self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_symbol() {
        let currency = Currency::new(" brl ", "Brazilian Real", Source::Repo).unwrap();
        assert_eq!(currency.symbol, "BRL");
        assert_eq!(currency.source, Source::Repo);
    }

    #[test]
    fn test_parse_symbol() {
        assert_eq!(parse_symbol("eur").unwrap(), "EUR");
        assert!(matches!(parse_symbol("  "), Err(ValidationError::EmptySymbol)));
        assert!(matches!(parse_symbol("EU"), Err(ValidationError::SymbolMinLen)));
    }

    #[test]
    fn test_empty_symbol_fails() {
        let result = Currency::new("", "nothing", Source::Repo);
        assert!(matches!(result, Err(ValidationError::EmptySymbol)));
    }

    #[test]
    fn test_short_symbol_fails() {
        for symbol in ["B", "BR", " BR "] {
            let result = Currency::new(symbol, "", Source::Repo);
            assert!(matches!(result, Err(ValidationError::SymbolMinLen)), "{symbol:?}");
        }
    }

    #[test]
    fn test_long_symbols_are_accepted() {
        assert!(Currency::new("DOGE", "Dogecoin", Source::Exchange).is_ok());
    }

    #[test]
    fn test_source_wire_names() {
        assert_eq!(serde_json::to_string(&Source::NoEdit).unwrap(), "\"no-edit\"");
        assert_eq!(serde_json::to_string(&Source::Repo).unwrap(), "\"repo\"");
        assert_eq!(serde_json::to_string(&Source::Exchange).unwrap(), "\"exchange\"");
        assert_eq!("exchange".parse::<Source>().unwrap(), Source::Exchange);
        assert!("manual".parse::<Source>().is_err());
    }

    #[test]
    fn test_currency_json_shape() {
        let currency = Currency::from_parts("BRL".into(), String::new(), Source::Repo);
        assert_eq!(
            serde_json::to_string(&currency).unwrap(),
            r#"{"symbol":"BRL","description":"","source":"repo"}"#
        );
    }
}
