//! # Resolver Types
//!
//! Domain types and port traits for the currency-conversion resolver.
//! This crate has ZERO external IO dependencies - only data structures,
//! validation rules, and trait definitions.
//!
//! ## Architecture
//!
//! - `domain/` - Currencies, rate pairs, conversion requests and results
//! - `ports/` - Repository and rate provider traits that adapters implement
//! - `dto/` - Request bodies for the HTTP boundary
//! - `error/` - Validation, repository, provider and application errors

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

pub use domain::{
    ConversionRequest, ConversionResult, ConversionSvc, Currency, RatePair, Source,
    checked_amount, normalize_symbol, parse_symbol,
};
pub use dto::*;
pub use error::{AppError, Entity, ProviderError, RepoError, ValidationError};
pub use ports::{CurrencyListing, CurrencyRepository, ExchangeQuote, RateProvider};
