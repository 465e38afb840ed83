//! Exchange Rate Providers
//!
//! Implementations of the [`RateProvider`] port:
//!
//! - [`ExchangeHostClient`] talks to an exchangerate.host / apilayer style HTTP API.
//!   Base URL and credential placement come from [`ProviderConfig`], so the
//!   same client serves every vendor revision of that API.
//! - [`StaticRateProvider`] answers from a built-in USD-based table, for
//!   development and offline testing.
//! - [`ConfiguredProvider`] picks one of the above at runtime.
//!
//! # Example
//! ```
//! use exchange_rates::StaticRateProvider;
//!
//! let provider = StaticRateProvider::new();
//! let rate = provider.rate("USD", "BRL").unwrap();
//! assert!((rate - 5.0).abs() < 1e-9);
//! ```
//!
//! [`RateProvider`]: resolver_types::RateProvider

mod configured;
mod exchange_host;
mod static_rates;

pub use configured::{ConfiguredProvider, ProviderKind};
pub use exchange_host::{Credential, DEFAULT_BASE_URL, ExchangeHostClient, ProviderConfig};
pub use static_rates::StaticRateProvider;
