//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The resolution service depends on these traits, not concrete implementations.

mod exchange;
mod repository;

pub use exchange::{CurrencyListing, ExchangeQuote, RateProvider};
pub use repository::CurrencyRepository;
