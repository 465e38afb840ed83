//! Domain models for the resolver.

pub mod conversion;
pub mod currency;
pub mod rate;

pub use conversion::{ConversionRequest, ConversionResult, ConversionSvc};
pub use currency::{Currency, SYMBOL_MIN_LEN, Source, normalize_symbol, parse_symbol};
pub use rate::{RatePair, checked_amount};
