//! # Resolver Hex
//!
//! Application service layer and HTTP adapter for the currency resolver.
//!
//! ## Architecture
//!
//! - `service/` - Resolution service (orchestrates validation, repository and provider)
//! - `inbound/` - HTTP adapter (Axum server)
//! - `openapi/` - OpenAPI document served at `/api-docs/openapi.json`
//!
//! The service is generic over `R: CurrencyRepository` and `P: RateProvider`,
//! allowing different adapters to be injected.

pub mod inbound;
pub mod openapi;
pub mod service;


pub use service::ResolutionService;
