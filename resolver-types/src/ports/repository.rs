//! Repository port trait.
//!
//! This is the persistence port in our hexagonal architecture.
//! Adapters (Postgres, SQLite, in-memory) implement this trait and exclusively
//! own the stored currencies and rate pairs.

use crate::domain::{Currency, RatePair};
use crate::error::RepoError;

/// Storage for currencies and directional rate pairs.
///
/// Missing rows are reported as `Ok(None)` on reads and as
/// [`RepoError::NotFound`] on updates and deletes.
#[async_trait::async_trait]
pub trait CurrencyRepository: Send + Sync + 'static {
    // ─────────────────────────────────────────────────────────────────────────────
    // Currencies
    // ─────────────────────────────────────────────────────────────────────────────

    /// Inserts a currency. Fails with [`RepoError::Conflict`] if the symbol exists.
    async fn create_currency(&self, currency: &Currency) -> Result<(), RepoError>;

    /// Gets a currency by symbol.
    async fn read_currency(&self, symbol: &str) -> Result<Option<Currency>, RepoError>;

    /// Lists all currencies ordered by symbol.
    async fn list_currencies(&self) -> Result<Vec<Currency>, RepoError>;

    /// Overwrites the description of an existing currency.
    async fn update_currency(&self, symbol: &str, description: &str)
    -> Result<Currency, RepoError>;

    /// Deletes a currency together with every rate pair that references it.
    async fn delete_currency(&self, symbol: &str) -> Result<(), RepoError>;

    /// Number of stored currencies.
    async fn count_currencies(&self) -> Result<i64, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Rate pairs (MUST be atomic across both directions)
    // ─────────────────────────────────────────────────────────────────────────────

    /// Gets the directional pair `from → to`.
    async fn read_rate_pair(&self, from: &str, to: &str) -> Result<Option<RatePair>, RepoError>;

    /// Lists all stored pairs, both directions included.
    async fn list_rate_pairs(&self) -> Result<Vec<RatePair>, RepoError>;

    /// Writes `pair` and its inverse in one transaction.
    async fn upsert_rate_pair_with_inverse(&self, pair: &RatePair) -> Result<(), RepoError>;

    /// Removes `from → to` and `to → from` in one transaction.
    async fn delete_rate_pair_with_inverse(&self, from: &str, to: &str) -> Result<(), RepoError>;
}
