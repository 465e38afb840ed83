//! Shared database row types and error mapping.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use resolver_types::{Currency, RatePair, RepoError, Source};

/// Currency row from database.
#[derive(FromRow)]
pub struct DbCurrency {
    pub symbol: String,
    pub description: String,
    pub source: String,
}

impl DbCurrency {
    pub fn into_domain(self) -> Result<Currency, RepoError> {
        let source: Source = self.source.parse().map_err(RepoError::Database)?;
        Ok(Currency::from_parts(self.symbol, self.description, source))
    }
}

/// Rate pair row from database.
#[derive(FromRow)]
pub struct DbRatePair {
    pub from_symbol: String,
    pub to_symbol: String,
    pub rate: f64,
    pub updated_at: DateTime<Utc>,
}

impl DbRatePair {
    pub fn into_domain(self) -> RatePair {
        RatePair::from_parts(self.from_symbol, self.to_symbol, self.rate, self.updated_at)
    }
}

/// Count row.
#[derive(FromRow)]
pub struct DbCount {
    pub count: i64,
}

/// Maps driver errors onto the repository error contract.
///
/// Unique violations become `Conflict`; foreign key violations mean a
/// referenced currency is missing and become `NotFound`.
pub fn db_err(e: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return RepoError::Conflict(db.message().to_string());
        }
        if db.is_foreign_key_violation() {
            return RepoError::NotFound;
        }
    }
    RepoError::Database(e.to_string())
}
