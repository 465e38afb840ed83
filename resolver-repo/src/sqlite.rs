//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use resolver_types::{Currency, CurrencyRepository, RatePair, RepoError};

use crate::types::{DbCount, DbCurrency, DbRatePair, db_err};

const MIGRATIONS: &[&str] = &[
    include_str!("../migrations/0001_create_currencies.sql"),
    include_str!("../migrations/0002_create_rate_pairs.sql"),
];

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory database lives as long as its connection.
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePool::connect_with(options).await?
        };

        let repo = Self { pool };
        repo.create_schema().await?;
        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema (idempotent).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        for ddl in MIGRATIONS {
            sqlx::query(ddl).execute(&self.pool).await.map_err(db_err)?;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl CurrencyRepository for SqliteRepo {
    async fn create_currency(&self, currency: &Currency) -> Result<(), RepoError> {
        sqlx::query(r#"INSERT INTO currencies (symbol, description, source) VALUES (?, ?, ?)"#)
            .bind(&currency.symbol)
            .bind(&currency.description)
            .bind(currency.source.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn read_currency(&self, symbol: &str) -> Result<Option<Currency>, RepoError> {
        let row: Option<DbCurrency> = sqlx::query_as(
            r#"SELECT symbol, description, source FROM currencies WHERE symbol = ?"#,
        )
        .bind(symbol)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(DbCurrency::into_domain).transpose()
    }

    async fn list_currencies(&self) -> Result<Vec<Currency>, RepoError> {
        let rows: Vec<DbCurrency> = sqlx::query_as(
            r#"SELECT symbol, description, source FROM currencies ORDER BY symbol"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(DbCurrency::into_domain).collect()
    }

    async fn update_currency(
        &self,
        symbol: &str,
        description: &str,
    ) -> Result<Currency, RepoError> {
        let row: Option<DbCurrency> = sqlx::query_as(
            r#"UPDATE currencies SET description = ? WHERE symbol = ?
               RETURNING symbol, description, source"#,
        )
        .bind(description)
        .bind(symbol)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.ok_or(RepoError::NotFound)?.into_domain()
    }

    async fn delete_currency(&self, symbol: &str) -> Result<(), RepoError> {
        // rate_pairs rows referencing the symbol go with it (ON DELETE CASCADE).
        let result = sqlx::query(r#"DELETE FROM currencies WHERE symbol = ?"#)
            .bind(symbol)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn count_currencies(&self) -> Result<i64, RepoError> {
        let row: DbCount = sqlx::query_as(r#"SELECT COUNT(*) AS count FROM currencies"#)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(row.count)
    }

    async fn read_rate_pair(&self, from: &str, to: &str) -> Result<Option<RatePair>, RepoError> {
        let row: Option<DbRatePair> = sqlx::query_as(
            r#"SELECT from_symbol, to_symbol, rate, updated_at FROM rate_pairs
               WHERE from_symbol = ? AND to_symbol = ?"#,
        )
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(DbRatePair::into_domain))
    }

    async fn list_rate_pairs(&self) -> Result<Vec<RatePair>, RepoError> {
        let rows: Vec<DbRatePair> = sqlx::query_as(
            r#"SELECT from_symbol, to_symbol, rate, updated_at FROM rate_pairs
               ORDER BY from_symbol, to_symbol"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(DbRatePair::into_domain).collect())
    }

    async fn upsert_rate_pair_with_inverse(&self, pair: &RatePair) -> Result<(), RepoError> {
        let now = Utc::now();
        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        for p in [pair.clone(), pair.inverse()] {
            sqlx::query(
                r#"INSERT INTO rate_pairs (from_symbol, to_symbol, rate, updated_at) VALUES (?, ?, ?, ?)
                   ON CONFLICT (from_symbol, to_symbol)
                   DO UPDATE SET rate = excluded.rate, updated_at = excluded.updated_at"#,
            )
            .bind(&p.from)
            .bind(&p.to)
            .bind(p.rate)
            .bind(now)
            .execute(&mut *db_tx)
            .await
            .map_err(db_err)?;
        }

        db_tx
            .commit()
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete_rate_pair_with_inverse(&self, from: &str, to: &str) -> Result<(), RepoError> {
        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        let forward = sqlx::query(r#"DELETE FROM rate_pairs WHERE from_symbol = ? AND to_symbol = ?"#)
            .bind(from)
            .bind(to)
            .execute(&mut *db_tx)
            .await
            .map_err(db_err)?;

        if forward.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        sqlx::query(r#"DELETE FROM rate_pairs WHERE from_symbol = ? AND to_symbol = ?"#)
            .bind(to)
            .bind(from)
            .execute(&mut *db_tx)
            .await
            .map_err(db_err)?;

        db_tx
            .commit()
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }
}
