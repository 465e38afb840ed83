//! PostgreSQL repository adapter.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};

use resolver_types::{Currency, CurrencyRepository, RatePair, RepoError};

use crate::types::{DbCount, DbCurrency, DbRatePair, db_err};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository implementation.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

/// Runs all database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_currencies_pg.sql"),
        "0001",
    )
    .await?;

    execute_migration(
        pool,
        include_str!("../migrations/0002_create_rate_pairs_pg.sql"),
        "0002",
    )
    .await?;

    Ok(())
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CurrencyRepository for PostgresRepo {
    async fn create_currency(&self, currency: &Currency) -> Result<(), RepoError> {
        sqlx::query(r#"INSERT INTO currencies (symbol, description, source) VALUES ($1, $2, $3)"#)
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
            r#"SELECT symbol, description, source FROM currencies WHERE symbol = $1"#,
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
            r#"UPDATE currencies SET description = $1 WHERE symbol = $2
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
        let result = sqlx::query(r#"DELETE FROM currencies WHERE symbol = $1"#)
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
               WHERE from_symbol = $1 AND to_symbol = $2"#,
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
                r#"INSERT INTO rate_pairs (from_symbol, to_symbol, rate, updated_at) VALUES ($1, $2, $3, $4)
                   ON CONFLICT (from_symbol, to_symbol)
                   DO UPDATE SET rate = EXCLUDED.rate, updated_at = EXCLUDED.updated_at"#,
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

        // Both directions in one statement.
        let deleted = sqlx::query(
            r#"DELETE FROM rate_pairs
               WHERE (from_symbol = $1 AND to_symbol = $2) OR (from_symbol = $2 AND to_symbol = $1)
               RETURNING from_symbol"#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&mut *db_tx)
        .await
        .map_err(db_err)?;

        let forward_found = deleted.iter().any(|row| {
            row.try_get::<String, _>("from_symbol")
                .is_ok_and(|symbol| symbol == from)
        });

        if !forward_found {
            return Err(RepoError::NotFound);
        }

        db_tx
            .commit()
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }
}
