//! Error types for the resolver.

use std::fmt;

/// Client-caused input errors. Always rejected before any I/O.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("currency needs a symbol")]
    EmptySymbol,

    #[error("currency symbol has to have 3 or more characters")]
    SymbolMinLen,

    #[error("amount is not a number")]
    AmountIsNotANumber,

    #[error("rate has to be a positive number")]
    InvalidRate,

    #[error("rate needs two different currencies")]
    IdenticalPair,

    #[error("converted amount is out of range")]
    AmountOutOfRange,
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Rate provider errors.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider unreachable: {0}")]
    Unreachable(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// The provider answered but reported `success=false`.
    #[error("Provider declined {operation}")]
    Declined { operation: &'static str },
}

/// Business entities that can be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Currency,
    Rate,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Currency => f.write_str("currency"),
            Entity::Rate => f.write_str("rate"),
        }
    }
}

/// Application-level errors returned by the resolution service.
///
/// Maps cleanly to HTTP status codes: validation and not-found failures are
/// client errors, repository and provider failures are server errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0} not found")]
    NotFound(Entity),

    #[error("{0} already exists")]
    AlreadyExists(Entity),

    #[error("{operation}: {source}")]
    Repository {
        operation: &'static str,
        #[source]
        source: RepoError,
    },

    #[error("{operation}: {source}")]
    Provider {
        operation: &'static str,
        #[source]
        source: ProviderError,
    },
}

impl AppError {
    pub fn repo(operation: &'static str, source: RepoError) -> Self {
        AppError::Repository { operation, source }
    }

    pub fn provider(operation: &'static str, source: ProviderError) -> Self {
        AppError::Provider { operation, source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// True for failures caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::NotFound(_) | AppError::AlreadyExists(_)
        )
    }
}
