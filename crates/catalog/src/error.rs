//! Catalog-level error taxonomy.

use thiserror::Error;

use vitrine_core::{DomainError, StoreId};
use vitrine_query::ExecutorError;

/// Result type used across the catalog layer.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog read-layer error.
///
/// No variant is retried here; callers decide on retry/backoff. Execution
/// failures propagate unchanged from the query executor.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Scope or store-level configuration is unavailable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A caller-supplied argument violated the operation contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A required singleton row is absent for the given scope.
    #[error("{entity} not found for scope {scope}")]
    NotFound { entity: String, scope: StoreId },

    /// Propagated query executor failure.
    #[error("query execution failed: {0}")]
    Execution(#[from] ExecutorError),
}

impl CatalogError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn not_found(entity: impl Into<String>, scope: StoreId) -> Self {
        Self::NotFound {
            entity: entity.into(),
            scope,
        }
    }
}

impl From<DomainError> for CatalogError {
    fn from(err: DomainError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}
