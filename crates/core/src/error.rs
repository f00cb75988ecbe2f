//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic parse/validation failures. Storage and
/// composition concerns belong to the query and catalog layers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A product type string did not match any queryable type.
    #[error("unknown product type: {0}")]
    UnknownProductType(String),

    /// A link type string did not match any known link relation.
    #[error("unknown link type: {0}")]
    UnknownLinkType(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
