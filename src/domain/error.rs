use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} not found with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Duplicate resource or a write lost to a concurrent one.
    #[error("{0}")]
    Conflict(String),

    /// Business-rule violation (unpublished event, full capacity, bad dates).
    #[error("{0}")]
    InvalidState(String),

    /// Malformed or out-of-range input.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    /// Storage or other infrastructure failure.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.into(),
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── Tests ──────────────────────────────────────────────────────
