//! Domain-level error types.

use thiserror::Error;

/// A single failed write constraint, carrying the offending field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("field `{0}` must not be blank")]
    MissingField(&'static str),

    #[error("relation `{0}` is required and must reference an existing record")]
    MissingRelation(&'static str),
}

impl ValidationError {
    /// Name of the field that failed.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField(field) | Self::MissingRelation(field) => field,
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
