//! Domain Layer - Core Entity Trait
//!
//! Every record the repositories persist has a stable id and belongs to one
//! organization.

use serde::{Deserialize, Serialize};

/// Core trait for all domain records
pub trait Entity: Sized + Send + Sync + Clone {
    /// The type of the record's unique identifier
    type Id: Copy + Eq + std::hash::Hash + Send + Sync;

    /// Returns the record's unique identifier
    fn id(&self) -> Self::Id;

    /// Organization the record belongs to
    fn organization_id(&self) -> u32;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DomainError {
    NotFound(String),
    InvalidInput(String),
    Conflict(String),
    Internal(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DomainError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            DomainError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(code, msg)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                DomainError::Conflict(msg.unwrap_or_else(|| code.to_string()))
            }
            other => DomainError::Internal(other.to_string()),
        }
    }
}
