// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Insert execution boundary.
//!
//! The pipeline validates and coerces a request into a [`ValidatedRow`], then
//! hands it to an [`InsertExecutor`]. The executor is the only suspension
//! point of an insert; everything before it is pure.
//!
//! # Implementations
//!
//! | Type | Feature | Backing store |
//! |------|---------|---------------|
//! | [`MemoryExecutor`] | - | In-process tables |
//! | [`PgInsertExecutor`] | `postgres` | PostgreSQL via `sqlx` |
//!
//! # Contract
//!
//! - One call writes at most one row, atomically.
//! - On success the returned [`InsertedRow`] holds a value for every
//!   primary-key column, including database-assigned ones.
//! - Failures are classified, never retried.

mod memory;
#[cfg(feature = "postgres")]
mod postgres;

use async_trait::async_trait;
pub use memory::MemoryExecutor;
#[cfg(feature = "postgres")]
pub use postgres::PgInsertExecutor;

use crate::{
    error::GatewayError,
    schema::EntityMetadata,
    value::{InsertedRow, ValidatedRow}
};

/// Classification of an executor failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Uniqueness, foreign-key, not-null or check constraint.
    ConstraintViolation,

    /// The database could not be reached.
    Connectivity,

    /// Anything else.
    Unknown
}

/// Failure reported by an executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionFailure {
    /// Classification.
    pub kind:    FailureKind,
    /// Database message.
    pub message: String
}

impl ExecutionFailure {
    /// Constraint violation with a client-visible message.
    pub fn constraint(message: impl Into<String>) -> Self {
        Self {
            kind:    FailureKind::ConstraintViolation,
            message: message.into()
        }
    }

    /// Connectivity failure.
    pub fn connectivity(message: impl Into<String>) -> Self {
        Self {
            kind:    FailureKind::Connectivity,
            message: message.into()
        }
    }

    /// Unclassified failure.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            kind:    FailureKind::Unknown,
            message: message.into()
        }
    }
}

impl From<ExecutionFailure> for GatewayError {
    fn from(failure: ExecutionFailure) -> Self {
        let message = failure.message;
        match failure.kind {
            FailureKind::ConstraintViolation => Self::ConstraintViolation {
                message
            },
            FailureKind::Connectivity => Self::Connectivity {
                message
            },
            FailureKind::Unknown => Self::Database {
                message
            }
        }
    }
}

/// Result of one insert.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// The row was written.
    Inserted(InsertedRow),

    /// The database refused or could not be reached.
    Failed(ExecutionFailure)
}

impl InsertOutcome {
    /// Convert into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the failure mapped to its [`GatewayError`].
    pub fn into_result(self) -> Result<InsertedRow, GatewayError> {
        match self {
            Self::Inserted(row) => Ok(row),
            Self::Failed(failure) => Err(failure.into())
        }
    }
}

/// Writes one validated row.
///
/// # Example
///
/// ```rust,ignore
/// use restgate_core::prelude::*;
///
/// struct Audit<E>(E);
///
/// #[async_trait]
/// impl<E: InsertExecutor> InsertExecutor for Audit<E> {
///     async fn insert(&self, metadata: &EntityMetadata, row: ValidatedRow) -> InsertOutcome {
///         tracing::info!(table = metadata.source_name(), "insert");
///         self.0.insert(metadata, row).await
///     }
/// }
/// ```
#[async_trait]
pub trait InsertExecutor: Send + Sync {
    /// Insert `row` into the table behind `metadata`.
    async fn insert(&self, metadata: &EntityMetadata, row: ValidatedRow) -> InsertOutcome;
}

#[async_trait]
impl<T: InsertExecutor + ?Sized> InsertExecutor for std::sync::Arc<T> {
    async fn insert(&self, metadata: &EntityMetadata, row: ValidatedRow) -> InsertOutcome {
        (**self).insert(metadata, row).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SubStatusCode;

    #[test]
    fn failure_kinds_map_to_gateway_errors() {
        let conflict: GatewayError = ExecutionFailure::constraint("dup").into();
        assert_eq!(conflict.sub_status(), SubStatusCode::DatabaseOperationFailed);

        let down: GatewayError = ExecutionFailure::connectivity("refused").into();
        assert!(matches!(down, GatewayError::Connectivity { .. }));

        let other: GatewayError = ExecutionFailure::unknown("boom").into();
        assert!(matches!(other, GatewayError::Database { .. }));
    }

    #[test]
    fn outcome_into_result() {
        let ok = InsertOutcome::Inserted(InsertedRow::new()).into_result();
        assert!(ok.is_ok());
        let err = InsertOutcome::Failed(ExecutionFailure::unknown("x")).into_result();
        assert_eq!(err.unwrap_err().status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
