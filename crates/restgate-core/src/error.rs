// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Error types for the insert pipeline.
//!
//! Every stage of the pipeline short-circuits with a [`GatewayError`]. Each
//! variant knows its HTTP status and sub-status token, so the response
//! builder can render any failure without inspecting where it came from.
//!
//! # Taxonomy
//!
//! | Category | Variants | Status |
//! |----------|----------|--------|
//! | [`ErrorCategory::MalformedRequest`] | `BatchNotSupported`, `MalformedJson`, `NotAnObject` | 400 |
//! | [`ErrorCategory::InvalidRequestTarget`] | `InvalidQueryString`, `PrimaryKeyInRoute` | 400 |
//! | [`ErrorCategory::SchemaViolation`] | `FieldNotAllowed`, `UnexpectedFields`, `MissingField` | 400 |
//! | [`ErrorCategory::TypeMismatch`] | `InvalidNull`, `TypeMismatch` | 400 |
//! | [`ErrorCategory::NotFound`] | `EntityNotFound` | 404 |
//! | [`ErrorCategory::ExecutionFailure`] | `ConstraintViolation`, `Connectivity`, `Database` | 409 / 500 |
//! | [`ErrorCategory::Internal`] | `InvalidLocation` | 500 |
//!
//! Schema construction failures are reported separately through
//! [`SchemaError`]; they happen at startup, never while serving a request.

use http::StatusCode;
use serde::Serialize;

use crate::schema::ScalarType;

/// Message returned to clients for any 5xx database failure.
pub const DATABASE_FAILURE_MESSAGE: &str =
    "While processing your request the database ran into an error.";

/// Sub-status token carried in the error envelope.
///
/// Clients match on this token rather than on the free-form message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SubStatusCode {
    /// The request is invalid and must not be retried unchanged.
    BadRequest,

    /// The addressed entity is not part of the schema catalog.
    EntityNotFound,

    /// The database rejected the write.
    DatabaseOperationFailed,

    /// Anything the gateway cannot attribute to the client.
    UnexpectedError
}

impl SubStatusCode {
    /// Token as it appears on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "BadRequest",
            Self::EntityNotFound => "EntityNotFound",
            Self::DatabaseOperationFailed => "DatabaseOperationFailed",
            Self::UnexpectedError => "UnexpectedError"
        }
    }
}

/// Coarse classification of a [`GatewayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The body is not a single JSON object.
    MalformedRequest,

    /// The request URL carries a query string or key route.
    InvalidRequestTarget,

    /// Disallowed, unexpected or missing fields.
    SchemaViolation,

    /// A value cannot be coerced to its column type.
    TypeMismatch,

    /// The entity is unknown.
    NotFound,

    /// The insert executor reported a failure.
    ExecutionFailure,

    /// The gateway could not render a successful insert.
    Internal
}

/// Failure of a single insert request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    /// The top-level body is a JSON array.
    #[error(
        "Mutation operation on many instances of an entity in a single request are not yet supported."
    )]
    BatchNotSupported,

    /// The body is not valid JSON.
    #[error("The request body is not a valid JSON object.")]
    MalformedJson,

    /// The body is valid JSON but a scalar or `null`.
    #[error("The request body must be a JSON object.")]
    NotAnObject,

    /// A query string accompanied the POST.
    #[error("Query string for POST requests is an invalid url.")]
    InvalidQueryString,

    /// A primary-key route accompanied the POST.
    #[error("Primary key for POST requests can't be specified in the request URL.")]
    PrimaryKeyInRoute,

    /// An auto-generated primary key was supplied by the client.
    #[error("Invalid request body. Field not allowed in body: {field}.")]
    FieldNotAllowed {
        /// Exposed name of the offending field.
        field: String
    },

    /// The body names fields the entity does not expose.
    #[error("Invalid request body. Contained unexpected fields in body: {}", .fields.join(", "))]
    UnexpectedFields {
        /// Unrecognised names, in request order.
        fields: Vec<String>
    },

    /// A required field is absent.
    #[error("Invalid request body. Missing field in body: {field}.")]
    MissingField {
        /// Exposed name of the first missing field in schema order.
        field: String
    },

    /// `null` was supplied for a non-nullable column.
    #[error("Invalid value for field {field} in request body.")]
    InvalidNull {
        /// Exposed name of the field.
        field: String
    },

    /// A value cannot be coerced to the column type.
    #[error("Parameter \"{raw}\" cannot be resolved as column \"{column}\" with type \"{scalar_type}\".")]
    TypeMismatch {
        /// The value exactly as it appeared in the request.
        raw:         String,
        /// Backing column name.
        column:      String,
        /// Declared column type.
        scalar_type: ScalarType
    },

    /// The entity name is not in the catalog.
    #[error("The requested entity {entity} was not found.")]
    EntityNotFound {
        /// Requested entity name.
        entity: String
    },

    /// The database rejected the row on a constraint.
    #[error("{message}")]
    ConstraintViolation {
        /// Message reported by the executor.
        message: String
    },

    /// The database could not be reached.
    #[error("database connectivity failure: {message}")]
    Connectivity {
        /// Executor detail, never shown to clients.
        message: String
    },

    /// Any other database failure.
    #[error("database failure: {message}")]
    Database {
        /// Executor detail, never shown to clients.
        message: String
    },

    /// The row was stored but its route is not a valid `Location` value.
    #[error("generated location `{location}` is not a valid header value")]
    InvalidLocation {
        /// The rejected location.
        location: String
    }
}

impl GatewayError {
    /// Coarse category of this error.
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::BatchNotSupported | Self::MalformedJson | Self::NotAnObject => {
                ErrorCategory::MalformedRequest
            }
            Self::InvalidQueryString | Self::PrimaryKeyInRoute => {
                ErrorCategory::InvalidRequestTarget
            }
            Self::FieldNotAllowed { .. }
            | Self::UnexpectedFields { .. }
            | Self::MissingField { .. } => ErrorCategory::SchemaViolation,
            Self::InvalidNull { .. }
            | Self::TypeMismatch { .. } => ErrorCategory::TypeMismatch,
            Self::EntityNotFound { .. } => ErrorCategory::NotFound,
            Self::ConstraintViolation { .. }
            | Self::Connectivity { .. }
            | Self::Database { .. } => ErrorCategory::ExecutionFailure,
            Self::InvalidLocation { .. } => ErrorCategory::Internal
        }
    }

    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::EntityNotFound { .. } => StatusCode::NOT_FOUND,
            Self::ConstraintViolation { .. } => StatusCode::CONFLICT,
            Self::Connectivity { .. }
            | Self::Database { .. }
            | Self::InvalidLocation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST
        }
    }

    /// Sub-status token for the error envelope.
    pub const fn sub_status(&self) -> SubStatusCode {
        match self.category() {
            ErrorCategory::NotFound => SubStatusCode::EntityNotFound,
            ErrorCategory::ExecutionFailure => match self {
                Self::ConstraintViolation { .. } => SubStatusCode::DatabaseOperationFailed,
                _ => SubStatusCode::UnexpectedError
            },
            ErrorCategory::Internal => SubStatusCode::UnexpectedError,
            _ => SubStatusCode::BadRequest
        }
    }

    /// Message safe to show to clients.
    ///
    /// Connectivity, unknown database and internal failures are replaced
    /// with [`DATABASE_FAILURE_MESSAGE`]; everything else is its display text.
    pub fn client_message(&self) -> String {
        match self {
            Self::Connectivity { .. }
            | Self::Database { .. }
            | Self::InvalidLocation { .. } => DATABASE_FAILURE_MESSAGE.to_string(),
            other => other.to_string()
        }
    }

    /// Check if the client can fix the request and retry.
    pub const fn is_client_error(&self) -> bool {
        !matches!(
            self.category(),
            ErrorCategory::ExecutionFailure | ErrorCategory::Internal
        )
    }
}

/// Failure to construct entity metadata or the schema catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The entity declares no primary-key column.
    #[error("entity `{entity}` declares no primary key")]
    MissingPrimaryKey {
        /// Entity name.
        entity: String
    },

    /// An explicit key order names something that is not a key column.
    #[error("entity `{entity}` orders its primary key by unknown column `{column}`")]
    UnknownKeyColumn {
        /// Entity name.
        entity: String,
        /// Offending column.
        column: String
    },

    /// An explicit key order does not list every key column exactly once.
    #[error("entity `{entity}` primary-key order does not match its key columns")]
    KeyOrderMismatch {
        /// Entity name.
        entity: String
    },

    /// Two columns share a backing name.
    #[error("entity `{entity}` declares column `{column}` twice")]
    DuplicateColumn {
        /// Entity name.
        entity: String,
        /// Duplicated backing name.
        column: String
    },

    /// Two columns share an exposed name.
    #[error("entity `{entity}` exposes field `{field}` twice")]
    DuplicateExposedName {
        /// Entity name.
        entity: String,
        /// Duplicated exposed name.
        field:  String
    },

    /// A non-key column is flagged as auto-generated.
    #[error("entity `{entity}` marks non-key column `{column}` as auto-generated")]
    AutoGeneratedNonKey {
        /// Entity name.
        entity: String,
        /// Offending column.
        column: String
    },

    /// Two entities share a name in the catalog.
    #[error("entity `{entity}` is registered twice")]
    DuplicateEntity {
        /// Entity name.
        entity: String
    }
}
