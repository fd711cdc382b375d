// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Insert pipeline.
//!
//! # Architecture
//!
//! ```text
//! InsertRequest
//!     │
//!     ├── catalog lookup ───── 404 EntityNotFound
//!     ├── target.rs ────────── 400 key route / query string
//!     ├── body.rs ──────────── 400 batch / not an object / malformed
//!     ├── mapper.rs
//!     ├── validate.rs ──────── 400 not allowed / unexpected / missing
//!     ├── coerce.rs ────────── 400 invalid null / type mismatch
//!     │
//!     ├── InsertExecutor ───── 409 constraint / 500 database
//!     │
//!     ├── route.rs ─────────── primary-key route
//!     └── response.rs ──────── InsertResponse
//! ```
//!
//! Everything before the executor is pure and synchronous;
//! [`validate_insert`] exposes that part on its own.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use restgate_core::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let books = EntityMetadata::builder("Book", "books")
//!     .column(ColumnMetadata::new("id", ScalarType::Int32).primary_key().auto_generated())
//!     .column(ColumnMetadata::new("title", ScalarType::String))
//!     .build()
//!     .unwrap();
//! let catalog = SchemaCatalog::builder().entity(books).build().unwrap();
//! let pipeline = InsertPipeline::new(Arc::new(catalog), Arc::new(MemoryExecutor::new()));
//!
//! let response = pipeline
//!     .execute(&InsertRequest::new("Book", r#"{"title": "Dune"}"#))
//!     .await;
//! assert_eq!(response.location.as_deref(), Some("/api/Book/id/1"));
//! # }
//! ```

mod body;
mod coerce;
mod mapper;
mod response;
pub mod route;
mod target;
mod validate;

use std::sync::Arc;

pub use body::{BodyField, ParsedBody, parse_body};
pub use coerce::{coerce_row, coerce_value};
pub use mapper::{MappedFields, map_fields};
pub use response::{InsertResponse, row_body};
pub use target::check_target;
use tracing::Instrument;
pub use validate::validate_fields;

use crate::{
    config::GatewayConfig,
    error::GatewayError,
    executor::InsertExecutor,
    schema::{EntityMetadata, SchemaCatalog},
    value::ValidatedRow
};

/// One `POST` against an entity collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertRequest {
    /// Entity name from the route.
    pub entity:            String,
    /// Path after the entity name; must be empty for inserts.
    pub primary_key_route: String,
    /// Raw query string, with or without the leading `?`.
    pub query_string:      String,
    /// Raw request payload.
    pub body:              Vec<u8>
}

impl InsertRequest {
    /// Create a request with no key route and no query string.
    pub fn new(entity: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            entity: entity.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    /// Set the path after the entity name.
    #[must_use]
    pub fn primary_key_route(mut self, route: impl Into<String>) -> Self {
        self.primary_key_route = route.into();
        self
    }

    /// Set the query string.
    #[must_use]
    pub fn query_string(mut self, query: impl Into<String>) -> Self {
        self.query_string = query.into();
        self
    }
}

/// Run the pure stages: parse, map, validate, coerce.
///
/// # Errors
///
/// The first malformed-request, schema or type error.
pub fn validate_insert(metadata: &EntityMetadata, payload: &[u8]) -> Result<ValidatedRow, GatewayError> {
    let body = parse_body(payload)?;
    let mapped = map_fields(metadata, &body);
    validate_fields(metadata, &mapped)?;
    coerce_row(metadata, &mapped)
}

/// Insert pipeline bound to a catalog and an executor.
///
/// Cheap to clone; clones share the catalog and executor.
#[derive(Debug)]
pub struct InsertPipeline<E> {
    catalog:  Arc<SchemaCatalog>,
    executor: Arc<E>,
    config:   GatewayConfig
}

impl<E> Clone for InsertPipeline<E> {
    fn clone(&self) -> Self {
        Self {
            catalog:  Arc::clone(&self.catalog),
            executor: Arc::clone(&self.executor),
            config:   self.config.clone()
        }
    }
}

impl<E: InsertExecutor> InsertPipeline<E> {
    /// Create a pipeline with default configuration.
    pub fn new(catalog: Arc<SchemaCatalog>, executor: Arc<E>) -> Self {
        Self {
            catalog,
            executor,
            config: GatewayConfig::default()
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: GatewayConfig) -> Self {
        self.config = config;
        self
    }

    /// Shared schema catalog.
    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    /// Shared executor.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Active configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Run the request and render any failure as an error response.
    pub async fn execute(&self, request: &InsertRequest) -> InsertResponse {
        match self.try_execute(request).await {
            Ok(response) => response,
            Err(err) => InsertResponse::from_error(&err)
        }
    }

    /// Run the request.
    ///
    /// # Errors
    ///
    /// The [`GatewayError`] of the first failing stage.
    pub async fn try_execute(&self, request: &InsertRequest) -> Result<InsertResponse, GatewayError> {
        let span = tracing::info_span!("insert", entity = %request.entity);
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: &InsertRequest) -> Result<InsertResponse, GatewayError> {
        let metadata = self.catalog.lookup(&request.entity).inspect_err(|err| {
            tracing::debug!(error = %err, "unknown entity");
        })?;

        let row = check_target(request)
            .and_then(|()| validate_insert(metadata, &request.body))
            .inspect_err(|err| {
                tracing::debug!(error = %err, category = ?err.category(), "insert rejected");
            })?;

        let inserted = self
            .executor
            .insert(metadata, row.clone())
            .await
            .into_result()
            .inspect_err(|err| match err {
                GatewayError::ConstraintViolation { .. } => {
                    tracing::warn!(error = %err, "insert violated a constraint");
                }
                _ => tracing::error!(error = %err, "insert failed")
            })?;

        let key = route::resolve_primary_key(metadata, &row, &inserted).inspect_err(|err| {
            tracing::error!(error = %err, "executor returned an incomplete key");
        })?;
        let pk_route = route::build_route(&key);
        let location = format!("{}/{pk_route}", self.config.entity_path(metadata.name()));
        if http::HeaderValue::from_str(&location).is_err() {
            let err = GatewayError::InvalidLocation { location };
            tracing::error!(error = %err, "row stored without a usable location");
            return Err(err);
        }

        tracing::info!(%location, "row created");
        Ok(InsertResponse::created(location, row_body(metadata, &row, &inserted)))
    }
}
