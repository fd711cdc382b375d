// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Core of the restgate insert pipeline.
//!
//! Turns an untyped JSON body into a typed row for a declared entity, hands it
//! to an executor and builds the `201 Created` response with the new row's
//! primary-key route.
//!
//! # Overview
//!
//! - [`schema`] - Entity metadata and the process-wide catalog
//! - [`insert`] - The pipeline stages and [`InsertPipeline`](insert::InsertPipeline)
//! - [`executor`] - The [`InsertExecutor`](executor::InsertExecutor) boundary
//!   with in-memory and PostgreSQL implementations
//! - [`value`] - Typed column values and rows
//! - [`error`] - [`GatewayError`](error::GatewayError) and [`SchemaError`](error::SchemaError)
//! - [`config`] - [`GatewayConfig`](config::GatewayConfig)
//! - [`prelude`] - Convenient re-exports
//!
//! # Features
//!
//! | Feature | Adds |
//! |---------|------|
//! | `postgres` | `PgInsertExecutor` on top of `sqlx` |
//! | `axum` | `IntoResponse` for `InsertResponse` |
//!
//! Most users depend on `restgate`, which re-exports this crate together
//! with `#[derive(Entity)]`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod error;
pub mod executor;
pub mod insert;
pub mod prelude;
pub mod schema;
pub mod value;

/// Re-export async_trait for executor implementations.
pub use async_trait::async_trait;
pub use config::GatewayConfig;
pub use error::{GatewayError, SchemaError, SubStatusCode};
#[cfg(feature = "postgres")]
pub use executor::PgInsertExecutor;
pub use executor::{ExecutionFailure, FailureKind, InsertExecutor, InsertOutcome, MemoryExecutor};
pub use insert::{InsertPipeline, InsertRequest, InsertResponse, validate_insert};
pub use schema::{ColumnMetadata, EntityMetadata, EntitySchema, ScalarType, SchemaCatalog};
pub use value::{ColumnValue, InsertedRow, ValidatedRow};
