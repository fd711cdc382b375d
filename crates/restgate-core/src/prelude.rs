// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust
//! use restgate_core::prelude::*;
//! ```

#[cfg(feature = "postgres")]
pub use crate::executor::PgInsertExecutor;
pub use crate::{
    async_trait,
    config::GatewayConfig,
    error::{GatewayError, SchemaError, SubStatusCode},
    executor::{ExecutionFailure, FailureKind, InsertExecutor, InsertOutcome, MemoryExecutor},
    insert::{InsertPipeline, InsertRequest, InsertResponse, validate_insert},
    schema::{ColumnMetadata, EntityMetadata, EntitySchema, ScalarType, SchemaCatalog},
    value::{ColumnValue, InsertedRow, ValidatedRow}
};
