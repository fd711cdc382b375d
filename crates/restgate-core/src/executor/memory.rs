// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! In-process executor.
//!
//! Tables live in a `HashMap` behind one `Mutex`. Auto-generated key columns
//! draw from a per-table counter starting at the configured seed; the counter
//! only advances when a row is actually stored. Columns with a database
//! default that the request left out are not stored, since the executor
//! cannot know the default value.

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError}
};

use async_trait::async_trait;

use super::{ExecutionFailure, InsertExecutor, InsertOutcome};
use crate::{
    config::GatewayConfig,
    insert::route,
    schema::{EntityMetadata, ScalarType},
    value::{ColumnValue, InsertedRow, ValidatedRow}
};

#[derive(Debug, Default)]
struct Table {
    rows:     Vec<InsertedRow>,
    next_key: HashMap<String, Option<i64>>
}

/// Executor storing rows in memory.
///
/// # Example
///
/// ```rust
/// use restgate_core::executor::MemoryExecutor;
///
/// let executor = MemoryExecutor::with_seed(5001);
/// assert!(executor.rows("books").is_empty());
/// ```
#[derive(Debug)]
pub struct MemoryExecutor {
    tables:   Mutex<HashMap<String, Table>>,
    key_seed: i64,
    failure:  Mutex<Option<ExecutionFailure>>
}

impl Default for MemoryExecutor {
    fn default() -> Self {
        Self::with_seed(1)
    }
}

impl MemoryExecutor {
    /// Create an empty executor with keys starting at 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty executor with keys starting at `seed`.
    pub fn with_seed(seed: i64) -> Self {
        Self {
            tables:   Mutex::new(HashMap::new()),
            key_seed: seed,
            failure:  Mutex::new(None)
        }
    }

    /// Create an empty executor seeded from configuration.
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::with_seed(config.memory_key_seed)
    }

    /// Make every following insert fail with `failure`.
    pub fn fail_with(&self, failure: ExecutionFailure) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(failure);
    }

    /// Undo [`fail_with`](Self::fail_with).
    pub fn clear_failure(&self) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Snapshot of the rows stored in table `source`, in insertion order.
    pub fn rows(&self, source: &str) -> Vec<InsertedRow> {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(source)
            .map(|table| table.rows.clone())
            .unwrap_or_default()
    }

    /// Read a row back through its primary-key route.
    ///
    /// The route has the form produced for `Location` headers, e.g.
    /// `categoryid/5/pieceid/2`.
    pub fn find_by_route(&self, metadata: &EntityMetadata, route: &str) -> Option<InsertedRow> {
        let key = route::parse_route(metadata, route)?;
        let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        tables
            .get(metadata.source_name())?
            .rows
            .iter()
            .find(|row| {
                key.iter().all(|(column, segment)| {
                    row.get(column)
                        .is_some_and(|value| value.to_string() == *segment)
                })
            })
            .cloned()
    }

    fn store(
        &self,
        metadata: &EntityMetadata,
        row: &ValidatedRow
    ) -> Result<InsertedRow, ExecutionFailure> {
        if let Some(failure) = self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(failure);
        }

        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        let table = tables.entry(metadata.source_name().to_string()).or_default();

        let mut inserted = InsertedRow::new();
        let mut generated = Vec::new();
        for column in metadata.columns() {
            let name = column.backing_name();
            let value = if column.is_auto_generated() {
                let next = table
                    .next_key
                    .get(name)
                    .copied()
                    .unwrap_or(Some(self.key_seed))
                    .ok_or_else(|| {
                        ExecutionFailure::unknown(format!(
                            "auto-generated key space of `{name}` is exhausted"
                        ))
                    })?;
                generated.push((name.to_string(), next));
                generated_value(column.scalar_type(), next)?
            } else {
                match row.get(name) {
                    Some(value) => value.clone(),
                    None if column.has_default() => continue,
                    None => ColumnValue::Null
                }
            };
            inserted.set(name, value);
        }

        let duplicate = table.rows.iter().any(|existing| {
            metadata
                .primary_key()
                .iter()
                .all(|key| existing.get(key) == inserted.get(key))
        });
        if duplicate {
            return Err(ExecutionFailure::constraint(format!(
                "Cannot insert duplicate key into \"{}\".",
                metadata.source_name()
            )));
        }

        for (name, value) in generated {
            table.next_key.insert(name, value.checked_add(1));
        }
        table.rows.push(inserted.clone());
        Ok(inserted)
    }
}

fn generated_value(scalar_type: ScalarType, next: i64) -> Result<ColumnValue, ExecutionFailure> {
    match scalar_type {
        ScalarType::Int64 => Ok(ColumnValue::Int64(next)),
        ScalarType::Int32 => i32::try_from(next)
            .map(ColumnValue::Int32)
            .map_err(|_| ExecutionFailure::unknown("auto-generated key out of Int32 range")),
        ScalarType::String => Ok(ColumnValue::String(next.to_string())),
        other => Err(ExecutionFailure::unknown(format!(
            "cannot generate keys of type {other}"
        )))
    }
}

#[async_trait]
impl InsertExecutor for MemoryExecutor {
    async fn insert(&self, metadata: &EntityMetadata, row: ValidatedRow) -> InsertOutcome {
        match self.store(metadata, &row) {
            Ok(inserted) => InsertOutcome::Inserted(inserted),
            Err(failure) => InsertOutcome::Failed(failure)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{executor::FailureKind, schema::ColumnMetadata};

    fn books() -> EntityMetadata {
        EntityMetadata::builder("Book", "books")
            .column(
                ColumnMetadata::new("id", ScalarType::Int32)
                    .primary_key()
                    .auto_generated()
            )
            .column(ColumnMetadata::new("title", ScalarType::String))
            .column(ColumnMetadata::new("note", ScalarType::String).nullable())
            .build()
            .unwrap()
    }

    fn stocks() -> EntityMetadata {
        EntityMetadata::builder("Stock", "stocks")
            .column(ColumnMetadata::new("categoryid", ScalarType::Int32).primary_key())
            .column(ColumnMetadata::new("pieceid", ScalarType::Int32).primary_key())
            .build()
            .unwrap()
    }

    fn titled(title: &str) -> ValidatedRow {
        let mut row = ValidatedRow::new();
        row.push("title", ColumnValue::String(title.into()));
        row
    }

    #[tokio::test]
    async fn assigns_sequential_keys_from_seed() {
        let executor = MemoryExecutor::with_seed(5001);
        let meta = books();

        let first = executor.insert(&meta, titled("a")).await.into_result().unwrap();
        let second = executor.insert(&meta, titled("b")).await.into_result().unwrap();

        assert_eq!(first.get("id"), Some(&ColumnValue::Int32(5001)));
        assert_eq!(second.get("id"), Some(&ColumnValue::Int32(5002)));
        assert_eq!(first.get("note"), Some(&ColumnValue::Null));
        assert_eq!(executor.rows("books").len(), 2);
    }

    #[tokio::test]
    async fn omits_defaulted_columns_left_out() {
        let executor = MemoryExecutor::new();
        let meta = EntityMetadata::builder("Stock", "stocks")
            .column(ColumnMetadata::new("categoryid", ScalarType::Int32).primary_key())
            .column(ColumnMetadata::new("pieces_required", ScalarType::Int32).with_default())
            .column(ColumnMetadata::new("note", ScalarType::String).nullable())
            .build()
            .unwrap();
        let mut row = ValidatedRow::new();
        row.push("categoryid", ColumnValue::Int32(1));

        let inserted = executor.insert(&meta, row).await.into_result().unwrap();
        assert_eq!(inserted.get("pieces_required"), None);
        assert_eq!(inserted.get("note"), Some(&ColumnValue::Null));

        let mut row = ValidatedRow::new();
        row.push("categoryid", ColumnValue::Int32(2));
        row.push("pieces_required", ColumnValue::Int32(4));
        let inserted = executor.insert(&meta, row).await.into_result().unwrap();
        assert_eq!(inserted.get("pieces_required"), Some(&ColumnValue::Int32(4)));
    }

    #[tokio::test]
    async fn exhausted_key_space_fails() {
        let executor = MemoryExecutor::with_seed(i64::MAX);
        let meta = EntityMetadata::builder("Event", "events")
            .column(
                ColumnMetadata::new("id", ScalarType::Int64)
                    .primary_key()
                    .auto_generated()
            )
            .build()
            .unwrap();

        let last = executor
            .insert(&meta, ValidatedRow::new())
            .await
            .into_result()
            .unwrap();
        assert_eq!(last.get("id"), Some(&ColumnValue::Int64(i64::MAX)));

        match executor.insert(&meta, ValidatedRow::new()).await {
            InsertOutcome::Failed(failure) => assert_eq!(failure.kind, FailureKind::Unknown),
            other => panic!("expected failure, got {other:?}")
        }
        assert_eq!(executor.rows("events").len(), 1);
    }

    #[tokio::test]
    async fn find_by_route_decodes_segments() {
        let executor = MemoryExecutor::new();
        let meta = EntityMetadata::builder("Tag", "tags")
            .column(ColumnMetadata::new("name", ScalarType::String).primary_key())
            .build()
            .unwrap();
        let mut row = ValidatedRow::new();
        row.push("name", ColumnValue::String("a/b c".into()));
        executor.insert(&meta, row).await.into_result().unwrap();

        let found = executor.find_by_route(&meta, "name/a%2Fb%20c").unwrap();
        assert_eq!(found.get("name"), Some(&ColumnValue::String("a/b c".into())));
        assert!(executor.find_by_route(&meta, "name/a/b c").is_none());
    }

    #[tokio::test]
    async fn duplicate_key_is_constraint_violation() {
        let executor = MemoryExecutor::new();
        let meta = stocks();
        let mut row = ValidatedRow::new();
        row.push("categoryid", ColumnValue::Int32(5));
        row.push("pieceid", ColumnValue::Int32(2));

        assert!(matches!(
            executor.insert(&meta, row.clone()).await,
            InsertOutcome::Inserted(_)
        ));
        match executor.insert(&meta, row).await {
            InsertOutcome::Failed(failure) => {
                assert_eq!(failure.kind, FailureKind::ConstraintViolation)
            }
            other => panic!("expected failure, got {other:?}")
        }
        assert_eq!(executor.rows("stocks").len(), 1);
    }

    #[tokio::test]
    async fn injected_failure_does_not_store() {
        let executor = MemoryExecutor::new();
        let meta = books();
        executor.fail_with(ExecutionFailure::connectivity("refused"));

        let outcome = executor.insert(&meta, titled("a")).await;
        assert!(matches!(outcome, InsertOutcome::Failed(_)));
        assert!(executor.rows("books").is_empty());

        executor.clear_failure();
        let row = executor.insert(&meta, titled("a")).await.into_result().unwrap();
        assert_eq!(row.get("id"), Some(&ColumnValue::Int32(1)));
    }

    #[tokio::test]
    async fn find_by_route_reads_back_row() {
        let executor = MemoryExecutor::new();
        let meta = stocks();
        let mut row = ValidatedRow::new();
        row.push("categoryid", ColumnValue::Int32(5));
        row.push("pieceid", ColumnValue::Int32(2));
        executor.insert(&meta, row).await.into_result().unwrap();

        let found = executor
            .find_by_route(&meta, "categoryid/5/pieceid/2")
            .unwrap();
        assert_eq!(found.get("pieceid"), Some(&ColumnValue::Int32(2)));
        assert!(executor.find_by_route(&meta, "categoryid/5/pieceid/3").is_none());
    }

    #[test]
    fn generated_value_types() {
        assert_eq!(
            generated_value(ScalarType::Int64, 7).unwrap(),
            ColumnValue::Int64(7)
        );
        assert!(generated_value(ScalarType::Int32, i64::MAX).is_err());
        assert!(generated_value(ScalarType::Bool, 1).is_err());
    }
}
