// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! PostgreSQL executor.
//!
//! Issues one `INSERT ... RETURNING *` statement per request, so the write is
//! atomic and database-assigned keys come back in the same round trip.
//!
//! # Generated SQL
//!
//! ```sql
//! INSERT INTO "public"."books" ("title", "publisher_id") VALUES ($1, $2) RETURNING *
//! INSERT INTO "public"."counters" DEFAULT VALUES RETURNING *
//! ```

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{
    PgPool, Postgres, Row,
    error::ErrorKind,
    postgres::{PgArguments, PgRow},
    query::Query
};

use super::{ExecutionFailure, InsertExecutor, InsertOutcome};
use crate::{
    schema::{ColumnMetadata, EntityMetadata, ScalarType},
    value::{ColumnValue, InsertedRow, ValidatedRow}
};

/// Executor writing to PostgreSQL through a `sqlx` pool.
#[derive(Debug, Clone)]
pub struct PgInsertExecutor {
    pool:   PgPool,
    schema: String
}

impl PgInsertExecutor {
    /// Create an executor writing to the `public` schema.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            schema: "public".to_string()
        }
    }

    /// Write to another database schema.
    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn execute(
        &self,
        metadata: &EntityMetadata,
        row: &ValidatedRow
    ) -> Result<InsertedRow, ExecutionFailure> {
        let sql = insert_sql(&self.schema, metadata.source_name(), row);
        tracing::debug!(sql = %sql, "executing insert");

        let mut query = sqlx::query(&sql);
        for (name, value) in row.iter() {
            let scalar_type = metadata
                .column_by_backing(name)
                .map(ColumnMetadata::scalar_type)
                .or_else(|| value.scalar_type())
                .unwrap_or(ScalarType::String);
            query = bind(query, scalar_type, value);
        }

        let returned = query.fetch_one(&self.pool).await.map_err(classify)?;
        decode(metadata, &returned)
    }
}

/// Quote an identifier, doubling embedded quotes.
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn insert_sql(schema: &str, table: &str, row: &ValidatedRow) -> String {
    let target = format!("{}.{}", quote_ident(schema), quote_ident(table));
    if row.is_empty() {
        return format!("INSERT INTO {target} DEFAULT VALUES RETURNING *");
    }

    let columns: Vec<String> = row.column_names().map(quote_ident).collect();
    let placeholders: Vec<String> = (1..=row.len()).map(|n| format!("${n}")).collect();
    format!(
        "INSERT INTO {target} ({}) VALUES ({}) RETURNING *",
        columns.join(", "),
        placeholders.join(", ")
    )
}

fn bind<'q>(
    query: Query<'q, Postgres, PgArguments>,
    scalar_type: ScalarType,
    value: &ColumnValue
) -> Query<'q, Postgres, PgArguments> {
    match value {
        ColumnValue::Null => match scalar_type {
            ScalarType::String => query.bind(None::<String>),
            ScalarType::Int32 => query.bind(None::<i32>),
            ScalarType::Int64 => query.bind(None::<i64>),
            ScalarType::Bool => query.bind(None::<bool>),
            ScalarType::Float64 => query.bind(None::<f64>),
            ScalarType::DateTime => query.bind(None::<DateTime<Utc>>),
            ScalarType::ByteArray => query.bind(None::<Vec<u8>>)
        },
        ColumnValue::String(s) => query.bind(s.clone()),
        ColumnValue::Int32(n) => query.bind(*n),
        ColumnValue::Int64(n) => query.bind(*n),
        ColumnValue::Bool(b) => query.bind(*b),
        ColumnValue::Float64(n) => query.bind(*n),
        ColumnValue::DateTime(ts) => query.bind(*ts),
        ColumnValue::ByteArray(bytes) => query.bind(bytes.clone())
    }
}

fn decode(metadata: &EntityMetadata, returned: &PgRow) -> Result<InsertedRow, ExecutionFailure> {
    let mut row = InsertedRow::new();
    for column in metadata.columns() {
        let name = column.backing_name();
        match decode_column(returned, name, column.scalar_type()) {
            Ok(value) => row.set(name, value),
            Err(sqlx::Error::ColumnNotFound(_)) => {}
            Err(err) => return Err(ExecutionFailure::unknown(err.to_string()))
        }
    }
    Ok(row)
}

fn decode_column(
    row: &PgRow,
    name: &str,
    scalar_type: ScalarType
) -> Result<ColumnValue, sqlx::Error> {
    let value = match scalar_type {
        ScalarType::String => row.try_get::<Option<String>, _>(name)?.map(ColumnValue::String),
        ScalarType::Int32 => row.try_get::<Option<i32>, _>(name)?.map(ColumnValue::Int32),
        ScalarType::Int64 => row.try_get::<Option<i64>, _>(name)?.map(ColumnValue::Int64),
        ScalarType::Bool => row.try_get::<Option<bool>, _>(name)?.map(ColumnValue::Bool),
        ScalarType::Float64 => row.try_get::<Option<f64>, _>(name)?.map(ColumnValue::Float64),
        ScalarType::DateTime => match row.try_get::<Option<DateTime<Utc>>, _>(name) {
            Ok(ts) => ts.map(ColumnValue::DateTime),
            Err(sqlx::Error::ColumnDecode { .. }) => row
                .try_get::<Option<NaiveDateTime>, _>(name)?
                .map(|naive| ColumnValue::DateTime(naive.and_utc())),
            Err(err) => return Err(err)
        },
        ScalarType::ByteArray => row.try_get::<Option<Vec<u8>>, _>(name)?.map(ColumnValue::ByteArray)
    };
    Ok(value.unwrap_or(ColumnValue::Null))
}

/// Map a `sqlx` error onto the executor failure classes.
fn classify(err: sqlx::Error) -> ExecutionFailure {
    match &err {
        sqlx::Error::Database(db) => match db.kind() {
            ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation => ExecutionFailure::constraint(db.message()),
            _ => ExecutionFailure::unknown(db.message())
        },
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => ExecutionFailure::connectivity(err.to_string()),
        _ => ExecutionFailure::unknown(err.to_string())
    }
}

#[async_trait]
impl InsertExecutor for PgInsertExecutor {
    async fn insert(&self, metadata: &EntityMetadata, row: ValidatedRow) -> InsertOutcome {
        match self.execute(metadata, &row).await {
            Ok(inserted) => InsertOutcome::Inserted(inserted),
            Err(failure) => {
                tracing::warn!(
                    table = metadata.source_name(),
                    kind = ?failure.kind,
                    error = %failure.message,
                    "postgres insert failed"
                );
                InsertOutcome::Failed(failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::FailureKind;

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("books"), "\"books\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn insert_with_columns() {
        let mut row = ValidatedRow::new();
        row.push("title", ColumnValue::String("Dune".into()));
        row.push("publisher_id", ColumnValue::Int32(1234));
        assert_eq!(
            insert_sql("public", "books", &row),
            "INSERT INTO \"public\".\"books\" (\"title\", \"publisher_id\") VALUES ($1, $2) RETURNING *"
        );
    }

    #[test]
    fn insert_without_columns() {
        assert_eq!(
            insert_sql("public", "counters", &ValidatedRow::new()),
            "INSERT INTO \"public\".\"counters\" DEFAULT VALUES RETURNING *"
        );
    }

    #[test]
    fn pool_errors_are_connectivity() {
        assert_eq!(classify(sqlx::Error::PoolTimedOut).kind, FailureKind::Connectivity);
        assert_eq!(classify(sqlx::Error::RowNotFound).kind, FailureKind::Unknown);
    }
}
