// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Typed column values and rows.
//!
//! [`ColumnValue`] is the closed set of values the pipeline hands to an
//! executor. [`ValidatedRow`] is what coercion produces; [`InsertedRow`] is
//! what an executor reports back.

use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::schema::ScalarType;

/// A coerced value for one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    /// SQL `NULL`.
    Null,

    /// Text.
    String(String),

    /// 32-bit integer.
    Int32(i32),

    /// 64-bit integer.
    Int64(i64),

    /// Boolean.
    Bool(bool),

    /// Double-precision float.
    Float64(f64),

    /// UTC timestamp.
    DateTime(DateTime<Utc>),

    /// Binary data.
    ByteArray(Vec<u8>)
}

impl ColumnValue {
    /// Scalar type of the value, `None` for `NULL`.
    pub const fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            Self::Null => None,
            Self::String(_) => Some(ScalarType::String),
            Self::Int32(_) => Some(ScalarType::Int32),
            Self::Int64(_) => Some(ScalarType::Int64),
            Self::Bool(_) => Some(ScalarType::Bool),
            Self::Float64(_) => Some(ScalarType::Float64),
            Self::DateTime(_) => Some(ScalarType::DateTime),
            Self::ByteArray(_) => Some(ScalarType::ByteArray)
        }
    }

    /// Check if the value is `NULL`.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Renders the value as it appears in a primary-key route.
impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::String(s) => f.write_str(s),
            Self::Int32(n) => write!(f, "{n}"),
            Self::Int64(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Float64(n) => write!(f, "{n}"),
            Self::DateTime(ts) => f.write_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::ByteArray(bytes) => f.write_str(&STANDARD.encode(bytes))
        }
    }
}

impl Serialize for ColumnValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::String(s) => serializer.serialize_str(s),
            Self::Int32(n) => serializer.serialize_i32(*n),
            Self::Int64(n) => serializer.serialize_i64(*n),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Float64(n) => serializer.serialize_f64(*n),
            Self::DateTime(_) | Self::ByteArray(_) => serializer.collect_str(self)
        }
    }
}

/// JSON form used in response bodies; non-finite floats become `null`.
impl From<&ColumnValue> for serde_json::Value {
    fn from(value: &ColumnValue) -> Self {
        match value {
            ColumnValue::Null => Self::Null,
            ColumnValue::String(s) => Self::String(s.clone()),
            ColumnValue::Int32(n) => Self::from(*n),
            ColumnValue::Int64(n) => Self::from(*n),
            ColumnValue::Bool(b) => Self::Bool(*b),
            ColumnValue::Float64(n) => Self::from(*n),
            ColumnValue::DateTime(_) | ColumnValue::ByteArray(_) => Self::String(value.to_string())
        }
    }
}

/// Ordered `column -> value` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
struct Columns(Vec<(String, ColumnValue)>);

impl Columns {
    fn get(&self, column: &str) -> Option<&ColumnValue> {
        self.0
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    fn set(&mut self, column: String, value: ColumnValue) {
        match self.0.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((column, value))
        }
    }
}

/// Row about to be inserted, keyed by backing column name.
///
/// Only the coercion stage creates one, which keeps its invariants: it never
/// holds an auto-generated key column and always holds every required
/// column, each with a value of the declared type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedRow {
    columns: Columns
}

impl ValidatedRow {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, column: impl Into<String>, value: ColumnValue) {
        self.columns.set(column.into(), value);
    }

    /// Value for a backing column.
    pub fn get(&self, column: &str) -> Option<&ColumnValue> {
        self.columns.get(column)
    }

    /// Check if the row writes `column`.
    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Column/value pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnValue)> + '_ {
        self.columns
            .0
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Backing column names in schema order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(name, _)| name)
    }

    /// Number of written columns.
    pub fn len(&self) -> usize {
        self.columns.0.len()
    }

    /// Check if no column is written.
    pub fn is_empty(&self) -> bool {
        self.columns.0.is_empty()
    }
}

/// Row reported by an executor after a successful insert.
///
/// Must contain every primary-key column, including database-assigned ones.
/// It may contain more; extra columns end up in the response body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertedRow {
    columns: Columns
}

impl InsertedRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value, builder style.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: ColumnValue) -> Self {
        self.set(column, value);
        self
    }

    /// Set a column value, replacing any previous one.
    pub fn set(&mut self, column: impl Into<String>, value: ColumnValue) {
        self.columns.set(column.into(), value);
    }

    /// Value for a backing column.
    pub fn get(&self, column: &str) -> Option<&ColumnValue> {
        self.columns.get(column)
    }

    /// Column/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnValue)> + '_ {
        self.columns
            .0
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.0.len()
    }

    /// Check if the row is empty.
    pub fn is_empty(&self) -> bool {
        self.columns.0.is_empty()
    }
}

impl From<&ValidatedRow> for InsertedRow {
    fn from(row: &ValidatedRow) -> Self {
        Self {
            columns: row.columns.clone()
        }
    }
}
