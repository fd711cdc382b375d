// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity schema model.
//!
//! The schema is loaded once at startup and never mutated afterwards. Every
//! request reads it through a shared reference, so no locking is involved.
//!
//! # Architecture
//!
//! ```text
//! schema.rs (coordinator, ScalarType)
//! ├── column.rs   - ColumnMetadata
//! ├── entity.rs   - EntityMetadata and its validating builder
//! └── catalog.rs  - SchemaCatalog, EntitySchema
//! ```

mod catalog;
mod column;
mod entity;

use std::{fmt, str::FromStr};

pub use catalog::{EntitySchema, SchemaCatalog, SchemaCatalogBuilder};
pub use column::ColumnMetadata;
pub use entity::{EntityMetadata, EntityMetadataBuilder};

/// Declared scalar type of a backing column.
///
/// The display form is the name used in type-mismatch messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// Text.
    String,

    /// 32-bit signed integer.
    Int32,

    /// 64-bit signed integer.
    Int64,

    /// Boolean.
    Bool,

    /// Double-precision float.
    Float64,

    /// Timestamp, normalised to UTC.
    DateTime,

    /// Binary data, base64 on the wire.
    ByteArray
}

impl ScalarType {
    /// Name used in client-facing messages.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Bool => "Boolean",
            Self::Float64 => "Double",
            Self::DateTime => "DateTime",
            Self::ByteArray => "Byte[]"
        }
    }

    /// Check if values of this type are integers.
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::Int32 | Self::Int64)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when parsing an unknown scalar type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scalar type `{0}`")]
pub struct UnknownScalarType(pub String);

impl FromStr for ScalarType {
    type Err = UnknownScalarType;

    /// Parse a type name as written in configuration.
    ///
    /// Accepts lowercase aliases (`int`, `bigint`, `text`, ...) as well as the
    /// display names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "string" | "text" | "varchar" => Ok(Self::String),
            "int32" | "int" | "integer" => Ok(Self::Int32),
            "int64" | "bigint" | "long" => Ok(Self::Int64),
            "bool" | "boolean" => Ok(Self::Bool),
            "float64" | "double" | "float" => Ok(Self::Float64),
            "datetime" | "timestamp" => Ok(Self::DateTime),
            "bytearray" | "byte[]" | "bytes" | "bytea" => Ok(Self::ByteArray),
            _ => Err(UnknownScalarType(s.to_string()))
        }
    }
}
