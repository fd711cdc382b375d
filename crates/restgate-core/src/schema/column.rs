// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Column metadata.

use super::ScalarType;

/// Description of one backing column.
///
/// Built with chained setters and then handed to
/// [`EntityMetadataBuilder::column`](super::EntityMetadataBuilder::column).
///
/// # Example
///
/// ```rust
/// use restgate_core::schema::{ColumnMetadata, ScalarType};
///
/// let id = ColumnMetadata::new("id", ScalarType::Int32)
///     .primary_key()
///     .auto_generated();
/// let species = ColumnMetadata::new("species", ScalarType::String)
///     .exposed_as("Scientific Name")
///     .nullable();
///
/// assert!(!id.is_required());
/// assert_eq!(species.exposed_name(), "Scientific Name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMetadata {
    backing_name:      String,
    exposed_name:      Option<String>,
    scalar_type:       ScalarType,
    is_nullable:       bool,
    is_auto_generated: bool,
    is_primary_key:    bool,
    has_default:       bool
}

impl ColumnMetadata {
    /// Create a non-nullable, client-supplied column.
    pub fn new(backing_name: impl Into<String>, scalar_type: ScalarType) -> Self {
        Self {
            backing_name: backing_name.into(),
            exposed_name: None,
            scalar_type,
            is_nullable: false,
            is_auto_generated: false,
            is_primary_key: false,
            has_default: false
        }
    }

    /// Expose the column to clients under a different name.
    #[must_use]
    pub fn exposed_as(mut self, name: impl Into<String>) -> Self {
        self.exposed_name = Some(name.into());
        self
    }

    /// Allow `NULL` values.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    /// Mark as part of the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    /// Mark as assigned by the database on insert.
    #[must_use]
    pub fn auto_generated(mut self) -> Self {
        self.is_auto_generated = true;
        self
    }

    /// Mark as having a database-side default.
    #[must_use]
    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    /// Name of the column in the database.
    pub fn backing_name(&self) -> &str {
        &self.backing_name
    }

    /// Name clients use. Falls back to the backing name.
    pub fn exposed_name(&self) -> &str {
        self.exposed_name.as_deref().unwrap_or(&self.backing_name)
    }

    /// Check if the exposed name differs from the backing name.
    pub fn is_mapped(&self) -> bool {
        self.exposed_name
            .as_deref()
            .is_some_and(|name| name != self.backing_name)
    }

    /// Declared scalar type.
    pub const fn scalar_type(&self) -> ScalarType {
        self.scalar_type
    }

    /// Check if `NULL` is accepted.
    pub const fn is_nullable(&self) -> bool {
        self.is_nullable
    }

    /// Check if the database assigns the value.
    pub const fn is_auto_generated(&self) -> bool {
        self.is_auto_generated
    }

    /// Check if the column is part of the primary key.
    pub const fn is_primary_key(&self) -> bool {
        self.is_primary_key
    }

    /// Check if the database supplies a default.
    pub const fn has_default(&self) -> bool {
        self.has_default
    }

    /// Check if a request body must carry this column.
    ///
    /// Auto-generated columns are never required. Client-supplied key
    /// columns always are; other columns are required unless nullable or
    /// defaulted.
    pub const fn is_required(&self) -> bool {
        if self.is_auto_generated {
            return false;
        }
        self.is_primary_key || !(self.is_nullable || self.has_default)
    }

    /// Check if a request body must not carry this column.
    pub const fn is_disallowed(&self) -> bool {
        self.is_primary_key && self.is_auto_generated
    }
}
