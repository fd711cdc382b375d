// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity metadata and its validating builder.
//!
//! [`EntityMetadata`] owns the ordered column list, the primary-key order and
//! both directions of the exposed-name mapping. The lookup tables are built
//! once by [`EntityMetadataBuilder::build`] and are pure data afterwards.

use std::collections::HashMap;

use super::ColumnMetadata;
use crate::error::SchemaError;

/// Schema of one entity exposed over REST.
///
/// # Example
///
/// ```rust
/// use restgate_core::schema::{ColumnMetadata, EntityMetadata, ScalarType};
///
/// let stocks = EntityMetadata::builder("Stock", "stocks")
///     .column(ColumnMetadata::new("categoryid", ScalarType::Int32).primary_key())
///     .column(ColumnMetadata::new("pieceid", ScalarType::Int32).primary_key())
///     .column(ColumnMetadata::new("categoryName", ScalarType::String))
///     .build()
///     .unwrap();
///
/// assert_eq!(stocks.primary_key(), ["categoryid", "pieceid"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMetadata {
    name:        String,
    source_name: String,
    columns:     Vec<ColumnMetadata>,
    primary_key: Vec<String>,
    by_backing:  HashMap<String, usize>,
    by_exposed:  HashMap<String, usize>
}

impl EntityMetadata {
    /// Start building metadata for `name`, backed by table `source_name`.
    pub fn builder(
        name: impl Into<String>,
        source_name: impl Into<String>
    ) -> EntityMetadataBuilder {
        EntityMetadataBuilder {
            name:        name.into(),
            source_name: source_name.into(),
            columns:     Vec::new(),
            key_order:   None
        }
    }

    /// Entity name used in routes.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing table identifier.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &[ColumnMetadata] {
        &self.columns
    }

    /// Primary-key backing names in key order.
    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    /// Primary-key columns in key order.
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &ColumnMetadata> + '_ {
        self.primary_key
            .iter()
            .filter_map(|name| self.column_by_backing(name))
    }

    /// Look up a column by its backing name.
    pub fn column_by_backing(&self, backing: &str) -> Option<&ColumnMetadata> {
        self.by_backing.get(backing).map(|&idx| &self.columns[idx])
    }

    /// Look up a column by the name clients use.
    pub fn column_by_exposed(&self, exposed: &str) -> Option<&ColumnMetadata> {
        self.by_exposed.get(exposed).map(|&idx| &self.columns[idx])
    }

    /// Resolve an exposed name to its backing column name.
    pub fn backing_name_of(&self, exposed: &str) -> Option<&str> {
        self.column_by_exposed(exposed)
            .map(ColumnMetadata::backing_name)
    }

    /// Resolve a backing column name to its exposed name.
    pub fn exposed_name_of(&self, backing: &str) -> Option<&str> {
        self.column_by_backing(backing)
            .map(ColumnMetadata::exposed_name)
    }

    /// Check if any primary-key column is assigned by the database.
    pub fn has_generated_key(&self) -> bool {
        self.primary_key_columns()
            .any(ColumnMetadata::is_auto_generated)
    }
}

/// Builder for [`EntityMetadata`].
///
/// Validation happens in [`build`](Self::build), so a malformed schema is
/// rejected at startup instead of surfacing as a request-time failure.
#[derive(Debug, Clone)]
pub struct EntityMetadataBuilder {
    name:        String,
    source_name: String,
    columns:     Vec<ColumnMetadata>,
    key_order:   Option<Vec<String>>
}

impl EntityMetadataBuilder {
    /// Append a column.
    #[must_use]
    pub fn column(mut self, column: ColumnMetadata) -> Self {
        self.columns.push(column);
        self
    }

    /// Append several columns.
    #[must_use]
    pub fn columns(mut self, columns: impl IntoIterator<Item = ColumnMetadata>) -> Self {
        self.columns.extend(columns);
        self
    }

    /// Order the primary key explicitly.
    ///
    /// Without this the key follows column declaration order. The list must
    /// name every key column exactly once.
    #[must_use]
    pub fn key_order<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        self.key_order = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Validate and freeze the metadata.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::DuplicateColumn`] when two columns share a backing name
    /// - [`SchemaError::DuplicateExposedName`] when two columns share an exposed name
    /// - [`SchemaError::AutoGeneratedNonKey`] for a generated non-key column
    /// - [`SchemaError::MissingPrimaryKey`] when no column is a key
    /// - [`SchemaError::UnknownKeyColumn`] / [`SchemaError::KeyOrderMismatch`]
    ///   for an inconsistent explicit key order
    pub fn build(self) -> Result<EntityMetadata, SchemaError> {
        let Self {
            name,
            source_name,
            columns,
            key_order
        } = self;

        let mut by_backing = HashMap::with_capacity(columns.len());
        let mut by_exposed = HashMap::with_capacity(columns.len());

        for (idx, column) in columns.iter().enumerate() {
            if column.is_auto_generated() && !column.is_primary_key() {
                return Err(SchemaError::AutoGeneratedNonKey {
                    entity: name,
                    column: column.backing_name().to_string()
                });
            }
            if by_backing
                .insert(column.backing_name().to_string(), idx)
                .is_some()
            {
                return Err(SchemaError::DuplicateColumn {
                    entity: name,
                    column: column.backing_name().to_string()
                });
            }
            if by_exposed
                .insert(column.exposed_name().to_string(), idx)
                .is_some()
            {
                return Err(SchemaError::DuplicateExposedName {
                    entity: name,
                    field:  column.exposed_name().to_string()
                });
            }
        }

        let declared: Vec<String> = columns
            .iter()
            .filter(|column| column.is_primary_key())
            .map(|column| column.backing_name().to_string())
            .collect();

        if declared.is_empty() {
            return Err(SchemaError::MissingPrimaryKey {
                entity: name
            });
        }

        let primary_key = match key_order {
            None => declared,
            Some(order) => {
                for column in &order {
                    if !declared.contains(column) {
                        return Err(SchemaError::UnknownKeyColumn {
                            entity: name,
                            column: column.clone()
                        });
                    }
                }
                let mut sorted = order.clone();
                sorted.sort();
                sorted.dedup();
                if sorted.len() != order.len() || order.len() != declared.len() {
                    return Err(SchemaError::KeyOrderMismatch {
                        entity: name
                    });
                }
                order
            }
        };

        Ok(EntityMetadata {
            name,
            source_name,
            columns,
            primary_key,
            by_backing,
            by_exposed
        })
    }
}
