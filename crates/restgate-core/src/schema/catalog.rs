// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Process-wide entity catalog.
//!
//! A [`SchemaCatalog`] is assembled once at startup and then shared by
//! reference (typically behind an `Arc`) with every request. It has no
//! interior mutability.

use std::collections::HashMap;

use super::EntityMetadata;
use crate::error::{GatewayError, SchemaError};

/// Types that describe their own entity schema.
///
/// Implemented by `#[derive(Entity)]`; manual implementations are fine too.
///
/// # Example
///
/// ```rust
/// use restgate_core::{
///     error::SchemaError,
///     schema::{ColumnMetadata, EntityMetadata, EntitySchema, ScalarType}
/// };
///
/// struct Publisher;
///
/// impl EntitySchema for Publisher {
///     fn entity_metadata() -> Result<EntityMetadata, SchemaError> {
///         EntityMetadata::builder("Publisher", "publishers")
///             .column(
///                 ColumnMetadata::new("id", ScalarType::Int32)
///                     .primary_key()
///                     .auto_generated()
///             )
///             .column(ColumnMetadata::new("name", ScalarType::String))
///             .build()
///     }
/// }
/// ```
pub trait EntitySchema {
    /// Build the metadata for this entity.
    fn entity_metadata() -> Result<EntityMetadata, SchemaError>;
}

/// Read-only lookup from entity name to metadata.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    entities: HashMap<String, EntityMetadata>
}

impl SchemaCatalog {
    /// Start assembling a catalog.
    pub fn builder() -> SchemaCatalogBuilder {
        SchemaCatalogBuilder::default()
    }

    /// Find an entity by name, case-sensitively.
    pub fn get(&self, entity: &str) -> Option<&EntityMetadata> {
        self.entities.get(entity)
    }

    /// Find an entity by name or fail with [`GatewayError::EntityNotFound`].
    pub fn lookup(&self, entity: &str) -> Result<&EntityMetadata, GatewayError> {
        self.get(entity)
            .ok_or_else(|| GatewayError::EntityNotFound {
                entity: entity.to_string()
            })
    }

    /// Number of registered entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Registered entity names, unordered.
    pub fn entity_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entities.keys().map(String::as_str)
    }
}

/// Builder for [`SchemaCatalog`].
#[derive(Debug, Default)]
pub struct SchemaCatalogBuilder {
    entities: Vec<EntityMetadata>,
    errors:   Vec<SchemaError>
}

impl SchemaCatalogBuilder {
    /// Add already-built metadata.
    #[must_use]
    pub fn entity(mut self, metadata: EntityMetadata) -> Self {
        self.entities.push(metadata);
        self
    }

    /// Add a type implementing [`EntitySchema`].
    ///
    /// A schema error is kept and reported by [`build`](Self::build).
    #[must_use]
    pub fn register<T: EntitySchema>(mut self) -> Self {
        match T::entity_metadata() {
            Ok(metadata) => self.entities.push(metadata),
            Err(err) => self.errors.push(err)
        }
        self
    }

    /// Freeze the catalog.
    ///
    /// # Errors
    ///
    /// Returns the first schema error raised by a registered type, or
    /// [`SchemaError::DuplicateEntity`] when a name is registered twice.
    pub fn build(self) -> Result<SchemaCatalog, SchemaError> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }

        let mut entities = HashMap::with_capacity(self.entities.len());
        for metadata in self.entities {
            let name = metadata.name().to_string();
            if entities.contains_key(&name) {
                return Err(SchemaError::DuplicateEntity {
                    entity: name
                });
            }
            tracing::debug!(
                entity = %name,
                source = metadata.source_name(),
                columns = metadata.columns().len(),
                "registered entity"
            );
            entities.insert(name, metadata);
        }

        Ok(SchemaCatalog {
            entities
        })
    }
}
