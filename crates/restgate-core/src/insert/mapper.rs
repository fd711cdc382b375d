// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Exposed-name resolution.

use super::body::{BodyField, ParsedBody};
use crate::schema::{ColumnMetadata, EntityMetadata};

/// Body fields resolved to backing columns.
///
/// Never fails on its own: unknown names are collected so the validator can
/// report them together.
#[derive(Debug, Clone)]
pub struct MappedFields<'a> {
    columns:      Vec<(&'a ColumnMetadata, &'a BodyField)>,
    unrecognized: Vec<String>
}

impl<'a> MappedFields<'a> {
    /// Field mapped to a backing column, if present.
    pub fn get(&self, backing: &str) -> Option<&'a BodyField> {
        self.columns
            .iter()
            .find(|(column, _)| column.backing_name() == backing)
            .map(|&(_, field)| field)
    }

    /// Check if the body supplies `backing`.
    pub fn contains(&self, backing: &str) -> bool {
        self.get(backing).is_some()
    }

    /// Mapped pairs in request order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a ColumnMetadata, &'a BodyField)> + '_ {
        self.columns.iter().copied()
    }

    /// Names that match no exposed field, in request order.
    pub fn unrecognized(&self) -> &[String] {
        &self.unrecognized
    }
}

/// Resolve every body field through the entity's exposed-name table.
pub fn map_fields<'a>(metadata: &'a EntityMetadata, body: &'a ParsedBody) -> MappedFields<'a> {
    let mut columns = Vec::with_capacity(body.len());
    let mut unrecognized = Vec::new();

    for field in body.fields() {
        match metadata.column_by_exposed(field.name()) {
            Some(column) => columns.push((column, field)),
            None => unrecognized.push(field.name().to_string())
        }
    }

    MappedFields {
        columns,
        unrecognized
    }
}
