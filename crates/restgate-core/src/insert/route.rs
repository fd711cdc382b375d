// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Primary-key resolution and routes.
//!
//! A route alternates exposed key names and values in primary-key order,
//! e.g. `categoryid/5/pieceid/2`. Every segment is percent-encoded, so names
//! and values may hold `/`, spaces or `?`.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

use crate::{
    error::GatewayError,
    schema::{ColumnMetadata, EntityMetadata},
    value::{ColumnValue, InsertedRow, ValidatedRow}
};

/// Bytes escaped inside one path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode one path segment.
pub fn encode_segment(segment: &str) -> Cow<'_, str> {
    utf8_percent_encode(segment, PATH_SEGMENT).into()
}

/// Final value of one primary-key column.
pub type KeyPart<'m> = (&'m ColumnMetadata, ColumnValue);

/// Resolve every primary-key column of a freshly inserted row.
///
/// Auto-generated columns take the executor's value; client-supplied ones
/// take the coerced request value, falling back to the executor's.
///
/// # Errors
///
/// [`GatewayError::Database`] when neither source holds a key column, which
/// means the executor broke its contract.
pub fn resolve_primary_key<'m>(
    metadata: &'m EntityMetadata,
    row: &ValidatedRow,
    inserted: &InsertedRow
) -> Result<Vec<KeyPart<'m>>, GatewayError> {
    metadata
        .primary_key_columns()
        .map(|column| {
            let name = column.backing_name();
            let value = if column.is_auto_generated() {
                inserted.get(name)
            } else {
                row.get(name).or_else(|| inserted.get(name))
            };
            value
                .cloned()
                .map(|value| (column, value))
                .ok_or_else(|| GatewayError::Database {
                    message: format!(
                        "insert into `{}` returned no value for key column `{name}`",
                        metadata.source_name()
                    )
                })
        })
        .collect()
}

/// Render resolved key parts as a route.
pub fn build_route(key: &[KeyPart<'_>]) -> String {
    key.iter()
        .map(|(column, value)| {
            format!(
                "{}/{}",
                encode_segment(column.exposed_name()),
                encode_segment(&value.to_string())
            )
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Split a route back into `(backing column, value)` pairs.
///
/// Segments are percent-decoded. Returns `None` unless the route names every
/// key column exactly once; pair order is free.
pub fn parse_route(metadata: &EntityMetadata, route: &str) -> Option<Vec<(String, String)>> {
    let segments: Vec<&str> = route.trim_matches('/').split('/').collect();
    if segments.len() % 2 != 0 {
        return None;
    }

    let mut key: Vec<(String, String)> = Vec::with_capacity(segments.len() / 2);
    for pair in segments.chunks(2) {
        let name = percent_decode_str(pair[0]).decode_utf8().ok()?;
        let value = percent_decode_str(pair[1]).decode_utf8().ok()?;
        let column = metadata
            .column_by_exposed(&name)
            .filter(|column| column.is_primary_key())?;
        if key.iter().any(|(name, _)| name == column.backing_name()) {
            return None;
        }
        key.push((column.backing_name().to_string(), value.into_owned()));
    }

    (key.len() == metadata.primary_key().len()).then_some(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ScalarType;

    fn stocks() -> EntityMetadata {
        EntityMetadata::builder("Stock", "stocks")
            .column(ColumnMetadata::new("categoryid", ScalarType::Int32).primary_key())
            .column(ColumnMetadata::new("pieceid", ScalarType::Int32).primary_key())
            .column(ColumnMetadata::new("categoryName", ScalarType::String))
            .build()
            .unwrap()
    }

    fn reviews() -> EntityMetadata {
        EntityMetadata::builder("Review", "reviews")
            .column(ColumnMetadata::new("book_id", ScalarType::Int32).primary_key())
            .column(
                ColumnMetadata::new("id", ScalarType::Int32)
                    .primary_key()
                    .auto_generated()
            )
            .build()
            .unwrap()
    }

    #[test]
    fn composite_route_uses_key_order() {
        let meta = stocks();
        let mut row = ValidatedRow::new();
        row.push("pieceid", ColumnValue::Int32(2));
        row.push("categoryid", ColumnValue::Int32(5));
        let inserted = InsertedRow::from(&row);

        let key = resolve_primary_key(&meta, &row, &inserted).unwrap();
        assert_eq!(build_route(&key), "categoryid/5/pieceid/2");
    }

    #[test]
    fn generated_part_comes_from_executor() {
        let meta = reviews();
        let mut row = ValidatedRow::new();
        row.push("book_id", ColumnValue::Int32(1));
        let inserted = InsertedRow::from(&row).with("id", ColumnValue::Int32(5001));

        let key = resolve_primary_key(&meta, &row, &inserted).unwrap();
        assert_eq!(build_route(&key), "book_id/1/id/5001");
    }

    #[test]
    fn missing_generated_value_is_database_error() {
        let meta = reviews();
        let mut row = ValidatedRow::new();
        row.push("book_id", ColumnValue::Int32(1));

        let err = resolve_primary_key(&meta, &row, &InsertedRow::from(&row)).unwrap_err();
        assert!(matches!(err, GatewayError::Database { .. }));
    }

    #[test]
    fn route_uses_exposed_names() {
        let meta = EntityMetadata::builder("Tree", "trees")
            .column(
                ColumnMetadata::new("treeId", ScalarType::Int32)
                    .primary_key()
                    .exposed_as("Tree Id")
            )
            .build()
            .unwrap();
        let mut row = ValidatedRow::new();
        row.push("treeId", ColumnValue::Int32(3));

        let key = resolve_primary_key(&meta, &row, &InsertedRow::from(&row)).unwrap();
        let route = build_route(&key);
        assert_eq!(route, "Tree%20Id/3");
        assert_eq!(
            parse_route(&meta, &route),
            Some(vec![("treeId".to_string(), "3".to_string())])
        );
    }

    #[test]
    fn parse_route_rejects_partial_or_unknown() {
        let meta = stocks();
        assert!(parse_route(&meta, "categoryid/5/pieceid/2").is_some());
        assert!(parse_route(&meta, "/pieceid/2/categoryid/5/").is_some());
        assert!(parse_route(&meta, "categoryid/5").is_none());
        assert!(parse_route(&meta, "categoryid/5/pieceid").is_none());
        assert!(parse_route(&meta, "categoryid/5/categoryName/x").is_none());
        assert!(parse_route(&meta, "categoryid/5/categoryid/6").is_none());
    }

    #[test]
    fn segments_are_percent_encoded() {
        let meta = EntityMetadata::builder("Tag", "tags")
            .column(
                ColumnMetadata::new("name", ScalarType::String)
                    .primary_key()
                    .exposed_as("tag name")
            )
            .build()
            .unwrap();
        let mut row = ValidatedRow::new();
        row.push("name", ColumnValue::String("a/b c?%".into()));

        let key = resolve_primary_key(&meta, &row, &InsertedRow::from(&row)).unwrap();
        let route = build_route(&key);
        assert_eq!(route, "tag%20name/a%2Fb%20c%3F%25");
        assert_eq!(
            parse_route(&meta, &route),
            Some(vec![("name".to_string(), "a/b c?%".to_string())])
        );
    }

    #[test]
    fn byte_array_keys_escape_base64_slashes() {
        assert_eq!(encode_segment("+/8="), "+%2F8=");
    }

    #[test]
    fn invalid_utf8_escape_is_rejected() {
        let meta = stocks();
        assert!(parse_route(&meta, "categoryid/%FF/pieceid/2").is_none());
    }
}
