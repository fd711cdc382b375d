// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! JSON to column value coercion.
//!
//! Every decision is one arm of a match over the JSON kind and the declared
//! scalar type.
//!
//! | Type | Accepts |
//! |------|---------|
//! | `String` | any non-null value; non-strings keep their JSON text |
//! | `Int32`, `Int64` | integer in range, or a string holding one |
//! | `Float64` | number, or a string holding a finite one |
//! | `Bool` | `true`/`false`, or the same words as a string |
//! | `DateTime` | RFC 3339 or `YYYY-MM-DD HH:MM:SS[.f]` (UTC) |
//! | `ByteArray` | base64 string |

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use super::{body::BodyField, mapper::MappedFields};
use crate::{
    error::GatewayError,
    schema::{ColumnMetadata, EntityMetadata, ScalarType},
    value::{ColumnValue, ValidatedRow}
};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Coerce the supplied fields into a row, in schema order.
///
/// # Errors
///
/// Returns the first [`GatewayError::InvalidNull`] or
/// [`GatewayError::TypeMismatch`] in schema order.
pub fn coerce_row(metadata: &EntityMetadata, mapped: &MappedFields<'_>) -> Result<ValidatedRow, GatewayError> {
    let mut row = ValidatedRow::new();
    for column in metadata.columns() {
        let Some(field) = mapped.get(column.backing_name()) else {
            continue;
        };
        row.push(column.backing_name(), coerce_value(column, field)?);
    }
    Ok(row)
}

/// Coerce one field to its column type.
///
/// # Errors
///
/// [`GatewayError::InvalidNull`] for `null` on a non-nullable column,
/// [`GatewayError::TypeMismatch`] for anything else that does not fit.
pub fn coerce_value(column: &ColumnMetadata, field: &BodyField) -> Result<ColumnValue, GatewayError> {
    let mismatch = || GatewayError::TypeMismatch {
        raw:         field.display_text().to_string(),
        column:      column.backing_name().to_string(),
        scalar_type: column.scalar_type()
    };

    let value = match (field.value(), column.scalar_type()) {
        (Value::Null, _) if column.is_nullable() => Some(ColumnValue::Null),
        (Value::Null, _) => {
            return Err(GatewayError::InvalidNull {
                field: column.exposed_name().to_string()
            });
        }

        (Value::String(s), ScalarType::String) => Some(ColumnValue::String(s.clone())),
        (_, ScalarType::String) => Some(ColumnValue::String(field.raw().to_string())),

        (Value::Number(n), ScalarType::Int32) => n
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(ColumnValue::Int32),
        (Value::String(s), ScalarType::Int32) => s.trim().parse().ok().map(ColumnValue::Int32),

        (Value::Number(n), ScalarType::Int64) => n.as_i64().map(ColumnValue::Int64),
        (Value::String(s), ScalarType::Int64) => s.trim().parse().ok().map(ColumnValue::Int64),

        (Value::Number(n), ScalarType::Float64) => n.as_f64().map(ColumnValue::Float64),
        (Value::String(s), ScalarType::Float64) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(ColumnValue::Float64),

        (Value::Bool(b), ScalarType::Bool) => Some(ColumnValue::Bool(*b)),
        (Value::String(s), ScalarType::Bool) => parse_bool(s).map(ColumnValue::Bool),

        (Value::String(s), ScalarType::DateTime) => parse_datetime(s).map(ColumnValue::DateTime),

        (Value::String(s), ScalarType::ByteArray) => STANDARD.decode(s).ok().map(ColumnValue::ByteArray),

        (
            Value::Bool(_) | Value::Array(_) | Value::Object(_),
            ScalarType::Int32 | ScalarType::Int64 | ScalarType::Float64
        )
        | (
            Value::Number(_) | Value::Array(_) | Value::Object(_),
            ScalarType::Bool
        )
        | (
            Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_),
            ScalarType::DateTime | ScalarType::ByteArray
        ) => None
    };

    value.ok_or_else(mismatch)
}

fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::insert::{body::parse_body, mapper::map_fields};

    fn coerce(column: ColumnMetadata, json: &str) -> Result<ColumnValue, GatewayError> {
        let meta = EntityMetadata::builder("T", "t")
            .column(ColumnMetadata::new("pk", ScalarType::Int32).primary_key())
            .column(column)
            .build()
            .unwrap();
        let payload = format!(r#"{{"field": {json}}}"#);
        let body = parse_body(payload.as_bytes()).unwrap();
        let column = meta.column_by_exposed("field").unwrap();
        coerce_value(column, body.get("field").unwrap())
    }

    fn col(ty: ScalarType) -> ColumnMetadata {
        ColumnMetadata::new("field", ty)
    }

    #[test]
    fn integers_accept_numbers_and_numeric_strings() {
        assert_eq!(coerce(col(ScalarType::Int32), "5"), Ok(ColumnValue::Int32(5)));
        assert_eq!(coerce(col(ScalarType::Int32), r#""5""#), Ok(ColumnValue::Int32(5)));
        assert_eq!(
            coerce(col(ScalarType::Int64), "9000000000"),
            Ok(ColumnValue::Int64(9_000_000_000))
        );
    }

    #[test]
    fn integers_reject_fractions_and_overflow() {
        assert!(coerce(col(ScalarType::Int32), "5.0").is_err());
        assert!(coerce(col(ScalarType::Int32), "9000000000").is_err());
        assert!(coerce(col(ScalarType::Int32), r#""abc""#).is_err());
        assert!(coerce(col(ScalarType::Int32), "true").is_err());
    }

    #[test]
    fn array_for_integer_quotes_raw_json() {
        let column = ColumnMetadata::new("publisher_id", ScalarType::Int32).exposed_as("field");
        assert_eq!(
            coerce(column, "[1234, 4321]").unwrap_err().to_string(),
            "Parameter \"[1234, 4321]\" cannot be resolved as column \"publisher_id\" with type \"Int32\"."
        );
    }

    #[test]
    fn string_mismatch_quotes_unwrapped_text() {
        let err = coerce(col(ScalarType::Bool), r#""maybe""#).unwrap_err();
        assert_eq!(
            err,
            GatewayError::TypeMismatch {
                raw:         "maybe".into(),
                column:      "field".into(),
                scalar_type: ScalarType::Bool
            }
        );
    }

    #[test]
    fn strings_keep_non_string_json_text() {
        assert_eq!(
            coerce(col(ScalarType::String), r#"["a", {"b": 1}]"#),
            Ok(ColumnValue::String(r#"["a", {"b": 1}]"#.into()))
        );
        assert_eq!(coerce(col(ScalarType::String), "42"), Ok(ColumnValue::String("42".into())));
    }

    #[test]
    fn null_handling() {
        assert_eq!(
            coerce(col(ScalarType::Int32).nullable(), "null"),
            Ok(ColumnValue::Null)
        );
        assert_eq!(
            coerce(col(ScalarType::Int32).exposed_as("field"), "null")
                .unwrap_err()
                .to_string(),
            "Invalid value for field field in request body."
        );
    }

    #[test]
    fn null_message_uses_exposed_name() {
        let column = ColumnMetadata::new("pieces", ScalarType::Int32).exposed_as("field");
        assert_eq!(
            coerce(column, "null").unwrap_err(),
            GatewayError::InvalidNull {
                field: "field".into()
            }
        );
    }

    #[test]
    fn floats_and_bools() {
        assert_eq!(coerce(col(ScalarType::Float64), "1.5"), Ok(ColumnValue::Float64(1.5)));
        assert_eq!(coerce(col(ScalarType::Float64), "2"), Ok(ColumnValue::Float64(2.0)));
        assert_eq!(coerce(col(ScalarType::Float64), r#""2.25""#), Ok(ColumnValue::Float64(2.25)));
        assert!(coerce(col(ScalarType::Float64), r#""NaN""#).is_err());
        assert_eq!(coerce(col(ScalarType::Bool), "false"), Ok(ColumnValue::Bool(false)));
        assert_eq!(coerce(col(ScalarType::Bool), r#""TRUE""#), Ok(ColumnValue::Bool(true)));
        assert!(coerce(col(ScalarType::Bool), "1").is_err());
    }

    #[test]
    fn datetimes() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(
            coerce(col(ScalarType::DateTime), r#""2024-03-01T14:30:00+02:00""#),
            Ok(ColumnValue::DateTime(expected))
        );
        assert_eq!(
            coerce(col(ScalarType::DateTime), r#""2024-03-01 12:30:00""#),
            Ok(ColumnValue::DateTime(expected))
        );
        assert!(coerce(col(ScalarType::DateTime), r#""yesterday""#).is_err());
        assert!(coerce(col(ScalarType::DateTime), "1709296200").is_err());
    }

    #[test]
    fn byte_arrays() {
        assert_eq!(
            coerce(col(ScalarType::ByteArray), r#""AQID""#),
            Ok(ColumnValue::ByteArray(vec![1, 2, 3]))
        );
        assert!(coerce(col(ScalarType::ByteArray), r#""not base64!""#).is_err());
    }

    #[test]
    fn first_failure_in_schema_order_wins() {
        let meta = EntityMetadata::builder("Book", "books")
            .column(ColumnMetadata::new("id", ScalarType::Int32).primary_key())
            .column(ColumnMetadata::new("title", ScalarType::String))
            .column(ColumnMetadata::new("publisher_id", ScalarType::Int32))
            .column(ColumnMetadata::new("pages", ScalarType::Int32))
            .build()
            .unwrap();
        let body = parse_body(
            br#"{"pages": "many", "title": ["x"], "publisher_id": [1234, 4321], "id": 1}"#
        )
        .unwrap();
        let err = coerce_row(&meta, &map_fields(&meta, &body)).unwrap_err();
        assert!(matches!(
            err,
            GatewayError::TypeMismatch { ref column, .. } if column == "publisher_id"
        ));
    }

    #[test]
    fn row_follows_schema_order() {
        let meta = EntityMetadata::builder("Stock", "stocks")
            .column(ColumnMetadata::new("categoryid", ScalarType::Int32).primary_key())
            .column(ColumnMetadata::new("pieceid", ScalarType::Int32).primary_key())
            .build()
            .unwrap();
        let body = parse_body(br#"{"pieceid": 2, "categoryid": "5"}"#).unwrap();
        let row = coerce_row(&meta, &map_fields(&meta, &body)).unwrap();
        let names: Vec<_> = row.column_names().collect();
        assert_eq!(names, ["categoryid", "pieceid"]);
        assert_eq!(row.get("categoryid"), Some(&ColumnValue::Int32(5)));
    }
}
