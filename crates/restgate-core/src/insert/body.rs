// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Request body parsing.
//!
//! The body is driven through a [`serde::de::Visitor`] that classifies the
//! top-level shape without materialising arrays. Object fields keep request
//! order and their raw JSON text; a repeated key replaces the earlier value
//! in place.

use std::fmt;

use serde::{
    Deserializer,
    de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor}
};
use serde_json::{Value, value::RawValue};

use crate::error::GatewayError;

/// One top-level field of the request body.
#[derive(Debug, Clone)]
pub struct BodyField {
    name:  String,
    raw:   Box<RawValue>,
    value: Value
}

impl BodyField {
    /// Field name as sent by the client.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parsed JSON value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// JSON text exactly as it appeared in the request.
    pub fn raw(&self) -> &str {
        self.raw.get()
    }

    /// Text used to quote this value in error messages.
    ///
    /// Strings are shown without their JSON quotes, everything else verbatim.
    pub fn display_text(&self) -> &str {
        match &self.value {
            Value::String(s) => s,
            _ => self.raw()
        }
    }
}

/// Request body known to be a single JSON object.
#[derive(Debug, Clone, Default)]
pub struct ParsedBody {
    fields: Vec<BodyField>
}

impl ParsedBody {
    /// Fields in request order.
    pub fn fields(&self) -> &[BodyField] {
        &self.fields
    }

    /// Look up a field by client name.
    pub fn get(&self, name: &str) -> Option<&BodyField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Number of distinct fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check for `{}`.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

enum Shape {
    Object(ParsedBody),
    Array,
    Scalar
}

struct ShapeVisitor;

impl ShapeVisitor {
    fn scalar<E>(self) -> Result<Shape, E> {
        Ok(Shape::Scalar)
    }
}

impl<'de> Visitor<'de> for ShapeVisitor {
    type Value = Shape;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Shape, A::Error> {
        let mut fields: Vec<BodyField> = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((name, raw)) = map.next_entry::<String, Box<RawValue>>()? {
            let value: Value = serde_json::from_str(raw.get()).map_err(de::Error::custom)?;
            match fields.iter_mut().find(|field| field.name == name) {
                Some(field) => {
                    field.raw = raw;
                    field.value = value;
                }
                None => fields.push(BodyField {
                    name,
                    raw,
                    value
                })
            }
        }
        Ok(Shape::Object(ParsedBody {
            fields
        }))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Shape, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Shape::Array)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Shape, E> {
        self.scalar()
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Shape, E> {
        self.scalar()
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Shape, E> {
        self.scalar()
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Shape, E> {
        self.scalar()
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Shape, E> {
        self.scalar()
    }

    fn visit_unit<E: de::Error>(self) -> Result<Shape, E> {
        self.scalar()
    }
}

/// Parse a request payload into a single JSON object.
///
/// # Errors
///
/// - [`GatewayError::BatchNotSupported`] for a top-level array
/// - [`GatewayError::NotAnObject`] for a scalar or `null`
/// - [`GatewayError::MalformedJson`] for anything that is not JSON,
///   including an empty payload
pub fn parse_body(payload: &[u8]) -> Result<ParsedBody, GatewayError> {
    let mut de = serde_json::Deserializer::from_slice(payload);
    let shape = (&mut de)
        .deserialize_any(ShapeVisitor)
        .and_then(|shape| de.end().map(|()| shape))
        .map_err(|err| {
            tracing::debug!(error = %err, "request body is not valid JSON");
            GatewayError::MalformedJson
        })?;

    match shape {
        Shape::Object(body) => Ok(body),
        Shape::Array => Err(GatewayError::BatchNotSupported),
        Shape::Scalar => Err(GatewayError::NotAnObject)
    }
}
