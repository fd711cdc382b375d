// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Response assembly.
//!
//! | Outcome | Status | Body |
//! |---------|--------|------|
//! | created | 201 + `Location` | `{"value": [row]}` |
//! | failure | from [`GatewayError::status`] | `{"error": {"code", "message", "status"}}` |

use http::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::{
    error::GatewayError,
    schema::EntityMetadata,
    value::{InsertedRow, ValidatedRow}
};

/// Final result of an insert, ready to be written to the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertResponse {
    /// HTTP status.
    #[serde(with = "status_code")]
    pub status:   StatusCode,
    /// `Location` header, set on success only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// JSON body.
    pub body:     Value
}

impl InsertResponse {
    /// `201 Created` for a new row.
    pub fn created(location: String, row: Map<String, Value>) -> Self {
        Self {
            status:   StatusCode::CREATED,
            location: Some(location),
            body:     json!({ "value": [Value::Object(row)] })
        }
    }

    /// Error envelope for `err`.
    ///
    /// Internal details of 5xx failures never reach the body.
    pub fn from_error(err: &GatewayError) -> Self {
        let status = err.status();
        Self {
            status,
            location: None,
            body: json!({
                "error": {
                    "code":    err.sub_status(),
                    "message": err.client_message(),
                    "status":  status.as_u16()
                }
            })
        }
    }

    /// Check for a 2xx status.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Error message of a failure envelope.
    pub fn error_message(&self) -> Option<&str> {
        self.body.pointer("/error/message").and_then(Value::as_str)
    }

    /// Sub-status token of a failure envelope.
    pub fn error_code(&self) -> Option<&str> {
        self.body.pointer("/error/code").and_then(Value::as_str)
    }

    /// Created row of a success body.
    pub fn created_row(&self) -> Option<&Map<String, Value>> {
        self.body.pointer("/value/0").and_then(Value::as_object)
    }
}

impl From<GatewayError> for InsertResponse {
    fn from(err: GatewayError) -> Self {
        Self::from_error(&err)
    }
}

/// Created row keyed by exposed name, in schema order.
///
/// Executor values win over request values so database-side defaults and
/// generated keys show up.
pub fn row_body(metadata: &EntityMetadata, row: &ValidatedRow, inserted: &InsertedRow) -> Map<String, Value> {
    let mut body = Map::new();
    for column in metadata.columns() {
        let name = column.backing_name();
        if let Some(value) = inserted.get(name).or_else(|| row.get(name)) {
            body.insert(column.exposed_name().to_string(), Value::from(value));
        }
    }
    body
}

mod status_code {
    use http::StatusCode;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(status.as_u16())
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for InsertResponse {
    fn into_response(self) -> axum::response::Response {
        let location = match self.location {
            Some(location) => match http::HeaderValue::from_str(&location) {
                Ok(value) => Some(value),
                Err(_) => {
                    let err = GatewayError::InvalidLocation { location };
                    tracing::error!(error = %err, "created response has no usable location");
                    return Self::from_error(&err).into_response();
                }
            },
            None => None
        };
        let mut response = (self.status, axum::Json(self.body)).into_response();
        if let Some(value) = location {
            response.headers_mut().insert(http::header::LOCATION, value);
        }
        response
    }
}
