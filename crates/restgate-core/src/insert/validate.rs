// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Structural validation of mapped fields.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! | # | Check | Error |
//! |---|-------|-------|
//! | 1 | auto-generated key supplied | [`GatewayError::FieldNotAllowed`] |
//! | 2 | unknown names | [`GatewayError::UnexpectedFields`] |
//! | 3 | required column absent | [`GatewayError::MissingField`] |

use super::mapper::MappedFields;
use crate::{error::GatewayError, schema::EntityMetadata};

type Check = fn(&EntityMetadata, &MappedFields<'_>) -> Result<(), GatewayError>;

const CHECKS: [Check; 3] = [disallowed_fields, unrecognized_fields, missing_fields];

/// Run every structural check against the mapped body.
///
/// # Errors
///
/// Returns the error of the first failing check.
pub fn validate_fields(metadata: &EntityMetadata, mapped: &MappedFields<'_>) -> Result<(), GatewayError> {
    CHECKS.iter().try_for_each(|check| check(metadata, mapped))
}

fn disallowed_fields(metadata: &EntityMetadata, mapped: &MappedFields<'_>) -> Result<(), GatewayError> {
    match metadata
        .columns()
        .iter()
        .find(|column| column.is_disallowed() && mapped.contains(column.backing_name()))
    {
        Some(column) => Err(GatewayError::FieldNotAllowed {
            field: column.exposed_name().to_string()
        }),
        None => Ok(())
    }
}

fn unrecognized_fields(_: &EntityMetadata, mapped: &MappedFields<'_>) -> Result<(), GatewayError> {
    if mapped.unrecognized().is_empty() {
        return Ok(());
    }
    Err(GatewayError::UnexpectedFields {
        fields: mapped.unrecognized().to_vec()
    })
}

fn missing_fields(metadata: &EntityMetadata, mapped: &MappedFields<'_>) -> Result<(), GatewayError> {
    match metadata
        .columns()
        .iter()
        .find(|column| column.is_required() && !mapped.contains(column.backing_name()))
    {
        Some(column) => Err(GatewayError::MissingField {
            field: column.exposed_name().to_string()
        }),
        None => Ok(())
    }
}
