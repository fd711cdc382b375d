// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Request-target checks for inserts.

use super::InsertRequest;
use crate::error::GatewayError;

/// Reject a primary-key route or query string on an insert.
///
/// A lone `?` counts as an empty query string.
///
/// # Errors
///
/// [`GatewayError::PrimaryKeyInRoute`] or [`GatewayError::InvalidQueryString`].
pub fn check_target(request: &InsertRequest) -> Result<(), GatewayError> {
    if !request.primary_key_route.trim_matches('/').is_empty() {
        return Err(GatewayError::PrimaryKeyInRoute);
    }
    if !request.query_string.trim_start_matches('?').is_empty() {
        return Err(GatewayError::InvalidQueryString);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_collection_post_passes() {
        let request = InsertRequest::new("Book", "{}").query_string("?");
        assert!(check_target(&request).is_ok());
    }

    #[test]
    fn query_string_is_rejected() {
        let request = InsertRequest::new("Book", "{}").query_string("?/id/5001");
        assert_eq!(check_target(&request), Err(GatewayError::InvalidQueryString));
    }

    #[test]
    fn key_route_is_rejected_first() {
        let request = InsertRequest::new("Book", "{}")
            .primary_key_route("id/1")
            .query_string("?x=1");
        assert_eq!(check_target(&request), Err(GatewayError::PrimaryKeyInRoute));
    }
}
