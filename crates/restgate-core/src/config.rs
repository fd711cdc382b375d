// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Gateway configuration.
//!
//! | Key | Default | Env override |
//! |-----|---------|--------------|
//! | `rest_path` | `/api` | `RESTGATE_REST_PATH` |
//! | `memory_key_seed` | `1` | - |

use serde::Deserialize;

use crate::insert::route::encode_segment;

/// Environment variable overriding [`GatewayConfig::rest_path`].
pub const REST_PATH_ENV: &str = "RESTGATE_REST_PATH";

/// Settings shared by every insert request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    /// Path prefix of every entity route, without a trailing slash.
    pub rest_path: String,

    /// First value handed out by in-memory auto-generated keys.
    pub memory_key_seed: i64
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            rest_path:       "/api".to_string(),
            memory_key_seed: 1
        }
    }
}

impl GatewayConfig {
    /// Parse from a JSON document; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for invalid JSON or unknown keys.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Defaults, with [`REST_PATH_ENV`] applied when set.
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Apply environment overrides on top of `self`.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`, keyed by environment variable
    /// name.
    #[must_use]
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup(REST_PATH_ENV) {
            self.rest_path = path;
        }
        self.normalized()
    }

    /// Replace the REST path prefix.
    #[must_use]
    pub fn rest_path(mut self, path: impl Into<String>) -> Self {
        self.rest_path = path.into();
        self.normalized()
    }

    /// Location prefix for an entity, e.g. `/api/Book`.
    pub fn entity_path(&self, entity: &str) -> String {
        format!("{}/{}", self.rest_path, encode_segment(entity))
    }

    fn normalized(mut self) -> Self {
        let trimmed = self.rest_path.trim_end_matches('/');
        self.rest_path = if trimmed.starts_with('/') || trimmed.is_empty() {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        };
        self
    }
}
