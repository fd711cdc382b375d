// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Attribute parsing for `#[derive(Entity)]`.
//!
//! # Architecture
//!
//! ```text
//! parse.rs (EntityAttrs via darling, EntityDef)
//! ├── field.rs   - FieldDef, #[id] / #[auto] / #[column] / #[field]
//! └── scalar.rs  - ScalarKind and Rust type inference
//! ```
//!
//! # Supported Attributes
//!
//! | Attribute | Required | Default | Description |
//! |-----------|----------|---------|-------------|
//! | `source` | No | snake_case struct name | Backing table |
//! | `name` | No | struct name | Entity name in routes |

mod field;
mod scalar;

use convert_case::{Case, Casing};
use darling::FromDeriveInput;
pub use field::FieldDef;
pub use scalar::ScalarKind;
use syn::{DeriveInput, Generics, Ident};

/// Entity-level attributes parsed from `#[entity(...)]`.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(entity), supports(struct_named))]
struct EntityAttrs {
    ident:    Ident,
    generics: Generics,
    source:   Option<String>,
    name:     Option<String>
}

/// Complete entity definition.
#[derive(Debug)]
pub struct EntityDef {
    /// Struct identifier.
    pub ident:    Ident,
    /// Struct generics, forwarded to the generated impl.
    pub generics: Generics,
    /// Entity name used in routes.
    pub name:     String,
    /// Backing table.
    pub source:   String,
    /// Fields in declaration order.
    pub fields:   Vec<FieldDef>
}

impl EntityDef {
    /// Parse entity definition from syn's `DeriveInput`.
    ///
    /// # Errors
    ///
    /// - Applied to an enum, union, tuple or unit struct
    /// - Unknown `#[entity(...)]` keys
    /// - Invalid field attributes (see [`FieldDef::from_field`])
    /// - No field marked `#[id]`
    pub fn from_derive_input(input: &DeriveInput) -> darling::Result<Self> {
        let attrs = EntityAttrs::from_derive_input(input)?;

        let named = match &input.data {
            syn::Data::Struct(syn::DataStruct {
                fields: syn::Fields::Named(named),
                ..
            }) => named,
            _ => {
                return Err(darling::Error::custom("Entity requires named fields")
                    .with_span(&input.ident));
            }
        };

        let mut errors = darling::Error::accumulator();
        let fields: Vec<FieldDef> = named
            .named
            .iter()
            .filter_map(|field| errors.handle(FieldDef::from_field(field)))
            .collect();

        let all_fields_parsed = fields.len() == named.named.len();
        if all_fields_parsed && !fields.iter().any(FieldDef::is_id) {
            errors.push(
                darling::Error::custom("Entity must have at least one field with #[id] attribute")
                    .with_span(&input.ident)
            );
        }
        errors.finish()?;

        let ident = attrs.ident;
        let name = attrs.name.unwrap_or_else(|| ident.to_string());
        let source = attrs
            .source
            .unwrap_or_else(|| ident.to_string().to_case(Case::Snake));

        Ok(Self {
            ident,
            generics: attrs.generics,
            name,
            source,
            fields
        })
    }

    /// Primary-key fields in key order.
    pub fn id_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|field| field.is_id())
    }
}
