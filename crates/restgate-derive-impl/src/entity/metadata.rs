// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `EntitySchema` implementation generation.
//!
//! # Generated Code
//!
//! For an entity `Tree`, generates:
//!
//! ```rust,ignore
//! impl Tree {
//!     pub const ENTITY: &'static str = "Tree";
//!     pub const SOURCE: &'static str = "trees";
//! }
//!
//! impl ::restgate_core::schema::EntitySchema for Tree {
//!     fn entity_metadata() -> Result<EntityMetadata, SchemaError> {
//!         EntityMetadata::builder("Tree", "trees")
//!             .column(ColumnMetadata::new("treeId", ScalarType::Int32).primary_key())
//!             .column(ColumnMetadata::new("species", ScalarType::String)
//!                 .exposed_as("Scientific Name"))
//!             .build()
//!     }
//! }
//! ```

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::{EntityDef, FieldDef};

/// Generates the schema impl and name constants.
pub fn generate(entity: &EntityDef) -> TokenStream {
    let ident = &entity.ident;
    let (impl_generics, ty_generics, where_clause) = entity.generics.split_for_impl();
    let name = &entity.name;
    let source = &entity.source;
    let columns = entity.fields.iter().map(column);

    quote! {
        impl #impl_generics #ident #ty_generics #where_clause {
            /// Entity name used in routes.
            pub const ENTITY: &'static str = #name;
            /// Backing table.
            pub const SOURCE: &'static str = #source;
        }

        impl #impl_generics ::restgate_core::schema::EntitySchema for #ident #ty_generics #where_clause {
            fn entity_metadata() -> ::core::result::Result<
                ::restgate_core::schema::EntityMetadata,
                ::restgate_core::error::SchemaError
            > {
                ::restgate_core::schema::EntityMetadata::builder(#name, #source)
                    #(.column(#columns))*
                    .build()
            }
        }
    }
}

fn column(field: &FieldDef) -> TokenStream {
    let backing = field.column_name();
    let scalar = field.scalar.tokens();

    let exposed = field
        .rename
        .as_ref()
        .map(|name| quote!(.exposed_as(#name)));
    let nullable = field.is_nullable().then(|| quote!(.nullable()));
    let primary_key = field.is_id().then(|| quote!(.primary_key()));
    let auto = field.is_auto.then(|| quote!(.auto_generated()));
    let default = field.column.default.then(|| quote!(.with_default()));

    quote! {
        ::restgate_core::schema::ColumnMetadata::new(#backing, #scalar)
            #exposed #nullable #primary_key #auto #default
    }
}
