// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Proc-macro implementation of `#[derive(Entity)]` for restgate.
//!
//! Use the `restgate` crate instead of depending on this one directly.
//!
//! # Attribute Quick Reference
//!
//! ## Entity-Level `#[entity(...)]`
//!
//! ```rust,ignore
//! #[derive(Entity)]
//! #[entity(
//!     source = "books", // Optional: backing table (default: snake_case struct name)
//!     name = "Book"     // Optional: entity name in routes (default: struct name)
//! )]
//! pub struct Book { /* ... */ }
//! ```
//!
//! ## Field-Level Attributes
//!
//! ```rust,ignore
//! pub struct Tree {
//!     #[id]                                   // Primary-key column, key order = field order
//!     #[auto]                                 // Assigned by the database (only with #[id])
//!     pub id: i32,
//!
//!     #[field(rename = "Scientific Name")]    // Name clients use in JSON bodies
//!     pub species: Option<String>,            // Option<T> makes the column nullable
//!
//!     #[column(name = "region_code")]         // Backing column name
//!     pub region: String,
//!
//!     #[column(default)]                      // Database default, may be omitted
//!     pub planted: DateTime<Utc>,
//!
//!     #[column(ty = "int64", nullable)]       // Explicit scalar type and nullability
//!     pub height: Height,
//! }
//! ```
//!
//! # Type Inference
//!
//! | Rust type | Scalar type |
//! |-----------|-------------|
//! | `String`, `&str` | `String` |
//! | `i32` | `Int32` |
//! | `i64` | `Int64` |
//! | `bool` | `Bool` |
//! | `f64` | `Float64` |
//! | `DateTime<_>`, `NaiveDateTime` | `DateTime` |
//! | `Vec<u8>` | `ByteArray` |
//! | `Option<T>` | as `T`, nullable |
//!
//! Any other type needs `#[column(ty = "...")]`.
//!
//! # Generated Code
//!
//! | Item | Description |
//! |------|-------------|
//! | `impl EntitySchema for T` | Builds the `EntityMetadata` |
//! | `T::ENTITY` | Entity name constant |
//! | `T::SOURCE` | Backing table constant |

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

mod entity;

use proc_macro::TokenStream;

/// Derive entity metadata for the restgate insert pipeline.
///
/// Generates an `EntitySchema` implementation so the type can be added to a
/// catalog with `SchemaCatalog::builder().register::<T>()`.
///
/// # Example
///
/// ```rust,ignore
/// use restgate::Entity;
///
/// #[derive(Entity)]
/// #[entity(source = "stocks")]
/// pub struct Stock {
///     #[id]
///     pub categoryid: i32,
///     #[id]
///     pub pieceid: i32,
///     #[field(rename = "categoryName")]
///     pub category_name: String,
///     pub pieces_available: Option<i32>,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(entity, id, auto, column, field))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive(input)
}
