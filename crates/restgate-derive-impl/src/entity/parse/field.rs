// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field-level attribute parsing.
//!
//! | Attribute | Example | Effect |
//! |-----------|---------|--------|
//! | `id` | `#[id]` | Primary-key column |
//! | `auto` | `#[auto]` | Database-assigned key |
//! | `column` | `#[column(name = "region_code")]` | Backing column name |
//! | `column` | `#[column(default)]` | Database default, not required |
//! | `column` | `#[column(nullable)]` | Allow `NULL` |
//! | `column` | `#[column(ty = "int64")]` | Explicit scalar type |
//! | `field` | `#[field(rename = "Scientific Name")]` | Exposed JSON name |

use syn::{Attribute, Field, Ident, LitStr, Meta};

use super::ScalarKind;

/// `#[column(...)]` options.
#[derive(Debug, Clone, Default)]
pub struct ColumnAttr {
    /// Custom backing column name.
    pub name:     Option<String>,
    /// Column has a database default.
    pub default:  bool,
    /// Explicitly nullable.
    pub nullable: bool,
    /// Explicit scalar type.
    pub ty:       Option<LitStr>
}

impl ColumnAttr {
    /// Parse `#[column(...)]`.
    ///
    /// `default` accepts both the flag form and `default = "expr"`; the
    /// expression itself belongs to the database.
    pub fn from_attr(attr: &Attribute) -> syn::Result<Self> {
        let mut config = Self::default();

        if let Meta::List(meta_list) = &attr.meta {
            meta_list.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    config.name = Some(value.value());
                } else if meta.path.is_ident("default") {
                    if meta.input.peek(syn::Token![=]) {
                        let _: LitStr = meta.value()?.parse()?;
                    }
                    config.default = true;
                } else if meta.path.is_ident("nullable") {
                    config.nullable = true;
                } else if meta.path.is_ident("ty") {
                    config.ty = Some(meta.value()?.parse()?);
                } else {
                    return Err(meta.error("unsupported column option"));
                }
                Ok(())
            })?;
        }

        Ok(config)
    }
}

/// Parse `#[field(rename = "...")]`.
fn parse_rename(attr: &Attribute) -> syn::Result<Option<String>> {
    let mut rename = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("rename") {
            let value: LitStr = meta.value()?.parse()?;
            rename = Some(value.value());
            Ok(())
        } else {
            Err(meta.error("unsupported field option"))
        }
    })?;
    Ok(rename)
}

/// One struct field and its column configuration.
#[derive(Debug)]
pub struct FieldDef {
    /// Field identifier.
    pub ident:     Ident,
    /// Primary-key column.
    pub is_id:     bool,
    /// Database-assigned.
    pub is_auto:   bool,
    /// `#[column(...)]` options.
    pub column:    ColumnAttr,
    /// Exposed name from `#[field(rename = ...)]`.
    pub rename:    Option<String>,
    /// Resolved scalar type.
    pub scalar:    ScalarKind,
    /// Field type is `Option<T>`.
    pub is_option: bool,
    column_name:   String
}

impl FieldDef {
    /// Parse a field definition.
    ///
    /// # Errors
    ///
    /// - Tuple field
    /// - Malformed `#[column]` or `#[field]` options
    /// - `#[auto]` without `#[id]`
    /// - Unknown `ty = "..."` or a type that cannot be inferred
    pub fn from_field(field: &Field) -> darling::Result<Self> {
        let ident = field.ident.clone().ok_or_else(|| {
            darling::Error::custom("Entity fields must be named").with_span(field)
        })?;

        let mut errors = darling::Error::accumulator();
        let mut is_id = false;
        let mut is_auto = false;
        let mut column = ColumnAttr::default();
        let mut rename = None;

        for attr in &field.attrs {
            if attr.path().is_ident("id") {
                is_id = true;
            } else if attr.path().is_ident("auto") {
                is_auto = true;
            } else if attr.path().is_ident("column") {
                if let Some(parsed) = errors.handle(ColumnAttr::from_attr(attr).map_err(Into::into)) {
                    column = parsed;
                }
            } else if attr.path().is_ident("field") {
                if let Some(parsed) = errors.handle(parse_rename(attr).map_err(Into::into)) {
                    rename = parsed;
                }
            }
        }

        if is_auto && !is_id {
            errors.push(
                darling::Error::custom("#[auto] is only supported on #[id] fields").with_span(&ident)
            );
        }

        let (inferred, is_option) = ScalarKind::infer(&field.ty);
        let scalar = match &column.ty {
            Some(lit) => ScalarKind::from_name(&lit.value()).ok_or_else(|| {
                darling::Error::custom(format!("unknown scalar type `{}`", lit.value())).with_span(lit)
            }),
            None => inferred.ok_or_else(|| {
                darling::Error::custom("cannot infer the scalar type, add #[column(ty = \"...\")]")
                    .with_span(&field.ty)
            })
        };
        let scalar = errors.handle(scalar);

        errors.finish()?;
        let scalar = scalar.ok_or_else(|| darling::Error::custom("unresolved scalar type"))?;

        let column_name = column.name.clone().unwrap_or_else(|| ident.to_string());
        Ok(Self {
            ident,
            is_id,
            is_auto,
            column,
            rename,
            scalar,
            is_option,
            column_name
        })
    }

    /// Check if this is a primary-key field.
    #[must_use]
    pub fn is_id(&self) -> bool {
        self.is_id
    }

    /// Backing column name.
    #[must_use]
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    /// Check if the column accepts `NULL`.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.is_option || self.column.nullable
    }
}
