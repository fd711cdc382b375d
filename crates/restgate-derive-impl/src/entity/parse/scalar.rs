// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Scalar type inference from Rust field types.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericArgument, PathArguments, Type};

/// Scalar column type as seen by the macro.
///
/// Mirrors `restgate_core::schema::ScalarType`; proc-macro crates cannot
/// link the runtime crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// Text.
    String,
    /// 32-bit integer.
    Int32,
    /// 64-bit integer.
    Int64,
    /// Boolean.
    Bool,
    /// Double-precision float.
    Float64,
    /// Timestamp.
    DateTime,
    /// Binary data.
    ByteArray
}

impl ScalarKind {
    /// Parse a `#[column(ty = "...")]` value.
    ///
    /// Returns `None` for unrecognized names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "string" | "text" | "varchar" => Some(Self::String),
            "int32" | "int" | "integer" => Some(Self::Int32),
            "int64" | "bigint" | "long" => Some(Self::Int64),
            "bool" | "boolean" => Some(Self::Bool),
            "float64" | "double" | "float" => Some(Self::Float64),
            "datetime" | "timestamp" => Some(Self::DateTime),
            "bytearray" | "byte[]" | "bytes" | "bytea" => Some(Self::ByteArray),
            _ => None
        }
    }

    /// Infer from a field type.
    ///
    /// Returns the inferred kind (if any) and whether the type is `Option<T>`.
    pub fn infer(ty: &Type) -> (Option<Self>, bool) {
        match option_inner(ty) {
            Some(inner) => (Self::from_type(inner), true),
            None => (Self::from_type(ty), false)
        }
    }

    fn from_type(ty: &Type) -> Option<Self> {
        match ty {
            Type::Reference(reference) => match reference.elem.as_ref() {
                Type::Path(path) if path.path.is_ident("str") => Some(Self::String),
                _ => None
            },
            Type::Path(type_path) => {
                let segment = type_path.path.segments.last()?;
                match segment.ident.to_string().as_str() {
                    "String" => Some(Self::String),
                    "i32" => Some(Self::Int32),
                    "i64" => Some(Self::Int64),
                    "bool" => Some(Self::Bool),
                    "f64" => Some(Self::Float64),
                    "DateTime" | "NaiveDateTime" => Some(Self::DateTime),
                    "Vec" => match first_generic(&segment.arguments)? {
                        Type::Path(arg) if arg.path.is_ident("u8") => Some(Self::ByteArray),
                        _ => None
                    },
                    _ => None
                }
            }
            Type::Group(group) => Self::from_type(&group.elem),
            Type::Paren(paren) => Self::from_type(&paren.elem),
            _ => None
        }
    }

    /// Path to the runtime enum variant.
    pub fn tokens(self) -> TokenStream {
        let variant = match self {
            Self::String => quote!(String),
            Self::Int32 => quote!(Int32),
            Self::Int64 => quote!(Int64),
            Self::Bool => quote!(Bool),
            Self::Float64 => quote!(Float64),
            Self::DateTime => quote!(DateTime),
            Self::ByteArray => quote!(ByteArray)
        };
        quote!(::restgate_core::schema::ScalarType::#variant)
    }
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    first_generic(&segment.arguments)
}

fn first_generic(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(args) = arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None
    })
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    fn infer(ty: Type) -> (Option<ScalarKind>, bool) {
        ScalarKind::infer(&ty)
    }

    #[test]
    fn primitives() {
        assert_eq!(infer(parse_quote!(String)), (Some(ScalarKind::String), false));
        assert_eq!(infer(parse_quote!(&'static str)), (Some(ScalarKind::String), false));
        assert_eq!(infer(parse_quote!(i32)), (Some(ScalarKind::Int32), false));
        assert_eq!(infer(parse_quote!(i64)), (Some(ScalarKind::Int64), false));
        assert_eq!(infer(parse_quote!(bool)), (Some(ScalarKind::Bool), false));
        assert_eq!(infer(parse_quote!(f64)), (Some(ScalarKind::Float64), false));
    }

    #[test]
    fn chrono_and_bytes() {
        assert_eq!(
            infer(parse_quote!(chrono::DateTime<chrono::Utc>)),
            (Some(ScalarKind::DateTime), false)
        );
        assert_eq!(
            infer(parse_quote!(NaiveDateTime)),
            (Some(ScalarKind::DateTime), false)
        );
        assert_eq!(infer(parse_quote!(Vec<u8>)), (Some(ScalarKind::ByteArray), false));
        assert_eq!(infer(parse_quote!(Vec<i32>)), (None, false));
    }

    #[test]
    fn option_is_nullable() {
        assert_eq!(
            infer(parse_quote!(Option<String>)),
            (Some(ScalarKind::String), true)
        );
        assert_eq!(
            infer(parse_quote!(std::option::Option<i64>)),
            (Some(ScalarKind::Int64), true)
        );
        assert_eq!(infer(parse_quote!(Option<Money>)), (None, true));
    }

    #[test]
    fn unknown_type() {
        assert_eq!(infer(parse_quote!(uuid::Uuid)), (None, false));
        assert_eq!(infer(parse_quote!(u32)), (None, false));
    }

    #[test]
    fn names() {
        assert_eq!(ScalarKind::from_name("bigint"), Some(ScalarKind::Int64));
        assert_eq!(ScalarKind::from_name("Byte[]"), Some(ScalarKind::ByteArray));
        assert_eq!(ScalarKind::from_name("money"), None);
    }

    #[test]
    fn tokens_point_at_runtime_enum() {
        let tokens = ScalarKind::Bool.tokens().to_string();
        assert!(tokens.contains("restgate_core"));
        assert!(tokens.contains("Bool"));
    }
}
