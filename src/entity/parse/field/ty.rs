// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field type classification.
//!
//! Generated code needs to know how a field binds as a parameter and whether
//! it is a reference slot rather than a column. Only the type's shape matters
//! here, so classification works on the last path segment.

use syn::{GenericArgument, PathArguments, Type};

/// Shape of a field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// `String`, `str`.
    Text,

    /// Any primitive integer.
    Integer,

    /// `f32`, `f64`.
    Float,

    /// `bool`.
    Bool,

    /// `Vec<u8>`.
    Bytes,

    /// `Option<T>`.
    Optional(Box<FieldType>),

    /// `Vec<T>` for any `T` other than `u8`.
    List(Box<FieldType>),

    /// `BTreeMap<K, V>`, `HashMap<K, V>`.
    Map,

    /// Anything else, by last path segment.
    Other(String)
}

impl FieldType {
    /// Classify a field type.
    pub fn classify(ty: &Type) -> Self {
        match ty {
            Type::Reference(reference) => Self::classify(&reference.elem),
            Type::Paren(paren) => Self::classify(&paren.elem),
            Type::Group(group) => Self::classify(&group.elem),
            Type::Path(path) => {
                let Some(segment) = path.path.segments.last() else {
                    return Self::Other(String::new());
                };
                let name = segment.ident.to_string();
                let args = type_args(ty);
                match (name.as_str(), args.as_slice()) {
                    ("String" | "str", _) => Self::Text,
                    (
                        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32"
                        | "u64" | "u128" | "usize",
                        _
                    ) => Self::Integer,
                    ("f32" | "f64", _) => Self::Float,
                    ("bool", _) => Self::Bool,
                    ("Option", [inner]) => Self::Optional(Box::new(Self::classify(inner))),
                    ("Vec", [inner]) => match Self::classify(inner) {
                        Self::Integer if is_named(inner, "u8") => Self::Bytes,
                        item => Self::List(Box::new(item))
                    },
                    ("BTreeMap" | "HashMap", [_, _]) => Self::Map,
                    _ => Self::Other(name)
                }
            }
            _ => Self::Other(String::new())
        }
    }

    /// Check if values of this type are `Copy` and bind by value.
    pub fn is_copy(&self) -> bool {
        match self {
            Self::Integer | Self::Float | Self::Bool => true,
            Self::Optional(inner) => inner.is_copy(),
            _ => false
        }
    }

    /// Check if this is `Option<_>`.
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Check if this is a plain `String`.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }

    /// Check if a field of this type, left untagged, holds a reference.
    ///
    /// Maps always do. Lists do when their items are structs.
    pub fn is_reference_slot(&self) -> bool {
        match self {
            Self::Map => true,
            Self::List(item) => matches!(**item, Self::Other(_)),
            _ => false
        }
    }
}

/// Generic type arguments of the last path segment.
pub fn type_args(ty: &Type) -> Vec<&Type> {
    let Type::Path(path) = ty else {
        return Vec::new();
    };
    let Some(segment) = path.path.segments.last() else {
        return Vec::new();
    };
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return Vec::new();
    };
    args.args
        .iter()
        .filter_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None
        })
        .collect()
}

/// Last path segment identifier of `ty`.
pub fn type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(path) => path.path.segments.last().map(|s| s.ident.to_string()),
        _ => None
    }
}

fn is_named(ty: &Type, name: &str) -> bool {
    type_name(ty).is_some_and(|n| n == name)
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    #[test]
    fn scalars() {
        assert_eq!(FieldType::classify(&parse_quote!(String)), FieldType::Text);
        assert_eq!(FieldType::classify(&parse_quote!(&str)), FieldType::Text);
        assert_eq!(FieldType::classify(&parse_quote!(i64)), FieldType::Integer);
        assert_eq!(FieldType::classify(&parse_quote!(f64)), FieldType::Float);
        assert_eq!(FieldType::classify(&parse_quote!(bool)), FieldType::Bool);
        assert_eq!(FieldType::classify(&parse_quote!(Vec<u8>)), FieldType::Bytes);
    }

    #[test]
    fn wrappers() {
        assert_eq!(
            FieldType::classify(&parse_quote!(Option<i64>)),
            FieldType::Optional(Box::new(FieldType::Integer))
        );
        assert_eq!(
            FieldType::classify(&parse_quote!(Vec<Port>)),
            FieldType::List(Box::new(FieldType::Other("Port".into())))
        );
        assert_eq!(
            FieldType::classify(&parse_quote!(std::collections::BTreeMap<String, String>)),
            FieldType::Map
        );
    }

    #[test]
    fn copy_types() {
        assert!(FieldType::classify(&parse_quote!(Option<i64>)).is_copy());
        assert!(!FieldType::classify(&parse_quote!(String)).is_copy());
        assert!(!FieldType::classify(&parse_quote!(Option<String>)).is_copy());
    }

    #[test]
    fn reference_slots() {
        assert!(FieldType::classify(&parse_quote!(HashMap<String, String>)).is_reference_slot());
        assert!(FieldType::classify(&parse_quote!(Vec<Device>)).is_reference_slot());
        assert!(!FieldType::classify(&parse_quote!(Vec<String>)).is_reference_slot());
        assert!(!FieldType::classify(&parse_quote!(Vec<u8>)).is_reference_slot());
    }

    #[test]
    fn type_args_of_map() {
        let ty: Type = parse_quote!(BTreeMap<String, i64>);
        let args = type_args(&ty);
        assert_eq!(args.len(), 2);
        assert_eq!(type_name(args[1]).as_deref(), Some("i64"));
    }
}
