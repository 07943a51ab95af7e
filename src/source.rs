// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Struct metadata.
//!
//! Generation never inspects Rust items directly. It asks a
//! [`MetadataProvider`] for a [`StructDesc`] by name: the struct identifier,
//! an optional table override and each field's identifier, type and raw tag.
//!
//! [`Catalog`] is the provider backed by Rust source text:
//!
//! ```rust,ignore
//! #[mapper(table = "networks_forwards")]
//! pub struct NetworkForward {
//!     pub id: i64,
//!     #[db = "primary=yes"]
//!     pub network_id: i64,
//!     #[db = "primary=yes"]
//!     pub listen_address: String,
//!     pub config: BTreeMap<String, String>
//! }
//! ```
//!
//! Several `#[db = "..."]` attributes on one field are joined with `&`.

use std::{collections::BTreeMap, path::Path};

use darling::FromDeriveInput;
use syn::{Attribute, DeriveInput, Expr, ExprLit, Fields, Ident, Item, Lit, Meta, Type};

use crate::{Result, utils::naming};

/// Field as declared in a struct.
#[derive(Debug, Clone)]
pub struct RawField {
    pub ident: Ident,
    pub ty:    Type,
    pub tag:   Option<String>
}

/// Struct as seen by the generator.
#[derive(Debug, Clone)]
pub struct StructDesc {
    /// Struct identifier.
    pub ident: Ident,

    /// `#[mapper(table = "...")]` override.
    pub table: Option<String>,

    /// Named fields in declaration order.
    pub fields: Vec<RawField>
}

impl StructDesc {
    /// Get the struct name.
    pub fn name(&self) -> String {
        self.ident.to_string()
    }
}

/// Source of struct descriptions.
pub trait MetadataProvider {
    /// Describe the struct named `name`, if known.
    fn describe(&self, name: &str) -> Option<StructDesc>;
}

impl<T: MetadataProvider + ?Sized> MetadataProvider for &T {
    fn describe(&self, name: &str) -> Option<StructDesc> {
        (**self).describe(name)
    }
}

/// Entity-level attributes parsed from `#[mapper(...)]`.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(mapper), supports(struct_named))]
struct StructAttrs {
    ident: Ident,

    data: darling::ast::Data<(), FieldAttrs>,

    /// Table name override.
    table: Option<String>
}

#[derive(Debug, darling::FromField)]
#[darling(forward_attrs(db))]
struct FieldAttrs {
    ident: Option<Ident>,
    ty:    Type,
    attrs: Vec<Attribute>
}

/// In-memory [`MetadataProvider`].
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    structs: BTreeMap<String, StructDesc>
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a struct description.
    pub fn insert(&mut self, desc: StructDesc) -> &mut Self {
        self.structs.insert(desc.name(), desc);
        self
    }

    /// Collect every struct with named fields declared in `source`.
    ///
    /// # Errors
    ///
    /// - [`Error::Source`](crate::Error::Source) if the text is not valid Rust
    ///   or a `db` attribute is not a string literal
    /// - [`Error::Attribute`](crate::Error::Attribute) for a malformed
    ///   `#[mapper(...)]`
    pub fn from_source(source: &str) -> Result<Self> {
        let file = syn::parse_file(source)?;
        let mut catalog = Self::new();
        collect(&file.items, &mut catalog)?;
        tracing::debug!(structs = catalog.structs.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Read and parse a Rust source file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_source(&source)
    }

    /// Iterate over struct names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.structs.keys().map(String::as_str)
    }
}

impl MetadataProvider for Catalog {
    fn describe(&self, name: &str) -> Option<StructDesc> {
        self.structs
            .get(name)
            .or_else(|| self.structs.get(&naming::pascal(name)))
            .cloned()
    }
}

fn collect(items: &[Item], catalog: &mut Catalog) -> Result<()> {
    for item in items {
        match item {
            Item::Struct(item) if matches!(item.fields, Fields::Named(_)) => {
                let input = DeriveInput::from(item.clone());
                catalog.insert(describe(&input)?);
            }
            Item::Mod(module) => {
                if let Some((_, items)) = &module.content {
                    collect(items, catalog)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn describe(input: &DeriveInput) -> Result<StructDesc> {
    let attrs = StructAttrs::from_derive_input(input)?;
    let fields = attrs
        .data
        .take_struct()
        .map(|fields| fields.fields)
        .unwrap_or_default();

    let fields = fields
        .into_iter()
        .filter_map(|field| {
            let ident = field.ident?;
            Some(tag(&field.attrs).map(|tag| RawField {
                ident,
                ty: field.ty,
                tag
            }))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(StructDesc {
        ident: attrs.ident,
        table: attrs.table,
        fields
    })
}

/// Join every `#[db = "..."]` on a field into one tag.
fn tag(attrs: &[Attribute]) -> Result<Option<String>> {
    let mut parts = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("db")) {
        match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(value),
                    ..
                }) => parts.push(value.value()),
                other => {
                    return Err(syn::Error::new_spanned(other, "expected a string tag").into());
                }
            },
            _ => {
                return Err(syn::Error::new_spanned(attr, "expected #[db = \"...\"]").into());
            }
        }
    }

    Ok((!parts.is_empty()).then(|| parts.join("&")))
}
