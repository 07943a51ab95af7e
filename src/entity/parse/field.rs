// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field-level metadata.
//!
//! A [`FieldDef`] is one column of an entity: the struct field, its
//! classified type and its parsed [`Tag`].
//!
//! # Statement membership
//!
//! | Role | SELECT | INSERT | UPDATE SET | UPDATE WHERE |
//! |------|--------|--------|------------|--------------|
//! | row id (`id`) | yes | no | no | when primary |
//! | `primary=yes` | yes | yes | no | yes |
//! | `leftjoin=...` | yes | no | no | no |
//! | `omit=create` | yes | no | | |
//! | `omit=update` | yes | | no | |
//! | plain | yes | yes | yes | no |

mod ty;

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Ident, Type, ext::IdentExt};

pub use self::ty::{FieldType, type_args, type_name};
use super::tag::{Join, Marshal, Omit, Tag};
use crate::{Result, utils::naming};

/// Name of the surrogate row id field.
pub const ROW_ID: &str = "id";

/// Column definition.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field identifier (e.g., `network_id`).
    pub ident: Ident,

    /// Declared field type.
    pub ty: Type,

    /// Classified type shape.
    pub kind: FieldType,

    /// Parsed `#[db = "..."]` tag.
    pub tag: Tag,

    /// Column name: tag override or the field name.
    pub column: String,

    /// Column links a reference row to its parent and has no struct field.
    pub link: bool
}

impl FieldDef {
    /// Build a field from its identifier, type and raw tag.
    ///
    /// # Errors
    ///
    /// Returns the tag parser's error for a malformed tag.
    pub fn new(ident: Ident, ty: Type, tag: Option<&str>) -> Result<Self> {
        let name = ident.unraw().to_string();
        let tag = Tag::parse(&name, tag.unwrap_or_default())?;
        let column = tag.column.clone().unwrap_or_else(|| name.clone());
        let kind = FieldType::classify(&ty);

        Ok(Self {
            ident,
            ty,
            kind,
            tag,
            column,
            link: false
        })
    }

    /// Get the field identifier.
    pub fn name(&self) -> &Ident {
        &self.ident
    }

    /// Get the field name as a string, without `r#`.
    pub fn name_str(&self) -> String {
        self.ident.unraw().to_string()
    }

    /// Get the field name in `PascalCase` (e.g., `NetworkId`).
    pub fn pascal(&self) -> String {
        naming::pascal(&self.name_str())
    }

    /// Get the field type.
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// Check if this is the surrogate row id.
    pub fn is_row_id(&self) -> bool {
        self.name_str() == ROW_ID
    }

    /// Check if the tag marks this field as part of the key.
    pub fn is_primary(&self) -> bool {
        self.tag.primary
    }

    /// Check if the column may hold NULL.
    pub fn is_nullable(&self) -> bool {
        self.tag.nullable
    }

    /// Get the joined table and column, if any.
    pub fn join(&self) -> Option<&Join> {
        self.tag.join.as_ref()
    }

    /// Check if the column stores JSON text.
    pub fn is_marshal(&self) -> bool {
        self.tag.marshal == Marshal::Json
    }

    /// Check if the field is written by `INSERT`.
    pub fn in_create(&self) -> bool {
        !self.is_row_id() && self.join().is_none() && !self.tag.omits(Omit::Create)
    }

    /// Check if the field is written by `UPDATE ... SET`.
    pub fn in_update(&self) -> bool {
        !self.is_row_id()
            && !self.is_primary()
            && self.join().is_none()
            && !self.tag.omits(Omit::Update)
    }

    /// Parameter type of this field in a generated signature.
    ///
    /// `Copy` types pass by value, `String` as `&str`, the rest by reference.
    pub fn param_type(&self) -> TokenStream {
        let ty = &self.ty;
        if self.kind.is_copy() {
            quote! { #ty }
        } else if self.kind.is_text() {
            quote! { &str }
        } else {
            quote! { &#ty }
        }
    }
}
