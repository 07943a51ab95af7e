// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Reference entities.
//!
//! A reference is a child table attached one-to-many to the parent row id.
//! It is declared by a *slot* field on the parent:
//!
//! | Slot type | Child columns | Resolved |
//! |-----------|---------------|----------|
//! | `BTreeMap<K, V>` / `HashMap<K, V>` | `<parent>_id`, `key`, `value` | at build |
//! | `Vec<T>` with `T` a struct | `<parent>_id`, fields of `T` | through the provider |
//!
//! The child table is `<parent table>_<slot>`. The link column is primary, so
//! the child's natural key is the link plus the key (maps) or the item's own
//! primary fields (lists).

use quote::format_ident;
use syn::{Ident, Type, parse_quote};

use super::{EntityDef, FieldDef, type_args, type_name};
use crate::{
    Error, Result,
    source::{RawField, StructDesc},
    utils::naming
};

/// Container shape of a reference slot.
#[derive(Debug, Clone)]
pub enum Shape {
    /// Key/value map.
    Map { key: Type, value: Type },

    /// List of structs named `item`.
    List { item: String }
}

/// Child entity attached to a parent.
#[derive(Debug, Clone)]
pub struct Reference {
    /// Reference name (e.g., `Config`).
    pub name: String,

    /// Slot field on the parent (e.g., `config`).
    pub slot: Ident,

    /// Declared slot type.
    pub slot_ty: Type,

    pub shape: Shape,

    /// Child entity, once resolved.
    pub entity: Option<Box<EntityDef>>
}

impl Reference {
    pub(super) fn from_slot(field: &FieldDef) -> Self {
        let args = type_args(&field.ty);
        let shape = match args.as_slice() {
            [key, value] => Shape::Map {
                key:   (*key).clone(),
                value: (*value).clone()
            },
            [item] => Shape::List {
                item: type_name(item).unwrap_or_default()
            },
            _ => Shape::List {
                item: String::new()
            }
        };

        Self {
            name: field.pascal(),
            slot: field.ident.clone(),
            slot_ty: field.ty.clone(),
            shape,
            entity: None
        }
    }

    /// Child table for a parent stored in `parent_table`.
    pub fn table(&self, parent_table: &str) -> String {
        format!("{parent_table}_{}", self.slot)
    }

    /// Get the resolved child entity.
    pub fn entity(&self) -> Option<&EntityDef> {
        self.entity.as_deref()
    }

    /// Get the column linking child rows to the parent.
    pub fn link(&self) -> Option<&FieldDef> {
        self.entity()?.fields.iter().find(|f| f.link)
    }

    /// Check if this reference is a key/value map.
    pub fn is_map(&self) -> bool {
        matches!(self.shape, Shape::Map { .. })
    }

    /// Build the child entity.
    ///
    /// `item` describes the list item struct and is ignored for maps.
    pub(super) fn resolve(
        &mut self,
        parent: &Ident,
        parent_table: &str,
        link_ty: &Type,
        item: Option<&StructDesc>
    ) -> Result<()> {
        let link = RawField {
            ident: format_ident!("{}_id", naming::snake(&parent.to_string())),
            ty:    link_ty.clone(),
            tag:   Some("primary=yes".to_string())
        };

        let mut fields = vec![link];
        match (&self.shape, item) {
            (Shape::Map { key, value }, _) => {
                fields.push(RawField {
                    ident: parse_quote!(key),
                    ty:    key.clone(),
                    tag:   Some("primary=yes".to_string())
                });
                fields.push(RawField {
                    ident: parse_quote!(value),
                    ty:    value.clone(),
                    tag:   None
                });
            }
            (Shape::List { .. }, Some(item)) => fields.extend(item.fields.iter().cloned()),
            (Shape::List { .. }, None) => {
                return Err(Error::UnknownReference {
                    entity:    parent.to_string(),
                    reference: self.name.clone()
                });
            }
        }

        let desc = StructDesc {
            ident: format_ident!("{}{}", parent, self.name),
            table: Some(self.table(parent_table)),
            fields
        };

        let mut entity = EntityDef::build(&desc, None)?;
        if !entity.references.is_empty() {
            return Err(Error::invalid_field(
                parent,
                &self.slot,
                "reference items cannot declare references"
            ));
        }
        if let Some(link) = entity.fields.first_mut() {
            link.link = true;
        }

        tracing::debug!(
            parent = %parent,
            reference = %self.name,
            table = %entity.table,
            "reference resolved"
        );
        self.entity = Some(Box::new(entity));
        Ok(())
    }
}
