// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Filter type description.
//!
//! `<Entity>Filter` is a user-declared struct of `Option<T>` fields. Each
//! field with a value set restricts the fetch by equality on the entity field
//! of the same name. A filter field tagged `primary=yes` additionally joins
//! the entity's natural key.

use syn::{Ident, Type};

use super::tag::Tag;
use crate::{Error, Result, source::StructDesc};

/// One field of a filter struct.
#[derive(Debug, Clone)]
pub struct FilterField {
    pub ident:   Ident,
    pub ty:      Type,
    pub primary: bool
}

/// Parsed `<Entity>Filter` struct.
#[derive(Debug, Clone)]
pub struct FilterDesc {
    /// Filter struct identifier.
    pub ident: Ident,

    /// Fields in declaration order.
    pub fields: Vec<FilterField>
}

impl FilterDesc {
    /// Read a filter struct description.
    ///
    /// # Errors
    ///
    /// Returns the tag parser's error for a malformed tag, or
    /// [`Error::InvalidField`] for a field that is not `Option<_>`.
    pub fn from_desc(desc: &StructDesc) -> Result<Self> {
        let fields = desc
            .fields
            .iter()
            .map(|raw| {
                let name = raw.ident.to_string();
                let tag = Tag::parse(&name, raw.tag.as_deref().unwrap_or_default())?;
                if super::field::type_name(&raw.ty).as_deref() != Some("Option") {
                    return Err(Error::invalid_field(
                        &desc.ident,
                        &name,
                        "filter fields must be `Option<_>`"
                    ));
                }
                Ok(FilterField {
                    ident:   raw.ident.clone(),
                    ty:      raw.ty.clone(),
                    primary: tag.primary
                })
            })
            .collect::<Result<_>>()?;

        Ok(Self {
            ident: desc.ident.clone(),
            fields
        })
    }
}
