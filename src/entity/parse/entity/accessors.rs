// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field and key accessors for [`EntityDef`].

use quote::format_ident;
use syn::Ident;

use super::EntityDef;
use crate::{
    Error, Result,
    entity::parse::{FieldDef, Join, Reference},
    utils::naming
};

impl EntityDef {
    /// Get the entity name.
    pub fn name(&self) -> &Ident {
        &self.ident
    }

    /// Get the entity name as a string.
    pub fn name_str(&self) -> String {
        self.ident.to_string()
    }

    /// Snake-case name (e.g., `network_forward`).
    pub fn snake(&self) -> String {
        naming::snake(&self.name_str())
    }

    /// Plural snake-case name (e.g., `network_forwards`).
    pub fn plural(&self) -> String {
        naming::plural(&self.snake())
    }

    /// Create an identifier with prefix/suffix around the entity name.
    pub fn ident_with(&self, prefix: &str, suffix: &str) -> Ident {
        format_ident!("{}{}{}", prefix, self.ident, suffix)
    }

    /// All columns in declaration order.
    pub fn all_fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Columns that are also fields of the entity struct.
    pub fn struct_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| !f.link)
    }

    /// Get the row id field.
    pub fn row_id(&self) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.is_row_id())
    }

    /// Get the row id field or fail with [`Error::NoRowId`].
    pub fn require_row_id(&self) -> Result<&FieldDef> {
        self.row_id().ok_or_else(|| Error::NoRowId {
            entity: self.name_str()
        })
    }

    /// Fields tagged `primary=yes`.
    pub fn primary_key(&self) -> Vec<&FieldDef> {
        self.fields.iter().filter(|f| f.is_primary()).collect()
    }

    /// Natural-key fields in declaration order.
    pub fn natural_key(&self) -> Vec<&FieldDef> {
        self.natural.iter().map(|&i| &self.fields[i]).collect()
    }

    /// Check if the natural key contains the row id.
    pub fn natural_key_has_row_id(&self) -> bool {
        self.natural_key().iter().any(|f| f.is_row_id())
    }

    /// Fields written by `INSERT`.
    pub fn create_fields(&self) -> Vec<&FieldDef> {
        self.fields.iter().filter(|f| f.in_create()).collect()
    }

    /// Fields written by `UPDATE ... SET`.
    pub fn update_fields(&self) -> Vec<&FieldDef> {
        self.fields.iter().filter(|f| f.in_update()).collect()
    }

    /// Distinct joined tables in declaration order.
    pub fn joins(&self) -> Vec<&Join> {
        let mut joins: Vec<&Join> = Vec::new();
        for join in self.fields.iter().filter_map(FieldDef::join) {
            if !joins.iter().any(|j| j.table == join.table) {
                joins.push(join);
            }
        }
        joins
    }

    /// Check if any column is read through a join.
    pub fn has_joins(&self) -> bool {
        self.fields.iter().any(|f| f.join().is_some())
    }

    pub(super) fn position(&self, name: &str) -> Option<usize> {
        let name = naming::normalize(name);
        self.fields
            .iter()
            .position(|f| naming::normalize(&f.name_str()) == name)
    }

    /// Find a column by filter name (`NetworkID`, `network_id`, ...).
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.position(name).map(|i| &self.fields[i])
    }

    /// Resolve filter names to columns, in the given order.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownFilterField`] for a name matching no column.
    pub fn resolve_fields(&self, names: &[String]) -> Result<Vec<&FieldDef>> {
        names
            .iter()
            .map(|name| {
                self.field(name)
                    .ok_or_else(|| Error::unknown_filter(&self.ident, name))
            })
            .collect()
    }

    /// Name of the filter struct (e.g., `NetworkForwardFilter`).
    pub fn filter_ident(&self) -> Ident {
        self.ident_with("", "Filter")
    }

    /// Columns named by the filter struct, in filter declaration order.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingFilterType`] when no filter struct was described
    /// - [`Error::UnknownFilterField`] for a filter field matching no column
    pub fn filter_fields(&self) -> Result<Vec<&FieldDef>> {
        let filter = self.filter.as_ref().ok_or_else(|| Error::MissingFilterType {
            entity: self.name_str(),
            filter: self.filter_ident().to_string()
        })?;

        filter
            .fields
            .iter()
            .map(|f| {
                let name = f.ident.to_string();
                self.field(&name)
                    .ok_or_else(|| Error::unknown_filter(&self.ident, &name))
            })
            .collect()
    }

    /// Find a resolved reference by name (`Config`, `config`).
    ///
    /// # Errors
    ///
    /// [`Error::UnknownReference`] when no slot has that name or its item
    /// struct was never resolved.
    pub fn reference(&self, name: &str) -> Result<&Reference> {
        let wanted = naming::normalize(name);
        self.references
            .iter()
            .find(|r| naming::normalize(&r.name) == wanted && r.entity.is_some())
            .ok_or_else(|| Error::UnknownReference {
                entity:    self.name_str(),
                reference: name.to_string()
            })
    }
}
