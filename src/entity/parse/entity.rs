// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity model.
//!
//! [`EntityDef`] is built from a [`StructDesc`] (and the optional
//! `<Entity>Filter` description) and is the single input of both the
//! statement and the method generators.
//!
//! # Keys
//!
//! | Key | Fields | Used by |
//! |-----|--------|---------|
//! | row id | the field named `id` | `create` result, reference links |
//! | primary key | `primary=yes` fields | `UPDATE ... WHERE` |
//! | natural key | primary key plus filter fields tagged `primary=yes` | `id`, `ORDER BY`, GetOne/ID/Exists params |

mod accessors;

use std::collections::BTreeSet;

use syn::Ident;

use super::{FieldDef, FilterDesc, Reference, Shape};
use crate::{
    Error, Result,
    source::{MetadataProvider, StructDesc},
    utils::naming
};

/// Complete entity definition.
#[derive(Debug, Clone)]
pub struct EntityDef {
    /// Struct identifier (e.g., `NetworkForward`).
    pub ident: Ident,

    /// Default table (e.g., `network_forwards`).
    pub table: String,

    /// Columns in declaration order. Reference slots are not columns.
    pub fields: Vec<FieldDef>,

    /// `<Entity>Filter` description.
    pub filter: Option<FilterDesc>,

    /// References in slot declaration order.
    pub references: Vec<Reference>,

    /// Indices into `fields` forming the natural key, ascending.
    natural: Vec<usize>
}

impl EntityDef {
    /// Build an entity from its struct description.
    ///
    /// Map references are resolved here; list references wait for
    /// [`EntityDef::resolve_references`].
    ///
    /// # Errors
    ///
    /// - tag parser errors for any field
    /// - [`Error::NoPrimaryKey`] when no field is `primary=yes`
    /// - [`Error::DuplicateColumn`] on a column collision
    /// - [`Error::InvalidField`] for contradictory declarations
    /// - [`Error::UnknownFilterField`] for a `primary=yes` filter field that
    ///   names no entity field
    pub fn build(desc: &StructDesc, filter: Option<&StructDesc>) -> Result<Self> {
        let entity = desc.name();
        let mut fields = Vec::with_capacity(desc.fields.len());
        let mut slots = Vec::new();

        for raw in &desc.fields {
            let field = FieldDef::new(raw.ident.clone(), raw.ty.clone(), raw.tag.as_deref())?;

            if field.kind.is_reference_slot() && !field.is_marshal() {
                if !field.tag.is_empty() {
                    return Err(Error::invalid_field(
                        &entity,
                        &field.name_str(),
                        "reference fields take no db tag besides marshal=json"
                    ));
                }
                slots.push(field);
                continue;
            }

            if field.is_nullable() && !field.kind.is_optional() {
                return Err(Error::invalid_field(
                    &entity,
                    &field.name_str(),
                    "nullable=true requires an Option<_> type"
                ));
            }

            fields.push(field);
        }

        if !fields.iter().any(FieldDef::is_primary) {
            return Err(Error::NoPrimaryKey {
                entity
            });
        }

        let mut columns = BTreeSet::new();
        for field in &fields {
            if !columns.insert(field.column.as_str()) {
                return Err(Error::DuplicateColumn {
                    entity,
                    column: field.column.clone()
                });
            }
        }

        let filter = filter.map(FilterDesc::from_desc).transpose()?;
        let table = desc
            .table
            .clone()
            .unwrap_or_else(|| naming::plural(&naming::snake(&entity)));

        let mut def = Self {
            ident: desc.ident.clone(),
            table,
            fields,
            filter,
            references: Vec::new(),
            natural: Vec::new()
        };
        def.natural = def.natural_indices()?;

        let link_ty = def.row_id().map(|f| f.ty.clone());
        for slot in &slots {
            let Some(link_ty) = &link_ty else {
                return Err(Error::invalid_field(
                    &entity,
                    &slot.name_str(),
                    "references require an `id` field on the parent"
                ));
            };

            let mut reference = Reference::from_slot(slot);
            if reference.is_map() {
                reference.resolve(&def.ident, &def.table, link_ty, None)?;
            }
            def.references.push(reference);
        }

        tracing::debug!(
            entity = %def.ident,
            table = %def.table,
            columns = def.fields.len(),
            references = def.references.len(),
            "entity built"
        );
        Ok(def)
    }

    /// Resolve list references through `provider`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownReference`] when an item struct is unknown, or any
    /// error from building the child entity.
    pub fn resolve_references(&mut self, provider: &dyn MetadataProvider) -> Result<()> {
        let Some(link_ty) = self.row_id().map(|f| f.ty.clone()) else {
            return Ok(());
        };

        for reference in &mut self.references {
            if reference.entity.is_some() {
                continue;
            }
            let Shape::List { item } = &reference.shape else {
                continue;
            };

            let item = provider
                .describe(item)
                .ok_or_else(|| Error::UnknownReference {
                    entity:    self.ident.to_string(),
                    reference: reference.name.clone()
                })?;
            reference.resolve(&self.ident, &self.table, &link_ty, Some(&item))?;
        }

        Ok(())
    }

    fn natural_indices(&self) -> Result<Vec<usize>> {
        let mut natural: BTreeSet<usize> = self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_primary())
            .map(|(i, _)| i)
            .collect();

        if let Some(filter) = &self.filter {
            for extra in filter.fields.iter().filter(|f| f.primary) {
                let name = extra.ident.to_string();
                let index = self
                    .position(&name)
                    .ok_or_else(|| Error::unknown_filter(&self.ident, &name))?;
                natural.insert(index);
            }
        }

        Ok(natural.into_iter().collect())
    }
}
