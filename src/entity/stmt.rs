// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! SQL statement generation.
//!
//! Each statement is emitted as a typed accessor constant:
//!
//! ```rust,ignore
//! /// `objects-by-Name` statement of `Widget`.
//! pub const WIDGET_OBJECTS_BY_NAME: &str = "SELECT id, name, tag FROM widgets WHERE name = ? ORDER BY id";
//! ```
//!
//! # Shapes
//!
//! | Kind | SQL |
//! |------|-----|
//! | `objects[-by-..]` | `SELECT cols[, jt.c AS col] FROM t [LEFT JOIN ..] [WHERE ..] ORDER BY <natural key>` |
//! | `create` | `INSERT INTO t (cols) VALUES (..)` (`RETURNING id` on Postgres) |
//! | `update` | `UPDATE t SET .. WHERE <primary key>` |
//! | `delete-by-..` | `DELETE FROM t WHERE ..` |
//! | `id` | `SELECT id FROM t WHERE <natural key>` |
//!
//! Values are always bound parameters; only identifiers taken from metadata
//! reach the SQL text.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::Ident;

use super::{
    kind::StmtKind,
    parse::{Dialect, EntityDef, FieldDef}
};
use crate::{
    Config, Error, Result,
    utils::sql::{comma, conditions, set_clause}
};

/// Generated SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Accessor constant name (e.g., `WIDGET_OBJECTS_BY_NAME`).
    pub name: Ident,

    /// Canonical kind.
    pub kind: StmtKind,

    /// Owning entity.
    pub entity: Ident,

    /// SQL text.
    pub sql: String
}

impl Statement {
    /// Accessor declaration.
    pub fn accessor(&self) -> TokenStream {
        let name = &self.name;
        let sql = &self.sql;
        let doc = format!(" `{}` statement of `{}`.", self.kind, self.entity);
        quote! {
            #[doc = #doc]
            pub const #name: &str = #sql;
        }
    }

    /// Get the SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

/// Generate the statement of `kind` for `entity`.
///
/// `table=` in `config` overrides the table for this statement.
///
/// # Errors
///
/// - [`Error::UnknownFilterField`] for an unresolved filter name
/// - [`Error::UnsupportedFilterField`] for a join field in a write filter
/// - [`Error::NoInsertableColumns`], [`Error::NoUpdatableColumns`]
/// - [`Error::NoRowId`] for `id` without a row id
/// - [`Error::MissingRequiredConfig`] for an empty `table=`
pub fn generate(
    entity: &EntityDef,
    kind: &StmtKind,
    config: &Config,
    dialect: Dialect
) -> Result<Statement> {
    let table = config
        .table(&entity.name_str())?
        .unwrap_or(&entity.table)
        .to_string();
    build(entity, kind, &table, dialect)
}

/// Generate a statement against an explicit table.
pub fn build(entity: &EntityDef, kind: &StmtKind, table: &str, dialect: Dialect) -> Result<Statement> {
    let ctx = Sql {
        entity,
        table,
        dialect
    };

    let (kind, sql) = match kind {
        StmtKind::Objects(names) => {
            let fields = entity.resolve_fields(names)?;
            (canonical(kind, &fields), ctx.select(&fields))
        }
        StmtKind::Create => (StmtKind::Create, ctx.create()?),
        StmtKind::Update => (StmtKind::Update, ctx.update()?),
        StmtKind::Delete(names) => {
            let fields = entity.resolve_fields(names)?;
            (canonical(kind, &fields), ctx.delete(&fields)?)
        }
        StmtKind::Id => (StmtKind::Id, ctx.id()?)
    };

    let statement = Statement {
        name: const_name(entity, &kind),
        kind,
        entity: entity.ident.clone(),
        sql
    };
    tracing::debug!(entity = %entity.ident, kind = %statement.kind, sql = %statement.sql, "statement generated");
    Ok(statement)
}

/// Rebuild a filtered kind from resolved fields.
fn canonical(kind: &StmtKind, fields: &[&FieldDef]) -> StmtKind {
    let names = fields.iter().map(|f| f.pascal()).collect();
    match kind {
        StmtKind::Delete(_) => StmtKind::Delete(names),
        _ => StmtKind::Objects(names)
    }
}

/// Accessor name for a canonical kind.
pub fn const_name(entity: &EntityDef, kind: &StmtKind) -> Ident {
    let slug = match kind {
        StmtKind::Objects(filters) | StmtKind::Delete(filters) => {
            let base = if matches!(kind, StmtKind::Delete(_)) { "delete" } else { "objects" };
            if filters.is_empty() {
                base.to_string()
            } else {
                let filters: Vec<String> = filters
                    .iter()
                    .map(|f| entity.field(f).map_or_else(|| f.to_lowercase(), FieldDef::name_str))
                    .collect();
                format!("{base}_by_{}", filters.join("_and_"))
            }
        }
        StmtKind::Create => "create".to_string(),
        StmtKind::Update => "update".to_string(),
        StmtKind::Id => "id".to_string()
    };
    format_ident!("{}", format!("{}_{slug}", entity.snake()).to_uppercase())
}

/// SQL text builder for one entity and table.
struct Sql<'a> {
    entity:  &'a EntityDef,
    table:   &'a str,
    dialect: Dialect
}

impl Sql<'_> {
    /// Column expression, table-qualified when `qualified`.
    fn expr(&self, field: &FieldDef, qualified: bool) -> String {
        match field.join() {
            Some(join) => format!("{}.{}", join.table, join.column),
            None if qualified => format!("{}.{}", self.table, field.column),
            None => field.column.clone()
        }
    }

    fn exprs(&self, fields: &[&FieldDef], qualified: bool) -> Vec<String> {
        fields.iter().map(|f| self.expr(f, qualified)).collect()
    }

    /// `LEFT JOIN` clauses, each with a leading space.
    fn joins(&self) -> String {
        self.entity
            .joins()
            .iter()
            .map(|join| {
                format!(
                    " LEFT JOIN {jt} ON {t}.{fk}_id = {jt}.id",
                    jt = join.table,
                    t = self.table,
                    fk = crate::utils::naming::singular(&join.table)
                )
            })
            .collect()
    }

    fn select(&self, filters: &[&FieldDef]) -> String {
        let qualified = self.entity.has_joins();
        let fields = self.entity.all_fields();

        let mut columns: Vec<String> = fields
            .iter()
            .filter(|f| f.join().is_none())
            .map(|f| self.expr(f, qualified))
            .collect();
        columns.extend(fields.iter().filter_map(|f| {
            f.join()
                .map(|join| format!("{}.{} AS {}", join.table, join.column, f.column))
        }));

        let mut sql = format!("SELECT {} FROM {}", comma(&columns), self.table);
        if qualified {
            sql.push_str(&self.joins());
        }
        if !filters.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions(&self.exprs(filters, qualified), self.dialect, 1));
        }
        let order = self.exprs(&self.entity.natural_key(), qualified);
        sql.push_str(" ORDER BY ");
        sql.push_str(&comma(&order));
        sql
    }

    fn create(&self) -> Result<String> {
        let fields = self.entity.create_fields();
        if fields.is_empty() {
            return Err(Error::NoInsertableColumns {
                entity: self.entity.name_str()
            });
        }

        let columns: Vec<&str> = fields.iter().map(|f| f.column.as_str()).collect();
        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            comma(&columns),
            self.dialect.placeholders(columns.len())
        );
        if self.dialect.supports_returning()
            && let Some(id) = self.entity.row_id()
        {
            sql.push_str(" RETURNING ");
            sql.push_str(&id.column);
        }
        Ok(sql)
    }

    fn update(&self) -> Result<String> {
        let fields = self.entity.update_fields();
        if fields.is_empty() {
            return Err(Error::NoUpdatableColumns {
                entity: self.entity.name_str()
            });
        }

        let keys = self.entity.primary_key();
        self.reject_joins(&keys, "an UPDATE key")?;

        let columns: Vec<&str> = fields.iter().map(|f| f.column.as_str()).collect();
        Ok(format!(
            "UPDATE {} SET {} WHERE {}",
            self.table,
            set_clause(&columns, self.dialect),
            conditions(&self.exprs(&keys, false), self.dialect, columns.len() + 1)
        ))
    }

    fn delete(&self, filters: &[&FieldDef]) -> Result<String> {
        self.reject_joins(filters, "a DELETE filter")?;
        Ok(format!(
            "DELETE FROM {} WHERE {}",
            self.table,
            conditions(&self.exprs(filters, false), self.dialect, 1)
        ))
    }

    fn id(&self) -> Result<String> {
        let row_id = self.entity.require_row_id()?;
        let natural = self.entity.natural_key();
        let qualified = natural.iter().any(|f| f.join().is_some());

        let mut sql = format!("SELECT {} FROM {}", self.expr(row_id, qualified), self.table);
        if qualified {
            sql.push_str(&self.joins());
        }
        sql.push_str(" WHERE ");
        sql.push_str(&conditions(&self.exprs(&natural, qualified), self.dialect, 1));
        Ok(sql)
    }

    fn reject_joins(&self, fields: &[&FieldDef], context: &str) -> Result<()> {
        match fields.iter().find(|f| f.join().is_some()) {
            Some(field) => Err(Error::UnsupportedFilterField {
                entity:  self.entity.name_str(),
                field:   field.name_str(),
                context: context.to_string()
            }),
            None => Ok(())
        }
    }
}
