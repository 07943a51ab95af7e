// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Write methods: `Create`, `Update`, `DeleteOne`, `DeleteMany`.
//!
//! `Create`, `Update` and `DeleteOne` run in one transaction. The
//! transaction is dropped on the first `?`, which rolls back every row
//! written so far, including a write that matched more than one row.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::Ident;

use super::{
    context::{Context, arg, core},
    reference
};
use crate::{
    Error, Result,
    entity::{
        kind::StmtKind,
        output::{Generated, MethodFn},
        parse::{Dialect, Reference, type_name}
    }
};

/// `create_<entity>(conn, object)`.
pub fn create(ctx: &Context<'_>, references: &[&Reference], out: &mut Generated) -> Result<()> {
    let statement = ctx.stmt(&StmtKind::Create)?;
    let stmt_name = statement.name.clone();
    out.push_statement(statement)?;

    let object = quote! { object };
    let binds: Vec<TokenStream> = ctx
        .entity
        .create_fields()
        .into_iter()
        .map(|f| ctx.field_bind(&object, f))
        .collect();
    let map_err = ctx.write_error();
    let entity_name = ctx.entity_name;
    let name = ctx.fn_name("create", "");
    let params = [quote! { object: &#entity_name }];

    let Some(row_id) = ctx.entity.row_id() else {
        if let Some(reference) = references.first() {
            return Err(Error::UnknownReference {
                entity:    ctx.entity.name_str(),
                reference: reference.name.clone()
            });
        }
        out.push_item(MethodFn {
            doc:  format!("Inserts a new `{entity_name}`."),
            sig:  ctx.sig(&name, &params, quote! { () }),
            body: quote! {
                sqlx::query(#stmt_name)#(#binds)*.execute(&mut *conn).await #map_err?;
                Ok(())
            }
        });
        return Ok(());
    };

    let id_ty = row_id.ty();
    let check = conflict_check(ctx, out)?;
    let insert = match ctx.dialect {
        Dialect::Sqlite => {
            if type_name(id_ty).as_deref() != Some("i64") {
                return Err(Error::invalid_field(
                    ctx.entity_name,
                    row_id.name(),
                    "row id must be i64 on sqlite"
                ));
            }
            quote! {
                let result = sqlx::query(#stmt_name)#(#binds)*.execute(&mut *tx).await #map_err?;
                let id = result.last_insert_rowid();
            }
        }
        Dialect::Postgres => quote! {
            let id: #id_ty = sqlx::query_scalar(#stmt_name)#(#binds)*.fetch_one(&mut *tx).await #map_err?;
        }
    };

    let mut writes = Vec::with_capacity(references.len());
    for reference in references {
        let helper = reference::create(ctx, reference, out)?;
        let slot = &reference.slot;
        let id = arg(row_id, quote! { id });
        writes.push(quote! {
            #helper(&mut *tx, #id, &object.#slot).await?;
        });
    }

    out.push_item(MethodFn {
        doc:  format!("Inserts a new `{entity_name}` and returns its row id."),
        sig:  ctx.sig(&name, &params, quote! { #id_ty }),
        body: quote! {
            let mut tx = sqlx::Connection::begin(&mut *conn).await?;
            #check
            #insert
            #(#writes)*
            tx.commit().await?;
            Ok(id)
        }
    });

    Ok(())
}

/// Natural-key lookup failing with `Conflict` before an insert.
///
/// Skipped when the key contains the row id or a joined column, neither of
/// which is known before the row exists.
fn conflict_check(ctx: &Context<'_>, out: &mut Generated) -> Result<TokenStream> {
    let natural = ctx.entity.natural_key();
    if ctx.entity.natural_key_has_row_id() || natural.iter().any(|f| f.join().is_some()) {
        return Ok(TokenStream::new());
    }

    let row_id = ctx.entity.require_row_id()?;
    let statement = ctx.stmt(&StmtKind::Id)?;
    let stmt_name = statement.name.clone();
    out.push_statement(statement)?;

    let object = quote! { object };
    let binds = natural.iter().map(|f| ctx.field_bind(&object, f));
    let id_ty = row_id.ty();
    let label = &ctx.label;
    let core = core();

    Ok(quote! {
        let existing: Option<#id_ty> = sqlx::query_scalar(#stmt_name)#(#binds)*.fetch_optional(&mut *tx).await?;
        if existing.is_some() {
            return Err(#core::Error::Conflict { entity: #label });
        }
    })
}

/// `update_<entity>(conn, <primary key>, object)`.
pub fn update(ctx: &Context<'_>, references: &[&Reference], out: &mut Generated) -> Result<()> {
    let statement = ctx.stmt(&StmtKind::Update)?;
    let stmt_name = statement.name.clone();
    out.push_statement(statement)?;

    let key = ctx.entity.primary_key();
    let object = quote! { object };
    let sets = ctx
        .entity
        .update_fields()
        .into_iter()
        .map(|f| ctx.field_bind(&object, f));
    let keys = ctx.param_binds(&key);
    let map_err = ctx.write_error();
    let label = &ctx.label;
    let core = core();
    let entity_name = ctx.entity_name;

    let mut params = ctx.params(&key);
    params.push(quote! { object: &#entity_name });
    let name = ctx.fn_name("update", "");
    let doc = format!("Updates the `{entity_name}` with the given primary key.");

    if references.is_empty() {
        out.push_item(MethodFn {
            doc,
            sig: ctx.sig(&name, &params, quote! { () }),
            body: quote! {
                let mut tx = sqlx::Connection::begin(&mut *conn).await?;
                let result = sqlx::query(#stmt_name)#(#sets)*#(#keys)*.execute(&mut *tx).await #map_err?;
                #core::affected_one(result.rows_affected(), #label)?;
                tx.commit().await?;
                Ok(())
            }
        });
        return Ok(());
    }

    let (resolve, id) = row_id_for_update(ctx, out)?;
    let row_id = ctx.entity.require_row_id()?;
    let mut writes = Vec::with_capacity(references.len());
    for reference in references {
        let helper = reference::update(ctx, reference, out)?;
        let slot = &reference.slot;
        let id = arg(row_id, quote! { #id });
        writes.push(quote! {
            #helper(&mut *tx, #id, &object.#slot).await?;
        });
    }

    out.push_item(MethodFn {
        doc,
        sig: ctx.sig(&name, &params, quote! { () }),
        body: quote! {
            let mut tx = sqlx::Connection::begin(&mut *conn).await?;
            let result = sqlx::query(#stmt_name)#(#sets)*#(#keys)*.execute(&mut *tx).await #map_err?;
            #core::affected_one(result.rows_affected(), #label)?;
            #resolve
            #(#writes)*
            tx.commit().await?;
            Ok(())
        }
    });

    Ok(())
}

/// Lookup of the updated row's id and the variable holding it.
///
/// A primary row id is already a parameter. Otherwise the row id is looked
/// up by natural key, reading primary fields from the parameters and the
/// rest from `object`.
fn row_id_for_update(ctx: &Context<'_>, out: &mut Generated) -> Result<(TokenStream, Ident)> {
    let row_id = ctx.entity.require_row_id()?;
    if row_id.is_primary() {
        return Ok((TokenStream::new(), row_id.name().clone()));
    }

    let natural = ctx.entity.natural_key();
    if let Some(field) = natural.iter().find(|f| f.join().is_some()) {
        return Err(Error::UnsupportedFilterField {
            entity:  ctx.entity.name_str(),
            field:   field.name_str(),
            context: "a reference update key".to_string()
        });
    }

    let statement = ctx.stmt(&StmtKind::Id)?;
    let stmt_name = statement.name.clone();
    out.push_statement(statement)?;

    let object = quote! { object };
    let binds = natural.iter().map(|f| {
        if f.is_primary() {
            let ident = f.name();
            quote! { .bind(#ident) }
        } else {
            ctx.field_bind(&object, f)
        }
    });
    let id_ty = row_id.ty();
    let label = &ctx.label;
    let core = core();

    let lookup = quote! {
        let id: Option<#id_ty> = sqlx::query_scalar(#stmt_name)#(#binds)*.fetch_optional(&mut *tx).await?;
        let id = #core::found(id, #label)?;
    };
    Ok((lookup, format_ident!("id")))
}

/// `delete_<entity>(conn, <filter params>)`.
pub fn delete_one(ctx: &Context<'_>, filters: &[String], out: &mut Generated) -> Result<()> {
    let (stmt_name, params, binds) = delete_statement(ctx, filters, out)?;
    let label = &ctx.label;
    let core = core();
    let entity_name = ctx.entity_name;

    let name = ctx.fn_name("delete", "");
    out.push_item(MethodFn {
        doc:  format!("Deletes the single `{entity_name}` matching the given fields."),
        sig:  ctx.sig(&name, &params, quote! { () }),
        body: quote! {
            let mut tx = sqlx::Connection::begin(&mut *conn).await?;
            let result = sqlx::query(#stmt_name)#(#binds)*.execute(&mut *tx).await?;
            #core::affected_one(result.rows_affected(), #label)?;
            tx.commit().await?;
            Ok(())
        }
    });

    Ok(())
}

/// `delete_<entities>(conn, <filter params>)`.
pub fn delete_many(ctx: &Context<'_>, filters: &[String], out: &mut Generated) -> Result<()> {
    let (stmt_name, params, binds) = delete_statement(ctx, filters, out)?;
    let entity_name = ctx.entity_name;

    let name = ctx.plural_fn_name("delete");
    out.push_item(MethodFn {
        doc:  format!("Deletes every `{entity_name}` matching the given fields and returns the count."),
        sig:  ctx.sig(&name, &params, quote! { u64 }),
        body: quote! {
            let result = sqlx::query(#stmt_name)#(#binds)*.execute(&mut *conn).await?;
            Ok(result.rows_affected())
        }
    });

    Ok(())
}

type DeleteParts = (Ident, Vec<TokenStream>, Vec<TokenStream>);

fn delete_statement(ctx: &Context<'_>, filters: &[String], out: &mut Generated) -> Result<DeleteParts> {
    let statement = ctx.stmt(&StmtKind::Delete(filters.to_vec()))?;
    let stmt_name = statement.name.clone();
    out.push_statement(statement)?;

    let fields = ctx.entity.resolve_fields(filters)?;
    Ok((stmt_name, ctx.params(&fields), ctx.param_binds(&fields)))
}
