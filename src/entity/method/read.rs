// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Read methods: `GetMany`, `GetOne`, `ID`, `Exists`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::{
    context::{Context, arg, core},
    reference
};
use crate::{
    Result,
    entity::{
        combination::DecisionTable,
        kind::StmtKind,
        output::{Generated, MethodFn},
        parse::Reference
    }
};

/// `get_<entities>(conn, filter)`.
///
/// The filter dispatch is a `match` over every field's presence with one arm
/// per [`DecisionTable`] variant.
pub fn get_many(ctx: &Context<'_>, references: &[&Reference], out: &mut Generated) -> Result<()> {
    let fields = ctx.entity.filter_fields()?;
    let filter_ty = ctx.entity.filter_ident();
    let filter_idents: Vec<_> = ctx
        .entity
        .filter
        .iter()
        .flat_map(|f| f.fields.iter().map(|f| f.ident.clone()))
        .collect();

    let table = DecisionTable::new(fields);
    let fetch = if table.fields().is_empty() {
        let statement = ctx.stmt(&StmtKind::Objects(Vec::new()))?;
        let name = statement.name.clone();
        out.push_statement(statement)?;
        quote! {
            let _ = filter;
            let rows = sqlx::query(#name).fetch_all(&mut *conn).await?;
        }
    } else {
        let mut arms = Vec::with_capacity(table.variants().len());
        for variant in table.variants() {
            let statement = ctx.stmt(&variant.kind())?;
            let name = statement.name.clone();
            out.push_statement(statement)?;

            let patterns = variant.presence.iter().zip(&filter_idents).map(|(present, ident)| {
                if *present {
                    quote! { Some(#ident) }
                } else {
                    quote! { None }
                }
            });
            let binds = variant
                .presence
                .iter()
                .zip(&filter_idents)
                .filter(|(present, _)| **present)
                .map(|(_, ident)| quote! { .bind(#ident) });

            arms.push(quote! {
                (#(#patterns,)*) => sqlx::query(#name)#(#binds)*.fetch_all(&mut *conn).await?
            });
        }

        quote! {
            let rows = match (#(filter.#filter_idents.as_ref(),)*) {
                #(#arms,)*
            };
        }
    };

    let loads = reference_loads(ctx, references, out)?;
    let attach = if loads.is_empty() {
        TokenStream::new()
    } else {
        quote! {
            for object in &mut objects {
                #(#loads)*
            }
        }
    };
    let from_row = ctx.from_row();
    let entity_name = ctx.entity_name;

    let name = ctx.plural_fn_name("get");
    out.push_item(MethodFn {
        doc:  format!("Returns every `{entity_name}` matching the set fields of `filter`."),
        sig:  ctx.sig(&name, &[quote! { filter: &#filter_ty }], quote! { Vec<#entity_name> }),
        body: quote! {
            #fetch
            let mut objects = Vec::with_capacity(rows.len());
            for row in &rows {
                objects.push(#from_row);
            }
            #attach
            Ok(objects)
        }
    });

    Ok(())
}

/// `get_<entity>(conn, <natural key>)`.
pub fn get_one(ctx: &Context<'_>, references: &[&Reference], out: &mut Generated) -> Result<()> {
    let key = ctx.entity.natural_key();
    let statement = ctx.stmt(&StmtKind::objects_by(
        &key.iter().map(|f| f.pascal()).collect::<Vec<_>>()
    ))?;
    let stmt_name = statement.name.clone();
    out.push_statement(statement)?;

    let loads = reference_loads(ctx, references, out)?;
    let params = ctx.params(&key);
    let binds = ctx.param_binds(&key);
    let from_row = ctx.from_row();
    let entity_name = ctx.entity_name;
    let label = &ctx.label;
    let core = core();

    let fetch = quote! {
        let rows = sqlx::query(#stmt_name)#(#binds)*.fetch_all(&mut *conn).await?;
        let mut objects = Vec::with_capacity(rows.len());
        for row in &rows {
            objects.push(#from_row);
        }
    };
    let body = if loads.is_empty() {
        quote! {
            #fetch
            #core::exactly_one(objects, #label)
        }
    } else {
        quote! {
            #fetch
            let mut object = #core::exactly_one(objects, #label)?;
            #(#loads)*
            Ok(object)
        }
    };

    let name = ctx.fn_name("get", "");
    out.push_item(MethodFn {
        doc: format!("Returns the `{entity_name}` with the given key."),
        sig: ctx.sig(&name, &params, quote! { #entity_name }),
        body
    });

    Ok(())
}

/// `get_<entity>_id(conn, <natural key>)`.
pub fn id(ctx: &Context<'_>, out: &mut Generated) -> Result<()> {
    let row_id = ctx.entity.require_row_id()?;
    let statement = ctx.stmt(&StmtKind::Id)?;
    let stmt_name = statement.name.clone();
    out.push_statement(statement)?;

    let key = ctx.entity.natural_key();
    let params = ctx.params(&key);
    let binds = ctx.param_binds(&key);
    let id_ty = row_id.ty();
    let label = &ctx.label;
    let core = core();
    let entity_name = ctx.entity_name;

    let name = ctx.fn_name("get", "_id");
    out.push_item(MethodFn {
        doc:  format!("Returns the row id of the `{entity_name}` with the given key."),
        sig:  ctx.sig(&name, &params, quote! { #id_ty }),
        body: quote! {
            let id: Option<#id_ty> = sqlx::query_scalar(#stmt_name)#(#binds)*.fetch_optional(&mut *conn).await?;
            #core::found(id, #label)
        }
    });

    Ok(())
}

/// `<entity>_exists(conn, <natural key>)`.
pub fn exists(ctx: &Context<'_>, out: &mut Generated) -> Result<()> {
    let row_id = ctx.entity.require_row_id()?;
    let statement = ctx.stmt(&StmtKind::Id)?;
    let stmt_name = statement.name.clone();
    out.push_statement(statement)?;

    let key = ctx.entity.natural_key();
    let params = ctx.params(&key);
    let binds = ctx.param_binds(&key);
    let id_ty = row_id.ty();
    let entity_name = ctx.entity_name;

    let name = format_ident!("{}_exists", ctx.label);
    out.push_item(MethodFn {
        doc:  format!("Checks if a `{entity_name}` with the given key exists."),
        sig:  ctx.sig(&name, &params, quote! { bool }),
        body: quote! {
            let id: Option<#id_ty> = sqlx::query_scalar(#stmt_name)#(#binds)*.fetch_optional(&mut *conn).await?;
            Ok(id.is_some())
        }
    });

    Ok(())
}

/// Statements loading each requested reference into `object`.
fn reference_loads(
    ctx: &Context<'_>,
    references: &[&Reference],
    out: &mut Generated
) -> Result<Vec<TokenStream>> {
    if references.is_empty() {
        return Ok(Vec::new());
    }

    let row_id = ctx.entity.require_row_id()?;
    let id = row_id.name();
    let mut loads = Vec::with_capacity(references.len());
    for reference in references {
        let helper = reference::get(ctx, reference, out)?;
        let slot = &reference.slot;
        let link = arg(row_id, quote! { object.#id });
        loads.push(quote! {
            object.#slot = #helper(&mut *conn, #link).await?;
        });
    }

    Ok(loads)
}
