// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Reference helpers.
//!
//! For a reference `Config` on `NetworkForward` the parent methods call:
//!
//! | Helper | Statements of the child entity |
//! |--------|--------------------------------|
//! | `get_network_forward_config` | `objects-by-NetworkForwardId` |
//! | `create_network_forward_config` | `create` |
//! | `update_network_forward_config` | `delete-by-NetworkForwardId`, `create` |
//!
//! Helpers begin their own transaction, which is a savepoint when called
//! from a parent transaction.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Ident, ext::IdentExt};

use super::context::{Context, decode, write_error};
use crate::{
    Error, Result,
    entity::{
        kind::StmtKind,
        output::{Generated, MethodFn},
        parse::{EntityDef, FieldDef, Reference, type_args}
    }
};

/// Child entity and link column of a resolved reference.
struct Child<'a> {
    entity: &'a EntityDef,
    link:   &'a FieldDef,
    table:  String
}

impl<'a> Child<'a> {
    fn new(ctx: &Context<'_>, reference: &'a Reference) -> Result<Self> {
        let unknown = || Error::UnknownReference {
            entity:    ctx.entity.name_str(),
            reference: reference.name.clone()
        };
        let entity = reference.entity().ok_or_else(unknown)?;
        let link = reference.link().ok_or_else(unknown)?;

        Ok(Self {
            entity,
            link,
            table: reference.table(&ctx.table)
        })
    }

    fn context(&self, ctx: &Context<'_>) -> Context<'a> {
        Context::new(self.entity, ctx.dialect, self.table.clone())
    }

    fn by_link(&self) -> Vec<String> {
        vec![self.link.pascal()]
    }

    fn column(&self, name: &str, ctx: &Context<'_>, reference: &Reference) -> Result<&'a FieldDef> {
        self.entity.field(name).ok_or_else(|| Error::UnknownReference {
            entity:    ctx.entity.name_str(),
            reference: reference.name.clone()
        })
    }
}

fn helper_name(ctx: &Context<'_>, prefix: &str, reference: &Reference) -> Ident {
    format_ident!("{}_{}_{}", prefix, ctx.label, reference.slot.unraw())
}

/// Generate `get_<entity>_<slot>` and return its name.
pub fn get(ctx: &Context<'_>, reference: &Reference, out: &mut Generated) -> Result<Ident> {
    let child = Child::new(ctx, reference)?;
    let child_ctx = child.context(ctx);
    let statement = child_ctx.stmt(&StmtKind::Objects(child.by_link()))?;
    let stmt_name = statement.name.clone();
    out.push_statement(statement)?;

    let link = child.link.name();
    let link_ty = child.link.param_type();
    let slot = &reference.slot;
    let slot_ty = &reference.slot_ty;

    let fill = if reference.is_map() {
        let key = decode(&child_ctx.label, child.column("key", ctx, reference)?);
        let value = decode(&child_ctx.label, child.column("value", ctx, reference)?);
        quote! {
            let key = #key;
            let value = #value;
            #slot.insert(key, value);
        }
    } else {
        let item = item_path(reference);
        let assigns = child.entity.struct_fields().map(|f| {
            let ident = f.name();
            let value = decode(&child_ctx.label, f);
            quote! { #ident: #value }
        });
        quote! {
            #slot.push(#item {
                #(#assigns,)*
            });
        }
    };

    let name = helper_name(ctx, "get", reference);
    out.push_item(MethodFn {
        doc:  format!(
            "Returns the `{}` reference of a `{}`.",
            reference.name, ctx.entity_name
        ),
        sig:  ctx.sig(&name, &[quote! { #link: #link_ty }], quote! { #slot_ty }),
        body: quote! {
            let rows = sqlx::query(#stmt_name).bind(#link).fetch_all(&mut *conn).await?;
            let mut #slot = <#slot_ty>::default();
            for row in &rows {
                #fill
            }
            Ok(#slot)
        }
    });

    Ok(name)
}

/// Generate `create_<entity>_<slot>` and return its name.
pub fn create(ctx: &Context<'_>, reference: &Reference, out: &mut Generated) -> Result<Ident> {
    let child = Child::new(ctx, reference)?;
    let insert = insert_loop(ctx, &child, reference, out)?;
    let (params, _) = helper_params(&child, reference);

    let name = helper_name(ctx, "create", reference);
    out.push_item(MethodFn {
        doc:  format!(
            "Inserts the `{}` reference rows of a `{}`.",
            reference.name, ctx.entity_name
        ),
        sig:  ctx.sig(&name, &params, quote! { () }),
        body: quote! {
            let mut tx = sqlx::Connection::begin(&mut *conn).await?;
            #insert
            tx.commit().await?;
            Ok(())
        }
    });

    Ok(name)
}

/// Generate `update_<entity>_<slot>` and return its name.
///
/// Existing rows are deleted and the given collection inserted in their
/// place.
pub fn update(ctx: &Context<'_>, reference: &Reference, out: &mut Generated) -> Result<Ident> {
    let child = Child::new(ctx, reference)?;
    let child_ctx = child.context(ctx);
    let delete = child_ctx.stmt(&StmtKind::Delete(child.by_link()))?;
    let delete_name = delete.name.clone();
    out.push_statement(delete)?;

    let insert = insert_loop(ctx, &child, reference, out)?;
    let (params, link) = helper_params(&child, reference);

    let name = helper_name(ctx, "update", reference);
    out.push_item(MethodFn {
        doc:  format!(
            "Replaces the `{}` reference rows of a `{}`.",
            reference.name, ctx.entity_name
        ),
        sig:  ctx.sig(&name, &params, quote! { () }),
        body: quote! {
            let mut tx = sqlx::Connection::begin(&mut *conn).await?;
            sqlx::query(#delete_name).bind(#link).execute(&mut *tx).await?;
            #insert
            tx.commit().await?;
            Ok(())
        }
    });

    Ok(name)
}

/// `(link: T, slot: &Collection)` parameters and the link identifier.
fn helper_params(child: &Child<'_>, reference: &Reference) -> (Vec<TokenStream>, Ident) {
    let link = child.link.name().clone();
    let link_ty = child.link.param_type();
    let slot = &reference.slot;
    let slot_ty = &reference.slot_ty;
    (vec![quote! { #link: #link_ty }, quote! { #slot: &#slot_ty }], link)
}

/// Loop inserting every element of the slot collection.
fn insert_loop(
    ctx: &Context<'_>,
    child: &Child<'_>,
    reference: &Reference,
    out: &mut Generated
) -> Result<TokenStream> {
    let child_ctx = child.context(ctx);
    let statement = child_ctx.stmt(&StmtKind::Create)?;
    let stmt_name = statement.name.clone();
    out.push_statement(statement)?;

    let slot = &reference.slot;
    let map_err = write_error(&child_ctx.label);
    let item = quote! { item };
    let binds: Vec<TokenStream> = child
        .entity
        .create_fields()
        .into_iter()
        .map(|f| {
            let ident = f.name();
            if f.link || reference.is_map() {
                quote! { .bind(#ident) }
            } else {
                child_ctx.field_bind(&item, f)
            }
        })
        .collect();

    let pattern = if reference.is_map() {
        quote! { (key, value) }
    } else {
        item
    };

    Ok(quote! {
        for #pattern in #slot {
            sqlx::query(#stmt_name)#(#binds)*.execute(&mut *tx).await #map_err?;
        }
    })
}

/// Path of the list item struct, taken from the slot type.
fn item_path(reference: &Reference) -> TokenStream {
    match type_args(&reference.slot_ty).first() {
        Some(ty) => quote! { #ty },
        None => TokenStream::new()
    }
}
