// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Generation context for transaction methods.
//!
//! Contains the [`Context`] struct that precomputes the identifiers and token
//! fragments shared by every method generator.
//!
//! | Field | Description |
//! |-------|-------------|
//! | `entity` | Parsed entity definition |
//! | `dialect` | Database dialect |
//! | `table` | Effective table (config override or default) |
//! | `entity_name` | Entity struct name (e.g., `NetworkForward`) |
//! | `label` | Snake-case name used in runtime errors |
//! | `conn` | Connection type taken by every method |

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Ident, Signature, parse_quote};

use crate::{
    Result,
    entity::{
        kind::StmtKind,
        parse::{Dialect, EntityDef, FieldDef},
        stmt::{self, Statement}
    }
};

/// Path of the runtime crate in generated code.
pub fn core() -> TokenStream {
    quote! { dbmapper_core }
}

/// Context for method generation.
pub struct Context<'a> {
    /// Parsed entity definition.
    pub entity: &'a EntityDef,

    pub dialect: Dialect,

    /// Table statements run against.
    pub table: String,

    /// Entity struct name.
    pub entity_name: &'a Ident,

    /// Snake-case entity name, carried by runtime errors.
    pub label: String,

    /// Connection type.
    pub conn: TokenStream
}

impl<'a> Context<'a> {
    /// Create a context for `entity` stored in `table`.
    pub fn new(entity: &'a EntityDef, dialect: Dialect, table: String) -> Self {
        Self {
            entity,
            dialect,
            table,
            entity_name: entity.name(),
            label: entity.snake(),
            conn: dialect.connection_type()
        }
    }

    /// Generate a statement of this entity.
    pub fn stmt(&self, kind: &StmtKind) -> Result<Statement> {
        stmt::build(self.entity, kind, &self.table, self.dialect)
    }

    /// Function name `<prefix>_<snake><suffix>`.
    pub fn fn_name(&self, prefix: &str, suffix: &str) -> Ident {
        format_ident!("{}_{}{}", prefix, self.label, suffix)
    }

    /// Function name `<prefix>_<plural>`.
    pub fn plural_fn_name(&self, prefix: &str) -> Ident {
        format_ident!("{}_{}", prefix, self.entity.plural())
    }

    /// `async fn name(conn: &mut Conn, params..) -> Result<ret, Error>`.
    pub fn sig(&self, name: &Ident, params: &[TokenStream], ret: TokenStream) -> Signature {
        let conn = &self.conn;
        let core = core();
        parse_quote! {
            async fn #name(conn: &mut #conn #(, #params)*) -> Result<#ret, #core::Error>
        }
    }

    /// `name: Type` parameters for key fields.
    pub fn params(&self, fields: &[&FieldDef]) -> Vec<TokenStream> {
        fields
            .iter()
            .map(|f| {
                let name = f.name();
                let ty = f.param_type();
                quote! { #name: #ty }
            })
            .collect()
    }

    /// `.bind(name)` for key parameters.
    pub fn param_binds(&self, fields: &[&FieldDef]) -> Vec<TokenStream> {
        fields
            .iter()
            .map(|f| {
                let name = f.name();
                quote! { .bind(#name) }
            })
            .collect()
    }

    /// `.bind(..)` of a field read from `owner`, marshaling JSON columns.
    pub fn field_bind(&self, owner: &TokenStream, field: &FieldDef) -> TokenStream {
        let name = field.name();
        if field.is_marshal() {
            let core = core();
            let label = &self.label;
            let field_name = field.name_str();
            quote! { .bind(#core::marshal(&#owner.#name, #label, #field_name)?) }
        } else {
            quote! { .bind(&#owner.#name) }
        }
    }

    /// Expression decoding `field` from `row`.
    pub fn decode(&self, field: &FieldDef) -> TokenStream {
        decode(&self.label, field)
    }

    /// Struct literal building the entity from `row`.
    ///
    /// Reference slots start empty.
    pub fn from_row(&self) -> TokenStream {
        let name = self.entity_name;
        let assigns = self.entity.struct_fields().map(|f| {
            let ident = f.name();
            let value = self.decode(f);
            quote! { #ident: #value }
        });
        let slots = self.entity.references.iter().map(|r| {
            let slot = &r.slot;
            quote! { #slot: Default::default() }
        });

        quote! {
            #name {
                #(#assigns,)*
                #(#slots,)*
            }
        }
    }

    /// `Error::from_write` mapping for INSERT/UPDATE results.
    pub fn write_error(&self) -> TokenStream {
        write_error(&self.label)
    }
}

/// Decode `field` from a row named `row`, reporting errors as `label`.
pub fn decode(label: &str, field: &FieldDef) -> TokenStream {
    let column = &field.column;
    if !field.is_marshal() {
        return quote! { sqlx::Row::try_get(row, #column)? };
    }

    let core = core();
    let field_name = field.name_str();
    if field.kind.is_optional() {
        quote! {
            {
                let raw: Option<String> = sqlx::Row::try_get(row, #column)?;
                raw.map(|raw| #core::unmarshal(&raw, #label, #field_name)).transpose()?
            }
        }
    } else {
        quote! {
            {
                let raw: String = sqlx::Row::try_get(row, #column)?;
                #core::unmarshal(&raw, #label, #field_name)?
            }
        }
    }
}

/// `.map_err(..)` turning unique violations into conflicts.
pub fn write_error(label: &str) -> TokenStream {
    let core = core();
    quote! { .map_err(|err| #core::Error::from_write(err, #label)) }
}

/// Argument passing `value` of `field`'s type to a parameter of that type.
pub fn arg(field: &FieldDef, value: TokenStream) -> TokenStream {
    if field.kind.is_copy() {
        value
    } else {
        quote! { &#value }
    }
}
