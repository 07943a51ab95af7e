// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Output files.
//!
//! A generated file is a header followed by one region per entity:
//!
//! ```text
//! // Code generated by dbmapper. DO NOT EDIT.
//!
//! #![cfg(feature = "db")]
//!
//! use crate::model::*;
//!
//! // dbmapper:begin Widget
//! pub const WIDGET_CREATE: &str = "INSERT INTO widgets (name, tag) VALUES (?, ?)";
//! ...
//! // dbmapper:end Widget
//! ```
//!
//! Regenerating an entity rewrites its region in place with [`splice`] and
//! leaves every other line of the file alone.

use std::collections::BTreeMap;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::Ident;

use crate::{
    Error, Result,
    entity::{
        output::{Generated, MethodFn},
        stmt::Statement
    },
    utils::marker
};

/// File header: generated marker, optional build line, `use` lines.
///
/// `build` is stamped verbatim (e.g., `#![cfg(feature = "db")]`).
pub fn header(build: Option<&str>, imports: &[&str]) -> String {
    let mut out = String::from(marker::GENERATED);
    out.push('\n');
    if let Some(build) = build {
        out.push('\n');
        out.push_str(build);
        out.push('\n');
    }
    if !imports.is_empty() {
        out.push('\n');
        for import in imports {
            out.push_str(&format!("use {import};\n"));
        }
    }
    out
}

/// Wrap `body` in the region markers of `entity`.
pub fn region(entity: &str, body: &str) -> String {
    format!(
        "{}\n{}\n{}\n",
        marker::begin(entity),
        body.trim_end(),
        marker::end(entity)
    )
}

/// Replace the region of `entity` in `existing` with `body`.
///
/// The region is appended when absent.
///
/// # Errors
///
/// [`Error::UnterminatedRegion`] when the begin marker has no end marker.
pub fn splice(existing: &str, entity: &str, body: &str) -> Result<String> {
    let begin = marker::begin(entity);
    let end = marker::end(entity);
    let replacement = region(entity, body);

    let Some(start) = line_offset(existing, &begin, 0) else {
        let mut out = existing.to_string();
        if !out.is_empty() {
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push('\n');
        }
        out.push_str(&replacement);
        return Ok(out);
    };

    let stop = line_offset(existing, &end, start)
        .map(|offset| {
            existing[offset..]
                .find('\n')
                .map_or(existing.len(), |nl| offset + nl + 1)
        })
        .ok_or_else(|| Error::UnterminatedRegion {
            entity: entity.to_string()
        })?;

    Ok(format!("{}{}{}", &existing[..start], replacement, &existing[stop..]))
}

/// Byte offset of the first line at or after `from` equal to `line`.
fn line_offset(text: &str, line: &str, from: usize) -> Option<usize> {
    let mut offset = 0;
    for current in text.split_inclusive('\n') {
        if offset >= from && current.trim_end() == line {
            return Some(offset);
        }
        offset += current.len();
    }
    None
}

/// Format tokens as Rust source.
///
/// # Errors
///
/// [`Error::Source`] when the tokens do not form valid items.
pub fn format(tokens: TokenStream) -> Result<String> {
    let file: syn::File = syn::parse2(tokens)?;
    Ok(prettyplease::unparse(&file))
}

/// Generated output of one entity, accumulated across directives.
#[derive(Debug, Clone)]
pub struct Unit {
    entity:     Ident,
    statements: BTreeMap<String, Statement>,
    items:      Vec<MethodFn>,
    signatures: BTreeMap<String, TokenStream>
}

impl Unit {
    /// Create an empty unit for `entity`.
    pub fn new(entity: Ident) -> Self {
        Self {
            entity,
            statements: BTreeMap::new(),
            items: Vec::new(),
            signatures: BTreeMap::new()
        }
    }

    /// Get the entity name.
    pub fn entity(&self) -> &Ident {
        &self.entity
    }

    /// Add a statement.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateStatement`] when the accessor name is already taken
    /// by different SQL.
    pub fn push_statement(&mut self, statement: Statement) -> Result<()> {
        let name = statement.name.to_string();
        match self.statements.get(&name) {
            Some(existing) if existing.sql != statement.sql => Err(Error::DuplicateStatement {
                name
            }),
            Some(_) => Ok(()),
            None => {
                self.statements.insert(name, statement);
                Ok(())
            }
        }
    }

    /// Add a method with its statements and signatures.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateStatement`] on conflicting statements or functions.
    pub fn push(&mut self, generated: Generated) -> Result<()> {
        for statement in generated.statements {
            self.push_statement(statement)?;
        }

        for item in generated.items {
            let name = item.name().to_string();
            match self.items.iter().find(|i| *i.name() == name) {
                Some(existing) if existing.body.to_string() != item.body.to_string() => {
                    return Err(Error::DuplicateStatement {
                        name
                    });
                }
                Some(_) => {}
                None => self.items.push(item)
            }
        }

        for signature in generated.signatures {
            self.signatures.insert(signature.to_string(), signature);
        }
        Ok(())
    }

    /// Check if nothing was generated.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty() && self.items.is_empty()
    }

    /// Accessors and functions.
    pub fn code(&self) -> TokenStream {
        let accessors = self.statements.values().map(Statement::accessor);
        let items = &self.items;
        quote! {
            #(#accessors)*
            #(#items)*
        }
    }

    /// `<Entity>Generated` trait, when any signature was requested.
    pub fn interface(&self) -> Option<TokenStream> {
        if self.signatures.is_empty() {
            return None;
        }

        let name = format_ident!("{}Generated", self.entity);
        let doc = format!(" Generated transaction methods of `{}`.", self.entity);
        let signatures = self.signatures.values();
        Some(quote! {
            #[doc = #doc]
            #[allow(async_fn_in_trait)]
            pub trait #name {
                #(#signatures)*
            }
        })
    }

    /// Formatted region body for this entity.
    ///
    /// # Errors
    ///
    /// [`Error::Source`] when formatting fails.
    pub fn render(&self) -> Result<String> {
        let code = self.code();
        let interface = self.interface();
        format(quote! {
            #code
            #interface
        })
    }
}
