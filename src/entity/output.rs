// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Generation results.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Ident, Signature};

use super::stmt::Statement;
use crate::{Error, Result};

/// Generated `async fn`.
#[derive(Debug, Clone)]
pub struct MethodFn {
    /// Doc comment text, one line.
    pub doc: String,

    pub sig: Signature,

    pub body: TokenStream
}

impl MethodFn {
    /// Get the function name.
    pub fn name(&self) -> &Ident {
        &self.sig.ident
    }
}

impl ToTokens for MethodFn {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let doc = format!(" {}", self.doc);
        let sig = &self.sig;
        let body = &self.body;
        tokens.extend(quote! {
            #[doc = #doc]
            pub #sig {
                #body
            }
        });
    }
}

/// Output of one generation call.
#[derive(Debug, Clone)]
pub struct Generated {
    /// Entity the output belongs to.
    pub entity: Ident,

    /// Statements, including those the methods depend on.
    pub statements: Vec<Statement>,

    /// Functions, reference helpers first, then the main method.
    pub items: Vec<MethodFn>,

    /// Interface declarations, when requested.
    pub signatures: Vec<TokenStream>
}

impl Generated {
    pub(crate) fn new(entity: Ident) -> Self {
        Self {
            entity,
            statements: Vec::new(),
            items: Vec::new(),
            signatures: Vec::new()
        }
    }

    /// Add a statement unless one with the same name is present.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateStatement`] when the name is taken by different SQL.
    pub(crate) fn push_statement(&mut self, statement: Statement) -> Result<()> {
        match self.statements.iter().find(|s| s.name == statement.name) {
            Some(existing) if existing.sql != statement.sql => Err(Error::DuplicateStatement {
                name: statement.name.to_string()
            }),
            Some(_) => Ok(()),
            None => {
                self.statements.push(statement);
                Ok(())
            }
        }
    }

    pub(crate) fn push_item(&mut self, item: MethodFn) {
        if !self.items.iter().any(|i| i.name() == item.name()) {
            self.items.push(item);
        }
    }

    /// Statement accessors followed by functions.
    pub fn tokens(&self) -> TokenStream {
        let accessors = self.statements.iter().map(Statement::accessor);
        let items = &self.items;
        quote! {
            #(#accessors)*
            #(#items)*
        }
    }
}
