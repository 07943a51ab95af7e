// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Interface projection.
//!
//! Every generated method has a body-less twin for traits that abstract a
//! transaction boundary:
//!
//! ```rust,ignore
//! /// Returns the `Widget` with the given key.
//! async fn get_widget(conn: &mut sqlx::SqliteConnection, id: i64) -> Result<Widget, dbmapper_core::Error>;
//! ```

use proc_macro2::TokenStream;
use quote::quote;

use super::output::MethodFn;

/// Doc attribute and signature of `method`, terminated by `;`.
pub fn project(method: &MethodFn) -> TokenStream {
    let doc = format!(" {}", method.doc);
    let sig = &method.sig;
    quote! {
        #[doc = #doc]
        #sig;
    }
}
