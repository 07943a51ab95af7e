// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Runtime support for code generated by `dbmapper`.
//!
//! Generated transaction methods are plain `async fn`s over an `sqlx`
//! connection. They share a single error type and a handful of row-count
//! contracts, which live here so the generated text stays small.
//!
//! # Overview
//!
//! - [`Error`]: Runtime error returned by every generated method
//! - [`exactly_one`] / [`affected_one`] / [`found`]: Row-count contracts
//! - [`marshal`] / [`unmarshal`]: JSON encoding for `marshal=json` columns
//! - [`prelude`]: Convenient re-exports
//!
//! # Example
//!
//! ```rust,ignore
//! use dbmapper_core::prelude::*;
//!
//! async fn load(conn: &mut sqlx::SqliteConnection) -> Result<(), Error> {
//!     let forward = get_network_forward(conn, 1, "10.0.0.1").await?;
//!     if !network_forward_exists(conn, 1, "10.0.0.2").await? {
//!         // ...
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod marshal;
pub mod prelude;
mod rows;

pub use error::Error;
pub use marshal::{marshal, unmarshal};
pub use rows::{affected_one, exactly_one, found};
