// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

//! # dbmapper
//!
//! Generates SQL statements and `sqlx` transaction methods from tagged Rust
//! structs.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dbmapper::{Catalog, Config, Mapper};
//!
//! let catalog = Catalog::from_file("src/model.rs")?;
//! let mapper = Mapper::new(catalog);
//!
//! let create = mapper.stmt("Widget", "create", &Config::new())?;
//! assert_eq!(create.sql, "INSERT INTO widgets (name, tag) VALUES (?, ?)");
//!
//! let config = Config::parse(["references=Config"])?;
//! let method = mapper.method("NetworkForward", "Create", &config, false)?;
//! ```
//!
//! # Tags
//!
//! Fields carry `#[db = "key=value&key=value"]`:
//!
//! | Key | Value | Effect |
//! |-----|-------|--------|
//! | `primary` | `yes` | Part of the primary key |
//! | `column` | name | Column name (default: field name) |
//! | `nullable` | `true` | Column may hold NULL |
//! | `leftjoin` | `table.column` | Read through a LEFT JOIN, never written |
//! | `marshal` | `json` | Stored as JSON text |
//! | `omit` | `create,update` | Excluded from INSERT and/or UPDATE |
//!
//! A `BTreeMap`/`HashMap` field, or a `Vec` of a described struct, is a
//! reference slot: its rows live in the child table `<table>_<slot>`.
//!
//! # Kinds
//!
//! | Statements | Methods |
//! |------------|---------|
//! | `objects[-by-A-and-B]` | `GetMany`, `GetOne` |
//! | `create` | `ID`, `Exists` |
//! | `update` | `Create`, `Update` |
//! | `delete-by-A-and-B` | `DeleteOne-by-A-and-B` |
//! | `id` | `DeleteMany-by-A-and-B` |
//!
//! Generated methods return `dbmapper_core::Error`.
//!
//! `GetOne` (`get_<entity>`) takes the natural key: the `primary=yes` fields
//! plus filter fields tagged `primary=yes`. A lookup by any other field goes
//! through `GetMany` (`get_<entities>`) with that filter field set.
//!
//! `Create`, `Update` and `DeleteOne` run in one transaction and roll back
//! when the write fails or touches more than one row.

mod config;
pub mod entity;
mod error;
mod source;
pub mod utils;
pub mod writer;

pub use config::Config;
pub use entity::{
    kind::{MethodKind, StmtKind},
    output::{Generated, MethodFn},
    parse::{Dialect, EntityDef},
    stmt::Statement
};
pub use error::{Error, Result};
pub use source::{Catalog, MetadataProvider, RawField, StructDesc};
pub use writer::Unit;

/// Generator options shared by every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// SQL dialect of statements and connection type of methods.
    pub dialect: Dialect
}

/// Entry point resolving entities through a [`MetadataProvider`].
#[derive(Debug, Clone)]
pub struct Mapper<P> {
    provider: P,
    options:  Options
}

impl<P: MetadataProvider> Mapper<P> {
    /// Create a mapper with default options.
    pub fn new(provider: P) -> Self {
        Self::with_options(provider, Options::default())
    }

    /// Create a mapper with explicit options.
    pub fn with_options(provider: P, options: Options) -> Self {
        Self {
            provider,
            options
        }
    }

    /// Get the options.
    pub fn options(&self) -> Options {
        self.options
    }

    /// Build the entity `name` with its filter and references.
    ///
    /// The filter is the struct `<Name>Filter`, when described.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownEntity`] when the provider does not know `name`, and
    /// any tag or validation error of the entity, its filter and references.
    pub fn entity(&self, name: &str) -> Result<EntityDef> {
        let desc = self.provider.describe(name).ok_or_else(|| Error::UnknownEntity {
            entity: name.to_string()
        })?;
        let filter = self.provider.describe(&format!("{}Filter", desc.name()));

        let mut entity = EntityDef::build(&desc, filter.as_ref())?;
        entity.resolve_references(&self.provider)?;
        Ok(entity)
    }

    /// Generate the statement `kind` of `entity`.
    ///
    /// # Errors
    ///
    /// Entity errors, [`Error::UnknownKind`] and statement errors.
    pub fn stmt(&self, entity: &str, kind: &str, config: &Config) -> Result<Statement> {
        let kind: StmtKind = kind.parse()?;
        let entity = self.entity(entity)?;
        entity::stmt::generate(&entity, &kind, config, self.options.dialect)
    }

    /// Generate the method `kind` of `entity`.
    ///
    /// # Errors
    ///
    /// Entity errors, [`Error::UnknownKind`] and method errors.
    pub fn method(&self, entity: &str, kind: &str, config: &Config, iface: bool) -> Result<Generated> {
        let kind: MethodKind = kind.parse()?;
        let entity = self.entity(entity)?;
        entity::method::generate(&entity, &kind, config, self.options.dialect, iface)
    }
}
