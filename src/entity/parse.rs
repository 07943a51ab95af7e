// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Metadata parsing.
//!
//! Turns a [`StructDesc`](crate::StructDesc) into the [`EntityDef`]
//! consumed by every generator.
//!
//! # Data Structures
//!
//! ```text
//! EntityDef
//! ├── ident: Ident              (struct name, e.g., "NetworkForward")
//! ├── table: String             (default table, e.g., "network_forwards")
//! ├── fields: Vec<FieldDef>     (columns, declaration order)
//! │   └── FieldDef
//! │       ├── ident / ty / kind
//! │       ├── column: String
//! │       └── tag: Tag          (primary, nullable, join, marshal, omit)
//! ├── filter: Option<FilterDesc>
//! └── references: Vec<Reference>
//!     └── entity: EntityDef     (child table, built recursively)
//! ```

mod dialect;
mod entity;
mod field;
mod filter;
mod reference;
mod tag;

pub use dialect::Dialect;
pub use entity::EntityDef;
pub use field::{FieldDef, FieldType, ROW_ID, type_args, type_name};
pub use filter::{FilterDesc, FilterField};
pub use reference::{Reference, Shape};
pub use tag::{Join, Marshal, Omit, Tag};
