// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity model and code generation.
//!
//! # Architecture
//!
//! ```text
//! entity.rs (orchestrator)
//! │
//! ├── parse/           → Tags, fields, filters, references (EntityDef)
//! ├── kind.rs          → Statement and method kinds
//! ├── combination.rs   → Filter subsets and the GetMany decision table
//! ├── stmt.rs          → SQL statements and their accessor constants
//! ├── method/          → Transaction methods and reference helpers
//! ├── iface.rs         → Body-less signatures
//! └── output.rs        → Generated statements and functions
//! ```

pub mod combination;
pub mod iface;
pub mod kind;
pub mod method;
pub mod output;
pub mod parse;
pub mod stmt;

#[cfg(test)]
pub(crate) mod fixtures;
