// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Database dialect configuration.
//!
//! This module defines [`Dialect`], which controls database-specific SQL
//! syntax (placeholders, id retrieval) and the `sqlx` types named in
//! generated code.
//!
//! | Dialect | Placeholders | Connection | New row id |
//! |---------|--------------|------------|------------|
//! | SQLite | `?, ?, ?` | `sqlx::SqliteConnection` | `last_insert_rowid()` |
//! | PostgreSQL | `$1, $2, $3` | `sqlx::PgConnection` | `RETURNING id` |

use std::{fmt, str::FromStr};

use proc_macro2::TokenStream;
use quote::quote;

use crate::Error;

/// Database dialect for code generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// SQLite, the default backend.
    #[default]
    Sqlite,

    /// PostgreSQL.
    Postgres
}

impl Dialect {
    /// Placeholder for the parameter at `index` (1-based).
    #[must_use]
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Self::Sqlite => "?".to_string(),
            Self::Postgres => format!("${index}")
        }
    }

    /// Comma-separated placeholders for `count` parameters.
    #[must_use]
    pub fn placeholders(&self, count: usize) -> String {
        (1..=count)
            .map(|i| self.placeholder(i))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Connection type taken by generated methods.
    #[must_use]
    pub fn connection_type(&self) -> TokenStream {
        match self {
            Self::Sqlite => quote! { sqlx::SqliteConnection },
            Self::Postgres => quote! { sqlx::PgConnection }
        }
    }

    /// Check if the new row id is read back with `RETURNING`.
    #[must_use]
    pub fn supports_returning(&self) -> bool {
        matches!(self, Self::Postgres)
    }

    /// Lower-case name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres"
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            _ => Err(Error::InvalidParam {
                param: format!("dialect={value}")
            })
        }
    }
}
