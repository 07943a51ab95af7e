// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Statement and method kinds.
//!
//! Kinds arrive as strings from generation directives and are parsed into
//! closed enums, so dispatch is an exhaustive `match`.
//!
//! | Statement kind | Method kind |
//! |----------------|-------------|
//! | `objects` | `GetMany` |
//! | `objects-by-A-and-B` | `GetOne` |
//! | `create` | `ID` |
//! | `update` | `Exists` |
//! | `delete-by-A-and-B` | `Create` |
//! | `id` | `Update` |
//! | | `DeleteOne-by-A-and-B` |
//! | | `DeleteMany-by-A-and-B` |

use std::{fmt, str::FromStr};

use crate::{Error, Result};

const BY: &str = "-by-";
const AND: &str = "-and-";

/// SQL statement kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StmtKind {
    /// `SELECT` with an optional equality filter.
    Objects(Vec<String>),

    /// `INSERT`.
    Create,

    /// `UPDATE` by primary key.
    Update,

    /// `DELETE` by filter.
    Delete(Vec<String>),

    /// Row id lookup by natural key.
    Id
}

/// Transaction method kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodKind {
    GetMany,
    GetOne,
    Id,
    Exists,
    Create,
    Update,
    DeleteOne(Vec<String>),
    DeleteMany(Vec<String>)
}

fn split_filters(kind: &str, filters: &str) -> Result<Vec<String>> {
    let names: Vec<String> = filters.split(AND).map(str::to_string).collect();
    if names.iter().any(|n| n.is_empty() || n.contains('-')) {
        return Err(Error::UnknownKind {
            kind: kind.to_string()
        });
    }
    Ok(names)
}

fn write_filters(f: &mut fmt::Formatter<'_>, prefix: &str, filters: &[String]) -> fmt::Result {
    f.write_str(prefix)?;
    if !filters.is_empty() {
        write!(f, "{BY}{}", filters.join(AND))?;
    }
    Ok(())
}

impl StmtKind {
    /// `objects-by-...` for the given filter names.
    pub fn objects_by<S: ToString>(filters: &[S]) -> Self {
        Self::Objects(filters.iter().map(ToString::to_string).collect())
    }

    /// Filter names carried by this kind.
    pub fn filters(&self) -> &[String] {
        match self {
            Self::Objects(filters) | Self::Delete(filters) => filters,
            Self::Create | Self::Update | Self::Id => &[]
        }
    }
}

impl FromStr for StmtKind {
    type Err = Error;

    fn from_str(kind: &str) -> Result<Self> {
        match kind {
            "objects" => Ok(Self::Objects(Vec::new())),
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "id" => Ok(Self::Id),
            _ => {
                if let Some(rest) = kind.strip_prefix("objects-by-") {
                    Ok(Self::Objects(split_filters(kind, rest)?))
                } else if let Some(rest) = kind.strip_prefix("delete-by-") {
                    Ok(Self::Delete(split_filters(kind, rest)?))
                } else {
                    Err(Error::UnknownKind {
                        kind: kind.to_string()
                    })
                }
            }
        }
    }
}

impl fmt::Display for StmtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Objects(filters) => write_filters(f, "objects", filters),
            Self::Create => f.write_str("create"),
            Self::Update => f.write_str("update"),
            Self::Delete(filters) => write_filters(f, "delete", filters),
            Self::Id => f.write_str("id")
        }
    }
}

impl FromStr for MethodKind {
    type Err = Error;

    fn from_str(kind: &str) -> Result<Self> {
        match kind {
            "GetMany" => Ok(Self::GetMany),
            "GetOne" => Ok(Self::GetOne),
            "ID" => Ok(Self::Id),
            "Exists" => Ok(Self::Exists),
            "Create" => Ok(Self::Create),
            "Update" => Ok(Self::Update),
            _ => {
                if let Some(rest) = kind.strip_prefix("DeleteOne-by-") {
                    Ok(Self::DeleteOne(split_filters(kind, rest)?))
                } else if let Some(rest) = kind.strip_prefix("DeleteMany-by-") {
                    Ok(Self::DeleteMany(split_filters(kind, rest)?))
                } else {
                    Err(Error::UnknownKind {
                        kind: kind.to_string()
                    })
                }
            }
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GetMany => f.write_str("GetMany"),
            Self::GetOne => f.write_str("GetOne"),
            Self::Id => f.write_str("ID"),
            Self::Exists => f.write_str("Exists"),
            Self::Create => f.write_str("Create"),
            Self::Update => f.write_str("Update"),
            Self::DeleteOne(filters) => write_filters(f, "DeleteOne", filters),
            Self::DeleteMany(filters) => write_filters(f, "DeleteMany", filters)
        }
    }
}
