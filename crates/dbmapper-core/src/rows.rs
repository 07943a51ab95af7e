// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Row-count contracts shared by generated methods.

use crate::Error;

/// Take the single element of `rows`.
///
/// Zero rows is [`Error::NotFound`]; more than one is
/// [`Error::Consistency`]. Extra rows are never silently dropped.
pub fn exactly_one<T>(mut rows: Vec<T>, entity: &'static str) -> Result<T, Error> {
    if rows.len() > 1 {
        return Err(Error::Consistency {
            entity,
            count: rows.len() as u64
        });
    }

    rows.pop().ok_or(Error::NotFound {
        entity
    })
}

/// Check that a write touched exactly one row.
pub fn affected_one(count: u64, entity: &'static str) -> Result<(), Error> {
    match count {
        0 => Err(Error::NotFound {
            entity
        }),
        1 => Ok(()),
        count => Err(Error::Consistency {
            entity,
            count
        })
    }
}

/// Unwrap an optional row, mapping absence to [`Error::NotFound`].
pub fn found<T>(row: Option<T>, entity: &'static str) -> Result<T, Error> {
    row.ok_or(Error::NotFound {
        entity
    })
}
