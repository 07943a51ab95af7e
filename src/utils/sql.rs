// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! SQL text fragments.

use crate::entity::parse::Dialect;

/// Join items with `, `.
pub fn comma<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build `a = ? AND b = ?`, numbering placeholders from `start`.
pub fn conditions<S: AsRef<str>>(exprs: &[S], dialect: Dialect, start: usize) -> String {
    exprs
        .iter()
        .enumerate()
        .map(|(i, expr)| format!("{} = {}", expr.as_ref(), dialect.placeholder(start + i)))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Build `a = ?, b = ?`, numbering placeholders from 1.
pub fn set_clause<S: AsRef<str>>(columns: &[S], dialect: Dialect) -> String {
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{} = {}", column.as_ref(), dialect.placeholder(i + 1)))
        .collect::<Vec<_>>()
        .join(", ")
}
