// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Shared helpers for naming and SQL text.

pub mod marker;
pub mod naming;
pub mod sql;
