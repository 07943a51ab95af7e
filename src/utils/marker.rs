// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Markers embedded in generated files.

/// First line of every generated file.
pub const GENERATED: &str = "// Code generated by dbmapper. DO NOT EDIT.";

/// Opening marker of an entity region.
pub fn begin(entity: &str) -> String {
    format!("// dbmapper:begin {entity}")
}

/// Closing marker of an entity region.
pub fn end(entity: &str) -> String {
    format!("// dbmapper:end {entity}")
}

/// Check if `source` was produced by the generator.
pub fn is_generated(source: &str) -> bool {
    source.lines().next().is_some_and(|line| line.trim_end() == GENERATED)
}
