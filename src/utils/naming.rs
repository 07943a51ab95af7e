// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Identifier case conversion and English pluralization.
//!
//! | Function | Input | Output |
//! |----------|-------|--------|
//! | [`snake`] | `NetworkForward` | `network_forward` |
//! | [`pascal`] | `network_id` | `NetworkId` |
//! | [`plural`] | `network_forward` | `network_forwards` |
//! | [`singular`] | `nodes` | `node` |
//! | [`normalize`] | `NetworkID` / `network_id` | `networkid` |

use convert_case::{Case, Casing};

/// Convert to `snake_case`.
pub fn snake(name: &str) -> String {
    name.to_case(Case::Snake)
}

/// Convert to `PascalCase`.
pub fn pascal(name: &str) -> String {
    name.to_case(Case::Pascal)
}

/// Pluralize a lower-case word.
pub fn plural(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y')
        && !stem.ends_with(['a', 'e', 'i', 'o', 'u'])
        && !stem.is_empty()
    {
        return format!("{stem}ies");
    }

    if word.ends_with(['s', 'x', 'z']) || word.ends_with("ch") || word.ends_with("sh") {
        return format!("{word}es");
    }

    format!("{word}s")
}

/// Reverse of [`plural`] for the forms it produces.
pub fn singular(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{stem}y");
    }

    for suffix in ["ses", "xes", "zes", "ches", "shes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }

    word.strip_suffix('s').unwrap_or(word).to_string()
}

/// Case-insensitive form used to match filter names against fields.
///
/// `NetworkID`, `NetworkId` and `network_id` all normalize to `networkid`.
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_conversion() {
        assert_eq!(snake("NetworkForward"), "network_forward");
        assert_eq!(snake("NetworkID"), "network_id");
        assert_eq!(pascal("listen_address"), "ListenAddress");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural("widget"), "widgets");
        assert_eq!(plural("network_forward"), "network_forwards");
        assert_eq!(plural("policy"), "policies");
        assert_eq!(plural("key"), "keys");
        assert_eq!(plural("address"), "addresses");
        assert_eq!(plural("box"), "boxes");
        assert_eq!(plural("batch"), "batches");
    }

    #[test]
    fn singular_reverses_plural() {
        for word in ["widget", "node", "policy", "address", "batch", "key"] {
            assert_eq!(singular(&plural(word)), word);
        }
    }

    #[test]
    fn normalize_ignores_case_and_separators() {
        assert_eq!(normalize("NetworkID"), "networkid");
        assert_eq!(normalize("network_id"), "networkid");
        assert_eq!(normalize("Ipv4Address"), normalize("ipv4_address"));
    }
}
