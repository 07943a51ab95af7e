// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field tag parsing.
//!
//! A tag is the string value of a field's `#[db = "..."]` attribute: pairs of
//! `key=value` joined by `&`.
//!
//! | Key | Value | Effect |
//! |-----|-------|--------|
//! | `primary` | `yes` | Field is part of the natural key |
//! | `column` | identifier | Column name override |
//! | `nullable` | `true` | Column may hold NULL |
//! | `leftjoin` | `table.column` | Value read from a joined table |
//! | `marshal` | `json` | Column stores the field serialized as JSON |
//! | `omit` | `create`, `update` (comma list) | Field skipped by those statements |
//!
//! Pair order is not significant. [`Tag`]'s `Display` writes the canonical
//! order, so a parsed tag renders back to an equivalent tag.

use std::{collections::BTreeSet, fmt, str::FromStr};

use crate::{Error, Result};

/// Keys accepted in a tag.
const KEYS: [&str; 6] = ["primary", "column", "nullable", "leftjoin", "marshal", "omit"];

/// Statement a field can be omitted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Omit {
    /// `INSERT`.
    Create,

    /// `UPDATE`.
    Update
}

impl Omit {
    /// Tag spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update"
        }
    }
}

impl FromStr for Omit {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            _ => Err(())
        }
    }
}

/// Value encoding of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Marshal {
    /// Column holds the field value directly.
    #[default]
    None,

    /// Column holds the field serialized as JSON text.
    Json
}

/// `leftjoin=table.column` target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    /// Joined table.
    pub table: String,

    /// Column read from the joined table.
    pub column: String
}

/// Parsed field tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    pub primary:  bool,
    pub column:   Option<String>,
    pub nullable: bool,
    pub join:     Option<Join>,
    pub marshal:  Marshal,
    pub omit:     BTreeSet<Omit>
}

impl Tag {
    /// Parse the tag of `field`.
    ///
    /// An empty tag yields [`Tag::default`].
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownTagKey`] for a key outside the table above
    /// - [`Error::DuplicateTagKey`] when a key appears twice
    /// - [`Error::InvalidTagValue`] for a malformed value or a known key without `=`
    pub fn parse(field: &str, tag: &str) -> Result<Self> {
        let mut parsed = Self::default();
        let tag = tag.trim();
        if tag.is_empty() {
            return Ok(parsed);
        }

        let unknown = |key: &str| Error::UnknownTagKey {
            field: field.to_string(),
            key:   key.to_string()
        };

        let mut seen = BTreeSet::new();
        for pair in tag.split('&') {
            let invalid = |key: &str, value: &str| Error::InvalidTagValue {
                field: field.to_string(),
                key:   key.to_string(),
                value: value.to_string()
            };

            let (key, value) = match pair.split_once('=') {
                Some((k, v)) => (k.trim(), v.trim()),
                None => (pair.trim(), "")
            };
            if !KEYS.contains(&key) {
                return Err(unknown(key));
            }
            if !pair.contains('=') {
                return Err(invalid(key, value));
            }

            if !seen.insert(key) {
                return Err(Error::DuplicateTagKey {
                    field: field.to_string(),
                    key:   key.to_string()
                });
            }

            match key {
                "primary" => {
                    if value != "yes" {
                        return Err(invalid(key, value));
                    }
                    parsed.primary = true;
                }
                "column" => {
                    if !is_identifier(value) {
                        return Err(invalid(key, value));
                    }
                    parsed.column = Some(value.to_string());
                }
                "nullable" => {
                    if value != "true" {
                        return Err(invalid(key, value));
                    }
                    parsed.nullable = true;
                }
                "leftjoin" => {
                    let join = value
                        .split_once('.')
                        .filter(|(t, c)| is_identifier(t) && is_identifier(c))
                        .ok_or_else(|| invalid(key, value))?;
                    parsed.join = Some(Join {
                        table:  join.0.to_string(),
                        column: join.1.to_string()
                    });
                }
                "marshal" => {
                    if value != "json" {
                        return Err(invalid(key, value));
                    }
                    parsed.marshal = Marshal::Json;
                }
                "omit" => {
                    for item in value.split(',') {
                        let omit = item.trim().parse().map_err(|()| invalid(key, value))?;
                        parsed.omit.insert(omit);
                    }
                }
                _ => return Err(unknown(key))
            }
        }

        Ok(parsed)
    }

    /// Check if the field is skipped by `statement`.
    pub fn omits(&self, statement: Omit) -> bool {
        self.omit.contains(&statement)
    }

    /// Check if no key is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pairs = Vec::new();
        if self.primary {
            pairs.push("primary=yes".to_string());
        }
        if let Some(column) = &self.column {
            pairs.push(format!("column={column}"));
        }
        if self.nullable {
            pairs.push("nullable=true".to_string());
        }
        if let Some(join) = &self.join {
            pairs.push(format!("leftjoin={}.{}", join.table, join.column));
        }
        if self.marshal == Marshal::Json {
            pairs.push("marshal=json".to_string());
        }
        if !self.omit.is_empty() {
            let omit: Vec<_> = self.omit.iter().map(Omit::as_str).collect();
            pairs.push(format!("omit={}", omit.join(",")));
        }
        f.write_str(&pairs.join("&"))
    }
}

/// Check if `value` is a plain SQL identifier.
fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tag_is_default() {
        assert!(Tag::parse("name", "").unwrap().is_empty());
        assert!(Tag::parse("name", "  ").unwrap().is_empty());
    }

    #[test]
    fn parses_every_key() {
        let tag = Tag::parse(
            "location",
            "leftjoin=nodes.name&omit=create,update&nullable=true&column=node&marshal=json&primary=yes"
        )
        .unwrap();

        assert!(tag.primary);
        assert!(tag.nullable);
        assert_eq!(tag.column.as_deref(), Some("node"));
        assert_eq!(
            tag.join,
            Some(Join {
                table:  "nodes".into(),
                column: "name".into()
            })
        );
        assert_eq!(tag.marshal, Marshal::Json);
        assert!(tag.omits(Omit::Create));
        assert!(tag.omits(Omit::Update));
    }

    #[test]
    fn display_is_canonical() {
        let a = Tag::parse("f", "omit=update&primary=yes").unwrap();
        let b = Tag::parse("f", "primary=yes&omit=update").unwrap();
        assert_eq!(a.to_string(), "primary=yes&omit=update");
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(Tag::parse("f", &a.to_string()).unwrap(), a);
    }

    #[test]
    fn rejects_unknown_key() {
        let err = Tag::parse("name", "primary=yes&size=10").unwrap_err();
        assert!(matches!(err, Error::UnknownTagKey { ref key, .. } if key == "size"));
    }

    #[test]
    fn rejects_unknown_key_without_value() {
        let err = Tag::parse("name", "size").unwrap_err();
        assert!(matches!(err, Error::UnknownTagKey { ref key, .. } if key == "size"));
        let err = Tag::parse("name", "primary=yes&size").unwrap_err();
        assert!(matches!(err, Error::UnknownTagKey { ref key, .. } if key == "size"));
    }

    #[test]
    fn rejects_duplicate_key() {
        let err = Tag::parse("name", "primary=yes&primary=yes").unwrap_err();
        assert!(matches!(err, Error::DuplicateTagKey { ref key, .. } if key == "primary"));
    }

    #[test]
    fn rejects_malformed_values() {
        for tag in [
            "primary=no",
            "nullable=yes",
            "marshal=yaml",
            "omit=delete",
            "omit=create,",
            "leftjoin=nodes",
            "leftjoin=.name",
            "column=1st",
            "column=a b",
            "primary"
        ] {
            let err = Tag::parse("f", tag).unwrap_err();
            assert!(matches!(err, Error::InvalidTagValue { .. }), "{tag}: {err}");
        }
    }
}
