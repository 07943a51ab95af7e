// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Per-call generation parameters.
//!
//! A directive carries `key=value` parameters next to the entity and kind:
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `table` | Table name for this statement or method |
//! | `references` | Comma-separated reference names to load or write |
//!
//! Other keys are kept and ignored. A later duplicate overrides an earlier
//! one.

use std::collections::BTreeMap;

use crate::{Error, Result};

/// Parsed `key=value` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    values: BTreeMap<String, String>
}

impl Config {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `key=value` arguments.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParam`] when an argument has no `=` or an empty key.
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>
    {
        let mut config = Self::new();
        for arg in args {
            let arg = arg.as_ref();
            let (key, value) = arg
                .split_once('=')
                .filter(|(key, _)| !key.trim().is_empty())
                .ok_or_else(|| Error::InvalidParam {
                    param: arg.to_string()
                })?;
            config.set(key.trim(), value.trim());
        }
        Ok(config)
    }

    /// Set a parameter.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Builder form of [`Config::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Get a raw parameter.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Table override, if any.
    ///
    /// # Errors
    ///
    /// [`Error::MissingRequiredConfig`] when `table=` is given empty.
    pub fn table(&self, entity: &str) -> Result<Option<&str>> {
        self.non_empty(entity, "table")
    }

    /// Requested reference names, in order.
    ///
    /// # Errors
    ///
    /// [`Error::MissingRequiredConfig`] when `references=` is given empty.
    pub fn references(&self, entity: &str) -> Result<Vec<&str>> {
        Ok(self
            .non_empty(entity, "references")?
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default())
    }

    fn non_empty(&self, entity: &str, key: &str) -> Result<Option<&str>> {
        match self.get(key) {
            Some(value) if value.trim().is_empty() => Err(Error::MissingRequiredConfig {
                entity: entity.to_string(),
                key:    key.to_string()
            }),
            other => Ok(other)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs() {
        let config = Config::parse(["table=networks_forwards", "references=Config, Devices"]).unwrap();
        assert_eq!(config.table("NetworkForward").unwrap(), Some("networks_forwards"));
        assert_eq!(config.references("NetworkForward").unwrap(), ["Config", "Devices"]);
    }

    #[test]
    fn later_duplicate_wins() {
        let config = Config::parse(["table=a", "table=b"]).unwrap();
        assert_eq!(config.get("table"), Some("b"));
    }

    #[test]
    fn value_may_contain_equals() {
        let config = Config::parse(["build=cfg(feature = \"x\")"]).unwrap();
        assert_eq!(config.get("build"), Some("cfg(feature = \"x\")"));
    }

    #[test]
    fn rejects_malformed_param() {
        for arg in ["table", "=widgets", ""] {
            assert!(matches!(
                Config::parse([arg]).unwrap_err(),
                Error::InvalidParam { .. }
            ));
        }
    }

    #[test]
    fn empty_values_are_missing() {
        let config = Config::new().with("references", "").with("table", " ");
        assert!(matches!(
            config.references("Widget").unwrap_err(),
            Error::MissingRequiredConfig { ref key, .. } if key == "references"
        ));
        assert!(config.table("Widget").is_err());
    }

    #[test]
    fn absent_values() {
        let config = Config::new();
        assert_eq!(config.table("Widget").unwrap(), None);
        assert!(config.references("Widget").unwrap().is_empty());
    }
}
