// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! JSON encoding for `marshal=json` columns.
//!
//! Marshal fields are stored as opaque text. Generated INSERT/UPDATE code
//! binds [`marshal`]'s output and generated readers decode the column with
//! [`unmarshal`].

use serde::{Serialize, de::DeserializeOwned};

use crate::Error;

/// Serialize a field value into its text column.
pub fn marshal<T: Serialize + ?Sized>(
    value: &T,
    entity: &'static str,
    field: &'static str
) -> Result<String, Error> {
    serde_json::to_string(value).map_err(|source| Error::Marshal {
        entity,
        field,
        source
    })
}

/// Deserialize a text column back into the field value.
pub fn unmarshal<T: DeserializeOwned>(
    raw: &str,
    entity: &'static str,
    field: &'static str
) -> Result<T, Error> {
    serde_json::from_str(raw).map_err(|source| Error::Unmarshal {
        entity,
        field,
        source
    })
}
