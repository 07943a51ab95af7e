// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Generation-time errors.
//!
//! Every error is fatal to the single generation call that raised it and
//! names the offending entity, field and/or key. A batch driver can report it
//! and carry on with the next directive.

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error raised while parsing metadata or generating code.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Tag contains a key outside `primary|column|nullable|leftjoin|marshal|omit`.
    #[error("unknown key {key:?} in db tag of field {field}")]
    UnknownTagKey { field: String, key: String },

    /// Tag repeats a key.
    #[error("duplicate key {key:?} in db tag of field {field}")]
    DuplicateTagKey { field: String, key: String },

    /// Tag value is malformed for its key.
    #[error("invalid value {value:?} for key {key:?} in db tag of field {field}")]
    InvalidTagValue {
        field: String,
        key:   String,
        value: String
    },

    /// No field carries `primary=yes`.
    #[error("entity {entity} has no primary key field")]
    NoPrimaryKey { entity: String },

    /// Two fields map to the same column.
    #[error("entity {entity} maps more than one field to column {column:?}")]
    DuplicateColumn { entity: String, column: String },

    /// Field declaration contradicts its tag or role.
    #[error("invalid field {entity}.{field}: {reason}")]
    InvalidField {
        entity: String,
        field:  String,
        reason: String
    },

    /// Filter name does not resolve to an entity field.
    #[error("entity {entity} has no field matching filter {field:?}")]
    UnknownFilterField { entity: String, field: String },

    /// Field exists but cannot be used where it was requested.
    #[error("field {entity}.{field} cannot be used in {context}")]
    UnsupportedFilterField {
        entity:  String,
        field:   String,
        context: String
    },

    /// `create` would insert nothing.
    #[error("entity {entity} has no insertable columns")]
    NoInsertableColumns { entity: String },

    /// `update` would set nothing.
    #[error("entity {entity} has no updatable columns")]
    NoUpdatableColumns { entity: String },

    /// Operation needs the surrogate `id` field.
    #[error("entity {entity} has no `id` field")]
    NoRowId { entity: String },

    /// Statement or method kind literal is not recognised.
    #[error("unknown kind {kind:?}")]
    UnknownKind { kind: String },

    /// Config key required by this kind is absent or empty.
    #[error("missing required config {key:?} for entity {entity}")]
    MissingRequiredConfig { entity: String, key: String },

    /// Directive parameter is not `key=value`.
    #[error("invalid config parameter {param:?}")]
    InvalidParam { param: String },

    /// Metadata provider does not know the entity.
    #[error("unknown entity {entity}")]
    UnknownEntity { entity: String },

    /// Requested reference does not resolve.
    #[error("entity {entity} has no reference {reference}")]
    UnknownReference { entity: String, reference: String },

    /// Operation needs the `<Entity>Filter` description.
    #[error("entity {entity} has no filter type {filter}")]
    MissingFilterType { entity: String, filter: String },

    /// Same accessor or function name generated with different content.
    #[error("{name} generated twice with different content")]
    DuplicateStatement { name: String },

    /// Existing output opens an entity region without closing it.
    #[error("region of {entity} is not terminated")]
    UnterminatedRegion { entity: String },

    /// Entity-level `#[mapper(...)]` attribute is malformed.
    #[error(transparent)]
    Attribute(#[from] darling::Error),

    /// Source text could not be parsed.
    #[error("failed to parse source: {0}")]
    Source(#[from] syn::Error),

    /// Source file could not be read.
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error)
}

impl Error {
    pub(crate) fn unknown_filter(entity: &impl ToString, field: &str) -> Self {
        Self::UnknownFilterField {
            entity: entity.to_string(),
            field:  field.to_string()
        }
    }

    pub(crate) fn invalid_field(
        entity: &impl ToString,
        field: &impl ToString,
        reason: impl Into<String>
    ) -> Self {
        Self::InvalidField {
            entity: entity.to_string(),
            field:  field.to_string(),
            reason: reason.into()
        }
    }
}
