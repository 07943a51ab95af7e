// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Runtime error type for generated methods.
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | `NotFound` | Zero rows where exactly one was required |
//! | `Consistency` | More rows than the operation's contract allows |
//! | `Conflict` | Natural key already taken, or a unique constraint fired |
//! | `Marshal` / `Unmarshal` | A `marshal=json` column could not be encoded or decoded |
//! | `Storage` | Any other `sqlx` error, passed through untouched |

/// Error returned by every generated transaction method.
///
/// `Consistency` signals a data-integrity bug (duplicate rows behind a key
/// that should be unique), not a normal absence. Callers usually branch on
/// [`Error::is_not_found`] and propagate the rest.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// No row matched where exactly one was required.
    #[error("{entity} not found")]
    NotFound {
        /// Snake-case entity name.
        entity: &'static str
    },

    /// More rows were returned or affected than allowed.
    #[error("{entity}: expected exactly one row, got {count}")]
    Consistency {
        /// Snake-case entity name.
        entity: &'static str,

        /// Number of rows actually returned or affected.
        count: u64
    },

    /// A row with the same key already exists.
    #[error("this \"{entity}\" entry already exists")]
    Conflict {
        /// Snake-case entity name.
        entity: &'static str
    },

    /// A field could not be serialized to its text column.
    #[error("failed to marshal {entity}.{field}: {source}")]
    Marshal {
        /// Snake-case entity name.
        entity: &'static str,

        /// Field name.
        field: &'static str,

        /// Underlying JSON error.
        source: serde_json::Error
    },

    /// A text column could not be deserialized into its field.
    #[error("failed to unmarshal {entity}.{field}: {source}")]
    Unmarshal {
        /// Snake-case entity name.
        entity: &'static str,

        /// Field name.
        field: &'static str,

        /// Underlying JSON error.
        source: serde_json::Error
    },

    /// Lower-level storage error.
    #[error(transparent)]
    Storage(#[from] sqlx::Error)
}

impl Error {
    /// Classify an error raised by an INSERT or UPDATE.
    ///
    /// Unique violations become [`Error::Conflict`]; everything else is
    /// wrapped as [`Error::Storage`].
    pub fn from_write(err: sqlx::Error, entity: &'static str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                tracing::debug!(entity, error = %db, "unique violation reported as conflict");
                Self::Conflict {
                    entity
                }
            }
            _ => Self::Storage(err)
        }
    }

    /// Check if this is a not-found error.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a conflict error.
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Check if this is a consistency error.
    pub const fn is_consistency(&self) -> bool {
        matches!(self, Self::Consistency { .. })
    }
}
