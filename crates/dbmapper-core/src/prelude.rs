// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust,ignore
//! use dbmapper_core::prelude::*;
//! ```

pub use crate::{Error, affected_one, exactly_one, found, marshal, unmarshal};
