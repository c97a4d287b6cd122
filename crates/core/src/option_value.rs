// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scalar option values carried by a [`crate::Target`] and a [`crate::Graph`]'s
//! backends (see `Backend::option_defaults` in `flowctl-engine`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A free-form target option value.
///
/// Targets carry an options map (`name -> OptionValue`) that is conceptually
/// free-form; a backend decides which keys it recognizes via
/// `option_defaults` and strips the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    String(String),
    Integer(i64),
    Bool(bool),
    Null,
}

impl OptionValue {
    /// An explicit null option value is stripped silently during
    /// normalization, as opposed to an unrecognized key, which is stripped
    /// with a warning.
    pub fn is_null(&self) -> bool {
        matches!(self, OptionValue::Null)
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::String(s) => write!(f, "{s}"),
            OptionValue::Integer(n) => write!(f, "{n}"),
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::Null => write!(f, "null"),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::String(s.to_string())
    }
}

impl From<i64> for OptionValue {
    fn from(n: i64) -> Self {
        OptionValue::Integer(n)
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}
