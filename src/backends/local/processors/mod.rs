// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod call_module;
pub mod set_value;

pub use call_module::*;
pub use set_value::*;

use crate::errors::ProcessorError;
use crate::processors::ProcessorBase;

/// Read a string parameter the schema guarantees is present.
pub(crate) fn string_param(base: &ProcessorBase, name: &str) -> Result<String, ProcessorError> {
    let value = base.param(name)?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ProcessorError::InvalidParameter {
            processor: base.type_name().to_string(),
            name: name.to_string(),
            reason: format!("expected a string, got {} '{}'", value.kind(), value),
        })
}

/// Split a comma-separated list of context keys, ignoring blanks.
pub(crate) fn key_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}
