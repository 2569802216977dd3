// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for processor construction and parameter access.

use thiserror::Error;

/// Errors raised while building a processor or reading its parameters.
///
/// These are caller errors: they surface immediately and are never
/// recovered inside the pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessorError {
    /// One or more required parameters were not supplied.
    #[error("The {processor} processor is missing the following required parameters: {}", missing.join(", "))]
    MissingParameters {
        processor: String,
        /// Every missing name, sorted.
        missing: Vec<String>,
    },

    /// A parameter was requested that the processor does not hold.
    #[error("'{processor}' processor has no parameter '{name}'")]
    UnknownAttribute { processor: String, name: String },

    /// A parameter was supplied with a value the processor cannot use.
    #[error("The {processor} processor cannot use parameter '{name}': {reason}")]
    InvalidParameter {
        processor: String,
        name: String,
        reason: String,
    },

    /// Child processors were attached to a processor that is not a group.
    #[error("The {processor} processor (type '{found}') cannot hold child processors; only a {expected} can")]
    TypeMismatch {
        processor: String,
        expected: &'static str,
        /// Configured type of the offending processor.
        found: String,
    },
}
