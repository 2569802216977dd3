// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use thiserror::Error;

use super::ProcessorError;
use crate::backends::wasm::WasmError;

/// Problems found while validating a loaded configuration, before any
/// processor is built.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A node names a processor type the factory does not know.
    UnknownProcessorType {
        /// Position in the pipeline tree, e.g. `pipeline/2/0`.
        path: String,
        processor_type: String,
    },
    /// A node lists children but its type cannot hold any.
    ChildrenOnLeaf {
        path: String,
        processor_type: String,
    },
    /// A failure strategy was set on a node that has no children to apply it to.
    FailureStrategyOnLeaf {
        path: String,
        processor_type: String,
    },
    /// The fuel bounds do not satisfy `minimum <= default <= maximum`.
    InvalidFuelBounds { minimum: u64, default: u64, maximum: u64 },
    /// A module declaration has an empty category, name or callable.
    IncompleteModuleDeclaration { index: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownProcessorType { path, processor_type } => {
                write!(f, "Unknown processor type '{}' at '{}'", processor_type, path)
            }
            ValidationError::ChildrenOnLeaf { path, processor_type } => {
                write!(
                    f,
                    "Processor '{}' at '{}' cannot hold child processors",
                    processor_type, path
                )
            }
            ValidationError::FailureStrategyOnLeaf { path, processor_type } => {
                write!(
                    f,
                    "Processor '{}' at '{}' does not take a failure strategy",
                    processor_type, path
                )
            }
            ValidationError::InvalidFuelBounds {
                minimum,
                default,
                maximum,
            } => {
                write!(
                    f,
                    "Fuel bounds must satisfy minimum <= default <= maximum (got {} / {} / {})",
                    minimum, default, maximum
                )
            }
            ValidationError::IncompleteModuleDeclaration { index } => {
                write!(
                    f,
                    "Module declaration {} needs a category, name and callable",
                    index
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while loading a pipeline configuration and building the
/// processor tree it describes.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported config format '{0}' (expected .yaml, .yml or .toml)")]
    UnsupportedFormat(String),

    #[error("Configuration validation failed:\n{}", join_lines(.0))]
    Validation(Vec<ValidationError>),

    #[error("Unknown processor type '{0}'")]
    UnknownProcessorType(String),

    /// A processor rejected its configured parameters.
    #[error("Failed to build processor at '{path}': {source}")]
    Build {
        /// Position in the pipeline tree, e.g. `pipeline/2/0`.
        path: String,
        #[source]
        source: ProcessorError,
    },

    /// A processor created outside a pipeline tree rejected its parameters.
    #[error("Failed to construct a '{processor_type}' processor: {source}")]
    Construct {
        processor_type: String,
        #[source]
        source: ProcessorError,
    },

    #[error("Failed to set up module loading: {0}")]
    Loader(#[from] WasmError),
}

fn join_lines(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}
