// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types for WASM backend operations.
//!
//! This module defines error types for loading, parsing, validating and
//! calling WASM units. All errors implement `std::error::Error` via the
//! `thiserror` crate.

use thiserror::Error;

/// Error message for component-model binaries, which units cannot be.
pub const WASM_UNSUPPORTED_ENCODING: &str = "Unsupported WASM binary: Component Model binaries \
cannot be loaded as units. Please provide a core WASM module.";

/// Error message for legacy Preview 1 component binaries.
pub const WASM_LEGACY_COMPONENT: &str = "Unsupported WASM binary: Legacy Preview 1 Component Model detected. \
Please provide a core WASM module.";

#[derive(Error, Debug)]
pub enum WasmError {
    /// Invalid or malformed WASM binary format.
    #[error("Invalid WASM binary: {0}")]
    InvalidWasmBinary(String),

    /// Module compilation or instantiation error.
    #[error("WASM module error: {0}")]
    ModuleError(String),

    /// File I/O error during module loading.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Wasmtime runtime execution error, including fuel exhaustion.
    #[error("WASM execution error: {0}")]
    ExecutionError(#[from] wasmtime::Error),

    /// Input validation error (size limits, argument types, etc.).
    #[error("Invalid input: {0}")]
    ValidationError(String),

    /// Wasmtime engine creation or configuration error.
    #[error("Engine creation error: {0}")]
    EngineError(String),

    /// An export uses value types that cannot cross the unit boundary.
    #[error("Export '{export}' has an unsupported signature: {reason}")]
    UnsupportedSignature { export: String, reason: String },

    /// Unsupported WASM encoding (component model or legacy Preview 1).
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// WASM binary parsing error from wasmparser.
    #[error("WASM parser error: {0}")]
    ParserError(#[from] wasmparser::BinaryReaderError),
}

/// Result type alias for WASM operations.
pub type WasmResult<T> = Result<T, WasmError>;
