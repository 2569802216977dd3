// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for loading external units and invoking their callables.
//!
//! A load failure never reaches a `Module` caller: the registry logs it and
//! caches the unit as unavailable. Call failures do propagate, since by then
//! the capability is known to exist.

use thiserror::Error;

use crate::backends::wasm::WasmError;

#[derive(Error, Debug)]
pub enum UnitError {
    /// No loader knows a unit by this name.
    #[error("Unit '{0}' not found")]
    NotFound(String),

    /// The unit exists but could not be loaded.
    #[error("Failed to load unit '{name}': {reason}")]
    LoadFailed { name: String, reason: String },

    /// The callable was invoked with the wrong number of arguments.
    #[error("Callable '{callable}' expects {expected} arguments, got {got}")]
    ArityMismatch {
        callable: String,
        expected: usize,
        got: usize,
    },

    /// The callable ran and reported a failure.
    #[error("Callable '{callable}' failed: {reason}")]
    CallFailed { callable: String, reason: String },

    /// Errors from the WebAssembly backend.
    #[error(transparent)]
    Wasm(#[from] WasmError),
}
