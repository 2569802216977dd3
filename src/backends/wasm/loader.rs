// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Locating and reading WASM unit files.
//!
//! Units are found by name: `<search_path>/<name>.wasm`, first match wins.
//! Reading checks the size limit before pulling the file into memory. The
//! binary format itself is checked by the detector module.

use std::path::{Path, PathBuf};

use crate::backends::wasm::error::{WasmError, WasmResult};
use crate::observability::messages::wasm::{ModuleLoadFailed, ModuleLoaded};
use crate::observability::messages::StructuredLog;

/// Maximum allowed size for WASM binaries (16 MB)
pub const MAX_WASM_SIZE: u64 = 16 * 1024 * 1024;

/// File extension of unit binaries.
pub const WASM_EXTENSION: &str = "wasm";

/// Unit names are bare identifiers; anything that could escape a search
/// directory is rejected.
pub fn is_valid_unit_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        && !name.starts_with('.')
}

/// Find `<name>.wasm` in the first search path that has it.
pub fn locate_unit(search_paths: &[PathBuf], name: &str) -> Option<PathBuf> {
    if !is_valid_unit_name(name) {
        return None;
    }

    search_paths
        .iter()
        .map(|dir| dir.join(format!("{}.{}", name, WASM_EXTENSION)))
        .find(|candidate| candidate.is_file())
}

/// Read a unit binary, rejecting files over [`MAX_WASM_SIZE`].
pub fn read_unit_bytes(path: &Path) -> WasmResult<Vec<u8>> {
    let module_path = path.display().to_string();

    let result = std::fs::metadata(path)
        .map_err(WasmError::IoError)
        .and_then(|metadata| {
            if metadata.len() > MAX_WASM_SIZE {
                return Err(WasmError::ValidationError(format!(
                    "WASM file too large: {} bytes (max: {} bytes)",
                    metadata.len(),
                    MAX_WASM_SIZE
                )));
            }
            std::fs::read(path).map_err(WasmError::IoError)
        });

    match &result {
        Ok(bytes) => ModuleLoaded {
            module_path: &module_path,
            size_bytes: bytes.len(),
        }
        .log(),
        Err(error) => ModuleLoadFailed {
            module_path: &module_path,
            error,
        }
        .log(),
    }

    result
}
