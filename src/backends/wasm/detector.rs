// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! WASM binary encoding detection
//!
//! Units must be core WASM modules. This module uses wasmparser to tell core
//! modules apart from Component Model binaries before compilation, so a
//! component gets a clear error instead of a compiler failure.

use wasmparser::{Encoding, Parser, Payload};

use crate::backends::wasm::error::{
    WasmError, WasmResult, WASM_LEGACY_COMPONENT, WASM_UNSUPPORTED_ENCODING,
};

/// Encoding of a WASM binary.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryEncoding {
    /// Core WASM module (binary version 1).
    Core,
    /// Component Model binary.
    Component,
}

/// Parses the binary header and sections to determine its encoding.
///
/// # Errors
/// Returns an error if the input is empty, truncated or otherwise invalid,
/// or if it is a legacy Preview 1 component (a core module carrying a
/// `component` custom section).
pub fn detect_encoding(bytes: &[u8]) -> WasmResult<BinaryEncoding> {
    let mut encoding = None;
    let mut has_component_section = false;

    for payload in Parser::new(0).parse_all(bytes) {
        match payload? {
            Payload::Version { encoding: enc, .. } => encoding = Some(enc),
            Payload::CustomSection(reader) if reader.name() == "component" => {
                has_component_section = true;
            }
            _ => {}
        }
    }

    match encoding {
        None => Err(WasmError::InvalidWasmBinary(
            "missing WASM version header".to_string(),
        )),
        Some(Encoding::Component) => Ok(BinaryEncoding::Component),
        Some(Encoding::Module) if has_component_section => Err(WasmError::UnsupportedEncoding(
            WASM_LEGACY_COMPONENT.to_string(),
        )),
        Some(Encoding::Module) => Ok(BinaryEncoding::Core),
    }
}

/// Accepts core modules only.
pub fn ensure_core_module(bytes: &[u8]) -> WasmResult<()> {
    match detect_encoding(bytes)? {
        BinaryEncoding::Core => Ok(()),
        BinaryEncoding::Component => Err(WasmError::UnsupportedEncoding(
            WASM_UNSUPPORTED_ENCODING.to_string(),
        )),
    }
}
