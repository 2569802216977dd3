// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for WASM unit loading and invocation events.

use std::fmt::{Display, Formatter};

use super::StructuredLog;

/// WASM module bytes read successfully.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use pocketchemist::observability::messages::wasm::ModuleLoaded;
///
/// let msg = ModuleLoaded {
///     module_path: "plugins/peaks.wasm",
///     size_bytes: 4096,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ModuleLoaded<'a> {
    pub module_path: &'a str,
    pub size_bytes: usize,
}

impl Display for ModuleLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded WASM module: {} ({} bytes)",
            self.module_path, self.size_bytes
        )
    }
}

impl StructuredLog for ModuleLoaded<'_> {
    fn log(&self) {
        tracing::info!("{}", self);
    }
}

/// WASM module loading failed.
///
/// # Log Level
/// `error!` - The file exists but could not be used
pub struct ModuleLoadFailed<'a> {
    pub module_path: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ModuleLoadFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to load WASM module '{}': {}",
            self.module_path, self.error
        )
    }
}

impl StructuredLog for ModuleLoadFailed<'_> {
    fn log(&self) {
        tracing::error!("{}", self);
    }
}

/// No `<name>.wasm` file exists on any search path.
///
/// # Log Level
/// `debug!` - A missing optional unit is a normal condition
pub struct ModuleNotOnSearchPath<'a> {
    pub name: &'a str,
    pub searched: usize,
}

impl Display for ModuleNotOnSearchPath<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "WASM module '{}' not found in {} search paths",
            self.name, self.searched
        )
    }
}

impl StructuredLog for ModuleNotOnSearchPath<'_> {
    fn log(&self) {
        tracing::debug!("{}", self);
    }
}

/// WASM module compiled and its exports indexed.
///
/// # Log Level
/// `debug!` - Detailed loading information
pub struct ModuleCompiled<'a> {
    pub module_path: &'a str,
    pub exported_functions: usize,
}

impl Display for ModuleCompiled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Compiled WASM module '{}' with {} exported functions",
            self.module_path, self.exported_functions
        )
    }
}

impl StructuredLog for ModuleCompiled<'_> {
    fn log(&self) {
        tracing::debug!("{}", self);
    }
}

/// WASM export call completed.
///
/// # Log Level
/// `debug!` - Emitted for every call
///
/// # Example
/// ```
/// use pocketchemist::observability::messages::wasm::CallCompleted;
/// use std::time::Duration;
///
/// let msg = CallCompleted {
///     unit: "peaks",
///     callable: "gaussian",
///     fuel_consumed: 1200,
///     duration: Duration::from_micros(40),
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct CallCompleted<'a> {
    pub unit: &'a str,
    pub callable: &'a str,
    pub fuel_consumed: u64,
    pub duration: std::time::Duration,
}

impl Display for CallCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "WASM call '{}.{}' completed: fuel_consumed={}, duration={:?}",
            self.unit, self.callable, self.fuel_consumed, self.duration
        )
    }
}

impl StructuredLog for CallCompleted<'_> {
    fn log(&self) {
        tracing::debug!("{}", self);
    }
}

/// WASM export call failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct CallFailed<'a> {
    pub unit: &'a str,
    pub callable: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for CallFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "WASM call '{}.{}' failed: {}",
            self.unit, self.callable, self.error
        )
    }
}

impl StructuredLog for CallFailed<'_> {
    fn log(&self) {
        tracing::error!("{}", self);
    }
}
