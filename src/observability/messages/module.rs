// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for optional module resolution.

use std::fmt::{Display, Formatter};

use super::StructuredLog;

/// A unit was loaded and cached.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ModuleResolved<'a> {
    pub name: &'a str,
    pub origin: &'a str,
    pub callable_count: usize,
}

impl Display for ModuleResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Module '{}' resolved from {} ({} callables)",
            self.name, self.origin, self.callable_count
        )
    }
}

impl StructuredLog for ModuleResolved<'_> {
    fn log(&self) {
        tracing::info!("{}", self);
    }
}

/// A unit could not be loaded and is cached as unavailable.
///
/// # Log Level
/// `info!` - A missing optional module is a normal condition
///
/// # Example
/// ```
/// use pocketchemist::observability::messages::module::ModuleUnavailable;
///
/// let error = std::io::Error::new(std::io::ErrorKind::NotFound, "no such unit");
/// let msg = ModuleUnavailable {
///     name: "peaks",
///     loader: "native",
///     error: &error,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ModuleUnavailable<'a> {
    pub name: &'a str,
    pub loader: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ModuleUnavailable<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Module '{}' unavailable via {}: {}",
            self.name, self.loader, self.error
        )
    }
}

impl StructuredLog for ModuleUnavailable<'_> {
    fn log(&self) {
        tracing::info!("{}", self);
    }
}

/// A resolution was served from the cache.
///
/// # Log Level
/// `trace!` - High-frequency event
pub struct ModuleCacheHit<'a> {
    pub name: &'a str,
    pub available: bool,
}

impl Display for ModuleCacheHit<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let state = if self.available { "available" } else { "unavailable" };
        write!(f, "Module '{}' served from cache: {}", self.name, state)
    }
}

impl StructuredLog for ModuleCacheHit<'_> {
    fn log(&self) {
        tracing::trace!("{}", self);
    }
}

/// The resolution cache was cleared.
///
/// # Log Level
/// `debug!` - Expected in tests and reconfiguration
pub struct ModuleCacheReset {
    pub cleared: usize,
}

impl Display for ModuleCacheReset {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Module resolution cache reset: {} entries cleared", self.cleared)
    }
}

impl StructuredLog for ModuleCacheReset {
    fn log(&self) {
        tracing::debug!("{}", self);
    }
}
