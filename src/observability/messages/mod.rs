// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Messages are organized by subsystem:
//!
//! * `processor` - Processor construction and execution events
//! * `group` - Group processor lifecycle and child failures
//! * `module` - Optional module resolution and caching
//! * `wasm` - WASM unit loading and invocation
//!
//! # Usage Pattern
//!
//! ```rust
//! use pocketchemist::observability::messages::StructuredLog;
//! use pocketchemist::observability::messages::module::ModuleCacheHit;
//!
//! ModuleCacheHit {
//!     name: "peaks",
//!     available: true,
//! }
//! .log();
//! ```

pub mod group;
pub mod module;
pub mod processor;
pub mod wasm;

/// Emits a message at the level its type documents.
pub trait StructuredLog: std::fmt::Display {
    fn log(&self);
}
