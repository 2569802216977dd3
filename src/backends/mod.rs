// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Backends: where processors and module units come from.
//!
//! # Available Backends
//!
//! ## Local Backend
//! Built-in processors and the [`ProcessorFactory`](local::ProcessorFactory)
//! that maps configuration type names to them:
//! - **`set_value`**: Seed the context with a parameter value
//! - **`call_module`**: Call an optional module's callable with context inputs
//! - **`group`**: Run child processors in order
//!
//! ## Native Units
//! In-process units whose callables are Rust closures. Always tried first.
//!
//! ## WASM Units
//! Core WebAssembly modules found as `<name>.wasm` on configured search
//! paths. Every exported function becomes a callable; each call runs in a
//! fresh, fuel-limited store with no imports available.
//!
//! # Architecture
//!
//! ```text
//! Configuration → ProcessorFactory → Processor tree
//!                                      └─ call_module → ModuleRegistry → LoaderChain(native, wasm)
//! ```

pub mod local;
pub mod native;
pub mod wasm;
