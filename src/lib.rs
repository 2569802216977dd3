// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // native + WASM units, built-in processors
pub mod cli;        // command-line plugins
pub mod config;     // config loading + runtime
pub mod errors;     // error handling
pub mod modules;    // optional-module resolution
pub mod observability;
pub mod processors; // processor tree
pub mod traits;     // unified abstractions
