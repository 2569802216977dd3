// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod detector;
pub mod error;
pub mod loader;
pub mod unit;

pub use error::{WasmError, WasmResult};
pub use unit::{WasmCallable, WasmUnit, WasmUnitLoader};
