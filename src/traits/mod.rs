// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod processor;
pub mod unit;

pub use processor::{NameStyle, ParamSchema, Processor, DEFAULT_INDENT_WIDTH};
pub use unit::{CallValue, ExternalUnit, UnitCallable, UnitLoader};
