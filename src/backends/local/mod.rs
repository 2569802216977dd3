// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod factory;
pub mod processors;

pub use factory::{ProcessorConstructor, ProcessorFactory};
pub use processors::*;
