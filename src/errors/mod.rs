// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod execution;
mod processor;
mod unit;

pub use config::{ConfigError, ValidationError};
pub use execution::{ChildFailure, FailureStrategy, ProcessError};
pub use processor::ProcessorError;
pub use unit::UnitError;
