// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The processor tree: parameters, the shared context and the composite
//! group processor. Concrete processors live in
//! [`backends::local`](crate::backends::local).

mod base;
mod context;
mod group;
mod params;

pub use base::ProcessorBase;
pub use context::Context;
pub use group::GroupProcessor;
pub use params::{FitParameter, ParamValue, Params};
