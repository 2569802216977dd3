// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Optional external capabilities.
//!
//! A [`Module`] names a unit and a callable inside it. Nothing is loaded when
//! the descriptor is created; the first resolution goes through the
//! [`ModuleRegistry`], which asks its [`UnitLoader`](crate::traits::UnitLoader)
//! once per unit name and caches the outcome. A unit that cannot be loaded is
//! cached as unavailable and reported as `None`, never as an error.
//!
//! ```
//! use pocketchemist::backends::native::{NativeUnit, NativeUnitLoader};
//! use pocketchemist::modules::ModuleRegistry;
//! use pocketchemist::traits::CallValue;
//!
//! let mut loader = NativeUnitLoader::new();
//! loader.register(
//!     NativeUnit::builder("peaks")
//!         .callable("double", |args| Ok(vec![CallValue::F64(args[0].as_f64() * 2.0)]))
//!         .build(),
//! );
//!
//! let registry = ModuleRegistry::new(loader);
//! let present = registry.module("lineshapes", "peaks", "double");
//! let absent = registry.module("fitting", "lmfit", "minimize");
//!
//! assert!(present.resolve_callable().is_some());
//! assert!(absent.resolve_unit().is_none());
//! assert_eq!(registry.list_instances().len(), 2);
//! ```

mod chain;
mod module;
mod registry;

pub use chain::LoaderChain;
pub use module::Module;
pub use registry::{ModuleInfo, ModuleRegistry, Resolution};
