// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-process units: callables registered as Rust closures.
//!
//! Useful for capabilities compiled into the host binary behind a cargo
//! feature, and for tests that need a unit to be present.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::errors::UnitError;
use crate::traits::{CallValue, ExternalUnit, UnitCallable, UnitLoader};

type NativeFn = dyn Fn(&[CallValue]) -> Result<Vec<CallValue>, UnitError> + Send + Sync;

/// A closure exposed as a unit callable.
pub struct NativeCallable {
    name: String,
    func: Box<NativeFn>,
}

impl UnitCallable for NativeCallable {
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, args: &[CallValue]) -> Result<Vec<CallValue>, UnitError> {
        (self.func)(args)
    }
}

/// A named set of native callables.
pub struct NativeUnit {
    name: String,
    callables: BTreeMap<String, Arc<dyn UnitCallable>>,
}

impl NativeUnit {
    pub fn builder(name: impl Into<String>) -> NativeUnitBuilder {
        NativeUnitBuilder {
            name: name.into(),
            callables: BTreeMap::new(),
        }
    }
}

impl ExternalUnit for NativeUnit {
    fn name(&self) -> &str {
        &self.name
    }

    fn origin(&self) -> String {
        "native".to_string()
    }

    fn callable(&self, name: &str) -> Option<Arc<dyn UnitCallable>> {
        self.callables.get(name).cloned()
    }

    fn callable_names(&self) -> Vec<String> {
        self.callables.keys().cloned().collect()
    }
}

pub struct NativeUnitBuilder {
    name: String,
    callables: BTreeMap<String, Arc<dyn UnitCallable>>,
}

impl NativeUnitBuilder {
    pub fn callable<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[CallValue]) -> Result<Vec<CallValue>, UnitError> + Send + Sync + 'static,
    {
        let name = name.into();
        self.callables.insert(
            name.clone(),
            Arc::new(NativeCallable {
                name,
                func: Box::new(func),
            }),
        );
        self
    }

    pub fn build(self) -> NativeUnit {
        NativeUnit {
            name: self.name,
            callables: self.callables,
        }
    }
}

/// Catalog of native units, looked up by name.
#[derive(Default)]
pub struct NativeUnitLoader {
    units: HashMap<String, Arc<NativeUnit>>,
}

impl NativeUnitLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit, replacing any unit of the same name.
    pub fn register(&mut self, unit: NativeUnit) -> &mut Self {
        self.units.insert(unit.name.clone(), Arc::new(unit));
        self
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }
}

impl UnitLoader for NativeUnitLoader {
    fn load(&self, name: &str) -> Result<Arc<dyn ExternalUnit>, UnitError> {
        self.units
            .get(name)
            .map(|unit| Arc::clone(unit) as Arc<dyn ExternalUnit>)
            .ok_or_else(|| UnitError::NotFound(name.to_string()))
    }

    fn describe(&self) -> String {
        "native".to_string()
    }
}

/// Checks a native callable received exactly `expected` arguments.
pub fn expect_arity(callable: &str, args: &[CallValue], expected: usize) -> Result<(), UnitError> {
    if args.len() != expected {
        return Err(UnitError::ArityMismatch {
            callable: callable.to_string(),
            expected,
            got: args.len(),
        });
    }
    Ok(())
}
