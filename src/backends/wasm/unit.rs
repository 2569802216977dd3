// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! WASM units: core modules found on disk whose exported functions become
//! callables.
//!
//! Every call runs in a fresh `Store` with its own fuel budget, so calls are
//! isolated from each other and cannot loop forever. Modules are
//! instantiated without imports; a module that imports anything loads
//! (its exports are listed) but every call fails at instantiation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use wasmtime::{Config, Engine, ExternType, Linker, Module, Store, Val, ValType};

use super::detector::ensure_core_module;
use super::error::{WasmError, WasmResult};
use super::loader::{locate_unit, read_unit_bytes};
use crate::config::consts::DEFAULT_FUEL_LEVEL;
use crate::errors::UnitError;
use crate::observability::messages::wasm::{
    CallCompleted, CallFailed, ModuleCompiled, ModuleNotOnSearchPath,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{CallValue, ExternalUnit, UnitCallable, UnitLoader};

/// Loads `<name>.wasm` units from a list of directories.
pub struct WasmUnitLoader {
    search_paths: Vec<PathBuf>,
    engine: Engine,
    fuel: u64,
}

impl WasmUnitLoader {
    pub fn new(search_paths: Vec<PathBuf>) -> WasmResult<Self> {
        Ok(Self {
            search_paths,
            engine: Self::create_engine()?,
            fuel: DEFAULT_FUEL_LEVEL,
        })
    }

    /// Fuel given to each call.
    pub fn with_fuel(mut self, fuel: u64) -> Self {
        self.fuel = fuel;
        self
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    pub fn fuel(&self) -> u64 {
        self.fuel
    }

    fn create_engine() -> WasmResult<Engine> {
        let mut config = Config::new();

        // Each instruction consumes fuel; when fuel runs out, execution traps.
        config.consume_fuel(true);

        Engine::new(&config).map_err(|e| WasmError::EngineError(e.to_string()))
    }

    fn compile(&self, name: &str, path: &Path) -> WasmResult<WasmUnit> {
        let bytes = read_unit_bytes(path)?;
        ensure_core_module(&bytes)?;

        let module =
            Module::new(&self.engine, &bytes).map_err(|e| WasmError::ModuleError(e.to_string()))?;

        let mut callables: BTreeMap<String, Arc<dyn UnitCallable>> = BTreeMap::new();
        for export in module.exports() {
            if let ExternType::Func(func_type) = export.ty() {
                let callable = WasmCallable {
                    unit: name.to_string(),
                    export: export.name().to_string(),
                    engine: self.engine.clone(),
                    module: module.clone(),
                    params: func_type.params().collect(),
                    result_count: func_type.results().len(),
                    fuel: self.fuel,
                };
                callables.insert(export.name().to_string(), Arc::new(callable));
            }
        }

        ModuleCompiled {
            module_path: &path.display().to_string(),
            exported_functions: callables.len(),
        }
        .log();

        Ok(WasmUnit {
            name: name.to_string(),
            path: path.to_path_buf(),
            callables,
        })
    }
}

impl UnitLoader for WasmUnitLoader {
    fn load(&self, name: &str) -> Result<Arc<dyn ExternalUnit>, UnitError> {
        let Some(path) = locate_unit(&self.search_paths, name) else {
            ModuleNotOnSearchPath {
                name,
                searched: self.search_paths.len(),
            }
            .log();
            return Err(UnitError::NotFound(name.to_string()));
        };

        let unit = self.compile(name, &path)?;
        Ok(Arc::new(unit))
    }

    fn describe(&self) -> String {
        "wasm".to_string()
    }
}

/// A compiled WASM module.
pub struct WasmUnit {
    name: String,
    path: PathBuf,
    callables: BTreeMap<String, Arc<dyn UnitCallable>>,
}

impl WasmUnit {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExternalUnit for WasmUnit {
    fn name(&self) -> &str {
        &self.name
    }

    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    fn callable(&self, name: &str) -> Option<Arc<dyn UnitCallable>> {
        self.callables.get(name).cloned()
    }

    fn callable_names(&self) -> Vec<String> {
        self.callables.keys().cloned().collect()
    }
}

/// An exported WASM function.
pub struct WasmCallable {
    unit: String,
    export: String,
    engine: Engine,
    module: Module,
    params: Vec<ValType>,
    result_count: usize,
    fuel: u64,
}

impl WasmCallable {
    fn invoke(&self, args: &[CallValue]) -> Result<Vec<CallValue>, UnitError> {
        if args.len() != self.params.len() {
            return Err(UnitError::ArityMismatch {
                callable: self.export.clone(),
                expected: self.params.len(),
                got: args.len(),
            });
        }

        let inputs = args
            .iter()
            .zip(&self.params)
            .map(|(arg, ty)| to_val(&self.export, *arg, ty))
            .collect::<WasmResult<Vec<Val>>>()?;

        let mut store = Store::new(&self.engine, ());
        store.set_fuel(self.fuel).map_err(WasmError::from)?;

        let linker = Linker::new(&self.engine);
        let instance = linker
            .instantiate(&mut store, &self.module)
            .map_err(WasmError::from)?;
        let func = instance.get_func(&mut store, &self.export).ok_or_else(|| {
            WasmError::ModuleError(format!("export '{}' is not a function", self.export))
        })?;

        let start_time = Instant::now();
        let mut outputs = vec![Val::I32(0); self.result_count];
        func.call(&mut store, &inputs, &mut outputs)
            .map_err(WasmError::from)?;

        let remaining = store.get_fuel().unwrap_or(0);
        CallCompleted {
            unit: &self.unit,
            callable: &self.export,
            fuel_consumed: self.fuel.saturating_sub(remaining),
            duration: start_time.elapsed(),
        }
        .log();

        outputs
            .iter()
            .map(|val| from_val(&self.export, val))
            .collect::<WasmResult<Vec<CallValue>>>()
            .map_err(UnitError::from)
    }
}

impl UnitCallable for WasmCallable {
    fn name(&self) -> &str {
        &self.export
    }

    fn call(&self, args: &[CallValue]) -> Result<Vec<CallValue>, UnitError> {
        let result = self.invoke(args);
        if let Err(error) = &result {
            CallFailed {
                unit: &self.unit,
                callable: &self.export,
                error,
            }
            .log();
        }
        result
    }
}

/// Coerce an argument to the parameter type the export declares.
fn to_val(export: &str, arg: CallValue, ty: &ValType) -> WasmResult<Val> {
    match ty {
        ValType::I32 => arg
            .to_i64_exact()
            .and_then(|value| i32::try_from(value).ok())
            .map(Val::I32)
            .ok_or_else(|| integer_mismatch(export, arg, "i32")),
        ValType::I64 => arg
            .to_i64_exact()
            .map(Val::I64)
            .ok_or_else(|| integer_mismatch(export, arg, "i64")),
        ValType::F32 => Ok(Val::F32((arg.as_f64() as f32).to_bits())),
        ValType::F64 => Ok(Val::F64(arg.as_f64().to_bits())),
        other => Err(WasmError::UnsupportedSignature {
            export: export.to_string(),
            reason: format!("parameter type {:?} is not a number", other),
        }),
    }
}

fn integer_mismatch(export: &str, arg: CallValue, ty: &str) -> WasmError {
    WasmError::ValidationError(format!(
        "argument {} is not exactly representable as the {} parameter of '{}'",
        arg, ty, export
    ))
}

fn from_val(export: &str, val: &Val) -> WasmResult<CallValue> {
    match val {
        Val::I32(v) => Ok(CallValue::I32(*v)),
        Val::I64(v) => Ok(CallValue::I64(*v)),
        Val::F32(bits) => Ok(CallValue::F32(f32::from_bits(*bits))),
        Val::F64(bits) => Ok(CallValue::F64(f64::from_bits(*bits))),
        _ => Err(WasmError::UnsupportedSignature {
            export: export.to_string(),
            reason: "result type is not a number".to_string(),
        }),
    }
}
