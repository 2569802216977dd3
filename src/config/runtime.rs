// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::local::ProcessorFactory;
use crate::backends::native::NativeUnitLoader;
use crate::backends::wasm::WasmUnitLoader;
use crate::config::{validate_config, Config};
use crate::errors::{ConfigError, ProcessError};
use crate::modules::{LoaderChain, Module, ModuleRegistry};
use crate::processors::Context;
use crate::traits::Processor;

/// A configured pipeline, ready to run.
///
/// Owns the module registry shared by every processor in the tree and the
/// descriptors for modules declared in the config.
pub struct Runtime {
    registry: ModuleRegistry,
    pipeline: Box<dyn Processor>,
    declared: Vec<Module>,
}

impl Runtime {
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn pipeline(&self) -> &dyn Processor {
        self.pipeline.as_ref()
    }

    /// Descriptors for the modules listed under `modules.declare`.
    pub fn declared_modules(&self) -> &[Module] {
        &self.declared
    }

    /// Run the pipeline root against `context`.
    pub fn run(&self, context: &mut Context) -> Result<(), ProcessError> {
        self.pipeline.process(context)
    }

    /// The pipeline tree, one line per processor.
    pub fn render_pipeline(&self, indent_width: usize) -> Vec<String> {
        self.pipeline.render(0, indent_width, None)
    }
}

/// Runtime builder - turns a configuration into a [`Runtime`].
///
/// Units are looked up in-process first, then as `.wasm` files on the
/// configured search paths.
///
/// # Examples
///
/// ```
/// use pocketchemist::config::{load_config_from_str, ConfigFormat, RuntimeBuilder};
/// use pocketchemist::processors::{Context, ParamValue};
///
/// let config = load_config_from_str(
///     "pipeline: { processor: set_value, params: { key: x, value: 3 } }",
///     ConfigFormat::Yaml,
/// )
/// .unwrap();
///
/// let runtime = RuntimeBuilder::from_config(&config).unwrap();
/// let mut context = Context::new();
/// runtime.run(&mut context).unwrap();
///
/// assert_eq!(context.scalar("x"), Some(&ParamValue::Int(3)));
/// ```
#[derive(Default)]
pub struct RuntimeBuilder {
    factory: ProcessorFactory,
    native: NativeUnitLoader,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom processor catalog instead of the built-ins.
    pub fn with_factory(mut self, factory: ProcessorFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Make in-process units available ahead of WASM units.
    pub fn with_native_units(mut self, native: NativeUnitLoader) -> Self {
        self.native = native;
        self
    }

    pub fn factory_mut(&mut self) -> &mut ProcessorFactory {
        &mut self.factory
    }

    /// Build a runtime with the built-in processors and no native units.
    pub fn from_config(cfg: &Config) -> Result<Runtime, ConfigError> {
        Self::new().build(cfg)
    }

    /// Validate `cfg`, set up module loading and build the processor tree.
    pub fn build(self, cfg: &Config) -> Result<Runtime, ConfigError> {
        validate_config(cfg, &self.factory).map_err(ConfigError::Validation)?;

        let fuel = cfg.modules.fuel.validate_and_clamp(cfg.modules.fuel.get_default());
        let wasm = WasmUnitLoader::new(cfg.modules.search_paths.clone())?.with_fuel(fuel);
        let registry = ModuleRegistry::new(LoaderChain::new().with(self.native).with(wasm));

        let declared = cfg
            .modules
            .declare
            .iter()
            .map(|d| registry.module(d.category.clone(), d.name.clone(), d.callable.clone()))
            .collect();
        let pipeline = self.factory.build(&cfg.pipeline, &registry)?;

        Ok(Runtime {
            registry,
            pipeline,
            declared,
        })
    }
}
