// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{ProcessorConfig, PIPELINE_ROOT};
use crate::errors::{ConfigError, ProcessorError};
use crate::modules::ModuleRegistry;
use crate::observability::messages::processor::ProcessorInstantiationFailed;
use crate::observability::messages::StructuredLog;
use crate::processors::{GroupProcessor, Params};
use crate::traits::{ParamSchema, Processor};

use super::processors::*;

/// Builds one processor from its display name and keyword parameters.
///
/// The module registry is handed to every constructor so processors that
/// depend on optional modules can create their descriptors.
pub type ProcessorConstructor =
    dyn Fn(&ModuleRegistry, Option<String>, Params) -> Result<Box<dyn Processor>, ProcessorError> + Send + Sync;

struct Registration {
    constructor: Arc<ProcessorConstructor>,
    composite: bool,
}

/// Catalog of processor types available to configuration files.
///
/// Built-in types:
/// - `group` -> [`GroupProcessor`] (composite)
/// - `set_value` -> [`SetValueProcessor`]
/// - `call_module` -> [`CallModuleProcessor`]
///
/// Applications add their own types with [`register`](Self::register).
///
/// ```
/// use pocketchemist::backends::local::ProcessorFactory;
/// use pocketchemist::processors::GroupProcessor;
///
/// let mut factory = ProcessorFactory::new();
/// factory.register("noop", |_registry, name, _params| Ok(Box::new(GroupProcessor::new(name))));
///
/// assert!(factory.is_registered("noop"));
/// assert!(!factory.is_composite("noop"));
/// ```
pub struct ProcessorFactory {
    registrations: BTreeMap<String, Registration>,
}

impl Default for ProcessorFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessorFactory {
    pub const GROUP: &'static str = "group";
    pub const SET_VALUE: &'static str = "set_value";
    pub const CALL_MODULE: &'static str = "call_module";

    /// A factory with the built-in types registered.
    pub fn new() -> Self {
        let mut factory = Self::empty();
        factory.register_composite(Self::GROUP, |_, name, params| {
            Ok(Box::new(GroupProcessor::with_params(name, params)?))
        });
        factory.register(Self::SET_VALUE, |_, name, params| {
            Ok(Box::new(SetValueProcessor::new(name, params)?))
        });
        factory.register(Self::CALL_MODULE, |registry, name, params| {
            Ok(Box::new(CallModuleProcessor::new(registry, name, params)?))
        });
        factory
    }

    /// A factory with nothing registered.
    pub fn empty() -> Self {
        Self {
            registrations: BTreeMap::new(),
        }
    }

    /// Register a leaf processor type, replacing any previous registration.
    pub fn register<F>(&mut self, processor_type: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(&ModuleRegistry, Option<String>, Params) -> Result<Box<dyn Processor>, ProcessorError>
            + Send
            + Sync
            + 'static,
    {
        self.insert(processor_type.into(), Arc::new(constructor), false)
    }

    /// Register a type whose instances accept children.
    ///
    /// The constructed processor must answer `as_group_mut`.
    pub fn register_composite<F>(&mut self, processor_type: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(&ModuleRegistry, Option<String>, Params) -> Result<Box<dyn Processor>, ProcessorError>
            + Send
            + Sync
            + 'static,
    {
        self.insert(processor_type.into(), Arc::new(constructor), true)
    }

    fn insert(&mut self, processor_type: String, constructor: Arc<ProcessorConstructor>, composite: bool) -> &mut Self {
        self.registrations.insert(
            processor_type,
            Registration {
                constructor,
                composite,
            },
        );
        self
    }

    pub fn is_registered(&self, processor_type: &str) -> bool {
        self.registrations.contains_key(processor_type)
    }

    pub fn is_composite(&self, processor_type: &str) -> bool {
        self.registrations
            .get(processor_type)
            .map(|registration| registration.composite)
            .unwrap_or(false)
    }

    /// Registered type names, sorted.
    pub fn processor_types(&self) -> Vec<&str> {
        self.registrations.keys().map(String::as_str).collect()
    }

    /// Create a single processor of the given type.
    pub fn create(
        &self,
        processor_type: &str,
        registry: &ModuleRegistry,
        name: Option<String>,
        params: Params,
    ) -> Result<Box<dyn Processor>, ConfigError> {
        let registration = self
            .registrations
            .get(processor_type)
            .ok_or_else(|| ConfigError::UnknownProcessorType(processor_type.to_string()))?;
        (registration.constructor)(registry, name, params).map_err(|source| ConfigError::Construct {
            processor_type: processor_type.to_string(),
            source,
        })
    }

    /// Build the processor tree described by `node`, children included.
    pub fn build(&self, node: &ProcessorConfig, registry: &ModuleRegistry) -> Result<Box<dyn Processor>, ConfigError> {
        self.build_at(node, PIPELINE_ROOT, registry)
    }

    fn build_at(
        &self,
        node: &ProcessorConfig,
        path: &str,
        registry: &ModuleRegistry,
    ) -> Result<Box<dyn Processor>, ConfigError> {
        let registration = self
            .registrations
            .get(&node.processor)
            .ok_or_else(|| ConfigError::UnknownProcessorType(node.processor.clone()))?;

        let mut processor = (registration.constructor)(registry, node.name.clone(), node.params.clone())
            .map_err(|source| {
                ProcessorInstantiationFailed {
                    path,
                    processor_type: &node.processor,
                    reason: &source.to_string(),
                }
                .log();
                ConfigError::Build {
                    path: path.to_string(),
                    source,
                }
            })?;

        if node.processors.is_empty() && node.failure_strategy.is_none() {
            return Ok(processor);
        }

        let found = processor.name().to_string();
        let group = processor.as_group_mut().ok_or_else(|| ConfigError::Build {
            path: path.to_string(),
            source: ProcessorError::TypeMismatch {
                processor: found,
                expected: GroupProcessor::TYPE_NAME,
                found: node.processor.clone(),
            },
        })?;

        if let Some(strategy) = node.failure_strategy {
            group.set_failure_strategy(strategy);
        }
        for (index, child) in node.processors.iter().enumerate() {
            group.add_boxed(self.build_at(child, &format!("{}/{}", path, index), registry)?);
        }

        Ok(processor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::native::NativeUnitLoader;
    use crate::config::{load_config_from_str, ConfigFormat};
    use crate::errors::FailureStrategy;
    use crate::processors::{Context, ParamValue};

    fn registry() -> ModuleRegistry {
        ModuleRegistry::new(NativeUnitLoader::new())
    }

    fn node(yaml: &str) -> ProcessorConfig {
        load_config_from_str(&format!("pipeline: {}", yaml), ConfigFormat::Yaml)
            .unwrap()
            .pipeline
    }

    #[test]
    fn test_builtin_types() {
        let factory = ProcessorFactory::new();
        assert_eq!(factory.processor_types(), vec!["call_module", "group", "set_value"]);
        assert!(factory.is_composite("group"));
        assert!(!factory.is_composite("set_value"));
        assert!(!factory.is_composite("unknown"));
        assert!(ProcessorFactory::empty().processor_types().is_empty());
    }

    #[test]
    fn test_build_nested_tree() {
        let factory = ProcessorFactory::new();
        let registry = registry();
        let pipeline = node(
            r#"
  processor: group
  name: Main
  failure_strategy: best_effort
  processors:
    - processor: set_value
      params: { key: x, value: 1 }
    - processor: group
      name: Inner
      processors:
        - processor: set_value
          params: { key: y, value: 2 }
"#,
        );

        let mut root = factory.build(&pipeline, &registry).unwrap();
        assert_eq!(root.name(), "Main");
        let group = root.as_group_mut().unwrap();
        assert_eq!(group.failure_strategy(), FailureStrategy::BestEffort);
        assert_eq!(group.len(), 2);

        let mut context = Context::new();
        root.process(&mut context).unwrap();
        assert_eq!(context.scalar("x"), Some(&ParamValue::Int(1)));
        assert_eq!(context.scalar("y"), Some(&ParamValue::Int(2)));
    }

    #[test]
    fn test_children_on_leaf_is_type_mismatch() {
        let factory = ProcessorFactory::new();
        let pipeline = node(
            r#"
  processor: group
  processors:
    - processor: set_value
      name: Seed
      params: { key: x, value: 1 }
      processors:
        - processor: group
"#,
        );

        let err = factory.build(&pipeline, &registry()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Build { ref path, source: ProcessorError::TypeMismatch { expected: "GroupProcessor", ref found, .. } }
                if path == "pipeline/0" && found == "set_value"
        ));
        assert_eq!(
            err.to_string(),
            "Failed to build processor at 'pipeline/0': The Seed processor (type 'set_value') \
             cannot hold child processors; only a GroupProcessor can"
        );
    }

    #[test]
    fn test_build_errors_carry_path() {
        let factory = ProcessorFactory::new();
        let registry = registry();

        let missing = node(
            r#"
  processor: group
  processors:
    - processor: group
    - processor: group
      processors:
        - processor: call_module
          params: { module: peaks }
"#,
        );
        let err = factory.build(&missing, &registry).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Build { ref path, source: ProcessorError::MissingParameters { ref missing, .. } }
                if path == "pipeline/1/0" && missing == &vec!["callable".to_string()]
        ));

        let unknown = node("{ processor: fitter }");
        assert!(matches!(
            factory.build(&unknown, &registry),
            Err(ConfigError::UnknownProcessorType(name)) if name == "fitter"
        ));
    }

    #[test]
    fn test_custom_registration() {
        let mut factory = ProcessorFactory::empty();
        factory.register_composite("sequence", |_, name, _| Ok(Box::new(GroupProcessor::new(name))));

        let processor = factory
            .create("sequence", &registry(), Some("Seq".to_string()), Params::new())
            .unwrap();
        assert_eq!(processor.name(), "Seq");
        assert!(matches!(
            factory.create("group", &registry(), None, Params::new()),
            Err(ConfigError::UnknownProcessorType(_))
        ));
    }

    #[test]
    fn test_create_errors_name_the_processor_type() {
        let factory = ProcessorFactory::new();

        let err = factory
            .create(ProcessorFactory::SET_VALUE, &registry(), None, Params::new())
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Construct { ref processor_type, source: ProcessorError::MissingParameters { .. } }
                if processor_type == "set_value"
        ));
        assert!(err.to_string().starts_with("Failed to construct a 'set_value' processor: "));
    }
}
