// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use tempfile::TempDir;

use crate::backends::local::ProcessorFactory;
use crate::backends::native::{expect_arity, NativeUnit, NativeUnitLoader};
use crate::config::{load_and_validate_config, load_config, RuntimeBuilder};
use crate::errors::{ConfigError, FailureStrategy, ProcessError, ValidationError};
use crate::processors::{Context, ParamValue};
use crate::traits::CallValue;

const SCALE_WAT: &str = r#"
(module
  (func (export "double") (param f64) (result f64)
    local.get 0
    f64.const 2
    f64.mul))
"#;

/// Write `config` plus a `scale.wasm` unit into a fresh directory whose
/// `plugins` subdirectory is the module search path.
fn workspace(file_name: &str, config: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let plugins = dir.path().join("plugins");
    std::fs::create_dir(&plugins).unwrap();
    std::fs::write(plugins.join("scale.wasm"), wat::parse_str(SCALE_WAT).unwrap()).unwrap();

    let config = config.replace("@PLUGINS@", &plugins.display().to_string());
    std::fs::write(dir.path().join(file_name), config).unwrap();
    dir
}

fn config_path(dir: &TempDir, file_name: &str) -> PathBuf {
    dir.path().join(file_name)
}

const PIPELINE_YAML: &str = r#"
modules:
  search_paths: ["@PLUGINS@"]
  fuel: { default: 5000000 }
  declare:
    - { category: lineshapes, name: scale, callable: double }
    - { category: fitting, name: lmfit, callable: minimize }
pipeline:
  processor: group
  name: Main
  failure_strategy: continue_on_error
  processors:
    - processor: set_value
      name: Seed
      params: { key: x, value: 2.5 }
    - processor: call_module
      name: Doubler
      params: { module: scale, callable: double, inputs: x, output: y }
    - processor: call_module
      name: Fitter
      params: { category: fitting, module: lmfit, callable: minimize, inputs: y, output: z }
"#;

#[test]
fn test_yaml_pipeline_runs_end_to_end() {
    let dir = workspace("pipeline.yaml", PIPELINE_YAML);
    let config = load_and_validate_config(config_path(&dir, "pipeline.yaml"), &ProcessorFactory::new()).unwrap();
    assert_eq!(config.pipeline.failure_strategy, Some(FailureStrategy::ContinueOnError));

    let runtime = RuntimeBuilder::from_config(&config).unwrap();
    let mut context = Context::new();
    let err = runtime.run(&mut context).unwrap_err();

    // The WASM module ran; the absent one is reported once the group finishes.
    assert_eq!(context.scalar("y"), Some(&ParamValue::Float(5.0)));
    assert!(!context.contains_key("z"));
    match err {
        ProcessError::ChildrenFailed { group, failures } => {
            assert_eq!(group, "Main");
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].index, 3);
            assert!(matches!(
                failures[0].error,
                ProcessError::CapabilityUnavailable { ref module, .. } if module == "lmfit"
            ));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_module_report_for_declared_modules() {
    let dir = workspace("pipeline.yaml", PIPELINE_YAML);
    let config = load_config(config_path(&dir, "pipeline.yaml")).unwrap();
    let runtime = RuntimeBuilder::from_config(&config).unwrap();

    assert_eq!(runtime.declared_modules().len(), 2);
    // Two declared modules plus the two held by call_module processors.
    assert_eq!(runtime.registry().list_instances().len(), 4);

    let report = runtime.registry().render_modules(2);
    assert_eq!(
        &report[..6],
        &[
            "1. lineshapes: scale.double".to_string(),
            "  module 'scale': AVAILABLE".to_string(),
            "  callable 'double': AVAILABLE".to_string(),
            "2. fitting: lmfit.minimize".to_string(),
            "  module 'lmfit': NOT FOUND".to_string(),
            "  callable 'minimize': NOT FOUND".to_string(),
        ]
    );
    assert_eq!(runtime.registry().cached_names(), vec!["lmfit".to_string(), "scale".to_string()]);
}

#[test]
fn test_pipeline_tree_rendering() {
    let dir = workspace("pipeline.yaml", PIPELINE_YAML);
    let config = load_config(config_path(&dir, "pipeline.yaml")).unwrap();
    let runtime = RuntimeBuilder::from_config(&config).unwrap();

    let lines = runtime.render_pipeline(2);
    assert_eq!(lines[0], "Main");
    assert_eq!(runtime.pipeline().describe(), "Main(number_processors=3)");
    assert_eq!(lines[1], "  1. Seed(key=x, value=2.5)");
    assert!(lines[2].starts_with("  2. Doubler(callable=double, inputs=x, module=scale, output=y)"));
}

#[test]
fn test_toml_pipeline_with_native_units() {
    let toml = r#"
[pipeline]
processor = "group"
name = "Main"

[[pipeline.processors]]
processor = "set_value"
params = { key = "a", value = 7 }

[[pipeline.processors]]
processor = "call_module"
params = { module = "arith", callable = "negate", inputs = "a", output = "b" }
"#;
    let dir = workspace("pipeline.toml", toml);
    let config = load_config(config_path(&dir, "pipeline.toml")).unwrap();

    let mut native = NativeUnitLoader::new();
    native.register(
        NativeUnit::builder("arith")
            .callable("negate", |args: &[CallValue]| {
                expect_arity("negate", args, 1)?;
                Ok(vec![CallValue::I64(-args[0].as_i64())])
            })
            .build(),
    );

    let runtime = RuntimeBuilder::new().with_native_units(native).build(&config).unwrap();
    let mut context = Context::new();
    runtime.run(&mut context).unwrap();
    assert_eq!(context.scalar("b"), Some(&ParamValue::Int(-7)));
}

#[test]
fn test_invalid_config_is_rejected_before_building() {
    let yaml = r#"
modules:
  fuel: { default: 10, minimum: 100, maximum: 50 }
pipeline:
  processor: group
  processors:
    - processor: fitter
"#;
    let dir = workspace("pipeline.yml", yaml);
    let config = load_config(config_path(&dir, "pipeline.yml")).unwrap();

    match RuntimeBuilder::from_config(&config) {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors.len(), 2);
            assert!(matches!(errors[0], ValidationError::UnknownProcessorType { .. }));
            assert!(matches!(errors[1], ValidationError::InvalidFuelBounds { .. }));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("invalid config was accepted"),
    }
}

#[test]
fn test_custom_processor_type() {
    let yaml = r#"
pipeline:
  processor: group
  processors:
    - processor: seed_many
      params: { count: 3 }
"#;
    let dir = workspace("pipeline.yaml", yaml);
    let config = load_config(config_path(&dir, "pipeline.yaml")).unwrap();

    let mut builder = RuntimeBuilder::new();
    builder.factory_mut().register("seed_many", |_, name, params| {
        let count = params.get("count").and_then(|v| v.as_i64()).unwrap_or(0);
        let mut group = crate::processors::GroupProcessor::new(name);
        for i in 0..count {
            group.add(crate::backends::local::SetValueProcessor::new(
                None,
                crate::params! { "key" => format!("k{i}"), "value" => i },
            )?);
        }
        Ok(Box::new(group))
    });

    let runtime = builder.build(&config).unwrap();
    let mut context = Context::new();
    runtime.run(&mut context).unwrap();
    assert_eq!(context.scalar("k2"), Some(&ParamValue::Int(2)));
}

#[test]
fn test_unsupported_extension() {
    let dir = workspace("pipeline.json", "{}");
    assert!(matches!(
        load_config(config_path(&dir, "pipeline.json")),
        Err(ConfigError::UnsupportedFormat(_))
    ));
}
