// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::local::ProcessorFactory;
use crate::config::consts::{DEFAULT_FUEL_LEVEL, MAX_FUEL_LEVEL, MIN_FUEL_LEVEL};
use crate::config::validate_config;
use crate::errors::{ConfigError, FailureStrategy};
use crate::processors::Params;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration: where optional modules come from, and the
/// processor tree to run.
///
/// # Fields
/// * `modules` - Module search paths, fuel budget and declared modules (optional)
/// * `pipeline` - The root processor, usually a group
///
/// # Example
/// ```yaml
/// modules:
///   search_paths: ["plugins"]
///   declare:
///     - { category: lineshapes, name: peaks, callable: gaussian }
/// pipeline:
///   processor: group
///   name: Main
///   processors:
///     - processor: set_value
///       params: { key: x, value: 2.0 }
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub modules: ModulesConfig,
    pub pipeline: ProcessorConfig,
}

/// Optional-module settings.
///
/// # Fields
/// * `search_paths` - Directories searched for `<name>.wasm` units, in order
/// * `fuel` - Fuel budget for each WASM call
/// * `declare` - Modules to report on even if no processor uses them
#[derive(Debug, Default, Deserialize)]
pub struct ModulesConfig {
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,
    #[serde(default)]
    pub fuel: FuelConfig,
    #[serde(default)]
    pub declare: Vec<ModuleDeclaration>,
}

/// A module listed up front so `modules` can report its availability.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModuleDeclaration {
    pub category: String,
    pub name: String,
    pub callable: String,
}

/// Fuel consumption configuration for WASM calls.
///
/// Fuel limits prevent infinite loops and resource exhaustion by limiting the number
/// of instructions a WASM callable can execute. All values are optional.
///
/// # Fields
/// * `default` - Fuel given to each call (defaults to 100M)
/// * `minimum` - Minimum allowed fuel level (defaults to 1M)
/// * `maximum` - Maximum allowed fuel level (defaults to 500M)
///
/// # Example
/// ```yaml
/// fuel:
///   default: 100000000   # 100 million instructions
///   minimum: 1000000     # 1 million instructions
///   maximum: 500000000   # 500 million instructions (hard limit)
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct FuelConfig {
    pub default: Option<u64>,
    pub minimum: Option<u64>,
    pub maximum: Option<u64>,
}

impl FuelConfig {
    /// Get the default fuel level, using built-in default if not configured.
    pub fn get_default(&self) -> u64 {
        self.default.unwrap_or(DEFAULT_FUEL_LEVEL)
    }

    /// Get the minimum fuel level, using built-in default if not configured.
    pub fn get_minimum(&self) -> u64 {
        self.minimum.unwrap_or(MIN_FUEL_LEVEL)
    }

    /// Get the maximum fuel level, using built-in default if not configured.
    pub fn get_maximum(&self) -> u64 {
        self.maximum.unwrap_or(MAX_FUEL_LEVEL)
    }

    /// Clamp a fuel level to the configured bounds.
    ///
    /// ```
    /// use pocketchemist::config::FuelConfig;
    ///
    /// let config = FuelConfig::default();
    /// assert_eq!(config.validate_and_clamp(1_000_000_000), 500_000_000);
    /// ```
    pub fn validate_and_clamp(&self, requested: u64) -> u64 {
        let min = self.get_minimum();
        let max = self.get_maximum().max(min);
        requested.clamp(min, max)
    }
}

/// One node of the processor tree.
///
/// # Fields
/// * `processor` - Registered processor type, e.g. `group` or `call_module`
/// * `name` - Display name (optional, defaults to the type name)
/// * `params` - Keyword parameters handed to the constructor
/// * `failure_strategy` - Only meaningful on groups (optional, defaults to `fail_fast`)
/// * `processors` - Children; only groups may have them
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessorConfig {
    pub processor: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub failure_strategy: Option<FailureStrategy>,
    #[serde(default)]
    pub processors: Vec<ProcessorConfig>,
}

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "toml" => Ok(ConfigFormat::Toml),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Parse a config held in memory.
pub fn load_config_from_str(content: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
    let cfg = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
    };
    Ok(cfg)
}

/// Load a config from a YAML or TOML file, chosen by extension.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_config_from_str(&content, format)
}

/// Load a config and check it against the processor types `factory` knows.
pub fn load_and_validate_config<P: AsRef<Path>>(
    path: P,
    factory: &ProcessorFactory,
) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    validate_config(&cfg, factory).map_err(ConfigError::Validation)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::ParamValue;

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
modules:
  search_paths: [plugins, /opt/units]
  declare:
    - { category: lineshapes, name: peaks, callable: gaussian }
pipeline:
  processor: group
  name: Main
  failure_strategy: continue_on_error
  processors:
    - processor: set_value
      params: { key: x, value: 2.0 }
    - processor: call_module
      name: Doubler
      params: { module: arith, callable: double, inputs: x, output: y }
"#;

        let cfg = load_config_from_str(yaml, ConfigFormat::Yaml).unwrap();
        assert_eq!(cfg.modules.search_paths, vec![PathBuf::from("plugins"), PathBuf::from("/opt/units")]);
        assert_eq!(cfg.modules.declare[0].callable, "gaussian");
        assert_eq!(cfg.pipeline.name.as_deref(), Some("Main"));
        assert_eq!(cfg.pipeline.failure_strategy, Some(FailureStrategy::ContinueOnError));
        assert_eq!(cfg.pipeline.processors.len(), 2);
        assert_eq!(cfg.pipeline.processors[0].params.get("value"), Some(&ParamValue::Float(2.0)));
        assert_eq!(cfg.pipeline.processors[1].name.as_deref(), Some("Doubler"));
    }

    #[test]
    fn parse_toml_config() {
        let toml = r#"
[modules]
search_paths = ["plugins"]

[modules.fuel]
default = 2000000

[pipeline]
processor = "group"

[[pipeline.processors]]
processor = "set_value"
params = { key = "width", value = { value = 1.5, min = 0.0, max = 3.0 } }
"#;

        let cfg = load_config_from_str(toml, ConfigFormat::Toml).unwrap();
        assert_eq!(cfg.modules.fuel.get_default(), 2_000_000);
        let value = cfg.pipeline.processors[0].params.get("value").unwrap();
        let parameter = value.as_parameter().unwrap();
        assert_eq!(parameter.value, 1.5);
        assert_eq!(parameter.max, Some(3.0));
        assert!(parameter.vary);
    }

    #[test]
    fn test_parameter_values_keep_their_kind() {
        let yaml = r#"
pipeline:
  processor: set_value
  params: { count: 3, scale: 0.5, label: peak, width: { value: 1.0, vary: false } }
"#;

        let cfg = load_config_from_str(yaml, ConfigFormat::Yaml).unwrap();
        let params = &cfg.pipeline.params;
        assert_eq!(params.get("count"), Some(&ParamValue::Int(3)));
        assert_eq!(params.get("scale"), Some(&ParamValue::Float(0.5)));
        assert_eq!(params.get("label"), Some(&ParamValue::Str("peak".to_string())));
        assert_eq!(params.get("width").and_then(|v| v.as_parameter()).map(|p| p.vary), Some(false));
    }

    #[test]
    fn test_format_from_extension() {
        let cases = [
            ("pipeline.yaml", Some(ConfigFormat::Yaml)),
            ("pipeline.YML", Some(ConfigFormat::Yaml)),
            ("pipeline.toml", Some(ConfigFormat::Toml)),
            ("pipeline.json", None),
            ("pipeline", None),
        ];

        for (path, expected) in cases {
            let result = ConfigFormat::from_path(Path::new(path));
            match expected {
                Some(format) => assert_eq!(result.unwrap(), format, "{path}"),
                None => assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))), "{path}"),
            }
        }
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.yaml"));
    }

    #[test]
    fn test_modules_section_defaults() {
        let yaml = r#"
pipeline:
  processor: group
"#;

        let cfg = load_config_from_str(yaml, ConfigFormat::Yaml).unwrap();
        assert!(cfg.modules.search_paths.is_empty());
        assert!(cfg.modules.declare.is_empty());
        assert_eq!(cfg.modules.fuel.get_default(), 100_000_000);
        assert_eq!(cfg.modules.fuel.get_minimum(), 1_000_000);
        assert_eq!(cfg.modules.fuel.get_maximum(), 500_000_000);
        assert!(cfg.pipeline.failure_strategy.is_none());
    }

    #[test]
    fn test_fuel_config_validate_and_clamp() {
        let config = FuelConfig {
            default: Some(100_000_000),
            minimum: Some(10_000_000),
            maximum: Some(200_000_000),
        };

        // Within bounds - no change
        assert_eq!(config.validate_and_clamp(50_000_000), 50_000_000);

        // Below minimum - clamped to minimum
        assert_eq!(config.validate_and_clamp(1_000_000), 10_000_000);

        // Above maximum - clamped to maximum
        assert_eq!(config.validate_and_clamp(1_000_000_000), 200_000_000);

        // Exactly at bounds
        assert_eq!(config.validate_and_clamp(10_000_000), 10_000_000);
        assert_eq!(config.validate_and_clamp(200_000_000), 200_000_000);
    }

    #[test]
    fn test_fuel_config_validate_with_defaults() {
        let config = FuelConfig::default();

        assert_eq!(config.validate_and_clamp(50_000_000), 50_000_000);
        assert_eq!(config.validate_and_clamp(100), 1_000_000);
        assert_eq!(config.validate_and_clamp(1_000_000_000), 500_000_000);
    }
}
