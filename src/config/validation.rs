// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration validation for the processor tree and module settings.
//!
//! Validation runs before anything is built, so a config with several
//! problems reports all of them at once. Checks performed:
//!
//! 1. **Processor types**: every node names a type the factory knows
//! 2. **Composition**: only composite types list children or set a failure strategy
//! 3. **Fuel bounds**: `minimum <= default <= maximum`
//! 4. **Module declarations**: category, name and callable are all non-empty
//!
//! Nodes are addressed by path: the root is `pipeline`, its second child
//! `pipeline/1`, that child's first child `pipeline/1/0`.
//!
//! # Example
//! ```rust
//! use pocketchemist::backends::local::ProcessorFactory;
//! use pocketchemist::config::{load_config_from_str, validate_config, ConfigFormat};
//! use pocketchemist::errors::ValidationError;
//!
//! let cfg = load_config_from_str(
//!     "pipeline: { processor: group, processors: [ { processor: fitter } ] }",
//!     ConfigFormat::Yaml,
//! )
//! .unwrap();
//!
//! let errors = validate_config(&cfg, &ProcessorFactory::new()).unwrap_err();
//! assert!(matches!(
//!     &errors[0],
//!     ValidationError::UnknownProcessorType { path, .. } if path == "pipeline/0"
//! ));
//! ```

use crate::backends::local::ProcessorFactory;
use crate::config::{Config, FuelConfig, ModuleDeclaration, ProcessorConfig};
use crate::errors::ValidationError;

/// Path of the pipeline root, used as the prefix of every node path.
pub const PIPELINE_ROOT: &str = "pipeline";

/// Validate a loaded configuration, collecting every problem found.
pub fn validate_config(cfg: &Config, factory: &ProcessorFactory) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_node(&cfg.pipeline, PIPELINE_ROOT, factory, &mut errors);
    validate_fuel(&cfg.modules.fuel, &mut errors);
    validate_declarations(&cfg.modules.declare, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_node(
    node: &ProcessorConfig,
    path: &str,
    factory: &ProcessorFactory,
    errors: &mut Vec<ValidationError>,
) {
    if !factory.is_registered(&node.processor) {
        errors.push(ValidationError::UnknownProcessorType {
            path: path.to_string(),
            processor_type: node.processor.clone(),
        });
    } else if !factory.is_composite(&node.processor) {
        if !node.processors.is_empty() {
            errors.push(ValidationError::ChildrenOnLeaf {
                path: path.to_string(),
                processor_type: node.processor.clone(),
            });
        }
        if node.failure_strategy.is_some() {
            errors.push(ValidationError::FailureStrategyOnLeaf {
                path: path.to_string(),
                processor_type: node.processor.clone(),
            });
        }
    }

    for (index, child) in node.processors.iter().enumerate() {
        validate_node(child, &format!("{}/{}", path, index), factory, errors);
    }
}

fn validate_fuel(fuel: &FuelConfig, errors: &mut Vec<ValidationError>) {
    let (minimum, default, maximum) = (fuel.get_minimum(), fuel.get_default(), fuel.get_maximum());
    if !(minimum <= default && default <= maximum) {
        errors.push(ValidationError::InvalidFuelBounds {
            minimum,
            default,
            maximum,
        });
    }
}

fn validate_declarations(declarations: &[ModuleDeclaration], errors: &mut Vec<ValidationError>) {
    for (index, declaration) in declarations.iter().enumerate() {
        let incomplete = [&declaration.category, &declaration.name, &declaration.callable]
            .iter()
            .any(|field| field.trim().is_empty());
        if incomplete {
            errors.push(ValidationError::IncompleteModuleDeclaration { index });
        }
    }
}
