// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{ProcessError, ProcessorError};
use crate::modules::{Module, ModuleRegistry};
use crate::processors::{Context, Params, ProcessorBase};
use crate::traits::{CallValue, NameStyle, ParamSchema, Processor};

use super::{key_list, string_param};

/// Category used when a `call_module` node does not name one.
pub const DEFAULT_MODULE_CATEGORY: &str = "optional";

/// Calls a callable of an optional module with scalar inputs read from the
/// context, and writes the results back.
///
/// The module is only resolved when the processor runs. An unavailable
/// module or callable is reported as
/// [`ProcessError::CapabilityUnavailable`] so the enclosing group's failure
/// strategy decides what happens next.
pub struct CallModuleProcessor {
    base: ProcessorBase,
    module: Module,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl ParamSchema for CallModuleProcessor {
    const TYPE_NAME: &'static str = "CallModule";
    const REQUIRED_PARAMS: &'static [&'static str] = &["module", "callable"];
    const OPTIONAL_PARAMS: &'static [&'static str] = &["category", "inputs", "output"];
}

impl CallModuleProcessor {
    pub fn new(registry: &ModuleRegistry, name: Option<String>, kwargs: Params) -> Result<Self, ProcessorError> {
        let base = ProcessorBase::new::<Self>(name, kwargs)?;

        let module_name = string_param(&base, "module")?;
        let callable = string_param(&base, "callable")?;
        let category = match base.get_param("category") {
            Some(_) => string_param(&base, "category")?,
            None => DEFAULT_MODULE_CATEGORY.to_string(),
        };
        let inputs = match base.get_param("inputs") {
            Some(_) => key_list(&string_param(&base, "inputs")?),
            None => Vec::new(),
        };
        let outputs = match base.get_param("output") {
            Some(_) => key_list(&string_param(&base, "output")?),
            None => Vec::new(),
        };

        Ok(Self {
            module: registry.module(category, module_name, callable),
            base,
            inputs,
            outputs,
        })
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    fn read_inputs(&self, context: &Context) -> Result<Vec<CallValue>, ProcessError> {
        self.inputs
            .iter()
            .map(|key| {
                let value = context.scalar(key).ok_or_else(|| ProcessError::MissingInput {
                    processor: self.name().to_string(),
                    key: key.clone(),
                })?;
                CallValue::from_param(value).ok_or_else(|| ProcessError::InvalidInput {
                    processor: self.name().to_string(),
                    key: key.clone(),
                    reason: format!("expected a number, got {} '{}'", value.kind(), value),
                })
            })
            .collect()
    }
}

impl Processor for CallModuleProcessor {
    fn base(&self) -> &ProcessorBase {
        &self.base
    }

    fn process(&self, context: &mut Context) -> Result<(), ProcessError> {
        let callable = self
            .module
            .resolve_callable()
            .ok_or_else(|| ProcessError::CapabilityUnavailable {
                processor: self.name().to_string(),
                module: self.module.name().to_string(),
                callable: self.module.callable_name().to_string(),
            })?;

        let args = self.read_inputs(context)?;
        let results = callable.call(&args).map_err(|source| ProcessError::Call {
            processor: self.name().to_string(),
            source,
        })?;

        if results.len() < self.outputs.len() {
            return Err(ProcessError::Failed {
                processor: self.name().to_string(),
                reason: format!(
                    "'{}' returned {} value(s) but {} output key(s) are configured",
                    callable.name(),
                    results.len(),
                    self.outputs.len()
                ),
            });
        }

        for (key, value) in self.outputs.iter().zip(results) {
            context.insert_scalar(key.clone(), value.into_param());
        }
        Ok(())
    }

    fn render_styled(
        &self,
        level: usize,
        indent_width: usize,
        item_number: Option<usize>,
        style: NameStyle,
    ) -> Vec<String> {
        let mut lines = vec![self.base.render_line_styled(level, indent_width, item_number, style)];
        let pad = " ".repeat(level * indent_width);
        lines.extend(
            self.module
                .render_cached(indent_width, None, &[])
                .into_iter()
                .skip(1)
                .map(|line| format!("{pad}{line}")),
        );
        lines
    }
}
