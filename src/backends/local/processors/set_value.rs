// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{ProcessError, ProcessorError};
use crate::processors::{Context, Params, ProcessorBase};
use crate::traits::{ParamSchema, Processor};

use super::string_param;

/// Seeds the context: writes its `value` parameter under `key`.
pub struct SetValueProcessor {
    base: ProcessorBase,
    key: String,
}

impl ParamSchema for SetValueProcessor {
    const TYPE_NAME: &'static str = "SetValue";
    const REQUIRED_PARAMS: &'static [&'static str] = &["key", "value"];
}

impl SetValueProcessor {
    pub fn new(name: Option<String>, kwargs: Params) -> Result<Self, ProcessorError> {
        let base = ProcessorBase::new::<Self>(name, kwargs)?;
        let key = string_param(&base, "key")?;
        Ok(Self { base, key })
    }
}

impl Processor for SetValueProcessor {
    fn base(&self) -> &ProcessorBase {
        &self.base
    }

    fn process(&self, context: &mut Context) -> Result<(), ProcessError> {
        let value = self
            .param("value")
            .map_err(|e| ProcessError::Failed {
                processor: self.name().to_string(),
                reason: e.to_string(),
            })?
            .clone();
        context.insert_scalar(self.key.clone(), value);
        Ok(())
    }
}
