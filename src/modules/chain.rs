// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::errors::UnitError;
use crate::traits::{ExternalUnit, UnitLoader};

/// Tries several loaders in order; the first one that loads a unit wins.
///
/// If every loader fails, the last non-`NotFound` error is returned so a
/// broken unit is not reported as merely missing.
#[derive(Default)]
pub struct LoaderChain {
    loaders: Vec<Box<dyn UnitLoader>>,
}

impl LoaderChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, loader: impl UnitLoader + 'static) -> Self {
        self.push(Box::new(loader));
        self
    }

    pub fn push(&mut self, loader: Box<dyn UnitLoader>) {
        self.loaders.push(loader);
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

impl UnitLoader for LoaderChain {
    fn load(&self, name: &str) -> Result<Arc<dyn ExternalUnit>, UnitError> {
        let mut last_error = None;

        for loader in &self.loaders {
            match loader.load(name) {
                Ok(unit) => return Ok(unit),
                Err(UnitError::NotFound(_)) => continue,
                Err(error) => last_error = Some(error),
            }
        }

        Err(last_error.unwrap_or_else(|| UnitError::NotFound(name.to_string())))
    }

    fn describe(&self) -> String {
        let names: Vec<String> = self.loaders.iter().map(|l| l.describe()).collect();
        format!("chain[{}]", names.join(", "))
    }
}
