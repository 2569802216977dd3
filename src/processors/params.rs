// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Parameter values carried by processors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Named processor parameters, ordered by name so rendering is stable.
pub type Params = BTreeMap<String, ParamValue>;

/// A fit parameter: a value with optional bounds and a flag telling a
/// fitting routine whether it may vary.
///
/// # Example
/// ```yaml
/// width: { value: 1.5, min: 0.0, max: 10.0, vary: true }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitParameter {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default = "default_vary")]
    pub vary: bool,
}

fn default_vary() -> bool {
    true
}

impl FitParameter {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            min: None,
            max: None,
            vary: true,
        }
    }

    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn fixed(mut self) -> Self {
        self.vary = false;
        self
    }
}

impl fmt::Display for FitParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parameter(value={:?}", self.value)?;
        if let Some(min) = self.min {
            write!(f, ", min={:?}", min)?;
        }
        if let Some(max) = self.max {
            write!(f, ", max={:?}", max)?;
        }
        write!(f, ", vary={})", self.vary)
    }
}

/// A single parameter value.
///
/// Deserialization is untagged: integers become `Int`, other numbers `Float`,
/// strings `Str` and mappings with a `value` field `Parameter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Str(String),
    Parameter(FitParameter),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value. Fit parameters yield their current value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(i) => Some(*i as f64),
            ParamValue::Float(v) => Some(*v),
            ParamValue::Parameter(p) => Some(p.value),
            ParamValue::Str(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_parameter(&self) -> Option<&FitParameter> {
        match self {
            ParamValue::Parameter(p) => Some(p),
            _ => None,
        }
    }

    /// Short label for the kind of value, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ParamValue::Int(_) => "integer",
            ParamValue::Float(_) => "float",
            ParamValue::Str(_) => "string",
            ParamValue::Parameter(_) => "parameter",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(v) => write!(f, "{:?}", v),
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Parameter(p) => write!(f, "{}", p),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<FitParameter> for ParamValue {
    fn from(value: FitParameter) -> Self {
        ParamValue::Parameter(value)
    }
}

/// Builds a [`Params`] map from `name => value` pairs.
///
/// ```
/// use pocketchemist::params;
/// use pocketchemist::processors::ParamValue;
///
/// let kwargs = params! { "x" => 5, "label" => "peak" };
/// assert_eq!(kwargs["x"], ParamValue::Int(5));
/// ```
#[macro_export]
macro_rules! params {
    () => { $crate::processors::Params::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::processors::Params::new();
        $( map.insert(($key).to_string(), $crate::processors::ParamValue::from($value)); )+
        map
    }};
}
