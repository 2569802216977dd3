// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Abstractions for optional external units and the callables they export.

use std::fmt;
use std::sync::Arc;

use crate::errors::UnitError;
use crate::processors::ParamValue;

/// A scalar passed to or returned from an external callable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CallValue {
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

impl CallValue {
    pub fn as_f64(self) -> f64 {
        match self {
            CallValue::I32(v) => v as f64,
            CallValue::I64(v) => v as f64,
            CallValue::F32(v) => v as f64,
            CallValue::F64(v) => v,
        }
    }

    /// Integer view; floats are truncated toward zero.
    pub fn as_i64(self) -> i64 {
        match self {
            CallValue::I32(v) => v as i64,
            CallValue::I64(v) => v,
            CallValue::F32(v) => v as i64,
            CallValue::F64(v) => v as i64,
        }
    }

    /// Integer value without loss, or `None` for floats that are not finite,
    /// have a fractional part or fall outside the `i64` range.
    pub fn to_i64_exact(self) -> Option<i64> {
        // 2^63 is exactly representable; i64::MAX is not.
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;
        let exact = |v: f64| (v.is_finite() && v.fract() == 0.0 && (-LIMIT..LIMIT).contains(&v)).then_some(v as i64);
        match self {
            CallValue::I32(v) => Some(v as i64),
            CallValue::I64(v) => Some(v),
            CallValue::F32(v) => exact(v as f64),
            CallValue::F64(v) => exact(v),
        }
    }

    /// Convert a scalar parameter. Strings have no numeric form.
    pub fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Int(i) => Some(CallValue::I64(*i)),
            ParamValue::Str(_) => None,
            other => other.as_f64().map(CallValue::F64),
        }
    }

    pub fn into_param(self) -> ParamValue {
        match self {
            CallValue::I32(v) => ParamValue::Int(v as i64),
            CallValue::I64(v) => ParamValue::Int(v),
            CallValue::F32(v) => ParamValue::Float(v as f64),
            CallValue::F64(v) => ParamValue::Float(v),
        }
    }
}

impl fmt::Display for CallValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallValue::I32(v) => write!(f, "{}", v),
            CallValue::I64(v) => write!(f, "{}", v),
            CallValue::F32(v) => write!(f, "{:?}", v),
            CallValue::F64(v) => write!(f, "{:?}", v),
        }
    }
}

/// A named function exported by an external unit.
pub trait UnitCallable: Send + Sync {
    fn name(&self) -> &str;

    fn call(&self, args: &[CallValue]) -> Result<Vec<CallValue>, UnitError>;
}

/// A loaded external unit.
pub trait ExternalUnit: Send + Sync {
    fn name(&self) -> &str;

    /// Where the unit came from (a file path, or the loader's name).
    fn origin(&self) -> String;

    /// Look up an exported callable. Repeated lookups return the same `Arc`.
    fn callable(&self, name: &str) -> Option<Arc<dyn UnitCallable>>;

    /// Names of every exported callable, sorted.
    fn callable_names(&self) -> Vec<String>;
}

/// Loads external units by name.
///
/// Loaders are consulted by the module registry at most once per name;
/// they do not need to cache.
pub trait UnitLoader: Send + Sync {
    fn load(&self, name: &str) -> Result<Arc<dyn ExternalUnit>, UnitError>;

    /// Short label used in log messages.
    fn describe(&self) -> String;
}
