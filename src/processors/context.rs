// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The working context threaded through a pipeline run.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use super::ParamValue;

type Entry = Box<dyn Any + Send + Sync>;

/// Keyed, heterogeneous store shared by every processor in a run.
///
/// Processors read their inputs from it and publish their outputs into it
/// for the stages that follow. Values of any `Send + Sync` type can be
/// stored; scalars are conventionally stored as [`ParamValue`].
///
/// ```
/// use pocketchemist::processors::{Context, ParamValue};
///
/// let mut context = Context::new();
/// context.insert("points", vec![1.0_f64, 2.0, 3.0]);
/// context.insert_scalar("scale", 2.0);
///
/// assert_eq!(context.get::<Vec<f64>>("points").map(|v| v.len()), Some(3));
/// assert_eq!(context.scalar("scale"), Some(&ParamValue::Float(2.0)));
/// ```
#[derive(Default)]
pub struct Context {
    entries: HashMap<String, Entry>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing whatever was under `key`.
    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.entries.insert(key.into(), Box::new(value));
    }

    pub fn insert_scalar(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.insert(key, value.into());
    }

    /// Borrow the value under `key` if it exists and has type `T`.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.entries.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.entries.get_mut(key).and_then(|v| v.downcast_mut::<T>())
    }

    pub fn scalar(&self, key: &str) -> Option<&ParamValue> {
        self.get::<ParamValue>(key)
    }

    /// Remove the value under `key`, returning it if it has type `T`.
    ///
    /// The entry is removed even when the type does not match.
    pub fn remove<T: Any>(&mut self, key: &str) -> Option<T> {
        self.entries
            .remove(key)
            .and_then(|v| v.downcast::<T>().ok())
            .map(|v| *v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// All scalar entries, sorted by key.
    pub fn scalars(&self) -> Vec<(&str, &ParamValue)> {
        let mut scalars: Vec<_> = self
            .entries
            .iter()
            .filter_map(|(k, v)| v.downcast_ref::<ParamValue>().map(|v| (k.as_str(), v)))
            .collect();
        scalars.sort_by(|a, b| a.0.cmp(b.0));
        scalars
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.entries.keys().collect();
        keys.sort();
        f.debug_struct("Context")
            .field("entry_count", &self.entries.len())
            .field("keys", &keys)
            .finish()
    }
}
