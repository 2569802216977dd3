// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::observability::messages::module::{
    ModuleCacheHit, ModuleCacheReset, ModuleResolved, ModuleUnavailable,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{ExternalUnit, UnitLoader};

use super::module::{render_module, Lookup};
use super::Module;

/// Outcome of resolving a unit name: the unit, or `None` when unavailable.
pub type Resolution = Option<Arc<dyn ExternalUnit>>;

/// Snapshot of a live [`Module`] descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub id: u64,
    pub category: String,
    pub name: String,
    pub callable_name: String,
}

struct RegistryInner {
    loader: Box<dyn UnitLoader>,
    cache: Mutex<HashMap<String, Arc<OnceLock<Resolution>>>>,
    instances: Mutex<Vec<ModuleInfo>>,
    next_id: AtomicU64,
}

/// Resolution service shared by every [`Module`] created through it.
///
/// Construct one at startup and hand clones to whatever creates modules;
/// clones share the same cache and instance list.
///
/// Each unit name is loaded at most once until [`reset`](Self::reset). The
/// cache lock is only held to fetch a name's cell; the load itself runs in
/// `OnceLock::get_or_init`, so concurrent first resolutions of one name
/// perform a single load and the others wait for its result.
#[derive(Clone)]
pub struct ModuleRegistry {
    inner: Arc<RegistryInner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ModuleRegistry {
    pub fn new(loader: impl UnitLoader + 'static) -> Self {
        Self::from_boxed(Box::new(loader))
    }

    pub fn from_boxed(loader: Box<dyn UnitLoader>) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                loader,
                cache: Mutex::new(HashMap::new()),
                instances: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Create a module descriptor and record it in the instance list.
    ///
    /// Nothing is loaded until the module is resolved.
    pub fn module(
        &self,
        category: impl Into<String>,
        name: impl Into<String>,
        callable_name: impl Into<String>,
    ) -> Module {
        let info = ModuleInfo {
            id: self.inner.next_id.fetch_add(1, Ordering::Relaxed),
            category: category.into(),
            name: name.into(),
            callable_name: callable_name.into(),
        };
        lock(&self.inner.instances).push(info.clone());
        Module::new(self.clone(), info)
    }

    /// Resolve a unit by name, loading it on first use.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn ExternalUnit>> {
        let cell = {
            let mut cache = lock(&self.inner.cache);
            Arc::clone(cache.entry(name.to_string()).or_default())
        };

        if let Some(resolution) = cell.get() {
            ModuleCacheHit {
                name,
                available: resolution.is_some(),
            }
            .log();
            return resolution.clone();
        }

        cell.get_or_init(|| self.load(name)).clone()
    }

    fn load(&self, name: &str) -> Resolution {
        match self.inner.loader.load(name) {
            Ok(unit) => {
                ModuleResolved {
                    name,
                    origin: &unit.origin(),
                    callable_count: unit.callable_names().len(),
                }
                .log();
                Some(unit)
            }
            Err(error) => {
                ModuleUnavailable {
                    name,
                    loader: &self.inner.loader.describe(),
                    error: &error,
                }
                .log();
                None
            }
        }
    }

    /// Whether `name` has a settled resolution (available or not).
    pub fn is_cached(&self, name: &str) -> bool {
        lock(&self.inner.cache)
            .get(name)
            .is_some_and(|cell| cell.get().is_some())
    }

    /// The settled resolution for `name`, without loading anything.
    ///
    /// `None` means the name has not been resolved yet; `Some(None)` means it
    /// was resolved and found unavailable.
    pub fn cached(&self, name: &str) -> Option<Resolution> {
        lock(&self.inner.cache)
            .get(name)
            .and_then(|cell| cell.get().cloned())
    }

    /// Names with a settled resolution, sorted.
    pub fn cached_names(&self) -> Vec<String> {
        let mut names: Vec<String> = lock(&self.inner.cache)
            .iter()
            .filter(|(_, cell)| cell.get().is_some())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Forget every resolution so the next lookup of each name loads again.
    ///
    /// Live module descriptors are unaffected.
    pub fn reset(&self) {
        let mut cache = lock(&self.inner.cache);
        let cleared = cache.len();
        cache.clear();
        ModuleCacheReset { cleared }.log();
    }

    /// Every live module descriptor, in creation order.
    pub fn list_instances(&self) -> Vec<ModuleInfo> {
        lock(&self.inner.instances).clone()
    }

    pub(crate) fn unregister(&self, id: u64) {
        lock(&self.inner.instances).retain(|info| info.id != id);
    }

    /// Availability report for every live module, numbered from 1.
    pub fn render_modules(&self, indent_width: usize) -> Vec<String> {
        self.list_instances()
            .iter()
            .enumerate()
            .flat_map(|(position, info)| render_module(self, info, Lookup::Resolve, indent_width, Some(position + 1), &[]))
            .collect()
    }

    /// Print the availability report to stderr.
    pub fn print_modules(&self, indent_width: usize) {
        for line in self.render_modules(indent_width) {
            eprintln!("{}", line);
        }
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("loader", &self.inner.loader.describe())
            .field("cached", &self.cached_names())
            .field("instances", &lock(&self.inner.instances).len())
            .finish()
    }
}
