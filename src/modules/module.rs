// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::Arc;

use crate::traits::{ExternalUnit, UnitCallable};

use super::{ModuleInfo, ModuleRegistry};

/// Descriptor for an optional capability: callable `callable_name` inside
/// unit `name`, grouped under `category` for reporting.
///
/// Created through [`ModuleRegistry::module`]; dropping it removes it from
/// the registry's instance list.
pub struct Module {
    registry: ModuleRegistry,
    info: ModuleInfo,
}

impl Module {
    pub(super) fn new(registry: ModuleRegistry, info: ModuleInfo) -> Self {
        Self { registry, info }
    }

    pub fn id(&self) -> u64 {
        self.info.id
    }

    pub fn category(&self) -> &str {
        &self.info.category
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn callable_name(&self) -> &str {
        &self.info.callable_name
    }

    pub fn info(&self) -> &ModuleInfo {
        &self.info
    }

    /// The unit, or `None` if it cannot be loaded. Loads at most once per
    /// unit name across the registry.
    pub fn resolve_unit(&self) -> Option<Arc<dyn ExternalUnit>> {
        self.registry.resolve(&self.info.name)
    }

    /// The callable, or `None` if the unit is unavailable or does not
    /// export it.
    pub fn resolve_callable(&self) -> Option<Arc<dyn UnitCallable>> {
        self.resolve_unit()?.callable(&self.info.callable_name)
    }

    pub fn is_available(&self) -> bool {
        self.resolve_callable().is_some()
    }

    /// Availability report for this module, without printing it. Resolves
    /// the unit if nothing has resolved it yet.
    pub fn render(&self, indent_width: usize, item_number: Option<usize>, extra_lines: &[&str]) -> Vec<String> {
        render_module(&self.registry, &self.info, Lookup::Resolve, indent_width, item_number, extra_lines)
    }

    /// Like [`render`](Self::render), but reports what the registry already
    /// knows and never loads the unit. Names nobody has resolved yet are shown
    /// as `NOT RESOLVED`.
    pub fn render_cached(&self, indent_width: usize, item_number: Option<usize>, extra_lines: &[&str]) -> Vec<String> {
        render_module(&self.registry, &self.info, Lookup::CachedOnly, indent_width, item_number, extra_lines)
    }

    /// Print the availability report to stderr.
    pub fn print(&self, indent_width: usize, item_number: Option<usize>, extra_lines: &[&str]) {
        for line in self.render(indent_width, item_number, extra_lines) {
            eprintln!("{}", line);
        }
    }
}

impl Drop for Module {
    fn drop(&mut self) {
        self.registry.unregister(self.info.id);
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("category", &self.info.category)
            .field("name", &self.info.name)
            .field("callable_name", &self.info.callable_name)
            .finish()
    }
}

/// How a report learns whether a unit is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Lookup {
    Resolve,
    CachedOnly,
}

const UNRESOLVED: &str = "NOT RESOLVED";

fn availability(available: bool) -> &'static str {
    if available {
        "AVAILABLE"
    } else {
        "NOT FOUND"
    }
}

pub(super) fn render_module(
    registry: &ModuleRegistry,
    info: &ModuleInfo,
    lookup: Lookup,
    indent_width: usize,
    item_number: Option<usize>,
    extra_lines: &[&str],
) -> Vec<String> {
    let indent = " ".repeat(indent_width);
    let item = item_number.map(|n| format!("{}. ", n)).unwrap_or_default();

    let resolution = match lookup {
        Lookup::Resolve => Some(registry.resolve(&info.name)),
        Lookup::CachedOnly => registry.cached(&info.name),
    };
    let (module_status, callable_status) = match resolution {
        None => (UNRESOLVED, UNRESOLVED),
        Some(unit) => {
            let callable = unit
                .as_ref()
                .and_then(|unit| unit.callable(&info.callable_name));
            (availability(unit.is_some()), availability(callable.is_some()))
        }
    };

    let mut lines = vec![
        format!("{}{}: {}.{}", item, info.category, info.name, info.callable_name),
        format!("{}module '{}': {}", indent, info.name, module_status),
        format!("{}callable '{}': {}", indent, info.callable_name, callable_status),
    ];
    lines.extend(extra_lines.iter().map(|line| format!("{}{}", indent, line)));
    lines
}

#[cfg(test)]
mod tests {
    use crate::backends::native::{NativeUnit, NativeUnitLoader};
    use crate::modules::ModuleRegistry;
    use crate::traits::CallValue;
    use std::sync::Arc;

    fn registry() -> ModuleRegistry {
        let mut loader = NativeUnitLoader::new();
        loader.register(
            NativeUnit::builder("present_pkg")
                .callable("present_fn", |args| Ok(vec![CallValue::F64(args[0].as_f64() + 1.0)]))
                .build(),
        );
        ModuleRegistry::new(loader)
    }

    #[test]
    fn test_resolve_callable_matches_direct_lookup() {
        let registry = registry();
        let module = registry.module("test", "present_pkg", "present_fn");

        let via_module = module.resolve_callable().unwrap();
        let direct = module.resolve_unit().unwrap().callable("present_fn").unwrap();

        assert!(Arc::ptr_eq(&via_module, &direct));
        assert_eq!(via_module.call(&[CallValue::F64(1.0)]).unwrap(), vec![CallValue::F64(2.0)]);
    }

    #[test]
    fn test_resolve_callable_unavailable_cases() {
        let registry = registry();

        let missing_unit = registry.module("test", "absent_pkg", "present_fn");
        let missing_callable = registry.module("test", "present_pkg", "absent_fn");

        assert!(missing_unit.resolve_callable().is_none());
        assert!(missing_callable.resolve_unit().is_some());
        assert!(missing_callable.resolve_callable().is_none());
        assert!(!missing_callable.is_available());
    }

    #[test]
    fn test_render_with_extra_lines() {
        let registry = registry();
        let module = registry.module("lineshapes", "present_pkg", "absent_fn");

        assert_eq!(
            module.render(4, None, &["used by: Fit"]),
            vec![
                "lineshapes: present_pkg.absent_fn",
                "    module 'present_pkg': AVAILABLE",
                "    callable 'absent_fn': NOT FOUND",
                "    used by: Fit",
            ]
        );
        assert_eq!(module.category(), "lineshapes");
        assert_eq!(module.callable_name(), "absent_fn");
    }

    #[test]
    fn test_render_cached_leaves_units_unloaded() {
        let registry = registry();
        let present = registry.module("lineshapes", "present_pkg", "present_fn");
        let absent = registry.module("fitting", "absent_pkg", "f");

        assert_eq!(
            present.render_cached(2, Some(1), &[]),
            vec![
                "1. lineshapes: present_pkg.present_fn",
                "  module 'present_pkg': NOT RESOLVED",
                "  callable 'present_fn': NOT RESOLVED",
            ]
        );
        assert!(registry.cached_names().is_empty());

        present.resolve_unit();
        absent.resolve_unit();
        assert_eq!(present.render_cached(2, None, &[])[2], "  callable 'present_fn': AVAILABLE");
        assert_eq!(absent.render_cached(2, None, &[])[1], "  module 'absent_pkg': NOT FOUND");
    }
}
