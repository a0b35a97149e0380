//! Category registry - named sets of risky modules and callables.
//!
//! Built-in tables are only defaults: a non-empty configured spec for the
//! same name replaces them wholesale. The `builtin` category is special
//! and always matches interpreter-builtin modules, whatever its tables say.

use std::collections::BTreeMap;

use modscout_core::config::CategorySpec;
use modscout_core::constants::{CATEGORY_BUILTIN, CATEGORY_SYSTEM, SYSTEM_CALLABLES, SYSTEM_MODULES};
use modscout_core::types::{FxHashMap, FxHashSet};
use once_cell::sync::Lazy;
use tracing::debug;

static DEFAULT_SYSTEM: Lazy<CategoryMatcher> = Lazy::new(|| CategoryMatcher::Membership {
    modules: SYSTEM_MODULES.iter().map(|m| m.to_string()).collect(),
    callables: SYSTEM_CALLABLES.iter().map(|c| c.to_string()).collect(),
});

/// How a category decides membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryMatcher {
    /// Module by exact name, or callable by exact terminal name.
    Membership {
        modules: FxHashSet<String>,
        callables: FxHashSet<String>,
    },
    /// Any interpreter-builtin module.
    BuiltinModules,
}

impl CategoryMatcher {
    fn from_spec(spec: &CategorySpec) -> Self {
        Self::Membership {
            modules: spec.modules.iter().cloned().collect(),
            callables: spec.callables.iter().cloned().collect(),
        }
    }
}

/// Resolved categories, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    categories: FxHashMap<String, CategoryMatcher>,
}

impl CategoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in `system` and `builtin` categories.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .categories
            .insert(CATEGORY_SYSTEM.to_string(), DEFAULT_SYSTEM.clone());
        registry
            .categories
            .insert(CATEGORY_BUILTIN.to_string(), CategoryMatcher::BuiltinModules);
        registry
    }

    /// Defaults overlaid with configured categories. Empty specs keep the default.
    pub fn from_config(overrides: &BTreeMap<String, CategorySpec>) -> Self {
        let mut registry = Self::with_defaults();
        for (name, spec) in overrides {
            registry.register(name, spec);
        }
        registry
    }

    /// Register or replace a category. Empty specs are ignored.
    pub fn register(&mut self, name: &str, spec: &CategorySpec) {
        if spec.is_empty() {
            return;
        }
        if name == CATEGORY_BUILTIN {
            debug!("builtin category tables are ignored; it matches by module origin");
            return;
        }
        self.categories
            .insert(name.to_string(), CategoryMatcher::from_spec(spec));
    }

    pub fn get(&self, name: &str) -> Option<&CategoryMatcher> {
        self.categories.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.categories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
