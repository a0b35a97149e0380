//! Object classifier - stateless predicates over a single node.
//!
//! `is_traversable` is the only gate on graph growth: too permissive and
//! every string instance becomes a frontier entry, too strict and real
//! risk paths are pruned.

pub mod paths;

use modscout_core::constants::BUILTIN_ORIGIN;
use serde::{Deserialize, Serialize};

use crate::host::{NodeKind, Reflectable, Runtime};

/// Structural description attached to every finding.
///
/// Each field degrades to `None` independently when its read fails.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObjectDescription {
    /// `"module"` for modules, else the runtime type name.
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    /// Owning module name, if the node declares one.
    pub module: Option<String>,
    pub qualname: Option<String>,
    pub name: Option<String>,
    /// Module file location (modules only).
    pub module_file: Option<String>,
    /// Loader origin (modules only).
    pub spec_origin: Option<String>,
}

impl ObjectDescription {
    /// `<module>.<qualname|name>` when the owner is known, else the bare name.
    pub fn location(&self) -> Option<String> {
        let local = self.qualname.as_deref().or(self.name.as_deref());
        match (&self.module, local) {
            (Some(module), Some(local)) => Some(format!("{module}.{local}")),
            (Some(module), None) => Some(module.clone()),
            (None, local) => local.map(String::from),
        }
    }
}

/// Which non-module nodes the walker may expand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalPolicy {
    pub follow_classes: bool,
    pub follow_instances: bool,
}

impl Default for TraversalPolicy {
    fn default() -> Self {
        Self {
            follow_classes: true,
            follow_instances: false,
        }
    }
}

/// Name of a module node, or `None` for non-modules and unreadable names.
pub fn module_name<N: Reflectable>(node: &N) -> Option<String> {
    if !node.kind().is_module() {
        return None;
    }
    node.name().ok().flatten()
}

/// Whether `node` is a module compiled into the interpreter.
///
/// The host's built-in registry is consulted first, then the module's
/// loader origin marker.
pub fn is_built_in<R: Runtime>(runtime: &R, node: &R::Node) -> bool {
    let Some(name) = module_name(node) else {
        return false;
    };
    if runtime.is_builtin_module_name(&name) {
        return true;
    }
    matches!(node.spec_origin(), Ok(Some(origin)) if origin == BUILTIN_ORIGIN)
}

/// Whether `node` is a module of the standard distribution.
///
/// Built-in-origin modules count. Otherwise the module's origin must lie
/// under the host's stdlib directory once both are made absolute and
/// normalized. Any missing piece of metadata yields `false`.
pub fn is_standard_distribution<R: Runtime>(runtime: &R, node: &R::Node) -> bool {
    if !node.kind().is_module() {
        return false;
    }
    let origin = match node.spec_origin() {
        Ok(Some(origin)) => origin,
        _ => return false,
    };
    if origin == BUILTIN_ORIGIN {
        return true;
    }
    let Some(stdlib) = runtime.stdlib_dir() else {
        return false;
    };
    match (paths::absolute(origin.as_ref()), paths::absolute(&stdlib)) {
        (Some(origin), Some(stdlib)) => origin.starts_with(&stdlib),
        _ => false,
    }
}

/// Whether the walker may enqueue `node` for expansion.
pub fn is_traversable<N: Reflectable>(node: &N, policy: TraversalPolicy) -> bool {
    match node.kind() {
        NodeKind::Module => true,
        NodeKind::Type if policy.follow_classes => true,
        NodeKind::Primitive => false,
        _ => policy.follow_instances && node.has_attribute_table(),
    }
}

/// Describe `node` for a finding. Never fails.
pub fn describe<N: Reflectable>(node: &N) -> ObjectDescription {
    let is_module = node.kind().is_module();
    let type_name = if is_module {
        Some("module".to_string())
    } else {
        node.type_name().ok()
    };

    ObjectDescription {
        type_name,
        module: node.owner_module().ok().flatten(),
        qualname: node.qualified_name().ok().flatten(),
        name: node.name().ok().flatten(),
        module_file: is_module
            .then(|| node.module_file().ok().flatten())
            .flatten(),
        spec_origin: is_module
            .then(|| node.spec_origin().ok().flatten())
            .flatten(),
    }
}
