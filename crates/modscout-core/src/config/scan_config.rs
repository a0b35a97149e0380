//! Scan budget and traversal policy configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_OBJECTS};

/// Configuration for one graph walk.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Deepest frontier level that is still expanded. Default: 5.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
    /// Maximum distinct objects visited. Default: 50000.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_objects: Option<usize>,
    /// Drop `__dunder__` names before fetching children. Default: true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prune_dunders: Option<bool>,
    /// Allow computed attribute lookups (may run host code). Default: false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_getattr: Option<bool>,
    /// Traverse into types/classes. Default: true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_classes: Option<bool>,
    /// Traverse into generic instances. Default: false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_instances: Option<bool>,
    /// Also enumerate names via the general enumeration protocol. Default: true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_enumerated: Option<bool>,
    /// Modules whose name starts with any of these are skipped entirely.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_module_prefixes: Vec<String>,
}

impl ScanConfig {
    pub fn effective_max_depth(&self) -> u32 {
        self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH)
    }

    pub fn effective_max_objects(&self) -> usize {
        self.max_objects.unwrap_or(DEFAULT_MAX_OBJECTS)
    }

    pub fn effective_prune_dunders(&self) -> bool {
        self.prune_dunders.unwrap_or(true)
    }

    pub fn effective_risk_getattr(&self) -> bool {
        self.risk_getattr.unwrap_or(false)
    }

    pub fn effective_follow_classes(&self) -> bool {
        self.follow_classes.unwrap_or(true)
    }

    pub fn effective_follow_instances(&self) -> bool {
        self.follow_instances.unwrap_or(false)
    }

    pub fn effective_include_enumerated(&self) -> bool {
        self.include_enumerated.unwrap_or(true)
    }
}
