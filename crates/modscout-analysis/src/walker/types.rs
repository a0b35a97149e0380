//! Walker types

use modscout_core::config::ScanConfig;
use modscout_core::types::PathSegments;
use serde::{Deserialize, Serialize};

use crate::classifier::{ObjectDescription, TraversalPolicy};
use crate::rules::RuleHit;

/// One rule match at one discovery path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Dotted discovery path from the root.
    pub path: String,
    /// Terminal name (last path segment).
    pub name: String,
    pub depth: u32,
    #[serde(rename = "match")]
    pub hit: RuleHit,
    pub object: ObjectDescription,
}

/// Resolved walk settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    pub max_depth: u32,
    pub max_objects: usize,
    pub prune_dunders: bool,
    pub risk_getattr: bool,
    pub include_enumerated: bool,
    pub policy: TraversalPolicy,
    pub exclude_module_prefixes: Vec<String>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self::from(&ScanConfig::default())
    }
}

impl From<&ScanConfig> for WalkOptions {
    fn from(scan: &ScanConfig) -> Self {
        Self {
            max_depth: scan.effective_max_depth(),
            max_objects: scan.effective_max_objects(),
            prune_dunders: scan.effective_prune_dunders(),
            risk_getattr: scan.effective_risk_getattr(),
            include_enumerated: scan.effective_include_enumerated(),
            policy: TraversalPolicy {
                follow_classes: scan.effective_follow_classes(),
                follow_instances: scan.effective_follow_instances(),
            },
            exclude_module_prefixes: scan.exclude_module_prefixes.clone(),
        }
    }
}

impl WalkOptions {
    /// Whether a module of this name is pruned by prefix.
    pub fn is_excluded_module(&self, name: &str) -> bool {
        self.exclude_module_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
    }
}

/// Counters for one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub objects_visited: usize,
    pub roots_resolved: usize,
    pub roots_failed: usize,
    /// The object budget ran out with work still queued.
    pub truncated: bool,
    /// Modules skipped by prefix, whether dequeued or discovered as children.
    pub excluded_modules: usize,
    pub duration_ms: u64,
}

/// Result of a scan. Findings are in discovery order.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub findings: Vec<Finding>,
    pub stats: ScanStats,
}

/// A frontier entry.
#[derive(Debug, Clone)]
pub(crate) struct QueueItem<N> {
    pub node: N,
    pub name: String,
    pub path: PathSegments,
    pub depth: u32,
    /// Rule hits were already recorded when this node was discovered.
    pub evaluated: bool,
}
