//! Graph Walker - bounded BFS over a host object graph
//!
//! Memory-efficient implementation using:
//! - FxHashSet of `NodeId` for identity-based visited tracking
//! - VecDeque frontier of owned entries
//! - SmallVec path segments, joined only when a path is reported

use std::collections::VecDeque;
use std::time::Instant;

use modscout_core::tracing::fields;
use modscout_core::types::{FxHashSet, NodeId, PathSegments};
use tracing::{debug, field, info, info_span, warn};

use super::types::{Finding, QueueItem, ScanOutcome, ScanStats, WalkOptions};
use crate::accessor::SafeAccessor;
use crate::classifier;
use crate::host::{Lookup, Reflectable, Runtime};
use crate::rules::RuleEngine;

/// Walks the graph of one runtime with one rule set.
///
/// Holds no per-scan state; every `scan` call owns its visited set,
/// frontier and counters.
pub struct GraphWalker<'a, R: Runtime> {
    runtime: &'a R,
    engine: &'a RuleEngine,
    options: WalkOptions,
    accessor: SafeAccessor,
}

impl<'a, R: Runtime> GraphWalker<'a, R> {
    pub fn new(runtime: &'a R, engine: &'a RuleEngine, options: WalkOptions) -> Self {
        let accessor = SafeAccessor::with_risk(options.risk_getattr);
        Self {
            runtime,
            engine,
            options,
            accessor,
        }
    }

    /// Scan from `roots` until the frontier empties or the object budget
    /// runs out. Never fails; unresolvable roots and unreadable attributes
    /// are logged and skipped.
    pub fn scan(&self, roots: &[String]) -> ScanOutcome {
        let span = info_span!(
            "scan",
            objects_visited = field::Empty,
            findings = field::Empty,
            roots_resolved = field::Empty,
            scan_duration_ms = field::Empty,
        );
        let _guard = span.enter();
        let started = Instant::now();

        let mut stats = ScanStats::default();
        let mut findings = Vec::new();
        let mut visited: FxHashSet<NodeId> = FxHashSet::default();
        let mut discovered: FxHashSet<NodeId> = FxHashSet::default();
        let mut queue: VecDeque<QueueItem<R::Node>> = VecDeque::new();

        for root in roots {
            match self.runtime.resolve_root(root) {
                Ok(node) => {
                    stats.roots_resolved += 1;
                    discovered.insert(node.node_id());
                    let mut path = PathSegments::new();
                    path.push(root.clone());
                    queue.push_back(QueueItem {
                        node,
                        name: root.clone(),
                        path,
                        depth: 0,
                        evaluated: false,
                    });
                }
                Err(e) => {
                    stats.roots_failed += 1;
                    warn!(root = %root, error = %e, "failed to resolve root");
                }
            }
        }

        while stats.objects_visited < self.options.max_objects {
            let Some(item) = queue.pop_front() else {
                break;
            };
            if !visited.insert(item.node.node_id()) {
                continue;
            }
            stats.objects_visited += 1;

            if self.is_excluded(&item.node) {
                stats.excluded_modules += 1;
                continue;
            }

            if !item.evaluated {
                let path = item.path.join(".");
                self.record(&mut findings, &item.node, &item.name, &path, item.depth);
            }

            if item.depth >= self.options.max_depth {
                continue;
            }

            for name in self.candidate_names(&item.node) {
                let Lookup::Found(child) = self.accessor.get(&item.node, &name) else {
                    continue;
                };
                // Expandable nodes are reported once; leaves are checked on every path.
                let traversable = classifier::is_traversable(&child, self.options.policy);
                if traversable && !discovered.insert(child.node_id()) {
                    continue;
                }
                if self.is_excluded(&child) {
                    stats.excluded_modules += 1;
                    continue;
                }

                let mut child_path = item.path.clone();
                child_path.push(name.clone());
                let depth = item.depth + 1;
                self.record(&mut findings, &child, &name, &child_path.join("."), depth);

                if traversable {
                    queue.push_back(QueueItem {
                        node: child,
                        name,
                        path: child_path,
                        depth,
                        evaluated: true,
                    });
                }
            }
        }

        stats.truncated = !queue.is_empty();
        if stats.truncated {
            info!(
                max_objects = self.options.max_objects,
                pending = queue.len(),
                "object budget exhausted; scan truncated"
            );
        }
        stats.duration_ms = started.elapsed().as_millis() as u64;

        span.record(fields::OBJECTS_VISITED, stats.objects_visited);
        span.record(fields::FINDINGS, findings.len());
        span.record(fields::ROOTS_RESOLVED, stats.roots_resolved);
        span.record(fields::SCAN_DURATION_MS, stats.duration_ms);
        info!(
            objects_visited = stats.objects_visited,
            findings = findings.len(),
            "scan complete"
        );

        ScanOutcome { findings, stats }
    }

    /// Append one finding per rule hit on `node`.
    fn record(
        &self,
        findings: &mut Vec<Finding>,
        node: &R::Node,
        name: &str,
        path: &str,
        depth: u32,
    ) {
        let hits = self.engine.evaluate(self.runtime, node, name, path);
        if hits.is_empty() {
            return;
        }
        let object = classifier::describe(node);
        for hit in hits {
            findings.push(Finding {
                path: path.to_string(),
                name: name.to_string(),
                depth,
                hit,
                object: object.clone(),
            });
        }
    }

    fn is_excluded(&self, node: &R::Node) -> bool {
        if self.options.exclude_module_prefixes.is_empty() {
            return false;
        }
        match classifier::module_name(node) {
            Some(name) if self.options.is_excluded_module(&name) => {
                debug!(module = %name, "excluded module pruned");
                true
            }
            _ => false,
        }
    }

    /// Declared names, then enumerated names not yet seen, minus dunders
    /// when pruning is on.
    fn candidate_names(&self, node: &R::Node) -> Vec<String> {
        let mut names = node.declared_attributes().unwrap_or_else(|e| {
            debug!(error = %e, "declared attribute table unreadable");
            Vec::new()
        });

        if self.options.include_enumerated {
            match node.enumerated_attributes() {
                Ok(extra) => {
                    let mut seen: FxHashSet<String> = names.iter().cloned().collect();
                    names.extend(extra.into_iter().filter(|n| seen.insert(n.clone())));
                }
                Err(e) => debug!(error = %e, "attribute enumeration failed"),
            }
        }

        if self.options.prune_dunders {
            names.retain(|n| !is_dunder(n));
        }
        names
    }
}

/// `__name__`-style reserved names.
fn is_dunder(name: &str) -> bool {
    name.starts_with("__") && name.ends_with("__")
}
