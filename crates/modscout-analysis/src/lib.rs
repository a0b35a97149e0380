//! modscout-analysis: the audit engine.
//!
//! A scan resolves named roots through a `host::Runtime`, walks the
//! reachable object graph breadth-first under a depth and object budget,
//! and records every rule that matches a visited node or one of its
//! attributes.
//!
//! - `host`: reflection traits plus the JSON snapshot host
//! - `classifier`: stateless node predicates and descriptions
//! - `accessor`: attribute reads under the safe/risk policy
//! - `rules`: rule kinds, categories and evaluation
//! - `walker`: the bounded BFS
//! - `report`: summaries, JSON report, console output

pub mod accessor;
pub mod classifier;
pub mod host;
pub mod report;
pub mod rules;
pub mod walker;

use modscout_core::config::ModscoutConfig;

use crate::host::Runtime;
use crate::rules::RuleEngine;
use crate::walker::{GraphWalker, ScanOutcome, WalkOptions};

/// Run one scan of `runtime` with a resolved configuration.
pub fn scan<R: Runtime>(runtime: &R, config: &ModscoutConfig) -> ScanOutcome {
    let engine = RuleEngine::from_config(config);
    let walker = GraphWalker::new(runtime, &engine, WalkOptions::from(&config.scan));
    walker.scan(&config.roots)
}
