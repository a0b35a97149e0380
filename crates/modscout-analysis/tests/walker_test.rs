//! Tests for the graph walker.

use modscout_analysis::host::{SnapshotBuilder, SnapshotGraph};
use modscout_analysis::rules::{CategoryRegistry, RuleEngine};
use modscout_analysis::walker::{GraphWalker, ScanOutcome, WalkOptions};
use modscout_core::config::{ModscoutConfig, RuleSpec};

fn scan_with(
    graph: &SnapshotGraph,
    rules: Vec<RuleSpec>,
    options: WalkOptions,
    roots: &[&str],
) -> ScanOutcome {
    let engine = RuleEngine::new(rules, CategoryRegistry::with_defaults());
    let walker = GraphWalker::new(graph, &engine, options);
    let roots: Vec<String> = roots.iter().map(|r| r.to_string()).collect();
    walker.scan(&roots)
}

fn system() -> Vec<RuleSpec> {
    vec![RuleSpec::category("system")]
}

/// Matches every node at every path.
fn everything() -> Vec<RuleSpec> {
    vec![RuleSpec::QualnameRegex {
        pattern: ".".into(),
    }]
}

/// A chain root → m1 → m2 → ... of `len` modules linked by `next`.
fn chain(len: usize) -> SnapshotGraph {
    let mut b = SnapshotBuilder::new();
    let ids: Vec<u64> = (0..len).map(|i| b.module(&format!("m{i}"))).collect();
    for pair in ids.windows(2) {
        b.set_attr(pair[0], "next", pair[1]);
    }
    b.build()
}

/// T3-WLK-01: A risky callable bound under an innocuous name is found once.
#[test]
fn test_danger_scenario() {
    let mut b = SnapshotBuilder::new();
    let root = b.module("root");
    let func = b.function("system", "root");
    b.set_attr(root, "danger", func);
    let graph = b.build();

    let outcome = scan_with(&graph, system(), WalkOptions::default(), &["root"]);

    assert_eq!(outcome.findings.len(), 1);
    let finding = &outcome.findings[0];
    assert_eq!(finding.depth, 1);
    assert_eq!(finding.path, "root.danger");
    assert_eq!(finding.name, "danger");
    assert_eq!(finding.hit.reason, "category:system");
    assert_eq!(finding.object.type_name.as_deref(), Some("function"));
}

/// T3-WLK-02: A sub-module reachable under two names is visited once.
#[test]
fn test_shared_submodule_visited_once() {
    let mut b = SnapshotBuilder::new();
    let app = b.module("app");
    let shared = b.module("shared");
    let func = b.function("system", "shared");
    b.set_attr(app, "a", shared)
        .set_attr(app, "b", shared)
        .set_attr(shared, "system", func);
    let graph = b.build();

    let rules = vec![
        RuleSpec::category("system"),
        RuleSpec::ModuleName {
            pattern: "shared".into(),
        },
    ];
    let outcome = scan_with(&graph, rules, WalkOptions::default(), &["app"]);

    let paths: Vec<&str> = outcome.findings.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["app.a", "app.a.system"]);
    assert_eq!(outcome.stats.objects_visited, 2);
}

/// T3-WLK-03: max_depth = 0 evaluates roots only.
#[test]
fn test_max_depth_zero() {
    let mut b = SnapshotBuilder::new();
    let os = b.module("os");
    let func = b.function("system", "os");
    b.set_attr(os, "system", func);
    let graph = b.build();

    let options = WalkOptions {
        max_depth: 0,
        ..WalkOptions::default()
    };
    let outcome = scan_with(&graph, system(), options, &["os"]);

    assert_eq!(outcome.findings.len(), 1);
    assert_eq!(outcome.findings[0].depth, 0);
    assert_eq!(outcome.findings[0].path, "os");
    assert_eq!(outcome.stats.objects_visited, 1);
}

/// T3-WLK-04: Excluded modules yield nothing, whether reached as child or root.
#[test]
fn test_exclusion_precedence() {
    let mut b = SnapshotBuilder::new();
    let app = b.module("app");
    let tools = b.module("vendor.tools");
    let func = b.function("system", "vendor.tools");
    b.set_attr(app, "tools", tools).set_attr(tools, "system", func);
    let graph = b.build();

    let rules = vec![
        RuleSpec::category("system"),
        RuleSpec::ModuleStartswith {
            pattern: "vendor".into(),
        },
    ];
    let options = WalkOptions {
        exclude_module_prefixes: vec!["vendor".into()],
        ..WalkOptions::default()
    };

    let outcome = scan_with(&graph, rules.clone(), options.clone(), &["app"]);
    assert!(outcome.findings.is_empty());
    assert_eq!(outcome.stats.excluded_modules, 1);

    let outcome = scan_with(&graph, rules, options, &["vendor.tools"]);
    assert!(outcome.findings.is_empty());
    assert_eq!(outcome.stats.objects_visited, 1);
    assert_eq!(outcome.stats.excluded_modules, 1);
}

/// T3-WLK-05: Safe mode never performs a computed lookup.
#[test]
fn test_safe_mode_non_invasive() {
    let mut b = SnapshotBuilder::new();
    let app = b.module("app");
    let class = b.class("Service", "app");
    let lazy = b.function("system", "os");
    b.set_attr(app, "Service", class)
        .set_computed(app, "lazy", lazy)
        .set_computed(class, "prop", lazy)
        .set_computed_error(class, "broken", "RuntimeError");
    let graph = b.build();

    let outcome = scan_with(&graph, system(), WalkOptions::default(), &["app"]);

    assert!(outcome.findings.is_empty());
    assert_eq!(graph.computed_lookups(), 0);
}

/// T3-WLK-06: Risk mode reaches computed attributes and absorbs their errors.
#[test]
fn test_risk_mode_reaches_computed() {
    let mut b = SnapshotBuilder::new();
    let app = b.module("app");
    let lazy = b.function("system", "os");
    b.set_computed(app, "lazy", lazy)
        .set_computed_error(app, "broken", "RuntimeError: boom");
    let graph = b.build();

    let options = WalkOptions {
        risk_getattr: true,
        ..WalkOptions::default()
    };
    let outcome = scan_with(&graph, system(), options, &["app"]);

    assert_eq!(outcome.findings.len(), 1);
    assert_eq!(outcome.findings[0].path, "app.lazy");
    assert!(graph.computed_lookups() >= 2);
}

/// T3-WLK-07: Without enumeration, computed-only names are never tried.
#[test]
fn test_declared_names_only() {
    let mut b = SnapshotBuilder::new();
    let app = b.module("app");
    let lazy = b.function("system", "os");
    b.set_computed(app, "lazy", lazy);
    let graph = b.build();

    let options = WalkOptions {
        risk_getattr: true,
        include_enumerated: false,
        ..WalkOptions::default()
    };
    let outcome = scan_with(&graph, system(), options, &["app"]);

    assert!(outcome.findings.is_empty());
    assert_eq!(graph.computed_lookups(), 0);
}

/// T3-WLK-08: Cycles terminate with each identity visited once.
#[test]
fn test_cycles_terminate() {
    let mut b = SnapshotBuilder::new();
    let a = b.module("a");
    let class = b.class("B", "a");
    b.set_attr(a, "B", class)
        .set_attr(class, "home", a)
        .set_attr(class, "me", class)
        .set_attr(a, "a", a);
    let graph = b.build();

    let outcome = scan_with(&graph, everything(), WalkOptions::default(), &["a"]);

    assert_eq!(outcome.stats.objects_visited, 2);
    assert!(!outcome.stats.truncated);
    let paths: Vec<&str> = outcome.findings.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["a", "a.B"]);
}

/// T3-WLK-09: The object budget caps visits and reports truncation.
#[test]
fn test_budget_respected() {
    let graph = chain(10);
    let options = WalkOptions {
        max_depth: 20,
        max_objects: 3,
        ..WalkOptions::default()
    };
    let outcome = scan_with(&graph, everything(), options, &["m0"]);

    assert_eq!(outcome.stats.objects_visited, 3);
    assert!(outcome.stats.truncated);
}

/// T3-WLK-10: No finding is deeper than max_depth + 1.
#[test]
fn test_depth_respected() {
    let graph = chain(10);
    let options = WalkOptions {
        max_depth: 2,
        ..WalkOptions::default()
    };
    let outcome = scan_with(&graph, everything(), options, &["m0"]);

    // Nodes at max_depth are checked when discovered but never expanded.
    let depths: Vec<u32> = outcome.findings.iter().map(|f| f.depth).collect();
    assert_eq!(depths, vec![0, 1, 2]);
    assert_eq!(outcome.findings[2].path, "m0.next.next");
    assert_eq!(outcome.stats.objects_visited, 3);
    assert!(!outcome.stats.truncated);
}

/// T3-WLK-11: Failed roots are skipped; zero resolved roots is not an error.
#[test]
fn test_root_failures_are_recoverable() {
    let mut b = SnapshotBuilder::new();
    let os = b.module("os");
    let func = b.function("system", "os");
    b.set_attr(os, "system", func);
    let graph = b.build();

    let outcome = scan_with(&graph, system(), WalkOptions::default(), &["nosuchmod", "os"]);
    assert_eq!(outcome.stats.roots_failed, 1);
    assert_eq!(outcome.stats.roots_resolved, 1);
    assert_eq!(outcome.findings.len(), 2);

    let outcome = scan_with(&graph, system(), WalkOptions::default(), &["nosuchmod"]);
    assert!(outcome.findings.is_empty());
    assert_eq!(outcome.stats.objects_visited, 0);
}

/// T3-WLK-12: Dunder names are pruned unless pruning is off.
#[test]
fn test_prune_dunders() {
    let mut b = SnapshotBuilder::new();
    let app = b.module("app");
    let func = b.function("system", "os");
    b.set_attr(app, "__loader__", func);
    let graph = b.build();

    let outcome = scan_with(&graph, system(), WalkOptions::default(), &["app"]);
    assert!(outcome.findings.is_empty());

    let options = WalkOptions {
        prune_dunders: false,
        ..WalkOptions::default()
    };
    let outcome = scan_with(&graph, system(), options, &["app"]);
    assert_eq!(outcome.findings.len(), 1);
    assert_eq!(outcome.findings[0].path, "app.__loader__");
}

/// T3-WLK-13: Instances are expanded only when following instances.
#[test]
fn test_follow_instances() {
    let mut b = SnapshotBuilder::new();
    let app = b.module("app");
    let client = b.instance("Client");
    let func = b.function("popen", "os");
    b.set_attr(app, "client", client).set_attr(client, "spawn_fn", func);
    let graph = b.build();

    let outcome = scan_with(&graph, system(), WalkOptions::default(), &["app"]);
    assert!(outcome.findings.is_empty());

    let mut options = WalkOptions::default();
    options.policy.follow_instances = true;
    let outcome = scan_with(&graph, system(), options, &["app"]);
    assert_eq!(outcome.findings.len(), 1);
    assert_eq!(outcome.findings[0].path, "app.client.spawn_fn");
    assert_eq!(outcome.findings[0].depth, 2);
}

/// T3-WLK-14: Broken metadata and dangling references are absorbed.
#[test]
fn test_per_item_failures_absorbed() {
    let mut b = SnapshotBuilder::new();
    let app = b.module("app");
    let func = b.function("system", "os");
    let other = b.module("other");
    b.set_attr(app, "run", func)
        .set_attr(app, "gone", 9_999)
        .set_attr(app, "other", other)
        .break_metadata(func, "qualname")
        .break_metadata(func, "owner_module")
        .break_metadata(other, "attributes");
    let graph = b.build();

    let outcome = scan_with(&graph, system(), WalkOptions::default(), &["app"]);

    assert_eq!(outcome.findings.len(), 1);
    let object = &outcome.findings[0].object;
    assert_eq!(object.qualname, None);
    assert_eq!(object.module, None);
    assert_eq!(object.name.as_deref(), Some("system"));
}

/// T3-WLK-15: Repeated scans of the same graph are identical.
#[test]
fn test_deterministic() {
    let mut b = SnapshotBuilder::new();
    b.builtin_name("posix");
    let os = b.module("os");
    let posix = b.module("posix");
    let sub = b.module("subprocess");
    let popen = b.class("Popen", "subprocess");
    b.set_attr(os, "posix", posix)
        .set_attr(os, "subprocess", sub)
        .set_attr(sub, "Popen", popen)
        .set_attr(popen, "module", sub);
    let graph = b.build();

    let rules = vec![RuleSpec::category("system"), RuleSpec::category("builtin")];
    let first = scan_with(&graph, rules.clone(), WalkOptions::default(), &["os"]);
    for _ in 0..5 {
        let again = scan_with(&graph, rules.clone(), WalkOptions::default(), &["os"]);
        assert_eq!(again.findings, first.findings);
    }
    assert!(first.findings.iter().any(|f| f.hit.reason == "category:builtin"));
}

/// T3-WLK-16: The crate-level entry point wires config into the walker.
#[test]
fn test_scan_from_config() {
    let mut b = SnapshotBuilder::new();
    let root = b.module("random");
    let os = b.module("os");
    let func = b.function("system", "posix");
    b.set_attr(root, "_os", os).set_attr(os, "system", func);
    let graph = b.build();

    let config = ModscoutConfig::example();
    let outcome = modscout_analysis::scan(&graph, &config);

    let reasons: Vec<(&str, &str)> = outcome
        .findings
        .iter()
        .map(|f| (f.path.as_str(), f.hit.reason.as_str()))
        .collect();
    assert_eq!(
        reasons,
        vec![
            ("random._os", "category:system"),
            ("random._os.system", "category:system"),
            (
                "random._os.system",
                "path matches /random\\._os\\.(system|popen|Popen|fork)/"
            ),
        ]
    );
}

/// T3-WLK-17: A leaf bound under several names is checked on every path.
#[test]
fn test_aliased_leaf_checked_per_path() {
    let mut b = SnapshotBuilder::new();
    let m = b.module("m");
    let func = b.function("system", "os");
    b.set_attr(m, "danger", func).set_attr(m, "system", func);
    let graph = b.build();

    let rules = vec![
        RuleSpec::CallableName {
            pattern: "system".into(),
        },
        RuleSpec::Qualname {
            pattern: "m.system".into(),
        },
    ];
    let outcome = scan_with(&graph, rules, WalkOptions::default(), &["m"]);
    let hits: Vec<(&str, &str)> = outcome
        .findings
        .iter()
        .map(|f| (f.path.as_str(), f.hit.reason.as_str()))
        .collect();
    assert_eq!(
        hits,
        vec![
            ("m.system", "callable name == system"),
            ("m.system", "path == m.system"),
        ]
    );

    let outcome = scan_with(&graph, system(), WalkOptions::default(), &["m"]);
    let paths: Vec<&str> = outcome.findings.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["m.danger", "m.system"]);
    assert_eq!(outcome.stats.objects_visited, 1);
}
