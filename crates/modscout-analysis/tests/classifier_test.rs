//! Tests for the object classifier and the safe accessor.

use modscout_analysis::accessor::SafeAccessor;
use modscout_analysis::classifier::{self, TraversalPolicy};
use modscout_analysis::host::{NodeKind, ObjectRecord, Reflectable, SnapshotBuilder};

const STDLIB: &str = "/usr/lib/python3.12";

/// T2-CLS-01: Built-in detection by registry name or by origin marker.
#[test]
fn test_is_built_in() {
    let mut b = SnapshotBuilder::new();
    let sys = b.module("sys");
    let posix = b.module_with_origin("posix", "built-in");
    let json = b.module_with_origin("json", "/usr/lib/python3.12/json/__init__.py");
    let func = b.function("sys", "os");
    b.builtin_name("sys");
    let graph = b.build();

    assert!(classifier::is_built_in(&graph, &graph.node(sys).unwrap()));
    assert!(classifier::is_built_in(&graph, &graph.node(posix).unwrap()));
    assert!(!classifier::is_built_in(&graph, &graph.node(json).unwrap()));
    // A callable named like a builtin module is not a module.
    assert!(!classifier::is_built_in(&graph, &graph.node(func).unwrap()));
}

/// T2-CLS-02: Stdlib membership is decided on normalized path components.
#[test]
fn test_is_standard_distribution() {
    let mut b = SnapshotBuilder::new();
    b.stdlib_dir(STDLIB);
    let json = b.module_with_origin("json", "/usr/lib/python3.12/json/__init__.py");
    let posix = b.module_with_origin("posix", "built-in");
    let sibling = b.module_with_origin("evil", "/usr/lib/python3.12-extra/evil.py");
    let escaped = b.module_with_origin("pkg", "/usr/lib/python3.12/../site-packages/pkg.py");
    let bare = b.module("frozen");
    let graph = b.build();

    assert!(classifier::is_standard_distribution(&graph, &graph.node(json).unwrap()));
    assert!(classifier::is_standard_distribution(&graph, &graph.node(posix).unwrap()));
    assert!(!classifier::is_standard_distribution(&graph, &graph.node(sibling).unwrap()));
    assert!(!classifier::is_standard_distribution(&graph, &graph.node(escaped).unwrap()));
    assert!(!classifier::is_standard_distribution(&graph, &graph.node(bare).unwrap()));
}

/// T2-CLS-03: Missing stdlib dir or unreadable origin yields false.
#[test]
fn test_stdlib_degrades_to_false() {
    let mut b = SnapshotBuilder::new();
    let json = b.module_with_origin("json", "/usr/lib/python3.12/json/__init__.py");
    let graph = b.build();
    assert!(!classifier::is_standard_distribution(&graph, &graph.node(json).unwrap()));

    let mut b = SnapshotBuilder::new();
    b.stdlib_dir(STDLIB);
    let json = b.module_with_origin("json", "/usr/lib/python3.12/json/__init__.py");
    b.break_metadata(json, "spec_origin");
    let graph = b.build();
    assert!(!classifier::is_standard_distribution(&graph, &graph.node(json).unwrap()));
}

/// T2-CLS-04: Traversal gate under each policy.
#[test]
fn test_is_traversable() {
    let mut b = SnapshotBuilder::new();
    let module = b.module("m");
    let class = b.class("C", "m");
    let func = b.function("f", "m");
    let with_dict = b.instance("Widget");
    let slotted = b.add(ObjectRecord {
        kind: NodeKind::Instance,
        type_name: Some("Slotted".into()),
        has_dict: Some(false),
        ..Default::default()
    });
    let text = b.primitive("str");
    let graph = b.build();
    let node = |id| graph.node(id).unwrap();

    let default = TraversalPolicy::default();
    assert!(classifier::is_traversable(&node(module), default));
    assert!(classifier::is_traversable(&node(class), default));
    assert!(!classifier::is_traversable(&node(func), default));
    assert!(!classifier::is_traversable(&node(with_dict), default));
    assert!(!classifier::is_traversable(&node(text), default));

    let everything = TraversalPolicy {
        follow_classes: true,
        follow_instances: true,
    };
    assert!(classifier::is_traversable(&node(with_dict), everything));
    assert!(classifier::is_traversable(&node(func), everything));
    assert!(!classifier::is_traversable(&node(slotted), everything));
    assert!(!classifier::is_traversable(&node(text), everything));

    let no_classes = TraversalPolicy {
        follow_classes: false,
        follow_instances: false,
    };
    assert!(!classifier::is_traversable(&node(class), no_classes));
    assert!(classifier::is_traversable(&node(module), no_classes));
}

/// T2-CLS-05: Descriptions degrade per field and never fail.
#[test]
fn test_describe() {
    let mut b = SnapshotBuilder::new();
    let module = b.module_with_origin("json", "/usr/lib/python3.12/json/__init__.py");
    let func = b.function("dumps", "json");
    b.break_metadata(func, "qualname").break_metadata(func, "type_name");
    let graph = b.build();

    let desc = classifier::describe(&graph.node(module).unwrap());
    assert_eq!(desc.type_name.as_deref(), Some("module"));
    assert_eq!(desc.name.as_deref(), Some("json"));
    assert_eq!(
        desc.module_file.as_deref(),
        Some("/usr/lib/python3.12/json/__init__.py")
    );

    let desc = classifier::describe(&graph.node(func).unwrap());
    assert_eq!(desc.type_name, None);
    assert_eq!(desc.qualname, None);
    assert_eq!(desc.name.as_deref(), Some("dumps"));
    assert_eq!(desc.module.as_deref(), Some("json"));
    assert_eq!(desc.module_file, None);
    assert_eq!(desc.location().as_deref(), Some("json.dumps"));
}

/// T2-ACC-01: Safe mode reads the declared table only.
#[test]
fn test_safe_accessor_declared_only() {
    let mut b = SnapshotBuilder::new();
    let module = b.module("m");
    let declared = b.function("f", "m");
    let computed = b.function("g", "m");
    b.set_attr(module, "f", declared).set_computed(module, "g", computed);
    let graph = b.build();
    let node = graph.node(module).unwrap();

    let safe = SafeAccessor::new();
    assert!(!safe.is_risk_mode());
    assert!(safe.get(&node, "f").is_found());
    assert!(!safe.get(&node, "g").is_found());
    assert!(!safe.get(&node, "missing").is_found());
    assert_eq!(graph.computed_lookups(), 0);
}

/// T2-ACC-02: Risk mode falls back to computed lookups and absorbs failures.
#[test]
fn test_risk_accessor_fallback() {
    let mut b = SnapshotBuilder::new();
    let module = b.module("m");
    let computed = b.function("g", "m");
    b.set_computed(module, "g", computed)
        .set_computed_error(module, "boom", "ImportError: lazy import failed");
    let graph = b.build();
    let node = graph.node(module).unwrap();

    let risky = SafeAccessor::with_risk(true);
    let found = risky.get(&node, "g").found().unwrap();
    assert_eq!(found.node_id().raw(), computed);
    assert!(!risky.get(&node, "boom").is_found());
    assert!(!risky.get(&node, "missing").is_found());
    assert_eq!(graph.computed_lookups(), 3);
}
