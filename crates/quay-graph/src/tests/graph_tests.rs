//! Construction, ordering, cycle and missing-dependency behavior.

use super::module;
use crate::{DependencyGraph, GraphError};

#[test]
fn dependencies_sort_before_dependents() {
    let batch = vec![
        module("reports", "1.0", &[("ledger", "1.0")]),
        module("ledger", "1.0", &[("core", "1.0")]),
        module("core", "1.0", &[]),
    ];
    let graph = DependencyGraph::build(batch).expect("build");
    let keys: Vec<String> = graph.iter().map(|n| n.key()).collect();
    assert_eq!(keys, vec!["core:1.0", "ledger:1.0", "reports:1.0"]);
}

#[test]
fn processing_order_is_input_order_independent() {
    let forward = vec![
        module("core", "1.0", &[]),
        module("ledger", "1.0", &[("core", "1.0")]),
        module("reports", "1.0", &[("ledger", "1.0"), ("core", "1.0")]),
    ];
    let mut backward = forward.clone();
    backward.reverse();

    let keys = |batch| -> Vec<String> {
        DependencyGraph::build(batch)
            .expect("build")
            .iter()
            .map(|n| n.key())
            .collect()
    };
    assert_eq!(keys(forward), keys(backward));
}

#[test]
fn equal_weights_tie_break_by_name() {
    let batch = vec![
        module("zeta", "1.0", &[]),
        module("alpha", "1.0", &[]),
        module("mid", "1.0", &[]),
    ];
    let graph = DependencyGraph::build(batch).expect("build");
    let keys: Vec<String> = graph.iter().map(|n| n.key()).collect();
    assert_eq!(keys, vec!["alpha:1.0", "mid:1.0", "zeta:1.0"]);
}

#[test]
fn roots_are_the_dependency_free_modules() {
    let batch = vec![
        module("core", "1.0", &[]),
        module("util", "1.0", &[]),
        module("ledger", "1.0", &[("core", "1.0")]),
    ];
    let graph = DependencyGraph::build(batch).expect("build");
    let roots: Vec<String> = graph.roots().map(|n| n.key()).collect();
    assert_eq!(roots, vec!["core:1.0", "util:1.0"]);
}

#[test]
fn edges_point_from_dependency_to_dependent() {
    let batch = vec![
        module("core", "1.0", &[]),
        module("ledger", "2.0", &[("core", "1.0")]),
    ];
    let graph = DependencyGraph::build(batch).expect("build");
    assert_eq!(graph.edges().len(), 1);
    assert_eq!(graph.edges()[0].from, "core:1.0");
    assert_eq!(graph.edges()[0].to, "ledger:2.0");
}

#[test]
fn dependents_are_computed_from_the_edge_list() {
    let batch = vec![
        module("core", "1.0", &[]),
        module("ledger", "1.0", &[("core", "1.0")]),
        module("reports", "1.0", &[("core", "1.0")]),
    ];
    let graph = DependencyGraph::build(batch).expect("build");
    let core = graph.get("core:1.0").expect("core node");
    let dependents: Vec<String> = core.dependents().iter().map(|n| n.key()).collect();
    assert_eq!(dependents, vec!["ledger:1.0", "reports:1.0"]);

    let reports = graph.get("reports:1.0").expect("reports node");
    assert!(reports.dependents().is_empty());
}

#[test]
fn two_module_cycle_reports_both_names() {
    let batch = vec![
        module("a", "1.0", &[("b", "1.0")]),
        module("b", "1.0", &[("a", "1.0")]),
    ];
    match DependencyGraph::build(batch) {
        Err(GraphError::CycleDetected { chain }) => {
            assert!(chain.contains(&"a".to_string()));
            assert!(chain.contains(&"b".to_string()));
            assert_eq!(chain.first(), chain.last());
        }
        other => panic!("expected cycle, got {:?}", other.map(|g| g.len())),
    }
}

#[test]
fn three_module_cycle_reports_the_full_chain() {
    let batch = vec![
        module("a", "1.0", &[("b", "1.0")]),
        module("b", "1.0", &[("c", "1.0")]),
        module("c", "1.0", &[("a", "1.0")]),
    ];
    match DependencyGraph::build(batch) {
        Err(GraphError::CycleDetected { chain }) => {
            assert_eq!(chain, vec!["a", "b", "c", "a"]);
        }
        other => panic!("expected cycle, got {:?}", other.map(|g| g.len())),
    }
}

#[test]
fn cycle_elsewhere_is_found_from_any_starting_module() {
    // "entry" is outside the cycle; the walk from it must not loop.
    let batch = vec![
        module("entry", "1.0", &[("a", "1.0")]),
        module("a", "1.0", &[("b", "1.0")]),
        module("b", "1.0", &[("a", "1.0")]),
    ];
    assert!(matches!(
        DependencyGraph::build(batch),
        Err(GraphError::CycleDetected { .. })
    ));
}

#[test]
fn version_mismatch_is_a_missing_dependency() {
    let batch = vec![
        module("x", "1.0", &[]),
        module("consumer", "1.0", &[("x", "2.0")]),
    ];
    let graph = DependencyGraph::build(batch).expect("build");
    let missing = graph.missing_dependencies();
    assert_eq!(missing.len(), 1);
    assert_eq!(
        missing.get("x:2.0").map(Vec::as_slice),
        Some(&["consumer".to_string()][..])
    );
    assert!(matches!(
        graph.ensure_satisfied(),
        Err(GraphError::MissingDependencies { .. })
    ));
}

#[test]
fn matching_version_clears_the_missing_entry() {
    // Without x:2.0 the graph is unsatisfied...
    let graph = DependencyGraph::build(vec![module("consumer", "1.0", &[("x", "2.0")])])
        .expect("build");
    assert!(graph.ensure_satisfied().is_err());

    // ...and satisfied once the exact key arrives.
    let graph = DependencyGraph::build(vec![
        module("consumer", "1.0", &[("x", "2.0")]),
        module("x", "2.0", &[]),
    ])
    .expect("build");
    assert!(graph.ensure_satisfied().is_ok());
    assert!(graph.missing_dependencies().is_empty());
}

#[test]
fn lookup_by_key_requires_the_exact_version() {
    let batch = vec![module("x", "1.0", &[])];
    let graph = DependencyGraph::build(batch).expect("build");
    assert!(graph.get("x:1.0").is_some());
    assert!(graph.get("x:2.0").is_none());
}

#[test]
fn empty_batch_builds_an_empty_graph() {
    let graph = DependencyGraph::build(Vec::new()).expect("build");
    assert!(graph.is_empty());
    assert_eq!(graph.roots().count(), 0);
    assert!(graph.ensure_satisfied().is_ok());
}
