//! Traversal contract: exactly-once visits, dependency-before-dependent
//! execution, and error propagation out of the per-node action.

use async_trait::async_trait;

use super::module;
use crate::{DependencyGraph, Node, NodeAction};

struct Recorder(Vec<String>);

#[async_trait]
impl NodeAction for Recorder {
    type Error = std::convert::Infallible;

    async fn execute(&mut self, node: Node<'_>) -> Result<(), Self::Error> {
        self.0.push(node.module().name.clone());
        Ok(())
    }
}

struct FailOn(&'static str);

#[async_trait]
impl NodeAction for FailOn {
    type Error = String;

    async fn execute(&mut self, node: Node<'_>) -> Result<(), Self::Error> {
        if node.module().name == self.0 {
            return Err(format!("boom in {}", self.0));
        }
        Ok(())
    }
}

fn diamond() -> DependencyGraph {
    DependencyGraph::build(vec![
        module("base", "1.0", &[]),
        module("left", "1.0", &[("base", "1.0")]),
        module("right", "1.0", &[("base", "1.0")]),
        module("top", "1.0", &[("left", "1.0"), ("right", "1.0")]),
    ])
    .expect("acyclic diamond")
}

#[tokio::test]
async fn visits_every_node_exactly_once() {
    let graph = diamond();
    let mut recorder = Recorder(Vec::new());
    graph.traverse(&mut recorder).await.expect("traverse");

    let mut names = recorder.0.clone();
    names.sort();
    assert_eq!(names, vec!["base", "left", "right", "top"]);
}

#[tokio::test]
async fn dependencies_complete_before_dependents_start() {
    let graph = diamond();
    let mut recorder = Recorder(Vec::new());
    graph.traverse(&mut recorder).await.expect("traverse");

    let position = |name: &str| {
        recorder
            .0
            .iter()
            .position(|n| n == name)
            .unwrap_or_else(|| panic!("{name} not visited"))
    };
    assert!(position("base") < position("left"));
    assert!(position("base") < position("right"));
    assert!(position("left") < position("top"));
    assert!(position("right") < position("top"));
}

#[tokio::test]
async fn load_order_matches_traversal_without_side_effects() {
    let graph = diamond();
    let mut recorder = Recorder(Vec::new());
    graph.traverse(&mut recorder).await.expect("traverse");

    let order = graph.load_order().await;
    let names: Vec<String> = order
        .iter()
        .map(|key| key.split(':').next().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, recorder.0);
}

#[tokio::test]
async fn load_order_is_deterministic_across_runs() {
    let graph = diamond();
    assert_eq!(graph.load_order().await, graph.load_order().await);
}

#[tokio::test]
async fn action_errors_abort_the_traversal() {
    let graph = diamond();
    let mut action = FailOn("left");
    let err = graph.traverse(&mut action).await.expect_err("should fail");
    assert_eq!(err, "boom in left");
}

#[tokio::test]
async fn fan_out_chain_keeps_relative_order() {
    // base -> mid -> top, with an unrelated island alongside.
    let graph = DependencyGraph::build(vec![
        module("island", "1.0", &[]),
        module("base", "1.0", &[]),
        module("mid", "1.0", &[("base", "1.0")]),
        module("top", "1.0", &[("mid", "1.0")]),
    ])
    .expect("build");

    let order = graph.load_order().await;
    let pos = |key: &str| order.iter().position(|k| k == key).expect("visited");
    assert_eq!(order.len(), 4);
    assert!(pos("base:1.0") < pos("mid:1.0"));
    assert!(pos("mid:1.0") < pos("top:1.0"));
}
