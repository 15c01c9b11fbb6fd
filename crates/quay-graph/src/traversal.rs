//! Dependency-respecting traversal.
//!
//! The runtime correctness mechanism: regardless of the approximate
//! weight-sort order fixed at construction, an action runs for a node only
//! after it has run for every node the module depends on.

use std::collections::VecDeque;
use std::convert::Infallible;

use async_trait::async_trait;
use rustc_hash::FxHashSet;

use crate::graph::DependencyGraph;
use crate::node::Node;

/// Per-node side effect executed during traversal (load the module's code,
/// merge its configuration). The action may await internal work; the
/// traversal awaits each call to completion before dequeuing the next
/// node, so actions never overlap.
#[async_trait]
pub trait NodeAction: Send {
    type Error: Send + 'static;

    async fn execute(&mut self, node: Node<'_>) -> Result<(), Self::Error>;
}

impl DependencyGraph {
    /// Visit every node exactly once such that a node is visited only
    /// after all nodes it depends on.
    ///
    /// A dequeued node with an unvisited dependency is re-enqueued at the
    /// back and retried later. This busy-wait-by-requeue always terminates
    /// because construction already proved the graph acyclic; the cycle
    /// check is a hard precondition of calling this, and the only way to
    /// obtain a graph is through [`DependencyGraph::build`], which runs it.
    ///
    /// The graph must also be fully satisfied: a node whose dependency
    /// never arrives would requeue forever, so call
    /// [`ensure_satisfied`](Self::ensure_satisfied) before traversing.
    ///
    /// Order among unrelated nodes is queue order and not specified
    /// further. Traversal is single-threaded: the action is awaited to
    /// completion before the next dequeue, never pipelined.
    pub async fn traverse<A>(&self, action: &mut A) -> Result<(), A::Error>
    where
        A: NodeAction,
    {
        debug_assert!(
            self.missing_dependencies().is_empty(),
            "traversal requires a fully satisfied graph"
        );

        let mut queue: VecDeque<usize> = self.root_indices().iter().copied().collect();
        let mut queued: FxHashSet<usize> = queue.iter().copied().collect();
        let mut visited: FxHashSet<&str> = FxHashSet::default();

        while let Some(index) = queue.pop_front() {
            let module = self.descriptor_at(index);

            let ready = module
                .dependencies
                .keys()
                .all(|dep| visited.contains(dep.as_str()));
            if !ready {
                queue.push_back(index);
                continue;
            }
            queued.remove(&index);

            action.execute(Node::new(self, index)).await?;
            visited.insert(module.name.as_str());

            for dependent in self.dependent_indices(index) {
                if queued.insert(dependent) {
                    queue.push_back(dependent);
                }
            }
        }
        Ok(())
    }

    /// The order [`traverse`](Self::traverse) would visit nodes in, as
    /// keys, without running any side effect.
    pub async fn load_order(&self) -> Vec<String> {
        let mut collector = OrderCollector(Vec::with_capacity(self.len()));
        match self.traverse(&mut collector).await {
            Ok(()) => collector.0,
            Err(never) => match never {},
        }
    }
}

struct OrderCollector(Vec<String>);

#[async_trait]
impl NodeAction for OrderCollector {
    type Error = Infallible;

    async fn execute(&mut self, node: Node<'_>) -> Result<(), Infallible> {
        self.0.push(node.key());
        Ok(())
    }
}
