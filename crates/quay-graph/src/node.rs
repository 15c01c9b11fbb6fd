//! Borrow wrapper over a graph vertex.

use std::fmt;

use quay_manifest::ModuleDescriptor;

use crate::graph::DependencyGraph;

/// A vertex handle. The graph exclusively owns every descriptor; a `Node`
/// is a read reference pairing the descriptor with the graph it lives in
/// so dependents can be resolved on demand.
#[derive(Clone, Copy)]
pub struct Node<'g> {
    graph: &'g DependencyGraph,
    index: usize,
}

impl<'g> Node<'g> {
    pub(crate) fn new(graph: &'g DependencyGraph, index: usize) -> Self {
        Self { graph, index }
    }

    /// The descriptor this vertex wraps.
    pub fn module(&self) -> &'g ModuleDescriptor {
        self.graph.descriptor_at(self.index)
    }

    /// Node identity, `"{name}:{version}"`.
    pub fn key(&self) -> String {
        self.module().key()
    }

    /// All nodes whose declared dependency key matches this node's key.
    ///
    /// Computed on demand by filtering the graph's shared edge list rather
    /// than held as back-pointers; the full edge list is only complete once
    /// construction finishes, and nodes are added incrementally.
    pub fn dependents(&self) -> Vec<Node<'g>> {
        self.graph
            .dependent_indices(self.index)
            .into_iter()
            .map(|index| Node::new(self.graph, index))
            .collect()
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node").field("key", &self.key()).finish()
    }
}
