//! Graph construction from a descriptor batch.

use indexmap::IndexMap;
use quay_manifest::ModuleDescriptor;
use rustc_hash::FxHashMap;

use crate::edge::Edge;
use crate::error::{GraphError, MissingDependencyIndex, Result};
use crate::node::Node;
use crate::order;

/// The module dependency graph.
///
/// Built once from a validated batch, then only read. Construction fixes a
/// deterministic processing order (weight, then name, then discovery
/// order), inserts one node per descriptor, records one edge per declared
/// dependency, and indexes every dependency key that no inserted node
/// satisfies. Cycles abort construction; missing dependencies are reported
/// by [`ensure_satisfied`](Self::ensure_satisfied) after the whole batch
/// has been inserted, since a later descriptor may still satisfy an
/// earlier requirement.
#[derive(Debug)]
pub struct DependencyGraph {
    nodes: Vec<ModuleDescriptor>,
    /// Node key -> position in `nodes`.
    index: FxHashMap<String, usize>,
    edges: Vec<Edge>,
    roots: Vec<usize>,
    missing: MissingDependencyIndex,
}

impl DependencyGraph {
    /// Build the graph. The batch must already be validated
    /// (field invariants and unique names).
    pub fn build(mut batch: Vec<ModuleDescriptor>) -> Result<Self> {
        let weights = order::weigh(&batch)?;
        order::sort(&mut batch, &weights);

        let mut graph = Self {
            nodes: Vec::with_capacity(batch.len()),
            index: FxHashMap::default(),
            edges: Vec::new(),
            roots: Vec::new(),
            missing: IndexMap::new(),
        };

        for md in batch {
            let key = md.key();
            graph.missing.shift_remove(&key);

            let position = graph.nodes.len();
            if md.dependencies.is_empty() {
                graph.roots.push(position);
            } else {
                for (dep_name, dep_version) in &md.dependencies {
                    let dep_key = format!("{dep_name}:{dep_version}");
                    graph.edges.push(Edge { from: dep_key.clone(), to: key.clone() });
                    if !graph.index.contains_key(&dep_key) {
                        tracing::debug!(
                            module = %md.name,
                            dependency = %dep_key,
                            "dependency not yet satisfied"
                        );
                        graph.missing.entry(dep_key).or_default().push(md.name.clone());
                    }
                }
            }

            graph.index.insert(key, position);
            graph.nodes.push(md);
        }

        Ok(graph)
    }

    /// Fail with the full missing-dependency index if any requirement is
    /// still unsatisfied after construction.
    pub fn ensure_satisfied(&self) -> Result<()> {
        if self.missing.is_empty() {
            return Ok(());
        }
        for (key, requesters) in &self.missing {
            tracing::error!(
                dependency = %key,
                requested_by = ?requesters,
                "missing dependency"
            );
        }
        Err(GraphError::MissingDependencies { index: self.missing.clone() })
    }

    /// Modules with no dependencies, in processing order.
    pub fn roots(&self) -> impl Iterator<Item = Node<'_>> {
        self.roots.iter().map(|&index| Node::new(self, index))
    }

    /// The flat dependency edge list.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Unresolved dependency keys and the modules requiring them.
    pub fn missing_dependencies(&self) -> &MissingDependencyIndex {
        &self.missing
    }

    /// All nodes in processing order.
    pub fn iter(&self) -> impl Iterator<Item = Node<'_>> {
        (0..self.nodes.len()).map(|index| Node::new(self, index))
    }

    /// Look a node up by its `"{name}:{version}"` key.
    pub fn get(&self, key: &str) -> Option<Node<'_>> {
        self.index.get(key).map(|&index| Node::new(self, index))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn descriptor_at(&self, index: usize) -> &ModuleDescriptor {
        &self.nodes[index]
    }

    pub(crate) fn root_indices(&self) -> &[usize] {
        &self.roots
    }

    /// Positions of every node whose declared dependency key matches the
    /// node at `index`.
    pub(crate) fn dependent_indices(&self, index: usize) -> Vec<usize> {
        let key = self.nodes[index].key();
        self.edges
            .iter()
            .filter(|edge| edge.from == key)
            .filter_map(|edge| self.index.get(&edge.to).copied())
            .collect()
    }
}
