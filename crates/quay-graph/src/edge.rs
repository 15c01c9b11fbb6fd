//! Dependency edges as a flat list.

use serde::{Deserialize, Serialize};

/// One dependency relation. `from` is the *dependency's* key
/// (`"{depName}:{depVersion}"`), `to` the dependent module's key, so edges
/// point in load order.
///
/// Edges are kept as a flat list, not deduplicated structurally; in
/// well-formed input each (from, to) pair occurs once because a dependency
/// map's keys are unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}
