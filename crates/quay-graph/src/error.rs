//! Error types for graph construction.

use indexmap::IndexMap;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

/// Unresolved dependency key -> names of the modules that required it.
/// Insertion-ordered so the first offending key reported is the first one
/// encountered during construction.
pub type MissingDependencyIndex = IndexMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum GraphError {
    /// A module is its own transitive dependent. The chain lists names in
    /// dependency order with the origin at both ends, e.g.
    /// `["billing", "ledger", "billing"]`.
    #[error("dependency cycle detected: {}", chain.join(" -> "))]
    CycleDetected { chain: Vec<String> },

    /// One or more required dependency keys have no matching node.
    #[error("{}", format_missing(index))]
    MissingDependencies { index: MissingDependencyIndex },
}

fn format_missing(index: &MissingDependencyIndex) -> String {
    match index.first() {
        Some((key, requesters)) => {
            let who = requesters.first().map(String::as_str).unwrap_or("unknown");
            if index.len() == 1 {
                format!("unresolved dependency {key:?} required by {who:?}")
            } else {
                format!(
                    "unresolved dependency {key:?} required by {who:?} ({} more unresolved)",
                    index.len() - 1
                )
            }
        }
        None => "unresolved dependencies".to_string(),
    }
}
