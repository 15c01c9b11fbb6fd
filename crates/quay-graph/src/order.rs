//! Deterministic pre-insertion ordering: cycle check and weight
//! propagation over a descriptor batch.
//!
//! The weight of a descriptor counts the paths leading into it from
//! modules it transitively depends on, so modules depended upon by longer
//! or wider chains sort later and plain dependencies sort first. This is a
//! heuristic pre-order; the traversal re-checks readiness at runtime.

use quay_manifest::ModuleDescriptor;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{GraphError, Result};

/// Compute per-module weights for the batch, failing on the first cycle.
pub(crate) fn weigh(batch: &[ModuleDescriptor]) -> Result<FxHashMap<String, u64>> {
    for md in batch {
        check_cycle(md, batch)?;
    }

    let mut weights: FxHashMap<String, u64> =
        batch.iter().map(|md| (md.name.clone(), 0)).collect();
    for md in batch {
        bump_dependents(md, batch, &mut weights);
    }
    Ok(weights)
}

/// Sort the batch in place: ascending weight, then name, then discovery
/// order. Names are unique per batch, so the discovery order is a
/// last-resort tie-break only.
pub(crate) fn sort(batch: &mut [ModuleDescriptor], weights: &FxHashMap<String, u64>) {
    batch.sort_by(|a, b| {
        let wa = weights.get(&a.name).copied().unwrap_or(0);
        let wb = weights.get(&b.name).copied().unwrap_or(0);
        wa.cmp(&wb)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.order.cmp(&b.order))
    });
}

/// Walk forward along dependency edges from `origin`; reaching any module
/// that itself lists `origin` as a dependency closes a cycle. The visited
/// set keeps cycles that do not involve `origin` from looping the walk.
fn check_cycle(origin: &ModuleDescriptor, batch: &[ModuleDescriptor]) -> Result<()> {
    fn walk<'a>(
        origin: &'a ModuleDescriptor,
        current: &'a ModuleDescriptor,
        batch: &'a [ModuleDescriptor],
        path: &mut Vec<&'a str>,
        seen: &mut FxHashSet<&'a str>,
    ) -> Result<()> {
        if current.dependencies.contains_key(&origin.name) {
            let mut chain: Vec<String> = path.iter().map(|name| (*name).to_string()).collect();
            chain.push(current.name.clone());
            chain.push(origin.name.clone());
            tracing::error!(chain = %chain.join(" -> "), "dependency cycle detected");
            return Err(GraphError::CycleDetected { chain });
        }

        for dep_name in current.dependencies.keys() {
            if let Some(next) = batch.iter().find(|md| md.name == *dep_name) {
                if seen.insert(next.name.as_str()) {
                    path.push(current.name.as_str());
                    walk(origin, next, batch, path, seen)?;
                    path.pop();
                }
            }
        }
        Ok(())
    }

    let mut seen = FxHashSet::default();
    seen.insert(origin.name.as_str());
    walk(origin, origin, batch, &mut Vec::new(), &mut seen)
}

/// Increment the weight of every module that depends on `md`, directly or
/// transitively, once per path. Terminates because the batch is proven
/// acyclic before weights are computed.
fn bump_dependents(
    md: &ModuleDescriptor,
    batch: &[ModuleDescriptor],
    weights: &mut FxHashMap<String, u64>,
) {
    for dependent in batch.iter().filter(|n| n.dependencies.contains_key(&md.name)) {
        if let Some(weight) = weights.get_mut(&dependent.name) {
            *weight += 1;
        }
        bump_dependents(dependent, batch, weights);
    }
}
