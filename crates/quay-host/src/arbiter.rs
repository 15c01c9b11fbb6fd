//! Auxiliary component version arbitration.
//!
//! Runs once per module, at the point the module is visited during
//! traversal, so decisions are made in dependency order. For each
//! candidate: the host's own registry rules first, then earlier modules'
//! pending candidates, and only a first sighting enters the pending set.

use std::cmp::Ordering;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::component::{
    ComponentCandidate, HOST_MODULE, HostComponents, LoadedComponent, ReplacementRecord,
};
use crate::error::HostError;
use crate::inspect::ComponentInspector;

/// The decided component set plus the audit trail of how it was reached.
#[derive(Debug)]
pub struct ArbitrationOutcome {
    /// Components to load, in registration order. Replacement keeps the
    /// original registration position.
    pub components: Vec<ComponentCandidate>,
    pub replacements: Vec<ReplacementRecord>,
    /// Every candidate examined, winners and losers alike.
    pub examined: Vec<LoadedComponent>,
}

/// Arbitrates component candidates against the host registry and against
/// each other. At most one candidate per component name survives.
pub struct ConflictArbiter<'a, I> {
    host: &'a HostComponents,
    inspector: &'a I,
    pending: IndexMap<String, ComponentCandidate>,
    replacements: Vec<ReplacementRecord>,
    examined: Vec<LoadedComponent>,
}

impl<'a, I: ComponentInspector> ConflictArbiter<'a, I> {
    pub fn new(host: &'a HostComponents, inspector: &'a I) -> Self {
        Self {
            host,
            inspector,
            pending: IndexMap::new(),
            replacements: Vec::new(),
            examined: Vec::new(),
        }
    }

    /// Arbitrate one candidate.
    ///
    /// Versions are resolved lazily: the artifact header is only read when
    /// a conflict actually needs the version and the manifest did not
    /// supply it.
    pub async fn consider(&mut self, mut candidate: ComponentCandidate) -> Result<(), HostError> {
        self.examined.push(LoadedComponent {
            module: candidate.module.clone(),
            component: candidate.name.clone(),
            full_name: candidate.full_name(),
        });

        if let Some(provided) = self.host.get(&candidate.name) {
            Self::resolve_version(self.inspector, &mut candidate).await?;
            if let (Some(have), Some(host_version)) = (&candidate.version, &provided.version) {
                if have > host_version {
                    tracing::error!(
                        component = %candidate.name,
                        module = %candidate.module,
                        candidate_version = %have,
                        host_version = %host_version,
                        "module component requires a newer version than the host provides"
                    );
                    return Err(HostError::IncompatibleComponent {
                        component: candidate.name,
                        module: candidate.module,
                        candidate: have.clone(),
                        host: host_version.clone(),
                    });
                }
            }
            tracing::debug!(
                component = %candidate.name,
                module = %candidate.module,
                "host already provides component, skipping candidate"
            );
            self.replacements.push(ReplacementRecord {
                component: candidate.name.clone(),
                replacement: provided.full_name(),
                module: HOST_MODULE.to_string(),
            });
            return Ok(());
        }

        match self.pending.entry(candidate.name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
            Entry::Occupied(mut slot) => {
                Self::resolve_version(self.inspector, &mut candidate).await?;
                Self::resolve_version(self.inspector, slot.get_mut()).await?;

                // Only two known versions can rank a challenger above the
                // incumbent; anything unresolved keeps the earlier
                // registration.
                let standing = match (&candidate.version, &slot.get().version) {
                    (Some(challenger), Some(holder)) => challenger.cmp(holder),
                    _ => Ordering::Less,
                };

                let record = match standing {
                    Ordering::Greater => {
                        let incumbent = slot.get();
                        tracing::info!(
                            replaced = %incumbent.full_name(),
                            replacement = %candidate.full_name(),
                            "component candidate superseded by newer version"
                        );
                        let record = ReplacementRecord {
                            component: incumbent.name.clone(),
                            replacement: candidate.full_name(),
                            module: incumbent.module.clone(),
                        };
                        // Replacement keeps the original registration slot.
                        *slot.get_mut() = candidate;
                        record
                    }
                    // Equal keeps the earlier registration as system of
                    // record; the record is informational and names the
                    // losing module.
                    Ordering::Equal | Ordering::Less => ReplacementRecord {
                        component: candidate.name.clone(),
                        replacement: slot.get().full_name(),
                        module: candidate.module.clone(),
                    },
                };
                self.replacements.push(record);
            }
        }
        Ok(())
    }

    /// Consume the arbiter once every module has been visited.
    pub fn finish(self) -> ArbitrationOutcome {
        ArbitrationOutcome {
            components: self.pending.into_values().collect(),
            replacements: self.replacements,
            examined: self.examined,
        }
    }

    async fn resolve_version(
        inspector: &I,
        candidate: &mut ComponentCandidate,
    ) -> Result<(), HostError> {
        if candidate.version.is_some() {
            return Ok(());
        }
        candidate.version = inspector
            .probe(&candidate.path)
            .await
            .map_err(|source| HostError::Probe {
                component: candidate.name.clone(),
                path: candidate.path.clone(),
                source,
            })?;
        Ok(())
    }
}
