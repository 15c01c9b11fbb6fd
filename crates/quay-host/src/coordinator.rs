//! Thin orchestration: graph construction, dependency-order traversal and
//! per-node side effects, sequenced into one resolution pass.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use figment::Figment;
use figment::providers::{Format as _, Json};
use serde::Deserialize;

use quay_graph::{DependencyGraph, Node, NodeAction};
use quay_manifest::ModuleDescriptor;

use crate::arbiter::ConflictArbiter;
use crate::component::{ComponentCandidate, HostComponents, LoadedComponent, ReplacementRecord};
use crate::error::{HostError, Result};
use crate::inspect::ComponentInspector;
use crate::loader::ArtifactLoader;

/// File extension of a module's primary artifact inside its directory.
pub const MODULE_EXTENSION: &str = "qmod";

/// The two directories driving discovery.
#[derive(Debug, Clone, Deserialize)]
pub struct HostOptions {
    /// Directory of module manifests.
    #[serde(rename = "Configurations")]
    pub manifest_dir: PathBuf,
    /// Directory modules are installed under when their manifest names no
    /// explicit path.
    #[serde(rename = "Installations")]
    pub install_dir: PathBuf,
}

/// Everything a successful resolution produced. Constructed once at
/// startup and passed by reference to consumers; independent resolutions
/// (and tests) can hold several without sharing state.
#[derive(Debug)]
pub struct Resolution {
    pub graph: DependencyGraph,
    /// Module keys in the order their side effects ran.
    pub load_order: Vec<String>,
    /// Decided component set, in registration order.
    pub components: Vec<ComponentCandidate>,
    pub replacements: Vec<ReplacementRecord>,
    /// Every candidate examined during arbitration.
    pub examined: Vec<LoadedComponent>,
    settings: Figment,
}

impl Resolution {
    /// The layered settings profile aggregated from every module's extra
    /// settings files, in traversal order (later modules override).
    pub fn settings(&self) -> &Figment {
        &self.settings
    }

    /// Extract the merged settings into a concrete type.
    pub fn settings_as<'de, T: Deserialize<'de>>(&'de self) -> Result<T> {
        self.settings.extract().map_err(HostError::from)
    }
}

/// Sequences one resolution pass: build the graph, fail on unsatisfied
/// requirements, traverse in dependency order while feeding the arbiter,
/// then hand the decided component set to the loader.
pub struct LoadCoordinator<I, L> {
    host: HostComponents,
    inspector: I,
    loader: L,
}

impl<I, L> LoadCoordinator<I, L>
where
    I: ComponentInspector,
    L: ArtifactLoader,
{
    pub fn new(host: HostComponents, inspector: I, loader: L) -> Self {
        Self { host, inspector, loader }
    }

    /// Discover manifests on disk, then resolve.
    pub async fn resolve_dir(&self, options: &HostOptions) -> Result<Resolution> {
        let batch = quay_manifest::discover(&options.manifest_dir, &options.install_dir)?;
        self.resolve(batch).await
    }

    /// Resolve a prepared descriptor batch.
    ///
    /// Either returns a usable [`Resolution`] or fails with the first
    /// fatal condition; there is no partial success and no retry.
    pub async fn resolve(&self, batch: Vec<ModuleDescriptor>) -> Result<Resolution> {
        tracing::info!(modules = batch.len(), "module registration started");
        quay_manifest::validate_batch(&batch)?;

        let graph = DependencyGraph::build(batch)?;
        graph.ensure_satisfied()?;

        let mut visitor = LoadVisitor {
            loader: &self.loader,
            arbiter: ConflictArbiter::new(&self.host, &self.inspector),
            order: Vec::with_capacity(graph.len()),
            settings: Figment::new(),
        };
        graph.traverse(&mut visitor).await?;
        let LoadVisitor { arbiter, order, settings, .. } = visitor;
        let outcome = arbiter.finish();

        for component in &outcome.components {
            tracing::info!(
                component = %component.full_name(),
                module = %component.module,
                "loading component"
            );
            if let Err(source) = self.loader.load_component(component).await {
                tracing::error!(
                    component = %component.full_name(),
                    path = %component.path.display(),
                    module = %component.module,
                    "component load failed"
                );
                return Err(HostError::ComponentLoad {
                    component: component.name.clone(),
                    path: component.path.clone(),
                    module: component.module.clone(),
                    source,
                });
            }
        }

        tracing::info!(
            modules = graph.len(),
            components = outcome.components.len(),
            "module registration finished"
        );
        Ok(Resolution {
            graph,
            load_order: order,
            components: outcome.components,
            replacements: outcome.replacements,
            examined: outcome.examined,
            settings,
        })
    }
}

/// Per-node side effects: load the module's primary artifact when it ships
/// one, feed its declared components through the arbiter, and layer its
/// extra settings files.
struct LoadVisitor<'a, I, L> {
    loader: &'a L,
    arbiter: ConflictArbiter<'a, I>,
    order: Vec<String>,
    settings: Figment,
}

#[async_trait]
impl<I, L> NodeAction for LoadVisitor<'_, I, L>
where
    I: ComponentInspector,
    L: ArtifactLoader,
{
    type Error = HostError;

    async fn execute(&mut self, node: Node<'_>) -> Result<()> {
        let module = node.module();

        let artifact = module.file_path(format!("{}.{MODULE_EXTENSION}", module.name));
        if artifact.is_file() {
            self.loader
                .load_module(module, &artifact)
                .await
                .map_err(|source| HostError::ModuleArtifact {
                    module: module.name.clone(),
                    path: artifact.clone(),
                    source,
                })?;
        }

        tracing::debug!(module = %module.name, "collecting auxiliary components");
        for declared in quay_manifest::declared_components(module)? {
            self.arbiter
                .consider(ComponentCandidate {
                    name: declared.name,
                    version: declared.version,
                    path: declared.path,
                    module: module.name.clone(),
                })
                .await?;
        }

        for file in &module.extra_settings {
            let path = if Path::new(file).is_absolute() {
                PathBuf::from(file)
            } else {
                module.file_path(file)
            };
            let layered = std::mem::replace(&mut self.settings, Figment::new());
            self.settings = layered.merge(Json::file(path));
        }

        self.order.push(module.key());
        Ok(())
    }
}
