//! The artifact loading boundary.
//!
//! Mapping module code or a decided component into the running process is
//! the host's concern; resolution ends at deciding what to load and in
//! which order. The coordinator drives this trait with those decisions.

use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use quay_manifest::ModuleDescriptor;

use crate::component::ComponentCandidate;

#[async_trait]
pub trait ArtifactLoader: Send + Sync {
    /// Load a module's primary artifact. Called in dependency order,
    /// once per module that ships one.
    async fn load_module(
        &self,
        module: &ModuleDescriptor,
        artifact: &Path,
    ) -> std::io::Result<()>;

    /// Load one decided auxiliary component, after arbitration has
    /// completed for the whole batch.
    async fn load_component(&self, component: &ComponentCandidate) -> std::io::Result<()>;
}

#[async_trait]
impl<T> ArtifactLoader for &T
where
    T: ArtifactLoader,
{
    async fn load_module(
        &self,
        module: &ModuleDescriptor,
        artifact: &Path,
    ) -> std::io::Result<()> {
        (**self).load_module(module, artifact).await
    }

    async fn load_component(&self, component: &ComponentCandidate) -> std::io::Result<()> {
        (**self).load_component(component).await
    }
}

/// Loader that records what it was asked to load without touching the
/// process. Backs dry-run resolution and the test suites.
#[derive(Debug, Default)]
pub struct RecordingLoader {
    modules: Mutex<Vec<String>>,
    components: Mutex<Vec<String>>,
}

impl RecordingLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Module names passed to [`ArtifactLoader::load_module`], in call order.
    pub fn modules(&self) -> Vec<String> {
        self.modules.lock().clone()
    }

    /// Full names passed to [`ArtifactLoader::load_component`], in call order.
    pub fn components(&self) -> Vec<String> {
        self.components.lock().clone()
    }
}

#[async_trait]
impl ArtifactLoader for RecordingLoader {
    async fn load_module(
        &self,
        module: &ModuleDescriptor,
        _artifact: &Path,
    ) -> std::io::Result<()> {
        self.modules.lock().push(module.name.clone());
        Ok(())
    }

    async fn load_component(&self, component: &ComponentCandidate) -> std::io::Result<()> {
        self.components.lock().push(component.full_name());
        Ok(())
    }
}
