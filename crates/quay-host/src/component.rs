//! Component candidates, the host's component registry, and the audit
//! records arbitration leaves behind.

use std::path::PathBuf;

use rustc_hash::FxHashMap;
use semver::Version;
use serde::Serialize;

/// Attribution used in [`ReplacementRecord::module`] when the host itself
/// provided the surviving component.
pub const HOST_MODULE: &str = "host";

/// An auxiliary component declared by a module, pending arbitration.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentCandidate {
    pub name: String,
    /// Concrete version. `None` until the manifest or a header probe
    /// supplies it; probing is deferred because header reads are costly.
    pub version: Option<Version>,
    pub path: PathBuf,
    /// Name of the module that declared this candidate.
    pub module: String,
}

impl ComponentCandidate {
    /// `name@version`, or just the name while the version is unknown.
    pub fn full_name(&self) -> String {
        match &self.version {
            Some(version) => format!("{}@{version}", self.name),
            None => self.name.clone(),
        }
    }
}

/// A component the hosting process already exposes.
#[derive(Debug, Clone)]
pub struct HostComponent {
    pub name: String,
    pub version: Option<Version>,
}

impl HostComponent {
    pub fn new(name: impl Into<String>, version: Option<Version>) -> Self {
        Self { name: name.into(), version }
    }

    pub fn full_name(&self) -> String {
        match &self.version {
            Some(version) => format!("{}@{version}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Registry of components the host already provides. Arbitration's first
/// authority: a candidate matching a host component never loads.
#[derive(Debug, Clone, Default)]
pub struct HostComponents {
    components: FxHashMap<String, HostComponent>,
}

impl HostComponents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, component: HostComponent) {
        self.components.insert(component.name.clone(), component);
    }

    pub fn get(&self, name: &str) -> Option<&HostComponent> {
        self.components.get(name)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl FromIterator<HostComponent> for HostComponents {
    fn from_iter<I: IntoIterator<Item = HostComponent>>(iter: I) -> Self {
        let mut registry = Self::new();
        for component in iter {
            registry.insert(component);
        }
        registry
    }
}

/// Audit entry: which component name was replaced, by which concrete
/// component, and on whose account. Append-only; consumed only for
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementRecord {
    /// Name of the component that was replaced or skipped.
    pub component: String,
    /// Full name of the component that survived arbitration.
    pub replacement: String,
    /// [`HOST_MODULE`] when the host's copy won; otherwise the module
    /// whose candidate lost.
    pub module: String,
}

/// Audit entry for every candidate arbitration examined, winner or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedComponent {
    pub module: String,
    pub component: String,
    pub full_name: String,
}
