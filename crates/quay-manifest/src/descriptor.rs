//! The module descriptor record and its validation rules.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ManifestError, Result};

/// Characters that may not appear in a module name. The name doubles as a
/// filesystem path segment: artifact, component-manifest and settings
/// lookups all join it onto the module directory.
const ILLEGAL_NAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Immutable-after-validation record of one module: identity, version,
/// dependency requirements and filesystem location.
///
/// The wire format matches the on-disk manifests: PascalCase field names,
/// `"Path"` for the module directory and `"Extra Settings"` for the list of
/// additional settings files. Dependencies map module names to required
/// versions; both sides are opaque strings and a requirement is satisfied
/// only by exact version equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModuleDescriptor {
    pub name: String,

    pub version: String,

    /// Absolute directory holding the module's files. Discovery resolves
    /// relative paths before validation; descriptors built in code must
    /// supply the final path themselves.
    #[serde(default)]
    pub path: PathBuf,

    /// Module name -> required version. Insertion order is preserved so
    /// edge construction and traversal readiness checks are deterministic.
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,

    /// Additional settings files merged into the host configuration when
    /// the module is visited. Relative entries resolve against `path`.
    #[serde(rename = "Extra Settings", default)]
    pub extra_settings: Vec<String>,

    /// Discovery order. Only used as the last ordering tie-break.
    #[serde(skip)]
    pub order: usize,

    /// Manifest file this descriptor was read from, when discovered.
    #[serde(skip)]
    pub manifest_path: Option<PathBuf>,
}

impl ModuleDescriptor {
    /// Graph node identity: `"{name}:{version}"`.
    pub fn key(&self) -> String {
        format!("{}:{}", self.name, self.version)
    }

    /// Check the field-level invariants: non-empty name without illegal
    /// path characters, non-empty version, no self-dependency.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ManifestError::EmptyName);
        }
        if self.name.contains(ILLEGAL_NAME_CHARS) || self.name.chars().any(char::is_control) {
            return Err(ManifestError::InvalidName(self.name.clone()));
        }
        if self.version.trim().is_empty() {
            return Err(ManifestError::EmptyVersion(self.name.clone()));
        }
        if self.dependencies.contains_key(&self.name) {
            return Err(ManifestError::SelfReference(self.name.clone()));
        }
        Ok(())
    }

    /// Check that the module directory exists. Kept separate from
    /// [`validate`](Self::validate) so descriptors can be validated without
    /// touching the filesystem.
    pub fn check_path(&self) -> Result<()> {
        if !self.path.is_dir() {
            return Err(ManifestError::PathNotFound(self.path.clone()));
        }
        Ok(())
    }

    /// Whether an available version satisfies this module. Exact string
    /// equality, deliberately: there is no range satisfaction for
    /// inter-module dependencies.
    pub fn version_fits(&self, version: &str) -> bool {
        self.version == version
    }

    /// Path of a file inside the module directory.
    pub fn file_path(&self, file_name: impl AsRef<Path>) -> PathBuf {
        self.path.join(file_name)
    }
}
