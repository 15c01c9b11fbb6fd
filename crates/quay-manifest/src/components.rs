//! Per-module component manifests.
//!
//! A module may ship auxiliary components next to its primary artifact,
//! listed in `<module_path>/<name>.deps.json`. These are distinct from
//! inter-module dependencies: they are loadable artifacts subject to
//! cross-module and host version arbitration, not graph edges.

use std::fs;
use std::path::PathBuf;

use semver::Version;
use serde::Deserialize;

use crate::descriptor::ModuleDescriptor;
use crate::error::{ManifestError, Result};

/// File extension of a component artifact inside the module directory.
pub const COMPONENT_EXTENSION: &str = "qco";

/// One entry of a component manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComponentEntry {
    pub name: String,
    /// Declared version, when the manifest knows it. Left unresolved here
    /// if absent; arbitration probes the artifact header on demand.
    #[serde(default)]
    pub version: Option<Version>,
}

/// A component declaration resolved against the module directory.
#[derive(Debug, Clone)]
pub struct DeclaredComponent {
    pub name: String,
    pub version: Option<Version>,
    pub path: PathBuf,
}

/// Read the module's component manifest, if any.
///
/// A missing `<name>.deps.json` means the module ships no auxiliary
/// components. Entries naming the module itself, and entries whose artifact
/// file is absent, are skipped rather than rejected: the manifest commonly
/// lists the module's own artifact and host-supplied files alongside the
/// real extras.
pub fn declared_components(module: &ModuleDescriptor) -> Result<Vec<DeclaredComponent>> {
    let manifest = module.file_path(format!("{}.deps.json", module.name));
    if !manifest.is_file() {
        return Ok(Vec::new());
    }

    let bytes = fs::read(&manifest)?;
    let entries: Vec<ComponentEntry> = serde_json::from_slice(&bytes)
        .map_err(|source| ManifestError::Json { path: manifest, source })?;

    let mut declared = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.name == module.name {
            continue;
        }
        let path = module.file_path(format!("{}.{COMPONENT_EXTENSION}", entry.name));
        if !path.is_file() {
            continue;
        }
        declared.push(DeclaredComponent {
            name: entry.name,
            version: entry.version,
            path,
        });
    }
    Ok(declared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use tempfile::TempDir;

    fn module_in(dir: &TempDir) -> ModuleDescriptor {
        ModuleDescriptor {
            name: "billing".into(),
            version: "1.0".into(),
            path: dir.path().to_path_buf(),
            dependencies: IndexMap::new(),
            extra_settings: Vec::new(),
            order: 0,
            manifest_path: None,
        }
    }

    #[test]
    fn missing_component_manifest_means_no_components() {
        let dir = TempDir::new().expect("tempdir");
        let declared = declared_components(&module_in(&dir)).expect("read");
        assert!(declared.is_empty());
    }

    #[test]
    fn reads_entries_and_resolves_artifact_paths() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(
            dir.path().join("billing.deps.json"),
            r#"[
                { "Name": "pdf-render", "Version": "1.2.0" },
                { "Name": "currency" }
            ]"#,
        )
        .expect("write manifest");
        fs::write(dir.path().join("pdf-render.qco"), b"").expect("artifact");
        fs::write(dir.path().join("currency.qco"), b"").expect("artifact");

        let declared = declared_components(&module_in(&dir)).expect("read");
        assert_eq!(declared.len(), 2);
        assert_eq!(declared[0].name, "pdf-render");
        assert_eq!(declared[0].version, Some(Version::new(1, 2, 0)));
        assert_eq!(declared[0].path, dir.path().join("pdf-render.qco"));
        assert_eq!(declared[1].version, None);
    }

    #[test]
    fn skips_self_entry_and_absent_artifacts() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(
            dir.path().join("billing.deps.json"),
            r#"[
                { "Name": "billing" },
                { "Name": "ghost" },
                { "Name": "currency" }
            ]"#,
        )
        .expect("write manifest");
        fs::write(dir.path().join("currency.qco"), b"").expect("artifact");

        let declared = declared_components(&module_in(&dir)).expect("read");
        assert_eq!(declared.len(), 1);
        assert_eq!(declared[0].name, "currency");
    }
}
