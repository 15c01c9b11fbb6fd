//! Manifest discovery: enumerate a directory of module manifests and
//! produce a validated descriptor batch.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::descriptor::ModuleDescriptor;
use crate::error::{ManifestError, Result};

/// Read every `*.json` manifest under `manifest_dir` into a validated
/// descriptor batch.
///
/// A manifest without a `"Path"` is assumed installed at
/// `<install_dir>/<name>`; a relative path resolves against the manifest
/// file's own directory. Files are visited in sorted order so discovery
/// `order` (and with it the final resolution order) is stable across runs.
pub fn discover(manifest_dir: &Path, install_dir: &Path) -> Result<Vec<ModuleDescriptor>> {
    let mut files: Vec<PathBuf> = fs::read_dir(manifest_dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    let mut seen: FxHashMap<String, PathBuf> = FxHashMap::default();
    let mut batch = Vec::with_capacity(files.len());

    for (order, file) in files.into_iter().enumerate() {
        tracing::info!(manifest = %file.display(), "loading module metadata");

        let bytes = fs::read(&file)?;
        let mut md: ModuleDescriptor = serde_json::from_slice(&bytes)
            .map_err(|source| ManifestError::Json { path: file.clone(), source })?;

        if md.path.as_os_str().is_empty() {
            md.path = install_dir.join(&md.name);
        } else if md.path.is_relative() {
            md.path = file.parent().unwrap_or(Path::new("")).join(&md.path);
        }

        md.validate()?;
        md.check_path()?;

        if let Some(first) = seen.insert(md.name.clone(), file.clone()) {
            return Err(ManifestError::DuplicateModule {
                name: md.name,
                first,
                second: file,
            });
        }

        md.order = order;
        md.manifest_path = Some(file);
        tracing::info!(module = %md.key(), "module metadata loaded");
        batch.push(md);
    }

    Ok(batch)
}

/// Validate a prepared batch the way discovery would: every descriptor's
/// field invariants, plus the batch-wide unique-name rule. Hosts that build
/// descriptors in code instead of going through [`discover`] run this
/// before graph construction.
pub fn validate_batch(batch: &[ModuleDescriptor]) -> Result<()> {
    let mut seen: FxHashMap<&str, &ModuleDescriptor> = FxHashMap::default();
    for md in batch {
        md.validate()?;
        if let Some(first) = seen.insert(md.name.as_str(), md) {
            return Err(ManifestError::DuplicateModule {
                name: md.name.clone(),
                first: first.manifest_path.clone().unwrap_or_else(|| first.path.clone()),
                second: md.manifest_path.clone().unwrap_or_else(|| md.path.clone()),
            });
        }
    }
    Ok(())
}
