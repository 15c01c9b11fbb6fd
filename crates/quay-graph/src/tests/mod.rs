//! Test support and suites for the graph crate.

mod graph_tests;
mod traversal_tests;

use indexmap::IndexMap;
use quay_manifest::ModuleDescriptor;

/// Build a descriptor without touching the filesystem. Path checks are
/// discovery's concern, not the graph's.
pub(crate) fn module(name: &str, version: &str, deps: &[(&str, &str)]) -> ModuleDescriptor {
    ModuleDescriptor {
        name: name.to_string(),
        version: version.to_string(),
        path: std::path::PathBuf::new(),
        dependencies: deps
            .iter()
            .map(|(dep, ver)| (dep.to_string(), ver.to_string()))
            .collect::<IndexMap<_, _>>(),
        extra_settings: Vec::new(),
        order: 0,
        manifest_path: None,
    }
}
