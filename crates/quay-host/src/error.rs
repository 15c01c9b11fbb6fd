//! Error types for arbitration and load coordination.

use std::path::PathBuf;

use semver::Version;
use thiserror::Error;

use crate::inspect::ProbeError;

pub type Result<T> = std::result::Result<T, HostError>;

#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Manifest(#[from] quay_manifest::ManifestError),

    #[error(transparent)]
    Graph(#[from] quay_graph::GraphError),

    /// The host cannot safely downgrade a component it has already loaded.
    #[error(
        "component {component:?} from module {module:?} requires version {candidate} \
         but the host provides {host}"
    )]
    IncompatibleComponent {
        component: String,
        module: String,
        candidate: Version,
        host: Version,
    },

    #[error("failed to read component header of {component:?} at {path}: {source}")]
    Probe {
        component: String,
        path: PathBuf,
        #[source]
        source: ProbeError,
    },

    #[error("failed to load primary artifact of module {module:?} from {path}: {source}")]
    ModuleArtifact {
        module: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load component {component:?} from {path} (module {module:?}): {source}")]
    ComponentLoad {
        component: String,
        path: PathBuf,
        module: String,
        #[source]
        source: std::io::Error,
    },

    #[error("settings extraction failed: {0}")]
    Settings(#[from] figment::Error),
}
