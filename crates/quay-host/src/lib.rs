//! # quay-host
//!
//! The hosting side of module resolution: arbitration of auxiliary
//! component versions against the host's own component registry and across
//! modules, and the [`LoadCoordinator`] that sequences graph construction,
//! dependency-order traversal and per-node side effects into one
//! [`Resolution`].
//!
//! Resolution runs once, before any module code executes, and either
//! produces a usable [`Resolution`] or fails with a single fatal
//! [`HostError`]; there is no partial success. The coordinator holds no
//! global state: everything a consumer needs lives in the returned
//! resolution context, so independent resolutions can coexist in one
//! process (and in tests).

pub mod logger;

mod arbiter;
mod component;
mod coordinator;
mod error;
mod inspect;
mod loader;

pub use arbiter::{ArbitrationOutcome, ConflictArbiter};
pub use component::{
    ComponentCandidate, HOST_MODULE, HostComponent, HostComponents, LoadedComponent,
    ReplacementRecord,
};
pub use coordinator::{HostOptions, LoadCoordinator, MODULE_EXTENSION, Resolution};
pub use error::{HostError, Result};
pub use inspect::{COMPONENT_MAGIC, ComponentInspector, HeaderInspector, ProbeError, header_bytes};
pub use loader::{ArtifactLoader, RecordingLoader};
