//! # quay-manifest
//!
//! Module manifest model for the quay module host: the [`ModuleDescriptor`]
//! record, its validation rules, and the discovery layer that enumerates a
//! directory of on-disk manifests into a validated batch ready for graph
//! construction.
//!
//! A descriptor is constructed once from parsed manifest input, validated,
//! and never mutated after it enters the dependency graph. Inter-module
//! dependency versions are opaque strings compared only for equality;
//! auxiliary component versions (see [`DeclaredComponent`]) are ordered
//! [`semver`] versions because conflict arbitration needs to rank them.

mod components;
mod descriptor;
mod discovery;
mod error;

pub use components::{COMPONENT_EXTENSION, ComponentEntry, DeclaredComponent, declared_components};
pub use descriptor::ModuleDescriptor;
pub use discovery::{discover, validate_batch};
pub use error::{ManifestError, Result};
