//! Core data structures for devlink.
//!
//! This module contains the foundational types used throughout devlink:
//! - Dependency manifests and the ecosystem filter
//! - Package descriptors of workspace checkouts
//! - Workspace layout
//! - Error kinds

pub mod descriptor;
pub mod errors;
pub mod manifest;
pub mod workspace;

pub use errors::LinkError;
pub use manifest::{Dependencies, Dependency, EcosystemPrefix};
pub use workspace::{LocalPackage, Workspace};
