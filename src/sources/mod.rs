//! Package sources.
//!
//! The registry answers where a package's repository lives; the package
//! manager installs from it.

pub mod npm;
pub mod registry;

pub use npm::PackageManager;
pub use registry::{RegistryResolver, RepositoryLookup};
