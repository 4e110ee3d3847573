//! devlink - cross-links plugin checkouts into a project's dependency tree
//!
//! This crate provides the core library functionality for devlink,
//! including manifest filtering, workspace discovery, registry lookups and
//! directory linking.

pub mod core;
pub mod ops;
pub mod sources;
pub mod util;

/// Test utilities and mocks for devlink unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides mock implementations for the filesystem and
/// command execution.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{errors::LinkError, manifest::Dependencies, workspace::Workspace};
pub use util::context::GlobalContext;
