//! High-level operations.
//!
//! This module contains the implementation of devlink commands.

pub mod devlink_link;
pub mod devlink_status;
pub mod devlink_uninstall;
pub mod devlink_update;
pub mod link;

use crate::sources::npm::PackageManager;
use crate::sources::registry::RegistryResolver;
use crate::util::config::Config;
use crate::util::fs::FileSystem;
use crate::util::process::CommandRunner;

pub use devlink_link::{
    link_workspace, link_workspace_with_progress, DependencyOutcome, DependencyState,
    LinkOptions, LinkReport, Unresolvable,
};
pub use devlink_status::{status, DependencyStatus, InstallState};
pub use devlink_uninstall::{uninstall, UninstallOptions};
pub use devlink_update::update;
pub use link::{DirectoryLinker, LinkAction};

/// The seams every operation runs against.
#[derive(Clone, Copy)]
pub struct OpsContext<'a> {
    pub fs: &'a dyn FileSystem,
    pub runner: &'a dyn CommandRunner,
    pub config: &'a Config,
}

impl<'a> OpsContext<'a> {
    pub fn new(fs: &'a dyn FileSystem, runner: &'a dyn CommandRunner, config: &'a Config) -> Self {
        OpsContext { fs, runner, config }
    }

    pub fn registry(&self) -> RegistryResolver<'a> {
        RegistryResolver::new(self.runner).with_tool(self.config.registry_tool())
    }

    pub fn package_manager(&self) -> PackageManager<'a> {
        PackageManager::new(self.runner)
            .with_program(self.config.package_manager())
            .with_hooks_command(self.config.hooks_command())
    }

    pub fn linker(&self) -> DirectoryLinker<'a> {
        DirectoryLinker::new(self.fs, self.runner).relative(self.config.relative_links())
    }
}
