//! Package manager and git-hook commands.

use std::path::Path;

use anyhow::Result;

use crate::util::process::{shell_quote, CommandRunner};

/// Default package manager executable.
pub const DEFAULT_PACKAGE_MANAGER: &str = "npm";

/// Default command installing a repository's git hooks.
pub const DEFAULT_HOOKS_COMMAND: &str = "grunt githooks";

/// Runs package manager commands inside a repository. Every command is
/// fatal on a non-zero exit code.
pub struct PackageManager<'a> {
    runner: &'a dyn CommandRunner,
    program: String,
    hooks_command: String,
}

impl<'a> PackageManager<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        PackageManager {
            runner,
            program: DEFAULT_PACKAGE_MANAGER.to_string(),
            hooks_command: DEFAULT_HOOKS_COMMAND.to_string(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_hooks_command(mut self, command: impl Into<String>) -> Self {
        self.hooks_command = command.into();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn run_in(&self, path: &Path, command: &str) -> Result<()> {
        self.runner
            .exec(&format!("cd {} && {}", shell_quote(path), command))?;
        Ok(())
    }

    /// Install the dependencies of the repository at `path`.
    pub fn install(&self, path: &Path) -> Result<()> {
        tracing::info!("installing dependencies in {}", path.display());
        self.run_in(path, &format!("{} install", self.program))
    }

    /// Install a package straight from its source URL into `path`.
    pub fn install_from(&self, path: &Path, url: &str) -> Result<()> {
        tracing::info!("installing {} into {}", url, path.display());
        self.run_in(path, &format!("{} install {}", self.program, shell_quote(url)))
    }

    /// Update the dependencies of the repository at `path`.
    pub fn update(&self, path: &Path) -> Result<()> {
        tracing::info!("updating dependencies in {}", path.display());
        self.run_in(path, &format!("{} update", self.program))
    }

    /// Uninstall `package` from the repository at `path`.
    pub fn uninstall(&self, path: &Path, package: &str) -> Result<()> {
        tracing::info!("uninstalling {} from {}", package, path.display());
        self.run_in(
            path,
            &format!("{} uninstall {}", self.program, shell_quote(package)),
        )
    }

    /// Install the git hooks of the repository at `path`.
    pub fn install_git_hooks(&self, path: &Path) -> Result<()> {
        tracing::info!("installing git hooks in {}", path.display());
        self.run_in(path, &self.hooks_command)
    }
}
