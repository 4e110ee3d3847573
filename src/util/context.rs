//! Global context for devlink operations.
//!
//! Provides centralized access to the working directory, configuration
//! and the workspace being linked.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::core::manifest::MANIFEST_FILE;
use crate::core::workspace::Workspace;
use crate::util::config::{global_config_path, load_config, project_config_path, Config};
use crate::util::fs::normalize_path;
use crate::util::process::ShellRunner;

/// Failure to locate the project.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("could not find `package.json` in `{}` or any parent directory", dir.display())]
    NotFound { dir: PathBuf },

    #[error("no `package.json` in `{}`", dir.display())]
    NoManifest { dir: PathBuf },

    #[error("project has no parent directory to use as workspace: {}", project.display())]
    NoWorkspace { project: PathBuf },
}

/// Global context containing the working directory and config locations.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Global config file, if the platform has a config directory
    global_config: Option<PathBuf>,
}

impl GlobalContext {
    /// Create a new GlobalContext for the process's working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(GlobalContext {
            cwd,
            global_config: global_config_path(),
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Use a specific global config file (or none).
    pub fn with_global_config(mut self, path: Option<PathBuf>) -> Self {
        self.global_config = path;
        self
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Find the project directory (containing `package.json`) starting from
    /// cwd and searching upward.
    pub fn find_project(&self) -> Result<PathBuf, ProjectError> {
        let mut current = self.cwd.clone();
        loop {
            if current.join(MANIFEST_FILE).is_file() {
                return Ok(current);
            }
            if !current.pop() {
                return Err(ProjectError::NotFound {
                    dir: self.cwd.clone(),
                });
            }
        }
    }

    /// Resolve the project: an explicit path (relative to cwd) or the
    /// nearest directory with a manifest.
    pub fn project(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        let project = match explicit {
            Some(path) => {
                let dir = self.cwd.join(path);
                if !dir.join(MANIFEST_FILE).is_file() {
                    return Err(ProjectError::NoManifest { dir }.into());
                }
                dir
            }
            None => self.find_project()?,
        };
        Ok(normalize_path(&project))
    }

    /// Merged global and project configuration.
    pub fn config(&self, project: &Path) -> Config {
        load_config(self.global_config.as_deref(), &project_config_path(project))
    }

    /// Build the workspace for `project`. The root is, in order: the
    /// explicit override, the configured path (relative to the project), or
    /// the project's parent directory.
    pub fn workspace(
        &self,
        project: &Path,
        root_override: Option<&Path>,
        config: &Config,
    ) -> Result<Workspace> {
        let root = match (root_override, config.workspace.path.as_deref()) {
            (Some(root), _) => self.cwd.join(root),
            (None, Some(root)) => project.join(root),
            (None, None) => project
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| ProjectError::NoWorkspace {
                    project: project.to_path_buf(),
                })?,
        };

        Ok(Workspace::new(normalize_path(&root), project)
            .with_prefix(config.prefix())
            .with_dependencies_dir(config.dependencies_dir()))
    }

    /// Command runner honouring the configured timeout.
    pub fn runner(&self, config: &Config) -> ShellRunner {
        ShellRunner::new(config.command_timeout())
    }
}
