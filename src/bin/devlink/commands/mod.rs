//! Command implementations

pub mod completions;
pub mod hooks;
pub mod link;
pub mod status;
pub mod uninstall;
pub mod update;

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::ProjectArgs;
use devlink::core::Workspace;
use devlink::ops::OpsContext;
use devlink::util::fs::OsFileSystem;
use devlink::util::process::find_executable;
use devlink::util::shell::Shell;
use devlink::util::{Config, GlobalContext, ShellRunner};

/// Everything a command needs to run against one project.
pub struct Session {
    pub project: PathBuf,
    pub workspace: Workspace,
    pub config: Config,
    pub runner: ShellRunner,
}

impl Session {
    pub fn open(args: &ProjectArgs) -> Result<Self> {
        let ctx = GlobalContext::new()?;
        let project = ctx.project(args.project.as_deref())?;
        let config = ctx.config(&project);
        let workspace = ctx.workspace(&project, args.workspace.as_deref(), &config)?;
        let runner = ctx.runner(&config);

        tracing::debug!(
            "project {}, workspace {}",
            project.display(),
            workspace.root().display()
        );

        Ok(Session {
            project,
            workspace,
            config,
            runner,
        })
    }

    pub fn ops(&self) -> OpsContext<'_> {
        OpsContext::new(&OsFileSystem, &self.runner, &self.config)
    }

    /// Warn about configured tools missing from PATH.
    pub fn check_tools(&self, shell: &Shell) {
        let tools = [self.config.registry_tool(), self.config.package_manager()];
        for tool in tools {
            let program = tool.split_whitespace().next().unwrap_or(tool);
            if find_executable(program).is_none() {
                shell.warn(format!("`{}` was not found on PATH", program));
            }
        }
    }
}
