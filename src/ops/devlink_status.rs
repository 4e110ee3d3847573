//! Implementation of `devlink status`.

use std::path::{Component, Path, PathBuf};

use anyhow::Result;

use crate::core::errors::LinkError;
use crate::core::workspace::Workspace;
use crate::ops::OpsContext;
use crate::util::fs::is_directory;

/// What is currently in `node_modules/<name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallState {
    /// A symlink, to the given target (relative targets resolved).
    Linked { target: PathBuf },
    /// A real directory.
    Installed,
    /// Nothing.
    Missing,
}

/// State of one required ecosystem dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyStatus {
    pub name: String,
    pub state: InstallState,
    /// Checkout in the workspace declaring this name, if any
    pub local: Option<PathBuf>,
}

impl DependencyStatus {
    /// Whether the dependency links to its workspace checkout.
    pub fn is_linked_locally(&self) -> bool {
        matches!(
            (&self.state, &self.local),
            (InstallState::Linked { target }, Some(local)) if target == local
        )
    }
}

/// Resolve a relative link target against the link's directory, lexically.
fn resolve_target(link: &Path, target: PathBuf) -> PathBuf {
    if target.is_absolute() {
        return target;
    }
    let mut resolved = link.parent().map(Path::to_path_buf).unwrap_or_default();
    for component in target.components() {
        match component {
            Component::ParentDir => {
                resolved.pop();
            }
            Component::CurDir => {}
            other => resolved.push(other),
        }
    }
    resolved
}

/// Report each required ecosystem dependency in manifest order. Read-only.
pub fn status(ctx: &OpsContext, ws: &Workspace) -> Result<Vec<DependencyStatus>> {
    let Some(required) = ws.required_dependencies(ctx.fs)? else {
        return Ok(Vec::new());
    };
    let local = ws.local_packages(ctx.fs)?;

    required
        .names()
        .map(|name| -> Result<DependencyStatus> {
            let path = ws.dependency_path(name);
            let state = match ctx
                .fs
                .read_link(&path)
                .map_err(|e| LinkError::io("inspect", &path, e))?
            {
                Some(target) => InstallState::Linked {
                    target: resolve_target(&path, target),
                },
                None if is_directory(ctx.fs, &path) => InstallState::Installed,
                None => InstallState::Missing,
            };

            Ok(DependencyStatus {
                name: name.to_string(),
                state,
                local: local.iter().find(|p| p.name == name).map(|p| p.path.clone()),
            })
        })
        .collect()
}
