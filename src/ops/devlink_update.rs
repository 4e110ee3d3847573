//! Implementation of `devlink update`.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::workspace::Workspace;
use crate::ops::OpsContext;

/// Update the project's dependencies, then those of every workspace
/// checkout the project requires. Returns the updated directories in order.
pub fn update(ctx: &OpsContext, ws: &Workspace) -> Result<Vec<PathBuf>> {
    let package_manager = ctx.package_manager();
    let mut updated = vec![ws.project().to_path_buf()];

    if let Some(required) = ws.required_dependencies(ctx.fs)? {
        let local = ws.local_packages(ctx.fs)?;
        updated.extend(
            required
                .names()
                .filter_map(|name| local.iter().find(|p| p.name == name))
                .map(|p| p.path.clone()),
        );
    }

    for path in &updated {
        package_manager
            .update(path)
            .with_context(|| format!("failed to update {}", path.display()))?;
    }

    Ok(updated)
}
