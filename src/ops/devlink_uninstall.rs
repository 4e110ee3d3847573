//! Implementation of `devlink uninstall`.

use anyhow::Result;
use serde_json::Value;

use crate::core::workspace::Workspace;
use crate::ops::OpsContext;
use crate::util::json::{read_json, update_json_file};

/// Options for uninstalling a dependency.
#[derive(Debug, Clone, Default)]
pub struct UninstallOptions {
    /// Also remove the entry from the project manifest
    pub save: bool,
}

/// Uninstall `package` from the project. Returns whether the manifest was
/// rewritten.
///
/// Current npm releases drop the manifest entry themselves. `save` covers
/// package managers that leave it behind, and is a no-op when the entry is
/// already gone.
pub fn uninstall(
    ctx: &OpsContext,
    ws: &Workspace,
    package: &str,
    opts: &UninstallOptions,
) -> Result<bool> {
    ctx.package_manager().uninstall(ws.project(), package)?;

    if !opts.save {
        return Ok(false);
    }

    let manifest_path = ws.manifest_path();
    let manifest = read_json(ctx.fs, &manifest_path)?;
    if manifest.pointer(&format!("/dependencies/{}", pointer_token(package))).is_none() {
        tracing::debug!("`{}` already gone from {}", package, manifest_path.display());
        return Ok(false);
    }

    update_json_file(ctx.fs, &manifest_path, |mut doc| {
        if let Some(deps) = doc.get_mut("dependencies").and_then(Value::as_object_mut) {
            deps.shift_remove(package);
        }
        doc
    })?;
    Ok(true)
}

/// Escape a key for use in a JSON pointer.
fn pointer_token(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}
