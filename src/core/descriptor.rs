//! Package descriptors of checked-out plugins.

use std::path::Path;

use anyhow::Result;

use crate::core::manifest::MANIFEST_FILE;
use crate::util::fs::{is_file, FileSystem};
use crate::util::json::read_json;

/// Declared package name of the package in `dir`.
///
/// `None` if the directory has no descriptor or the descriptor has no
/// string `name`. A descriptor that does not parse is an error.
pub fn read_package_name(fs: &dyn FileSystem, dir: &Path) -> Result<Option<String>> {
    let path = dir.join(MANIFEST_FILE);
    if !is_file(fs, &path) {
        return Ok(None);
    }

    let doc = read_json(fs, &path)?;
    Ok(doc
        .get("name")
        .and_then(|name| name.as_str())
        .map(str::to_string))
}
