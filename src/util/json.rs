//! Reading and rewriting JSON documents on disk.

use std::path::Path;

use anyhow::Result;
use serde_json::Value;

use crate::core::errors::LinkError;
use crate::util::fs::FileSystem;

/// Read and parse a JSON document. Parse failures are fatal.
pub fn read_json(fs: &dyn FileSystem, path: &Path) -> Result<Value> {
    let contents = fs
        .read_to_string(path)
        .map_err(|e| LinkError::io("read", path, e))?;

    let value = serde_json::from_str(&contents).map_err(|source| LinkError::MalformedDescriptor {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(value)
}

/// Serialize with 2-space indentation and no trailing newline.
pub fn to_pretty_json(value: &Value) -> String {
    // Serializing a `Value` cannot fail.
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Read the JSON file at `path`, pass it through `transform` and write the
/// result back to the same path.
///
/// The file is read once and written once. There is no locking, so
/// concurrent rewrites of the same file race.
pub fn update_json_file<F>(fs: &dyn FileSystem, path: &Path, transform: F) -> Result<()>
where
    F: FnOnce(Value) -> Value,
{
    let value = read_json(fs, path)?;
    let updated = transform(value);

    tracing::debug!("rewriting {}", path.display());
    fs.write(path, &to_pretty_json(&updated))
        .map_err(|e| LinkError::io("write", path, e))?;

    Ok(())
}
