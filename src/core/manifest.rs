//! The project's dependency manifest and the ecosystem filter over it.

use std::fmt;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::util::fs::{is_file, FileSystem};
use crate::util::json::read_json;

/// Prefix shared by every package of the plugin ecosystem.
pub const DEFAULT_ECOSYSTEM_PREFIX: &str = "ckeditor5-";

/// File name of a package descriptor / manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// Name prefix identifying ecosystem packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EcosystemPrefix(String);

impl EcosystemPrefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        EcosystemPrefix(prefix.into())
    }

    /// Whether `name` belongs to the ecosystem.
    pub fn matches(&self, name: &str) -> bool {
        name.starts_with(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EcosystemPrefix {
    fn default() -> Self {
        EcosystemPrefix::new(DEFAULT_ECOSYSTEM_PREFIX)
    }
}

impl fmt::Display for EcosystemPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single `name -> source` manifest entry. The source may be empty, a
/// version requirement or a git reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    pub source: String,
}

/// Ordered dependency mapping with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    entries: Vec<Dependency>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry, keeping the position of a replaced one.
    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        let name = name.into();
        let source = source.into();
        match self.entries.iter_mut().find(|d| d.name == name) {
            Some(existing) => existing.source = source,
            None => self.entries.push(Dependency { name, source }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.source.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|d| d.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build from the `dependencies` object of a manifest. Non-string
    /// values are kept as their JSON text.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut deps = Dependencies::new();
        for (name, source) in object {
            let source = match source {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            deps.insert(name.clone(), source);
        }
        Some(deps)
    }
}

impl<N: Into<String>, S: Into<String>> FromIterator<(N, S)> for Dependencies {
    fn from_iter<I: IntoIterator<Item = (N, S)>>(iter: I) -> Self {
        let mut deps = Dependencies::new();
        for (name, source) in iter {
            deps.insert(name, source);
        }
        deps
    }
}

/// The ecosystem-scoped subset of `manifest`.
///
/// Returns `None` when there is no manifest or when no entry matches the
/// prefix, so callers can tell "nothing to do" apart from a set. The
/// returned set is never empty and keeps the manifest's values and order.
pub fn get_ecosystem_dependencies(
    manifest: Option<&Dependencies>,
    prefix: &EcosystemPrefix,
) -> Option<Dependencies> {
    let manifest = manifest?;

    let filtered: Dependencies = manifest
        .iter()
        .filter(|dep| prefix.matches(&dep.name))
        .map(|dep| (dep.name.clone(), dep.source.clone()))
        .collect();

    if filtered.is_empty() {
        None
    } else {
        Some(filtered)
    }
}

/// Read the `dependencies` of the manifest in `project_dir`.
///
/// A missing manifest or a manifest without a `dependencies` object yields
/// `None`; a manifest that is not valid JSON is an error.
pub fn read_dependencies(fs: &dyn FileSystem, project_dir: &Path) -> Result<Option<Dependencies>> {
    let path = project_dir.join(MANIFEST_FILE);
    if !is_file(fs, &path) {
        return Ok(None);
    }

    let doc = read_json(fs, &path)?;
    Ok(doc.get("dependencies").and_then(Dependencies::from_json))
}
