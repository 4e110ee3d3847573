//! Workspace - the directory holding plugin checkouts and the project
//! they get linked into.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::descriptor::read_package_name;
use crate::core::manifest::{
    get_ecosystem_dependencies, read_dependencies, Dependencies, EcosystemPrefix, MANIFEST_FILE,
};
use crate::util::fs::{get_directories, FileSystem};

/// Default directory, relative to the project, dependencies are placed in.
pub const DEFAULT_DEPENDENCIES_DIR: &str = "node_modules";

/// A checked-out ecosystem package found in the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPackage {
    /// Declared package name.
    pub name: String,
    /// Absolute path of the checkout.
    pub path: PathBuf,
}

/// A workspace root and the project being linked.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Directory containing plugin checkouts
    root: PathBuf,

    /// Project whose manifest drives the linking
    project: PathBuf,

    /// Dependency directory, relative to the project
    dependencies_dir: PathBuf,

    /// Ecosystem package prefix
    prefix: EcosystemPrefix,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>, project: impl Into<PathBuf>) -> Self {
        Workspace {
            root: root.into(),
            project: project.into(),
            dependencies_dir: PathBuf::from(DEFAULT_DEPENDENCIES_DIR),
            prefix: EcosystemPrefix::default(),
        }
    }

    /// Set the ecosystem prefix.
    pub fn with_prefix(mut self, prefix: EcosystemPrefix) -> Self {
        self.prefix = prefix;
        self
    }

    /// Set the dependency directory (relative to the project).
    pub fn with_dependencies_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dependencies_dir = dir.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn project(&self) -> &Path {
        &self.project
    }

    pub fn prefix(&self) -> &EcosystemPrefix {
        &self.prefix
    }

    /// Path of the project manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.project.join(MANIFEST_FILE)
    }

    /// Directory dependencies are installed or linked into.
    pub fn dependencies_dir(&self) -> PathBuf {
        self.project.join(&self.dependencies_dir)
    }

    /// Where dependency `name` is expected to live.
    pub fn dependency_path(&self, name: &str) -> PathBuf {
        self.dependencies_dir().join(name)
    }

    /// Ecosystem dependencies the project requires, or `None` if it
    /// requires none.
    pub fn required_dependencies(&self, fs: &dyn FileSystem) -> Result<Option<Dependencies>> {
        let manifest = read_dependencies(fs, &self.project)?;
        Ok(get_ecosystem_dependencies(manifest.as_ref(), &self.prefix))
    }

    /// Ecosystem directories present in the workspace root.
    pub fn ecosystem_directories(&self, fs: &dyn FileSystem) -> Result<Vec<String>> {
        get_ecosystem_directories(fs, &self.root, &self.prefix)
    }

    /// Checked-out ecosystem packages, keyed by their declared name.
    ///
    /// Directories without a descriptor or without a name are skipped.
    /// When two checkouts declare the same name the first in listing order
    /// wins.
    pub fn local_packages(&self, fs: &dyn FileSystem) -> Result<Vec<LocalPackage>> {
        let mut packages: Vec<LocalPackage> = Vec::new();

        for dir_name in self.ecosystem_directories(fs)? {
            let path = self.root.join(&dir_name);
            if path == self.project {
                continue;
            }

            let Some(name) = read_package_name(fs, &path)? else {
                tracing::debug!("{} has no package name, skipping", path.display());
                continue;
            };

            if let Some(existing) = packages.iter().find(|p| p.name == name) {
                tracing::warn!(
                    "`{}` is checked out twice ({} and {}), using the first",
                    name,
                    existing.path.display(),
                    path.display()
                );
                continue;
            }

            packages.push(LocalPackage { name, path });
        }

        Ok(packages)
    }
}

/// Ecosystem directories directly under `workspace`, in listing order.
pub fn get_ecosystem_directories(
    fs: &dyn FileSystem,
    workspace: &Path,
    prefix: &EcosystemPrefix,
) -> Result<Vec<String>> {
    Ok(get_directories(fs, workspace)?
        .into_iter()
        .filter(|name| prefix.matches(name))
        .collect())
}
