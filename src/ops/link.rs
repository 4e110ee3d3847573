//! Replacing a dependency directory with a symlink to a local checkout.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::errors::LinkError;
use crate::util::fs::{is_directory, relative_path, FileSystem};
use crate::util::process::{shell_quote, CommandRunner};

/// What `link_directories` did to the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// Nothing was there; a link was created.
    Created,
    /// A real directory was removed and replaced by a link.
    ReplacedDirectory,
    /// A link to somewhere else was replaced.
    Relinked { previous: PathBuf },
    /// The destination already linked to the source.
    Unchanged,
}

/// Creates destination -> source symlinks.
pub struct DirectoryLinker<'a> {
    fs: &'a dyn FileSystem,
    runner: &'a dyn CommandRunner,
    relative: bool,
}

impl<'a> DirectoryLinker<'a> {
    pub fn new(fs: &'a dyn FileSystem, runner: &'a dyn CommandRunner) -> Self {
        DirectoryLinker {
            fs,
            runner,
            relative: false,
        }
    }

    /// Point links at a path relative to the link's directory.
    pub fn relative(mut self, relative: bool) -> Self {
        self.relative = relative;
        self
    }

    fn link_target(&self, source: &Path, destination: &Path) -> PathBuf {
        match destination.parent() {
            Some(parent) if self.relative => relative_path(parent, source),
            _ => source.to_path_buf(),
        }
    }

    /// Make `destination` a symlink to `source`.
    ///
    /// A real directory at `destination` is removed through the command
    /// runner first. An existing symlink is not a directory and is never
    /// handed to the runner: if it already points at `source` nothing
    /// happens, otherwise only the link itself is replaced.
    pub fn link_directories(&self, source: &Path, destination: &Path) -> Result<LinkAction> {
        let target = self.link_target(source, destination);

        let existing = self
            .fs
            .read_link(destination)
            .map_err(|e| LinkError::io("inspect", destination, e))?;

        let action = match existing {
            Some(previous) if previous == target || previous == source => {
                tracing::debug!("{} already links to {}", destination.display(), source.display());
                return Ok(LinkAction::Unchanged);
            }
            Some(previous) => {
                self.fs
                    .remove_link(destination)
                    .map_err(|e| LinkError::io("remove link", destination, e))?;
                LinkAction::Relinked { previous }
            }
            None if is_directory(self.fs, destination) => {
                self.runner.exec(&remove_dir_command(destination))?;
                LinkAction::ReplacedDirectory
            }
            None => LinkAction::Created,
        };

        if let Some(parent) = destination.parent() {
            self.fs
                .create_dir_all(parent)
                .map_err(|e| LinkError::io("create directory", parent, e))?;
        }

        self.fs
            .symlink(&target, destination)
            .map_err(|e| LinkError::io("create symlink at", destination, e))?;

        tracing::info!("linked {} -> {}", destination.display(), source.display());
        Ok(action)
    }
}

/// Recursive force-remove of a directory.
fn remove_dir_command(path: &Path) -> String {
    if cfg!(windows) {
        format!("rmdir /s /q {}", shell_quote(path))
    } else {
        format!("rm -rf {}", shell_quote(path))
    }
}
