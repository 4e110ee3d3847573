//! Filesystem access and the tolerant directory/file probes.
//!
//! All filesystem access goes through the [`FileSystem`] trait so the
//! linking logic can run against an in-memory filesystem in tests.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::errors::LinkError;

/// What a path refers to after following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

/// Raw filesystem primitives.
pub trait FileSystem: Send + Sync {
    /// Kind of the entry at `path`, following symlinks.
    fn kind(&self, path: &Path) -> io::Result<EntryKind>;

    /// Target of the symlink at `path`, or `None` if `path` is missing or
    /// not a symlink.
    fn read_link(&self, path: &Path) -> io::Result<Option<PathBuf>>;

    /// Names of the entries directly under `path`, in listing order.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<String>>;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create a symlink at `dst` pointing to `src`.
    fn symlink(&self, src: &Path, dst: &Path) -> io::Result<()>;

    /// Remove the symlink at `path` without touching its target.
    fn remove_link(&self, path: &Path) -> io::Result<()>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn kind(&self, path: &Path) -> io::Result<EntryKind> {
        let meta = fs::metadata(path)?;
        Ok(if meta.is_dir() {
            EntryKind::Directory
        } else if meta.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        })
    }

    fn read_link(&self, path: &Path) -> io::Result<Option<PathBuf>> {
        match fs::symlink_metadata(path) {
            Ok(meta) if meta.file_type().is_symlink() => fs::read_link(path).map(Some),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn symlink(&self, src: &Path, dst: &Path) -> io::Result<()> {
        symlink(src, dst)
    }

    #[cfg(unix)]
    fn remove_link(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    #[cfg(windows)]
    fn remove_link(&self, path: &Path) -> io::Result<()> {
        // Directory symlinks are removed as directories on Windows.
        fs::remove_dir(path).or_else(|_| fs::remove_file(path))
    }
}

/// True only if `path` exists and is a directory. Lookup errors are `false`.
pub fn is_directory(fs: &dyn FileSystem, path: &Path) -> bool {
    matches!(fs.kind(path), Ok(EntryKind::Directory))
}

/// True only if `path` exists and is a regular file. Lookup errors are `false`.
pub fn is_file(fs: &dyn FileSystem, path: &Path) -> bool {
    matches!(fs.kind(path), Ok(EntryKind::File))
}

/// List the immediate child directories of `root`, in listing order.
pub fn get_directories(fs: &dyn FileSystem, root: &Path) -> Result<Vec<String>> {
    let entries = fs
        .read_dir(root)
        .map_err(|e| LinkError::io("list directory", root, e))?;

    Ok(entries
        .into_iter()
        .filter(|name| is_directory(fs, &root.join(name)))
        .collect())
}

/// Canonicalize a path, but don't fail if it doesn't exist yet.
/// Returns the path as-is if canonicalization fails.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Create a symlink (platform-aware).
#[cfg(unix)]
pub fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
pub fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    let resolved = dst.parent().map(|p| p.join(src)).unwrap_or_else(|| src.to_path_buf());
    if resolved.is_dir() {
        std::os::windows::fs::symlink_dir(src, dst)
    } else {
        std::os::windows::fs::symlink_file(src, dst)
    }
}
