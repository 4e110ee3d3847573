//! Configuration file support for devlink.
//!
//! devlink reads two configuration files:
//! - Global: `<config dir>/devlink/config.toml` - User-wide defaults
//! - Project: `.devlink/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Every setting is
//! optional; accessors fall back to the built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::manifest::EcosystemPrefix;
use crate::core::workspace::DEFAULT_DEPENDENCIES_DIR;
use crate::sources::npm::{DEFAULT_HOOKS_COMMAND, DEFAULT_PACKAGE_MANAGER};
use crate::sources::registry::DEFAULT_REGISTRY_TOOL;

/// Default command timeout.
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 600;

/// devlink configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ecosystem: EcosystemConfig,
    pub workspace: WorkspaceConfig,
    pub registry: RegistryConfig,
    pub package_manager: PackageManagerConfig,
    pub command: CommandConfig,
    pub link: LinkConfig,
    pub resolve: ResolveConfig,
}

/// Which packages belong to the ecosystem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcosystemConfig {
    /// Package name prefix (default `ckeditor5-`)
    pub prefix: Option<String>,
}

/// Workspace layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Directory holding plugin checkouts (default: parent of the project)
    pub path: Option<PathBuf>,

    /// Dependency directory relative to the project (default `node_modules`)
    pub dependencies_dir: Option<PathBuf>,
}

/// Registry client settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Executable used for `view` queries (default `npm`)
    pub tool: Option<String>,
}

/// Package manager settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageManagerConfig {
    /// Package manager executable (default `npm`)
    pub program: Option<String>,

    /// Command installing git hooks (default `grunt githooks`)
    pub hooks_command: Option<String>,
}

/// Command runner settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    /// Per-command timeout in seconds; 0 disables the timeout
    pub timeout_secs: Option<u64>,
}

/// Symlink settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Create links relative to the dependency directory
    pub relative: Option<bool>,
}

/// Registry lookup settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Parallel registry lookups (None = available parallelism)
    pub jobs: Option<usize>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.ecosystem.prefix.is_some() {
            self.ecosystem.prefix = other.ecosystem.prefix;
        }

        if other.workspace.path.is_some() {
            self.workspace.path = other.workspace.path;
        }
        if other.workspace.dependencies_dir.is_some() {
            self.workspace.dependencies_dir = other.workspace.dependencies_dir;
        }

        if other.registry.tool.is_some() {
            self.registry.tool = other.registry.tool;
        }

        if other.package_manager.program.is_some() {
            self.package_manager.program = other.package_manager.program;
        }
        if other.package_manager.hooks_command.is_some() {
            self.package_manager.hooks_command = other.package_manager.hooks_command;
        }

        if other.command.timeout_secs.is_some() {
            self.command.timeout_secs = other.command.timeout_secs;
        }

        if other.link.relative.is_some() {
            self.link.relative = other.link.relative;
        }

        if other.resolve.jobs.is_some() {
            self.resolve.jobs = other.resolve.jobs;
        }
    }

    pub fn prefix(&self) -> EcosystemPrefix {
        self.ecosystem
            .prefix
            .clone()
            .map(EcosystemPrefix::new)
            .unwrap_or_default()
    }

    pub fn dependencies_dir(&self) -> PathBuf {
        self.workspace
            .dependencies_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DEPENDENCIES_DIR))
    }

    pub fn registry_tool(&self) -> &str {
        self.registry.tool.as_deref().unwrap_or(DEFAULT_REGISTRY_TOOL)
    }

    pub fn package_manager(&self) -> &str {
        self.package_manager
            .program
            .as_deref()
            .unwrap_or(DEFAULT_PACKAGE_MANAGER)
    }

    pub fn hooks_command(&self) -> &str {
        self.package_manager
            .hooks_command
            .as_deref()
            .unwrap_or(DEFAULT_HOOKS_COMMAND)
    }

    /// Command timeout, `None` when disabled.
    pub fn command_timeout(&self) -> Option<Duration> {
        match self.command.timeout_secs.unwrap_or(DEFAULT_COMMAND_TIMEOUT_SECS) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn relative_links(&self) -> bool {
        self.link.relative.unwrap_or(false)
    }

    pub fn jobs(&self) -> Option<usize> {
        self.resolve.jobs
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.devlink/config.toml)
/// 2. Global config
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    // Load global config first
    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    // Project config overrides global
    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global devlink config directory.
pub fn global_config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "devlink", "devlink")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the global config path.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.devlink/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".devlink").join("config.toml")
}
