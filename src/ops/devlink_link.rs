//! Implementation of `devlink link`.
//!
//! Every ecosystem dependency of the project goes through a small state
//! machine:
//!
//! ```text
//! Unresolved ──► LocallyLinked      (a checkout in the workspace declares the name)
//!            ├─► RemotelyInstalled  (the registry knows its repository URL)
//!            └─► Unresolvable       (neither; reported, not fatal)
//! ```
//!
//! Decisions are made first, registry lookups possibly in parallel. The
//! resulting links, installs and manifest rewrites are then applied one at a
//! time, in manifest order.

use std::path::PathBuf;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde_json::Value;

use crate::core::workspace::{LocalPackage, Workspace};
use crate::ops::link::LinkAction;
use crate::ops::OpsContext;
use crate::sources::registry::RepositoryLookup;
use crate::util::json::update_json_file;

/// Options for linking a workspace.
#[derive(Debug, Clone, Default)]
pub struct LinkOptions {
    /// Write resolved repository URLs back into the project manifest
    pub save: bool,

    /// Decide everything, change nothing
    pub dry_run: bool,

    /// Skip the project's own package install
    pub skip_install: bool,

    /// Skip git hook installation
    pub skip_hooks: bool,

    /// Parallel registry lookups (None = configured or available parallelism)
    pub jobs: Option<usize>,
}

/// Why a dependency could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unresolvable {
    /// The registry does not know the package.
    NotInRegistry,
    /// The package declares no repository.
    NoRepository,
}

/// Where a dependency ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyState {
    Unresolved,
    LocallyLinked {
        source: PathBuf,
        /// `None` in a dry run.
        action: Option<LinkAction>,
    },
    RemotelyInstalled {
        url: String,
    },
    Unresolvable(Unresolvable),
}

/// Final state of one required dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyOutcome {
    pub name: String,
    pub state: DependencyState,
}

/// Result of a link run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    /// One outcome per required dependency, in manifest order
    pub outcomes: Vec<DependencyOutcome>,

    /// Whether this was a dry run
    pub dry_run: bool,

    /// Whether the manifest was rewritten
    pub manifest_updated: bool,
}

impl LinkReport {
    fn names_where(&self, pred: impl Fn(&DependencyState) -> bool) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| pred(&o.state))
            .map(|o| o.name.as_str())
            .collect()
    }

    /// Dependencies linked to a local checkout.
    pub fn linked(&self) -> Vec<&str> {
        self.names_where(|s| matches!(s, DependencyState::LocallyLinked { .. }))
    }

    /// Dependencies installed from their repository.
    pub fn installed(&self) -> Vec<&str> {
        self.names_where(|s| matches!(s, DependencyState::RemotelyInstalled { .. }))
    }

    /// Dependencies that could be neither linked nor installed.
    pub fn unresolvable(&self) -> Vec<&str> {
        self.names_where(|s| matches!(s, DependencyState::Unresolvable(_)))
    }

    /// Whether the project required no ecosystem dependencies.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Link or install every ecosystem dependency of the project, then install
/// the project's own dependencies and git hooks.
pub fn link_workspace(ctx: &OpsContext, ws: &Workspace, opts: &LinkOptions) -> Result<LinkReport> {
    link_workspace_with_progress(ctx, ws, opts, &|_| {})
}

/// Like [`link_workspace`], calling `on_lookup` after each registry lookup.
pub fn link_workspace_with_progress(
    ctx: &OpsContext,
    ws: &Workspace,
    opts: &LinkOptions,
    on_lookup: &(dyn Fn(&str) + Sync),
) -> Result<LinkReport> {
    let mut report = LinkReport {
        dry_run: opts.dry_run,
        ..LinkReport::default()
    };

    let required = ws.required_dependencies(ctx.fs)?;
    let local = ws.local_packages(ctx.fs)?;

    match &required {
        Some(required) => {
            tracing::debug!(
                "{} ecosystem dependencies required, {} checkouts in {}",
                required.len(),
                local.len(),
                ws.root().display()
            );
            report.outcomes = required
                .names()
                .map(|name| DependencyOutcome {
                    name: name.to_string(),
                    state: DependencyState::Unresolved,
                })
                .collect();
        }
        None => tracing::info!("no ecosystem dependencies in {}", ws.manifest_path().display()),
    }

    match_local(&mut report.outcomes, &local);
    resolve_remote(ctx, &mut report.outcomes, opts, on_lookup)?;

    if opts.dry_run {
        return Ok(report);
    }

    apply(ctx, ws, &mut report.outcomes)?;

    if opts.save {
        report.manifest_updated = save_urls(ctx, ws, &report.outcomes)?;
    }

    let package_manager = ctx.package_manager();
    if !opts.skip_install {
        package_manager.install(ws.project())?;
    }
    if !opts.skip_hooks {
        package_manager.install_git_hooks(ws.project())?;
    }

    Ok(report)
}

/// Unresolved -> LocallyLinked for every name with a checkout.
fn match_local(outcomes: &mut [DependencyOutcome], local: &[LocalPackage]) {
    for outcome in outcomes.iter_mut() {
        if let Some(pkg) = local.iter().find(|p| p.name == outcome.name) {
            outcome.state = DependencyState::LocallyLinked {
                source: pkg.path.clone(),
                action: None,
            };
        }
    }
}

/// Unresolved -> RemotelyInstalled | Unresolvable through the registry.
/// The first lookup failure aborts the run.
fn resolve_remote(
    ctx: &OpsContext,
    outcomes: &mut [DependencyOutcome],
    opts: &LinkOptions,
    on_lookup: &(dyn Fn(&str) + Sync),
) -> Result<()> {
    let missing: Vec<&mut DependencyOutcome> = outcomes
        .iter_mut()
        .filter(|o| o.state == DependencyState::Unresolved)
        .collect();
    if missing.is_empty() {
        return Ok(());
    }

    let jobs = opts
        .jobs
        .or(ctx.config.jobs())
        .unwrap_or_else(|| std::thread::available_parallelism().map_or(1, |n| n.get()))
        .max(1);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.min(missing.len()))
        .build()
        .context("failed to start registry lookup pool")?;

    let registry = ctx.registry();
    pool.install(|| {
        missing.into_par_iter().try_for_each(|outcome| -> Result<()> {
            let lookup = registry
                .lookup(&outcome.name)
                .with_context(|| format!("failed to resolve `{}`", outcome.name))?;
            on_lookup(&outcome.name);

            outcome.state = match lookup {
                RepositoryLookup::Found(url) => DependencyState::RemotelyInstalled { url },
                RepositoryLookup::NoRepository => {
                    DependencyState::Unresolvable(Unresolvable::NoRepository)
                }
                RepositoryLookup::NotFound => {
                    DependencyState::Unresolvable(Unresolvable::NotInRegistry)
                }
            };
            Ok(())
        })
    })
}

/// Perform links and installs serially, in manifest order.
fn apply(ctx: &OpsContext, ws: &Workspace, outcomes: &mut [DependencyOutcome]) -> Result<()> {
    let linker = ctx.linker();
    let package_manager = ctx.package_manager();

    for outcome in outcomes.iter_mut() {
        match &mut outcome.state {
            DependencyState::LocallyLinked { source, action } => {
                let destination = ws.dependency_path(&outcome.name);
                *action = Some(
                    linker
                        .link_directories(source, &destination)
                        .with_context(|| format!("failed to link `{}`", outcome.name))?,
                );
            }
            DependencyState::RemotelyInstalled { url } => {
                package_manager
                    .install_from(ws.project(), url)
                    .with_context(|| format!("failed to install `{}`", outcome.name))?;
            }
            DependencyState::Unresolvable(reason) => {
                tracing::debug!("cannot resolve `{}`: {:?}", outcome.name, reason);
            }
            DependencyState::Unresolved => {}
        }
    }

    Ok(())
}

/// Record resolved URLs in the project manifest. Returns whether anything
/// was written.
fn save_urls(ctx: &OpsContext, ws: &Workspace, outcomes: &[DependencyOutcome]) -> Result<bool> {
    let urls: Vec<(&str, &str)> = outcomes
        .iter()
        .filter_map(|o| match &o.state {
            DependencyState::RemotelyInstalled { url } => Some((o.name.as_str(), url.as_str())),
            _ => None,
        })
        .collect();

    if urls.is_empty() {
        return Ok(false);
    }

    update_json_file(ctx.fs, &ws.manifest_path(), |mut doc| {
        if let Some(deps) = doc.get_mut("dependencies").and_then(Value::as_object_mut) {
            for (name, url) in &urls {
                deps.insert(name.to_string(), Value::String(url.to_string()));
            }
        }
        doc
    })?;

    Ok(true)
}
