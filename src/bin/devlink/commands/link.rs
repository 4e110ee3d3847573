//! `devlink link` command

use anyhow::{bail, Result};
use serde_json::json;

use crate::cli::LinkArgs;
use crate::commands::Session;
use crate::GlobalOptions;
use devlink::ops::{
    link_workspace_with_progress, DependencyOutcome, DependencyState, LinkAction, LinkOptions,
    Unresolvable,
};
use devlink::util::shell::{Shell, Status};
use devlink::util::OsFileSystem;

pub fn execute(args: LinkArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let session = Session::open(&args.project)?;
    session.check_tools(shell);

    let opts = LinkOptions {
        save: args.save,
        dry_run: args.dry_run,
        skip_install: args.skip_install,
        skip_hooks: args.skip_hooks,
        jobs: args.jobs,
    };

    let lookups = pending_lookups(&session)?;
    let span = shell.span(Status::Resolving, session.workspace.root().display());
    let progress = shell.progress(lookups as u64, "Resolving");

    let report = link_workspace_with_progress(&session.ops(), &session.workspace, &opts, &|name: &str| {
        progress.tick(name)
    });
    progress.finish();
    let report = report?;

    for outcome in &report.outcomes {
        print_outcome(shell, outcome, report.dry_run);
    }
    if report.manifest_updated {
        shell.status(Status::Updated, session.workspace.manifest_path().display());
    }

    let unresolvable = report.unresolvable();
    span.finish_with_message(format!(
        "{} linked, {} installed, {} unresolvable",
        report.linked().len(),
        report.installed().len(),
        unresolvable.len()
    ));

    if args.strict && !unresolvable.is_empty() {
        bail!(
            "{} dependencies could not be resolved: {}",
            unresolvable.len(),
            unresolvable.join(", ")
        );
    }

    Ok(())
}

/// Number of required dependencies without a workspace checkout.
fn pending_lookups(session: &Session) -> Result<usize> {
    let ws = &session.workspace;
    let Some(required) = ws.required_dependencies(&OsFileSystem)? else {
        return Ok(0);
    };
    let local = ws.local_packages(&OsFileSystem)?;
    Ok(required
        .names()
        .filter(|name| !local.iter().any(|p| p.name == *name))
        .count())
}

fn print_outcome(shell: &Shell, outcome: &DependencyOutcome, dry_run: bool) {
    let name = &outcome.name;
    match &outcome.state {
        DependencyState::LocallyLinked { source, action } => {
            shell.json_event(&json!({
                "reason": "linked",
                "name": name,
                "source": source.display().to_string(),
                "dry_run": dry_run,
            }));
            match action {
                None => shell.status(
                    Status::Info,
                    format!("would link {} -> {}", name, source.display()),
                ),
                Some(LinkAction::Unchanged) => shell.status(Status::Fresh, name),
                Some(_) => {
                    shell.status(Status::Linked, format!("{} -> {}", name, source.display()))
                }
            }
        }
        DependencyState::RemotelyInstalled { url } => {
            shell.json_event(&json!({
                "reason": "installed",
                "name": name,
                "url": url,
                "dry_run": dry_run,
            }));
            if dry_run {
                shell.status(Status::Info, format!("would install {} from {}", name, url));
            } else {
                shell.status(Status::Installed, format!("{} from {}", name, url));
            }
        }
        DependencyState::Unresolvable(reason) => {
            let why = match reason {
                Unresolvable::NotInRegistry => "is not in the registry",
                Unresolvable::NoRepository => "declares no repository",
            };
            shell.json_event(&json!({
                "reason": "unresolvable",
                "name": name,
                "message": why,
            }));
            shell.warn(format!("`{}` {}, skipping", name, why));
        }
        DependencyState::Unresolved => {}
    }
}
