//! `devlink status` command

use anyhow::Result;
use serde_json::json;

use crate::cli::StatusArgs;
use crate::commands::Session;
use crate::GlobalOptions;
use devlink::ops::{status, InstallState};

pub fn execute(args: StatusArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let session = Session::open(&args.project)?;

    let report = status(&session.ops(), &session.workspace)?;
    if report.is_empty() {
        shell.note("no ecosystem dependencies");
    }

    for dep in &report {
        let local = dep
            .local
            .as_ref()
            .map(|p| format!(" (checkout at {})", p.display()))
            .unwrap_or_default();

        let (state, line) = match &dep.state {
            InstallState::Linked { target } if dep.is_linked_locally() => {
                ("linked", format!("{} -> {}", dep.name, target.display()))
            }
            InstallState::Linked { target } => (
                "linked-elsewhere",
                format!("{} -> {}{}", dep.name, target.display(), local),
            ),
            InstallState::Installed => ("installed", format!("{}{}", dep.name, local)),
            InstallState::Missing => ("missing", format!("{}{}", dep.name, local)),
        };

        shell.json_event(&json!({
            "reason": "status",
            "name": dep.name,
            "state": state,
            "local": dep.local.as_ref().map(|p| p.display().to_string()),
        }));

        // Status lines go to stdout so they can be piped.
        if !shell.is_json() {
            println!("{:>12} {}", state, line);
        }
    }

    Ok(())
}
