//! `devlink uninstall` command

use anyhow::Result;

use crate::cli::UninstallArgs;
use crate::commands::Session;
use crate::GlobalOptions;
use devlink::ops::{uninstall, UninstallOptions};
use devlink::util::shell::Status;

pub fn execute(args: UninstallArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let session = Session::open(&args.project)?;

    let opts = UninstallOptions { save: args.save };
    let saved = uninstall(&session.ops(), &session.workspace, &args.name, &opts)?;

    shell.status(Status::Removed, &args.name);
    if saved {
        shell.status(Status::Updated, session.workspace.manifest_path().display());
    }

    Ok(())
}
