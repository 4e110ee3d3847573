//! `devlink hooks` command

use anyhow::Result;

use crate::cli::HooksArgs;
use crate::commands::Session;
use crate::GlobalOptions;
use devlink::util::shell::Status;

pub fn execute(args: HooksArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let session = Session::open(&args.project)?;

    session
        .ops()
        .package_manager()
        .install_git_hooks(&session.project)?;

    shell.status(Status::Installed, "git hooks");
    Ok(())
}
