//! `devlink update` command

use anyhow::Result;

use crate::cli::UpdateArgs;
use crate::commands::Session;
use crate::GlobalOptions;
use devlink::ops::update;
use devlink::util::shell::Status;

pub fn execute(args: UpdateArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let session = Session::open(&args.project)?;
    session.check_tools(shell);

    let span = shell.span(Status::Installing, "updating dependencies");
    let updated = update(&session.ops(), &session.workspace)?;

    for path in &updated {
        shell.status(Status::Updated, path.display());
        shell.json_event(&serde_json::json!({
            "reason": "updated",
            "path": path.display().to_string(),
        }));
    }
    span.finish_with_message(format!("updated {} repositories", updated.len()));

    Ok(())
}
