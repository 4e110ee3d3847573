//! devlink CLI - links plugin checkouts into a project's node_modules

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use devlink::util::shell::Shell;

mod cli;
mod commands;

use cli::{Cli, Commands, MessageFormat};

/// Options shared by every command.
pub struct GlobalOptions {
    pub shell: Arc<Shell>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging; RUST_LOG wins over the flags
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("devlink=debug")
        } else if cli.quiet {
            EnvFilter::new("devlink=error")
        } else {
            EnvFilter::new("devlink=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let global_opts = GlobalOptions {
        shell: Arc::new(Shell::from_flags(
            cli.quiet,
            cli.verbose,
            cli.color,
            cli.message_format == MessageFormat::Json,
        )),
    };

    // Execute command
    match cli.command {
        Commands::Link(args) => commands::link::execute(args, &global_opts),
        Commands::Update(args) => commands::update::execute(args, &global_opts),
        Commands::Uninstall(args) => commands::uninstall::execute(args, &global_opts),
        Commands::Status(args) => commands::status::execute(args, &global_opts),
        Commands::Hooks(args) => commands::hooks::execute(args, &global_opts),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
