//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell as CompletionShell;

use devlink::util::shell::ColorChoice;

/// devlink - cross-link plugin checkouts into a project's dependency tree
#[derive(Parser)]
#[command(name = "devlink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Print errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, default_value = "auto", value_parser = parse_color)]
    pub color: ColorChoice,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Human,
    Json,
}

fn parse_color(s: &str) -> Result<ColorChoice, String> {
    s.parse()
}

#[derive(Subcommand)]
pub enum Commands {
    /// Link local checkouts and install the remaining ecosystem dependencies
    Link(LinkArgs),

    /// Update the project and its locally checked-out dependencies
    Update(UpdateArgs),

    /// Uninstall a dependency from the project
    Uninstall(UninstallArgs),

    /// Show where each ecosystem dependency comes from
    Status(StatusArgs),

    /// Install the project's git hooks
    Hooks(HooksArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Locating the project and its workspace.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Project directory (defaults to the nearest directory with package.json)
    #[arg(long, short = 'p')]
    pub project: Option<PathBuf>,

    /// Directory holding plugin checkouts (defaults to the project's parent)
    #[arg(long, short = 'w', env = "DEVLINK_WORKSPACE")]
    pub workspace: Option<PathBuf>,
}

#[derive(Args)]
pub struct LinkArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Write resolved repository URLs into package.json
    #[arg(long)]
    pub save: bool,

    /// Show what would be done without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Don't run the package manager install in the project
    #[arg(long)]
    pub skip_install: bool,

    /// Don't install git hooks
    #[arg(long)]
    pub skip_hooks: bool,

    /// Fail when a dependency can be neither linked nor installed
    #[arg(long)]
    pub strict: bool,

    /// Number of parallel registry lookups
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Args)]
pub struct UninstallArgs {
    /// Package name to uninstall
    pub name: String,

    #[command(flatten)]
    pub project: ProjectArgs,

    /// Also remove the entry from package.json
    #[arg(long)]
    pub save: bool,
}

#[derive(Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Args)]
pub struct HooksArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: CompletionShell,
}
