//! Snipdeck CLI - snippet dashboard for grouped CSS/JS assets.

mod commands;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "snipdeck")]
#[command(about = "Manage, group and deploy storefront CSS/JS snippets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output format
    #[arg(long, value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    /// Configuration file path (defaults to ~/.snipdeck/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (-v info, -vv debug)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Register a new snippet
    Add(commands::snippets::AddArgs),

    /// List registered snippets
    List,

    /// Edit fields of an existing snippet
    Edit(commands::snippets::EditArgs),

    /// Remove a snippet
    Remove {
        /// Snippet id to remove
        id: uuid::Uuid,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Activate a snippet
    Enable {
        /// Snippet id to activate
        id: uuid::Uuid,
    },

    /// Deactivate a snippet without removing it
    Disable {
        /// Snippet id to deactivate
        id: uuid::Uuid,
    },

    /// Show the computed asset groups
    Groups,

    /// Print embed tags for the computed groups
    Tags {
        /// Only the group with this key (e.g. css-head-all)
        #[arg(long)]
        group: Option<snipdeck_core::GroupKey>,
    },

    /// Preview which group a candidate snippet would land in
    Suggest(commands::snippets::SnippetInput),

    /// Dashboard summary counters
    Stats,

    /// Publish snippets or groups to the publish root
    Deploy(commands::deploy::DeployArgs),

    /// Deploy state of every registered snippet
    Status,

    /// Recent deploys, newest first
    History {
        /// Maximum number of entries to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Manifest totals and file metrics
    Analytics,

    /// Reconcile the manifest with the published assets directory
    Sync,

    /// Stream manifest and deploy-log events until interrupted
    Watch,

    /// Export all snippets to a JSON file
    Export {
        /// Destination file
        path: PathBuf,
    },

    /// Import snippets from a JSON file
    Import {
        /// Source file
        path: PathBuf,
    },

    /// Manage snipdeck configuration
    Config {
        #[command(subcommand)]
        command: commands::ConfigCommand,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let format = cli.format;
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Add(args) => commands::snippets::add(args, format, config_path),
        Command::List => commands::snippets::list(format, config_path),
        Command::Edit(args) => commands::snippets::edit(args, format, config_path),
        Command::Remove { id, yes } => commands::snippets::remove(id, yes, format, config_path),
        Command::Enable { id } => commands::snippets::set_active(id, true, format, config_path),
        Command::Disable { id } => commands::snippets::set_active(id, false, format, config_path),
        Command::Groups => commands::snippets::groups(format, config_path),
        Command::Tags { group } => commands::snippets::tags(group, format, config_path),
        Command::Suggest(input) => commands::snippets::suggest(input, format, config_path),
        Command::Stats => commands::snippets::stats(format, config_path),
        Command::Deploy(args) => commands::deploy::handle_deploy(args, format, config_path),
        Command::Status => commands::deploy::status(format, config_path),
        Command::History { limit } => commands::deploy::history(limit, format, config_path),
        Command::Analytics => commands::deploy::analytics(format, config_path),
        Command::Sync => commands::deploy::sync(format, config_path),
        Command::Watch => commands::watch::handle_watch(format, config_path),
        Command::Export { path } => commands::snippets::export(path, format, config_path),
        Command::Import { path } => commands::snippets::import(path, format, config_path),
        Command::Config { command } => {
            commands::config::handle_config_command(command, format, config_path)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
