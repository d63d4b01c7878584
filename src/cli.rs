//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "homesync",
    about = "Keep application settings in sync across machines",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output (one line per managed path)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Preview changes without applying them
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Override the home directory
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Override the storage root (skips provider detection)
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Move config files into storage and link them back
    Backup(OpOpts),
    /// Link config files to existing storage copies
    Restore(OpOpts),
    /// Unlink everything and move the files back home
    Uninstall(UninstallOpts),
    /// List the supported applications
    List,
    /// Generate shell completions
    Completions(CompletionsOpts),
    /// Print version information
    Version,
}

/// Application filters shared by the three operations.
#[derive(Parser, Debug, Clone, Default)]
pub struct OpOpts {
    /// Skip specific applications (by id)
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Process only specific applications (by id)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
}

/// Options for the `uninstall` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct UninstallOpts {
    #[command(flatten)]
    pub filter: OpOpts,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub force: bool,
}

/// Options for the `completions` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionsOpts {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
