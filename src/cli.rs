//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Workstation personalization: dotfile synchronization and software setup.
#[derive(Debug, Parser)]
#[command(name = "dotsync", version = env!("DOTSYNC_VERSION"), about)]
pub struct Cli {
    /// Subcommand to run; the interactive menu is shown when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose diagnostic output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Repository root (defaults to `DOTSYNC_ROOT` or the current directory).
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Home directory to deploy into (defaults to the user's home).
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Answer yes to every confirmation prompt.
    #[arg(short, long, global = true)]
    pub yes: bool,
}

/// The operations the tool can perform.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Merge tracked dotfiles into the home directory.
    Deploy,
    /// Snapshot the home-side copies of every tracked dotfile.
    Backup,
    /// Pull custom sections from home files back into the repository.
    Capture {
        /// Specific home files to capture; all tracked files when empty.
        paths: Vec<PathBuf>,
    },
    /// Delete all backup snapshots.
    Clear,
    /// Install and upgrade the configured applications.
    Install,
    /// Run the full setup: backup, install, deploy, finalize.
    Run,
}
