use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command line interface for `coral` - incremental directory snapshots on top of rsync.
///
/// Each backup action pairs a source directory with a destination directory.
/// Every execution writes a new `<ACTION> backup <TIMESTAMP>` directory into the
/// destination, hardlinking files that did not change since the previous one.
#[derive(Parser)]
#[command(
    name = "coral",
    version = env!("CARGO_PKG_VERSION"),
    about = "Incremental, hardlinked directory snapshots with rsync"
)]
pub struct Cli {
    /// Settings file to use instead of ~/.coral/settings.json
    #[arg(long, global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new backup action
    Add(AddArgs),
    /// Delete the backup action (snapshots on disk are kept)
    Delete {
        /// Name of the backup action
        action: String,
    },
    /// Show all backup actions
    List,
    /// Execute the backup action
    Exec(ExecArgs),
    /// Show information about the backup action
    Info {
        /// Name of the backup action
        action: String,
    },
    /// Print the version
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Name of the new backup action
    pub action: String,

    /// Directory to back up
    #[arg(short, long, value_name = "DIR")]
    pub source: PathBuf,

    /// Directory that receives the snapshots
    #[arg(short, long, value_name = "DIR")]
    pub destination: PathBuf,

    /// File or directory to leave out (repeatable)
    #[arg(short, long = "exclude", value_name = "PATH")]
    pub exclusions: Vec<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ExecArgs {
    /// Name of the backup action
    pub action: String,

    /// Show what would have been backed up, but do not back them up
    #[arg(short, long)]
    pub dry_run: bool,

    /// Do not update the last run time when the backup finishes
    #[arg(long)]
    pub no_update_time: bool,
}
