use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use server_backup::cli::{
    handle_config, handle_history, handle_list, handle_prune, handle_run, CliContext,
};
use server_backup::logging;

#[derive(Parser)]
#[command(
    name = "server-backup",
    author = "Kaylee Beyene",
    version,
    about = "Timestamped backups of a game server's worlds and extensions",
    long_about = "server-backup copies a server's worlds and extensions (or the whole \
                  server directory) into a timestamped backup, optionally zips it, and \
                  keeps only the newest backups."
)]
struct Cli {
    /// Server directory to back up
    #[arg(long, global = true, env = "SERVER_BACKUP_ROOT", default_value = ".")]
    server_root: PathBuf,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a backup now
    Run {
        /// World to back up; repeat for several (default: every world found)
        #[arg(short, long = "world", value_name = "NAME")]
        worlds: Vec<String>,
    },

    /// List existing backups, newest first
    #[command(alias = "ls")]
    List,

    /// Delete the oldest backups beyond the retention count
    Prune {
        /// Number of backups to keep (default: maxbackups setting)
        #[arg(long)]
        max: Option<usize>,
    },

    /// Show recent runs from the journal
    History {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Show current configuration and paths
    Config {
        /// Write default config.json and messages.json
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let ctx = CliContext::load(&cli.server_root)?;

    match cli.command {
        Commands::Run { worlds } => {
            let outcome = handle_run(&ctx, worlds)?;
            if !outcome.is_success() {
                std::process::exit(1);
            }
        }
        Commands::List => handle_list(&ctx)?,
        Commands::Prune { max } => {
            handle_prune(&ctx, max)?;
        }
        Commands::History { limit } => handle_history(&ctx, limit)?,
        Commands::Config { init } => handle_config(&ctx, init)?,
    }

    Ok(())
}
