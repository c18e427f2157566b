//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{backup, list, share, task};
use crate::storage::Config;

#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about = "Local-first task lists with counters")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, env = "TALLY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the stored document
    #[arg(long, global = true, env = "TALLY_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage tasks
    #[command(subcommand)]
    Task(task::TaskCommands),

    /// Manage lists
    #[command(subcommand)]
    List(list::ListCommands),

    /// Export and import backups
    #[command(subcommand)]
    Backup(backup::BackupCommands),

    /// Publish and import lists through the sharing service
    #[command(subcommand)]
    Share(share::ShareCommands),
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    // RUST_LOG still wins when set
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = Output::new(cli.format);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    log::debug!("Using config: {:?}", config);

    match cli.command {
        Commands::Task(cmd) => task::run(cmd, &config, &output)?,
        Commands::List(cmd) => list::run(cmd, &config, &output)?,
        Commands::Backup(cmd) => backup::run(cmd, &config, &output)?,
        Commands::Share(cmd) => share::run(cmd, &config, &output)?,
    }

    log::debug!("Command completed successfully");
    Ok(())
}
