//! Folio CLI
//!
//! Command-line tools for Folio data directories.
//!
//! # Commands
//!
//! - `items` / `accounts` - List stored records
//! - `loans` - List one day of the loan log
//! - `inspect` - Display file sizes, record counts and partition dates
//! - `verify` - Strictly decode every file and report problems
//! - `clean` - Remove temp files left by interrupted writes

mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use commands::OutputFormat;
use folio_core::{Config, DataDir};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Folio command-line data tools.
#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the data directory [default: data]
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Directory holding loan partitions [default: the data directory]
    #[arg(global = true, long)]
    log_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog items
    Items {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List account holders (credentials are never printed)
    Accounts {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List the loan events of one day
    Loans {
        /// Partition date (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Display data directory statistics
    Inspect {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Verify that every file decodes cleanly
    Verify,

    /// Remove temp files left by interrupted writes
    Clean,

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = Config::new();
    if let Some(path) = cli.path {
        config = config.data_dir(path);
    }
    if let Some(log_dir) = cli.log_dir {
        config = config.log_dir(log_dir);
    }
    debug!(
        data_dir = %config.data_dir.display(),
        log_dir = %config.log_dir_path().display(),
        "resolved configuration"
    );

    match cli.command {
        Commands::Items { format } => {
            let dir = DataDir::open_existing(config)?;
            commands::list::items(&dir, format)?;
        }
        Commands::Accounts { format } => {
            let dir = DataDir::open_existing(config)?;
            commands::list::accounts(&dir, format)?;
        }
        Commands::Loans { date, format } => {
            let dir = DataDir::open_existing(config)?;
            commands::list::loans(&dir, date, format)?;
        }
        Commands::Inspect { format } => {
            let dir = DataDir::open_existing(config)?;
            commands::inspect::run(&dir, format)?;
        }
        Commands::Verify => {
            let dir = DataDir::open_existing(config)?;
            commands::verify::run(&dir)?;
        }
        Commands::Clean => {
            let dir = DataDir::open_existing(config)?;
            commands::clean::run(&dir)?;
        }
        Commands::Version => {
            println!("Folio CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Folio Core v{}", folio_core::VERSION);
        }
    }

    Ok(())
}
