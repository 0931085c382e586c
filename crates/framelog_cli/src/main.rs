//! Framelog CLI
//!
//! Command-line tools for inspecting block-framed logs.
//!
//! # Commands
//!
//! - `dump` - Print log records for debugging
//! - `verify` - Verify log integrity

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Framelog command-line log tools.
#[derive(Parser)]
#[command(name = "framelog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print log records for debugging
    Dump {
        /// Path to the log file
        file: PathBuf,

        /// Maximum number of entries to print
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print raw physical fragments instead of logical records
        #[arg(short, long)]
        physical: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Verify log integrity
    Verify {
        /// Path to the log file
        file: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

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

    match cli.command {
        Commands::Dump {
            file,
            limit,
            physical,
            format,
        } => {
            commands::dump::run(&file, limit, physical, &format)?;
        }
        Commands::Verify { file, format } => {
            commands::verify::run(&file, &format)?;
        }
        Commands::Version => {
            println!("Framelog CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Framelog Core v{}", framelog_core::VERSION);
        }
    }

    Ok(())
}
