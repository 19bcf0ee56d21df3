//! JIT Perf Map CLI
//!
//! Replays recorded JIT compilation events into a `perf-<pid>.map` symbol
//! map and validates existing maps.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use jit_perf_map::commands::{
    display_version, execute_replay, validate_args, validate_map_file, ReplayArgs,
};
use jit_perf_map::utils::config::DEFAULT_MAP_DIR;

/// JIT Perf Map - symbol maps for JIT-compiled code
#[derive(Parser, Debug)]
#[command(name = "jit-perf-map")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a recorded event log into a symbol map
    Replay {
        /// Recorded event log (JSON)
        #[arg(short, long)]
        events: PathBuf,

        /// Agent options, e.g. "unfold=1,flush=1,msig=1"
        #[arg(short, long, env = "JIT_PERF_MAP_OPTIONS")]
        options: Option<String>,

        /// Directory to write perf-<pid>.map into
        #[arg(long, default_value = DEFAULT_MAP_DIR)]
        out_dir: PathBuf,

        /// Process id for the map file name (defaults to the log's pid)
        #[arg(long)]
        pid: Option<u32>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a symbol map file
    Validate {
        /// Path to perf-<pid>.map
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Replay {
            events,
            options,
            out_dir,
            pid,
            summary,
        } => {
            let args = ReplayArgs {
                events,
                options,
                out_dir,
                pid,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_replay(args)?;
        }

        Commands::Validate { file } => {
            validate_map_file(&file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
