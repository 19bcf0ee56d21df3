//! Replay command implementation.
//!
//! The replay command:
//! 1. Loads a recorded event log
//! 2. Builds the method table
//! 3. Loads an agent writing `perf-<pid>.map`
//! 4. Replays every event through the agent
//! 5. Unloads the agent, closing the map

use super::models::ReplayArgs;
use crate::agent::PerfMapAgent;
use crate::replay::{load_event_log, method_table, replay_events};
use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Instant;

/// Execute the replay command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// Path of the written symbol map
///
/// # Errors
/// * Unreadable or invalid event log
/// * Symbol map cannot be created
pub fn execute_replay(args: ReplayArgs) -> Result<PathBuf> {
    let start_time = Instant::now();

    // Step 1: Load event log
    info!("Step 1/4: Loading event log {}...", args.events.display());
    let log = load_event_log(&args.events).context("Failed to load event log")?;

    // Step 2: Method table
    info!("Step 2/4: Building method table ({} methods)...", log.methods.len());
    let methods = method_table(&log).context("Invalid method table")?;
    if methods.is_empty() {
        warn!("Event log has no methods, compiled units will have no symbols");
    }

    // Step 3: Load agent
    let pid = args.pid.or(log.pid).unwrap_or_else(std::process::id);
    info!("Step 3/4: Loading agent for pid {}...", pid);

    std::fs::create_dir_all(&args.out_dir).with_context(|| {
        format!("Cannot create output directory {}", args.out_dir.display())
    })?;

    let agent = PerfMapAgent::on_load_in(args.options.as_deref(), &args.out_dir, pid);
    if !agent.is_writing() {
        bail!("Cannot write symbol map {}", agent.map_path().display());
    }
    debug!("Agent config: {:?}", agent.config());

    // Step 4: Replay
    info!("Step 4/4: Replaying {} events...", log.events.len());
    let replayed = replay_events(&log, &methods, &agent);

    let map_path = agent.map_path().to_path_buf();
    let stats = agent.on_unload();

    info!("✓ Symbol map written to: {}", map_path.display());

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("REPLAY SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Event log:      {}", args.events.display());
        println!("Symbol map:     {}", map_path.display());
        println!("Compiled units: {}", replayed.compiled_units);
        println!("Dynamic stubs:  {}", replayed.dynamic_stubs);
        println!("{}", stats.summary());
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("Replay completed in {:.2}s", elapsed.as_secs_f64());

    Ok(map_path)
}

/// Validate replay arguments before doing any work
///
/// **Public** - called from main.rs
pub fn validate_args(args: &ReplayArgs) -> Result<()> {
    if !args.events.is_file() {
        bail!("Event log not found: {}", args.events.display());
    }

    if args.out_dir.is_file() {
        bail!("Output directory is a file: {}", args.out_dir.display());
    }

    if args.pid == Some(0) {
        bail!("Process id must be non-zero");
    }

    Ok(())
}
