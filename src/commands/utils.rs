use anyhow::{Context, Result};
use std::path::Path;
use crate::output::{find_overlaps, read_map};
use crate::utils::config::EVENT_LOG_VERSION;

/// Validate a symbol map file
///
/// Every line must parse; overlapping ranges are reported but tolerated,
/// since perf resolves them by picking one.
pub fn validate_map_file(file_path: &Path) -> Result<usize> {
    println!("Validating symbol map: {}", file_path.display());

    let ranges = read_map(file_path)
        .with_context(|| format!("Invalid symbol map {}", file_path.display()))?;

    let overlaps = find_overlaps(&ranges);
    let covered = ranges
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.length));

    println!("✓ Valid symbol map");
    println!("  Entries: {}", ranges.len());
    println!("  Bytes covered: {:#x}", covered);
    println!("  Overlapping pairs: {}", overlaps.len());

    for (a, b) in overlaps.iter().take(10) {
        let (a, b) = (&ranges[*a], &ranges[*b]);
        println!(
            "    {:x}+{:x} {}  overlaps  {:x}+{:x} {}",
            a.address, a.length, a.label, b.address, b.length, b.label
        );
    }

    Ok(ranges.len())
}

/// Display version information
pub fn display_version() {
    println!("jit-perf-map v{}", env!("CARGO_PKG_VERSION"));
    println!("Event log schema: v{}", EVENT_LOG_VERSION);
    println!();
    println!("Symbol maps for JIT-compiled code, readable by perf.");
}
