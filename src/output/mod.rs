//! Symbol map output.
//!
//! This module handles writing `perf-<pid>.map` files and reading them back.

pub mod perf_map;
pub mod reader;

// Re-export main functions
pub use perf_map::{format_entry, map_file_path, PerfMapFile, PerfMapWriter, SymbolSink};
pub use reader::{find_overlaps, parse_map_line, read_map};
