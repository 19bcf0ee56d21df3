use std::path::PathBuf;
use crate::utils::config::DEFAULT_MAP_DIR;

/// Arguments for the replay command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ReplayArgs {
    /// Recorded event log (JSON)
    pub events: PathBuf,

    /// Agent option string, e.g. "unfold=1,flush=1"
    pub options: Option<String>,

    /// Directory the `perf-<pid>.map` file is written into
    pub out_dir: PathBuf,

    /// Process id to name the map after (defaults to the log's pid)
    pub pid: Option<u32>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for ReplayArgs {
    fn default() -> Self {
        Self {
            events: PathBuf::from("events.json"),
            options: None,
            out_dir: PathBuf::from(DEFAULT_MAP_DIR),
            pid: None,
            print_summary: false,
        }
    }
}
