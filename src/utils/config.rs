//! Configuration constants for the agent and the CLI.

/// Directory the agent writes `perf-<pid>.map` into by default
pub const DEFAULT_MAP_DIR: &str = "/tmp";

// perf looks for exactly this name, keyed by the profiled process id
pub const MAP_FILE_PREFIX: &str = "perf-";
pub const MAP_FILE_SUFFIX: &str = ".map";

// Frame annotations used when a label carries inline detail.
// `_[i]` marks an inlined frame, `_[j]` the outermost (compiled) frame.
pub const INLINED_FRAME_SUFFIX: &str = "_[i]";
pub const COMPILED_FRAME_SUFFIX: &str = "_[j]";
pub const FRAME_SEPARATOR: &str = "->";

/// Separator between tokens of the agent option string
pub const OPTION_SEPARATOR: char = ',';

// Recognised option keys (`key=<0|1>`)
pub const OPTION_FLUSH: &str = "flush";
pub const OPTION_UNFOLD: &str = "unfold";
pub const OPTION_METHOD_SIGNATURES: &str = "msig";
pub const OPTION_INLINE: &str = "inline";

/// Current recorded event log schema version
pub const EVENT_LOG_VERSION: &str = "1.0.0";
