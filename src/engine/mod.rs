//! Reactive symbol map engine.
//!
//! The host runtime drives everything: it calls into a
//! `CompilationEventHandler` once per compiled unit and once per dynamic
//! code stub, on whatever thread it likes.

pub mod handler;
pub mod options;

// Re-export main types
pub use handler::{CompilationEventHandler, EngineStats, StatsSnapshot, SymbolMapEngine};
pub use options::{parse_options, EngineConfig, LabelMode};
