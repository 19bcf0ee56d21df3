//! JIT Perf Map
//!
//! Symbol maps for just-in-time compiled code. The engine listens to a
//! managed runtime's compilation events and writes `perf-<pid>.map`, so a
//! sampling profiler such as `perf` can name JIT-compiled frames,
//! including frames that were inlined.
//!
//! ## Getting Started
//!
//! A host integration loads a `PerfMapAgent` and forwards its callbacks:
//!
//! ```ignore
//! let agent = PerfMapAgent::on_load(Some("unfold=1"));
//! agent.on_compiled_unit(&runtime_metadata, &unit);
//! agent.on_dynamic_code("Interpreter", 0x7f00_1000, 0x400);
//! agent.on_unload();
//! ```
//!
//! Recorded event logs can be replayed with the CLI:
//!
//! ```bash
//! jit-perf-map replay --events events.json --options unfold=1
//! ```

pub mod agent;
pub mod commands;
pub mod engine;
pub mod output;
pub mod replay;
pub mod runtime;
pub mod symbols;
pub mod utils;

pub use agent::PerfMapAgent;
pub use engine::{CompilationEventHandler, EngineConfig, LabelMode, SymbolMapEngine};
