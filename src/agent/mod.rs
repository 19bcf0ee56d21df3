//! Agent lifecycle.
//!
//! Glue between the host's load/unload hooks and the engine:
//! 1. Parse the option string
//! 2. Open `perf-<pid>.map`
//! 3. Serve compilation events until unload
//! 4. Flush and close the map, leaving it on disk for perf

use crate::engine::{
    parse_options, CompilationEventHandler, EngineConfig, StatsSnapshot, SymbolMapEngine,
};
use crate::output::{map_file_path, PerfMapFile, PerfMapWriter};
use crate::runtime::{CompiledUnit, MethodResolver};
use crate::utils::config::DEFAULT_MAP_DIR;
use env_logger::Env;
use log::{error, info};
use std::path::{Path, PathBuf};

/// A loaded agent writing one process's symbol map
pub struct PerfMapAgent {
    engine: SymbolMapEngine<PerfMapFile>,
    map_path: PathBuf,
}

impl PerfMapAgent {
    /// Load the agent for the current process, writing under `/tmp`
    ///
    /// **Public** - entry point for the host's load hook
    pub fn on_load(options: Option<&str>) -> Self {
        Self::on_load_in(options, DEFAULT_MAP_DIR, std::process::id())
    }

    /// Load the agent for `pid`, writing the map into `dir`
    ///
    /// Never fails: if the map cannot be created the error is logged once
    /// and every later entry is dropped.
    pub fn on_load_in(options: Option<&str>, dir: impl AsRef<Path>, pid: u32) -> Self {
        init_logging();

        let config = parse_options(options);
        info!("Agent loaded for pid {} with {:?}", pid, config);

        let map_path = map_file_path(dir, pid);
        let sink = PerfMapFile::create(&map_path).unwrap_or_else(|e| {
            error!("{}", e);
            PerfMapWriter::disabled()
        });

        Self {
            engine: SymbolMapEngine::new(config, sink),
            map_path,
        }
    }

    /// Flush and close the map
    ///
    /// **Public** - entry point for the host's unload hook
    pub fn on_unload(self) -> StatsSnapshot {
        let stats = self.engine.stats();

        if let Err(e) = self.engine.sink().close() {
            error!("Failed to close {}: {}", self.map_path.display(), e);
        }

        info!("Agent unloaded: {}", stats.summary());
        stats
    }

    pub fn map_path(&self) -> &Path {
        &self.map_path
    }

    pub fn config(&self) -> &EngineConfig {
        self.engine.config()
    }

    /// False once the map could not be opened or a write failed
    pub fn is_writing(&self) -> bool {
        self.engine.sink().is_enabled()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.engine.stats()
    }
}

impl CompilationEventHandler for PerfMapAgent {
    fn on_compiled_unit(&self, metadata: &dyn MethodResolver, unit: &CompiledUnit) {
        self.engine.on_compiled_unit(metadata, unit);
    }

    fn on_dynamic_code(&self, name: &str, address: u64, length: u64) {
        self.engine.on_dynamic_code(name, address, length);
    }
}

/// Route agent diagnostics to stderr; a no-op if the host already set a logger
fn init_logging() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("warn")).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::LabelMode;

    #[test]
    fn test_load_writes_map_and_unload_closes() {
        let temp_dir = tempfile::tempdir().unwrap();
        let agent = PerfMapAgent::on_load_in(Some("flush=1"), temp_dir.path(), 77);

        assert!(agent.is_writing());
        assert!(agent.config().flush);
        agent.on_dynamic_code("stub_1", 0x1000, 0x20);

        let path = agent.map_path().to_path_buf();
        let stats = agent.on_unload();

        assert_eq!(stats.dynamic_stubs, 1);
        assert_eq!(std::fs::read_to_string(path).unwrap(), "1000 20 stub_1\n");
    }

    #[test]
    fn test_unwritable_dir_degrades_silently() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("does/not/exist");
        let agent = PerfMapAgent::on_load_in(Some("unfold=1"), &missing, 78);

        assert!(!agent.is_writing());
        assert_eq!(agent.config().label_mode, LabelMode::Unfolded);
        agent.on_dynamic_code("stub_1", 0x1000, 0x20);
        assert_eq!(agent.on_unload().ranges_emitted, 1);
    }
}
