//! Compilation event handling.
//!
//! Each notification is resolved into ranges with call-local state only and
//! handed to the shared `SymbolSink`, which serializes the actual writes.

use super::options::EngineConfig;
use crate::output::SymbolSink;
use crate::runtime::{CompiledUnit, MethodResolver};
use crate::symbols::{dynamic_code_range, partition_unit, SymbolRange};
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};

/// Callbacks invoked by the host runtime
///
/// Implementations must tolerate concurrent calls and must never panic or
/// return errors into the host.
pub trait CompilationEventHandler: Send + Sync {
    /// A method was just-in-time compiled
    fn on_compiled_unit(&self, metadata: &dyn MethodResolver, unit: &CompiledUnit);

    /// A code stub without method identity was generated
    fn on_dynamic_code(&self, name: &str, address: u64, length: u64);
}

/// Running counters, updated lock-free from any callback thread
#[derive(Debug, Default)]
pub struct EngineStats {
    compiled_units: AtomicU64,
    dynamic_stubs: AtomicU64,
    ranges_emitted: AtomicU64,
    // units with at least one range skipped for missing metadata
    incomplete_units: AtomicU64,
}

/// Point-in-time copy of `EngineStats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub compiled_units: u64,
    pub dynamic_stubs: u64,
    pub ranges_emitted: u64,
    pub incomplete_units: u64,
}

impl EngineStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            compiled_units: self.compiled_units.load(Ordering::Relaxed),
            dynamic_stubs: self.dynamic_stubs.load(Ordering::Relaxed),
            ranges_emitted: self.ranges_emitted.load(Ordering::Relaxed),
            incomplete_units: self.incomplete_units.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    /// Get human-readable summary
    ///
    /// **Public** - for logging and the CLI
    pub fn summary(&self) -> String {
        format!(
            "Units: {} | Stubs: {} | Ranges emitted: {} | Incomplete units: {}",
            self.compiled_units, self.dynamic_stubs, self.ranges_emitted, self.incomplete_units
        )
    }
}

/// Engine context: immutable configuration plus the shared output sink
///
/// Constructed once at load and shared by reference with every callback.
pub struct SymbolMapEngine<S: SymbolSink> {
    config: EngineConfig,
    sink: S,
    stats: EngineStats,
}

impl<S: SymbolSink> SymbolMapEngine<S> {
    pub fn new(config: EngineConfig, sink: S) -> Self {
        Self {
            config,
            sink,
            stats: EngineStats::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Resolve a compiled unit into ranges without writing them
    ///
    /// **Public** - the pure part of `on_compiled_unit`
    pub fn resolve_unit(
        &self,
        metadata: &dyn MethodResolver,
        unit: &CompiledUnit,
    ) -> Vec<SymbolRange> {
        partition_unit(unit, metadata, &self.config)
    }

    fn emit(&self, range: &SymbolRange) {
        self.sink
            .write_entry(range.address, range.length, &range.label, self.config.flush);
        self.stats.ranges_emitted.fetch_add(1, Ordering::Relaxed);
    }
}

impl<S: SymbolSink> CompilationEventHandler for SymbolMapEngine<S> {
    fn on_compiled_unit(&self, metadata: &dyn MethodResolver, unit: &CompiledUnit) {
        debug!(
            "Compiled unit {} at {:#x} ({} bytes)",
            unit.method, unit.code_addr, unit.code_size
        );
        self.stats.compiled_units.fetch_add(1, Ordering::Relaxed);

        let ranges = self.resolve_unit(metadata, unit);
        let covered: u64 = ranges.iter().map(|r| r.length).sum();
        if covered != unit.code_size {
            self.stats.incomplete_units.fetch_add(1, Ordering::Relaxed);
        }

        for range in &ranges {
            self.emit(range);
        }
    }

    fn on_dynamic_code(&self, name: &str, address: u64, length: u64) {
        debug!("Dynamic code {} at {:#x} ({} bytes)", name, address, length);
        self.stats.dynamic_stubs.fetch_add(1, Ordering::Relaxed);

        self.emit(&dynamic_code_range(name, address, length));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::options::LabelMode;
    use crate::output::PerfMapWriter;
    use crate::runtime::{
        CompileInfo, InlineRecord, MethodId, MethodSignature, MethodTable, PcStackInfo,
    };
    use pretty_assertions::assert_eq;

    fn table() -> MethodTable {
        let mut table = MethodTable::new();
        table.insert(MethodId(1), MethodSignature::new("LRoot;", "run", "()V"));
        table.insert(MethodId(2), MethodSignature::new("LA;", "a", "()V"));
        table
    }

    fn output(engine: SymbolMapEngine<PerfMapWriter<Vec<u8>>>) -> String {
        String::from_utf8(engine.into_sink().into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_dynamic_code_line() {
        let engine = SymbolMapEngine::new(EngineConfig::new(), PerfMapWriter::new(Vec::new()));
        engine.on_dynamic_code("stub_1", 0x1000, 0x20);

        assert_eq!(engine.stats().dynamic_stubs, 1);
        assert_eq!(output(engine), "1000 20 stub_1\n");
    }

    #[test]
    fn test_compiled_unit_lines() {
        let config = EngineConfig::new().with_label_mode(LabelMode::Unfolded);
        let engine = SymbolMapEngine::new(config, PerfMapWriter::new(Vec::new()));
        let unit = CompiledUnit::new(MethodId(1), 0x2000, 0x30).with_compile_info(
            CompileInfo::Inline(InlineRecord::new(vec![PcStackInfo::new(
                0x2010,
                vec![MethodId(2), MethodId(1)],
            )])),
        );

        engine.on_compiled_unit(&table(), &unit);

        let stats = engine.stats();
        assert_eq!(stats.compiled_units, 1);
        assert_eq!(stats.ranges_emitted, 2);
        assert_eq!(stats.incomplete_units, 0);
        assert_eq!(
            output(engine),
            "2000 10 LRoot;.run\n2010 20 LA;.a_[i]->LRoot;.run_[j]\n"
        );
    }

    #[test]
    fn test_unresolvable_unit_is_counted_and_skipped() {
        let engine = SymbolMapEngine::new(EngineConfig::new(), PerfMapWriter::new(Vec::new()));
        engine.on_compiled_unit(&table(), &CompiledUnit::new(MethodId(7), 0x3000, 0x10));

        assert_eq!(engine.stats().incomplete_units, 1);
        assert_eq!(output(engine), "");
    }
}
