//! Turn interpreted segments into labeled symbol ranges.
//!
//! Each segment becomes one `SymbolRange`. The label depends on the
//! engine's `LabelMode`:
//! - Folded:   "LFoo;.inlined_[i]" (innermost method only)
//! - Unfolded: "LFoo;.inlined_[i]->LFoo;.caller_[i]->LFoo;.root_[j]"
//! - Flat:     "LFoo;.root" (one range for the whole unit)

use super::inline_interpreter::{interpret, ActiveStack, Segment};
use super::name_formatter::{annotate, format_signature, FrameAnnotation};
use crate::engine::options::{EngineConfig, LabelMode};
use crate::runtime::{CompiledUnit, MethodId, MethodResolver};
use crate::utils::config::FRAME_SEPARATOR;
use log::{debug, warn};
use std::collections::HashMap;

/// One labeled address range of the symbol map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRange {
    /// Start address
    pub address: u64,

    /// Length in bytes
    pub length: u64,

    /// Symbol name written for this range
    pub label: String,
}

impl SymbolRange {
    pub fn new(address: u64, length: u64, label: impl Into<String>) -> Self {
        Self {
            address,
            length,
            label: label.into(),
        }
    }

    /// End address (exclusive), saturating at the top of the address space
    pub fn end(&self) -> u64 {
        self.address.saturating_add(self.length)
    }
}

/// Partition one compiled unit into labeled ranges
///
/// **Public** - main entry point for compiled units
///
/// # Arguments
/// * `unit` - Compiled unit as reported by the runtime
/// * `resolver` - Runtime metadata accessor
/// * `config` - Engine configuration (label mode, descriptors)
///
/// # Returns
/// Ranges in increasing address order. A range whose method metadata cannot
/// be resolved is skipped; all others are still returned.
pub fn partition_unit(
    unit: &CompiledUnit,
    resolver: &dyn MethodResolver,
    config: &EngineConfig,
) -> Vec<SymbolRange> {
    let compile_info = match config.label_mode {
        LabelMode::Flat => None,
        LabelMode::Folded | LabelMode::Unfolded => unit.compile_info.as_ref(),
    };

    let segments = interpret(unit.method, unit.code_addr, unit.code_size, compile_info);
    let mut labels = LabelBuilder::new(resolver, config.method_signatures);

    let ranges: Vec<SymbolRange> = segments
        .iter()
        .filter_map(|segment| {
            let label = labels.segment_label(unit.method, segment, config.label_mode)?;
            Some(SymbolRange::new(segment.address, segment.length, label))
        })
        .collect();

    if ranges.len() != segments.len() {
        warn!(
            "Skipped {} of {} ranges for unit at {:#x} (metadata unavailable)",
            segments.len() - ranges.len(),
            segments.len(),
            unit.code_addr
        );
    }

    ranges
}

/// Range for a dynamically generated code stub
///
/// **Public** - stubs carry no method identity; the name is used verbatim
pub fn dynamic_code_range(name: &str, address: u64, length: u64) -> SymbolRange {
    SymbolRange::new(address, length, name)
}

/// Per-call label cache
///
/// **Private** - lives for exactly one notification, never shared
struct LabelBuilder<'r> {
    resolver: &'r dyn MethodResolver,
    include_descriptor: bool,
    names: HashMap<MethodId, Option<String>>,
}

impl<'r> LabelBuilder<'r> {
    fn new(resolver: &'r dyn MethodResolver, include_descriptor: bool) -> Self {
        Self {
            resolver,
            include_descriptor,
            names: HashMap::new(),
        }
    }

    /// Plain formatted name of a method; failures are cached too
    fn name(&mut self, method: MethodId) -> Option<String> {
        if let Some(cached) = self.names.get(&method) {
            return cached.clone();
        }

        let resolved = match self.resolver.resolve(method) {
            Ok(signature) => Some(format_signature(&signature, self.include_descriptor)),
            Err(e) => {
                debug!("{}", e);
                None
            }
        };

        self.names.insert(method, resolved.clone());
        resolved
    }

    fn segment_label(
        &mut self,
        root: MethodId,
        segment: &Segment<'_>,
        mode: LabelMode,
    ) -> Option<String> {
        match (segment.stack, mode) {
            (ActiveStack::RootOnly, _) | (_, LabelMode::Flat) => self.name(root),
            (ActiveStack::Frames(_), LabelMode::Folded) => {
                let innermost = segment.stack.innermost(root);
                if innermost == root {
                    self.name(root)
                } else {
                    self.name(innermost)
                        .map(|name| annotate(name, FrameAnnotation::Inlined))
                }
            }
            (ActiveStack::Frames(frames), LabelMode::Unfolded) => self.chain_label(root, frames),
        }
    }

    /// Innermost-first chain joined by `->`, outermost tagged as compiled
    fn chain_label(&mut self, root: MethodId, frames: &[MethodId]) -> Option<String> {
        if frames.is_empty() {
            return self.name(root);
        }

        let outermost = frames.len() - 1;
        let mut parts = Vec::with_capacity(frames.len());
        for (depth, &method) in frames.iter().enumerate() {
            let annotation = if depth == outermost {
                FrameAnnotation::Compiled
            } else {
                FrameAnnotation::Inlined
            };
            parts.push(annotate(self.name(method)?, annotation));
        }

        Some(parts.join(FRAME_SEPARATOR))
    }
}
