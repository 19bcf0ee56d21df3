//! Compiled code and inlining metadata as reported by the host runtime.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Record kind of a compiler side-table that carries per-PC inline stacks
pub const INLINE_INFO_RECORD_KIND: u32 = 2;

/// Opaque handle identifying one method in the host runtime
///
/// Only ever compared and handed back to a `MethodResolver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodId(pub u64);

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Inline stack active from `pc` up to the next entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcStackInfo {
    /// Absolute start address of this entry inside the unit
    pub pc: u64,

    /// Active methods, index 0 innermost, last entry the outermost caller
    pub methods: Vec<MethodId>,
}

impl PcStackInfo {
    pub fn new(pc: u64, methods: Vec<MethodId>) -> Self {
        Self { pc, methods }
    }

    /// Innermost (currently executing) method, if the stack is not empty
    pub fn innermost(&self) -> Option<MethodId> {
        self.methods.first().copied()
    }
}

/// Compiler inlining side-table for one compiled unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineRecord {
    /// Entries in the order the compiler supplied them
    pub pcs: Vec<PcStackInfo>,
}

impl InlineRecord {
    pub fn new(pcs: Vec<PcStackInfo>) -> Self {
        Self { pcs }
    }
}

/// Compile-time metadata attached to a compiled unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileInfo {
    /// Per-PC inline stacks
    Inline(InlineRecord),

    /// Any other record kind; carries no usable inline detail
    Other { kind: u32 },
}

impl CompileInfo {
    /// Build from a raw record discriminant
    ///
    /// Entries are dropped for anything that is not an inline-info record.
    pub fn from_raw(kind: u32, pcs: Vec<PcStackInfo>) -> Self {
        if kind == INLINE_INFO_RECORD_KIND {
            CompileInfo::Inline(InlineRecord::new(pcs))
        } else {
            CompileInfo::Other { kind }
        }
    }

    /// Raw record discriminant
    pub fn kind(&self) -> u32 {
        match self {
            CompileInfo::Inline(_) => INLINE_INFO_RECORD_KIND,
            CompileInfo::Other { kind } => *kind,
        }
    }

    /// Inline record, if this metadata is inline-stack shaped
    pub fn inline_record(&self) -> Option<&InlineRecord> {
        match self {
            CompileInfo::Inline(record) => Some(record),
            CompileInfo::Other { .. } => None,
        }
    }
}

/// One just-in-time compiled code blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledUnit {
    /// Root method the compiler was asked to compile
    pub method: MethodId,

    /// Base address of the generated code
    pub code_addr: u64,

    /// Size of the generated code in bytes
    pub code_size: u64,

    /// Optional inlining metadata
    pub compile_info: Option<CompileInfo>,
}

impl CompiledUnit {
    pub fn new(method: MethodId, code_addr: u64, code_size: u64) -> Self {
        Self {
            method,
            code_addr,
            code_size,
            compile_info: None,
        }
    }

    pub fn with_compile_info(mut self, compile_info: CompileInfo) -> Self {
        self.compile_info = Some(compile_info);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_inline_kind() {
        let pcs = vec![PcStackInfo::new(0x10, vec![MethodId(1)])];
        let info = CompileInfo::from_raw(INLINE_INFO_RECORD_KIND, pcs.clone());
        assert_eq!(info.inline_record().map(|r| r.pcs.clone()), Some(pcs));
        assert_eq!(info.kind(), INLINE_INFO_RECORD_KIND);
    }

    #[test]
    fn test_from_raw_unknown_kind_drops_entries() {
        let pcs = vec![PcStackInfo::new(0x10, vec![MethodId(1)])];
        let info = CompileInfo::from_raw(7, pcs);
        assert_eq!(info, CompileInfo::Other { kind: 7 });
        assert!(info.inline_record().is_none());
    }

    #[test]
    fn test_method_id_display() {
        assert_eq!(MethodId(255).to_string(), "0xff");
    }
}
