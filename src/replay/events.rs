//! Recorded event log schema.
//!
//! A log captures what a host runtime reported to the agent: a method table
//! and the ordered compilation events.
//!
//! Example:
//! ```json
//! {
//!   "version": "1.0.0",
//!   "pid": 4242,
//!   "methods": [{"id": 1, "class": "LFoo;", "name": "bar", "signature": "()V"}],
//!   "events": [
//!     {"type": "dynamic_code_generated", "name": "stub_1", "address": 4096, "length": 32},
//!     {"type": "compiled_method_load", "method": 1, "code_addr": 8192, "code_size": 64,
//!      "compile_info": {"kind": 2, "pcs": [{"pc": 8208, "methods": [1]}]}}
//!   ]
//! }
//! ```

use crate::runtime::{CompileInfo, CompiledUnit, MethodId, MethodSignature, PcStackInfo};
use serde::{Deserialize, Serialize};

/// Top-level recorded event log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLog {
    /// Schema version for compatibility checking
    pub version: String,

    /// Process id the events were recorded from
    #[serde(default)]
    pub pid: Option<u32>,

    /// Method table used to resolve method ids
    #[serde(default)]
    pub methods: Vec<RecordedMethod>,

    /// Events in the order the host delivered them
    #[serde(default)]
    pub events: Vec<RecordedEvent>,
}

/// One method table row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedMethod {
    pub id: MethodId,

    #[serde(flatten)]
    pub signature: MethodSignature,
}

/// One notification from the host
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordedEvent {
    CompiledMethodLoad {
        method: MethodId,
        code_addr: u64,
        code_size: u64,
        #[serde(default)]
        compile_info: Option<RecordedCompileInfo>,
    },
    DynamicCodeGenerated {
        name: String,
        address: u64,
        length: u64,
    },
}

/// Compile info as a raw record kind plus entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedCompileInfo {
    pub kind: u32,

    #[serde(default)]
    pub pcs: Vec<PcStackInfo>,
}

impl From<RecordedCompileInfo> for CompileInfo {
    fn from(raw: RecordedCompileInfo) -> Self {
        CompileInfo::from_raw(raw.kind, raw.pcs)
    }
}

impl RecordedEvent {
    /// Compiled unit carried by this event, if any
    pub fn to_compiled_unit(&self) -> Option<CompiledUnit> {
        match self {
            RecordedEvent::CompiledMethodLoad {
                method,
                code_addr,
                code_size,
                compile_info,
            } => {
                let unit = CompiledUnit::new(*method, *code_addr, *code_size);
                Some(match compile_info {
                    Some(info) => unit.with_compile_info(info.clone().into()),
                    None => unit,
                })
            }
            RecordedEvent::DynamicCodeGenerated { .. } => None,
        }
    }
}
