//! Runtime-facing data model.
//!
//! This module defines what the host virtual machine hands us:
//! - Opaque method handles and their resolved signatures
//! - Compiled units with optional inlining metadata
//! - The metadata accessor seam (`MethodResolver`)

pub mod metadata;
pub mod types;

// Re-export main types
pub use metadata::{MethodResolver, MethodSignature, MethodTable};
pub use types::{CompileInfo, CompiledUnit, InlineRecord, MethodId, PcStackInfo};
