//! Address-range resolution and symbol-name synthesis.
//!
//! This module turns one compiled unit into labeled address ranges:
//! - Name formatting (method signature to label text)
//! - Inline record interpretation (per-range active method stacks)
//! - Range partitioning (segments to labeled `SymbolRange`s)

pub mod inline_interpreter;
pub mod name_formatter;
pub mod range_partitioner;

// Re-export main types and functions
pub use inline_interpreter::{interpret, ActiveStack, Segment};
pub use name_formatter::{annotate, format_method_name, format_signature, FrameAnnotation};
pub use range_partitioner::{dynamic_code_range, partition_unit, SymbolRange};
