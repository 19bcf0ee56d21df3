//! Reconstruct per-range active method stacks from inlining metadata.
//!
//! A compiled unit's inline record lists, per PC, the stack of methods
//! logically executing there (innermost first). We walk it once and cut the
//! unit wherever the innermost method changes.
//!
//! Example: root `R` with entries `0x10:[A,R]`, `0x30:[R]` over `[0x0, 0x40)`
//! gives `[0x0,0x10) R`, `[0x10,0x30) A,R`, `[0x30,0x40) R`.

use crate::runtime::{CompileInfo, MethodId, PcStackInfo};
use log::{debug, warn};

/// Method stack active over one segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveStack<'a> {
    /// Only the root method; no inline detail to unfold
    RootOnly,

    /// Frames of one inline record entry, index 0 innermost
    Frames(&'a [MethodId]),
}

impl ActiveStack<'_> {
    /// Innermost method of this stack
    pub fn innermost(&self, root: MethodId) -> MethodId {
        match self {
            ActiveStack::RootOnly => root,
            ActiveStack::Frames(frames) => frames.first().copied().unwrap_or(root),
        }
    }
}

/// One contiguous address range with a single active stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub address: u64,
    pub length: u64,
    pub stack: ActiveStack<'a>,
}

impl Segment<'_> {
    /// End address (exclusive)
    pub fn end(&self) -> u64 {
        self.address + self.length
    }
}

/// Split a compiled unit into segments by innermost-method changes
///
/// **Public** - main entry point for inline interpretation
///
/// # Arguments
/// * `root` - Method the unit was compiled for
/// * `code_addr` - Base address of the unit
/// * `code_size` - Size of the unit in bytes
/// * `compile_info` - Optional compiler metadata
///
/// # Returns
/// Segments in increasing address order, tiling
/// `[code_addr, code_addr + code_size)` without gaps or overlaps.
/// Empty ranges are never returned.
///
/// # Algorithm
/// 1. Without inline-info metadata the unit is one `RootOnly` segment
/// 2. Otherwise track (current top method, segment start), starting at
///    (`root`, `code_addr`)
/// 3. When an entry's innermost method differs from the current top, close
///    the open segment at the entry's PC with the previous entry's stack
/// 4. Close the trailing segment at the end of the unit with the last stack
pub fn interpret(
    root: MethodId,
    code_addr: u64,
    code_size: u64,
    compile_info: Option<&CompileInfo>,
) -> Vec<Segment<'_>> {
    let code_end = code_addr.checked_add(code_size).unwrap_or_else(|| {
        warn!(
            "Unit at {:#x} with size {:#x} overflows the address space, truncating",
            code_addr, code_size
        );
        u64::MAX
    });
    let mut segments = Vec::new();

    let Some(record) = compile_info.and_then(CompileInfo::inline_record) else {
        if let Some(info) = compile_info {
            debug!(
                "Compile info kind {} carries no inline stacks, using whole unit",
                info.kind()
            );
        }
        push_segment(&mut segments, code_addr, code_end, ActiveStack::RootOnly);
        return segments;
    };

    let mut current_top = root;
    let mut segment_start = code_addr;
    let mut previous: Option<&PcStackInfo> = None;

    for entry in &record.pcs {
        let Some(top) = entry.innermost() else {
            warn!("Ignoring inline entry at {:#x} with an empty method stack", entry.pc);
            continue;
        };

        if top != current_top {
            // Out-of-order or out-of-range PCs must not break the tiling
            let boundary = entry.pc.clamp(segment_start, code_end);
            if boundary != entry.pc {
                debug!("Clamped inline entry PC {:#x} to {:#x}", entry.pc, boundary);
            }

            push_segment(&mut segments, segment_start, boundary, stack_of(previous));
            segment_start = boundary;
            current_top = top;
        }

        previous = Some(entry);
    }

    if segment_start != code_end {
        push_segment(&mut segments, segment_start, code_end, stack_of(previous));
    }

    debug!(
        "Interpreted {} inline entries into {} segments",
        record.pcs.len(),
        segments.len()
    );

    segments
}

/// Stack to report for a segment closed after `previous`
fn stack_of(previous: Option<&PcStackInfo>) -> ActiveStack<'_> {
    previous.map_or(ActiveStack::RootOnly, |entry| ActiveStack::Frames(&entry.methods))
}

fn push_segment<'a>(segments: &mut Vec<Segment<'a>>, start: u64, end: u64, stack: ActiveStack<'a>) {
    if end > start {
        segments.push(Segment {
            address: start,
            length: end - start,
            stack,
        });
    }
}
