//! Symbol map writer.
//!
//! Appends one line per range in the format perf expects:
//! `<address hex> <length hex> <label>\n`, e.g. `7f3a10 40 LFoo;.bar`.
//! Writes from concurrent callbacks are serialized per line.

use crate::utils::config::{MAP_FILE_PREFIX, MAP_FILE_SUFFIX};
use crate::utils::error::OutputError;
use log::{debug, error, info};
use parking_lot::Mutex;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Output channel for symbol map entries
///
/// Implementations must keep each entry on one uninterrupted line even when
/// called from several threads at once, and must never panic.
pub trait SymbolSink: Send + Sync {
    fn write_entry(&self, address: u64, length: u64, label: &str, flush_now: bool);
}

/// Thread-safe line writer over any `Write`
pub struct PerfMapWriter<W: Write + Send> {
    inner: Mutex<Option<W>>,
    reported: AtomicBool,
}

/// Writer backed by a `perf-<pid>.map` file
pub type PerfMapFile = PerfMapWriter<BufWriter<File>>;

impl<W: Write + Send> PerfMapWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(Some(writer)),
            reported: AtomicBool::new(false),
        }
    }

    /// Writer that silently drops every entry
    ///
    /// **Public** - used when the map could not be opened
    pub fn disabled() -> Self {
        Self {
            inner: Mutex::new(None),
            reported: AtomicBool::new(true),
        }
    }

    /// True while entries still reach the underlying writer
    pub fn is_enabled(&self) -> bool {
        self.inner.lock().is_some()
    }

    /// Flush and release the underlying writer
    ///
    /// Later entries are dropped.
    pub fn close(&self) -> Result<(), OutputError> {
        match self.inner.lock().take() {
            Some(mut writer) => writer.flush().map_err(OutputError::WriteFailed),
            None => Ok(()),
        }
    }

    /// Take back the underlying writer, if still open
    pub fn into_inner(self) -> Option<W> {
        self.inner.into_inner()
    }

    /// Report the first write failure only
    fn report_failure(&self, err: &std::io::Error) {
        if !self.reported.swap(true, Ordering::Relaxed) {
            error!("Symbol map write failed, further entries are dropped: {}", err);
        }
    }
}

impl PerfMapWriter<BufWriter<File>> {
    /// Create (truncate) the map file at `path`
    ///
    /// # Errors
    /// * `OutputError::Unavailable` - the file cannot be created
    pub fn create(path: impl AsRef<Path>) -> Result<Self, OutputError> {
        let path = path.as_ref();

        let file = File::create(path).map_err(|source| OutputError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Writing symbol map to: {}", path.display());
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write + Send> SymbolSink for PerfMapWriter<W> {
    fn write_entry(&self, address: u64, length: u64, label: &str, flush_now: bool) {
        let mut guard = self.inner.lock();
        let Some(writer) = guard.as_mut() else {
            return;
        };

        let result = writeln!(writer, "{}", format_entry(address, length, label)).and_then(|()| {
            if flush_now {
                writer.flush()
            } else {
                Ok(())
            }
        });

        if let Err(e) = result {
            // Drop the writer so a half-broken stream never gets partial lines
            *guard = None;
            drop(guard);
            self.report_failure(&e);
        }
    }
}

/// Format one map line without the trailing newline
///
/// **Public** - the bit-exact line contract consumed by perf
pub fn format_entry(address: u64, length: u64, label: &str) -> String {
    format!("{:x} {:x} {}", address, length, label)
}

/// Path of the map file for a process
///
/// # Example
/// `map_file_path("/tmp", 4242)` is `/tmp/perf-4242.map`
pub fn map_file_path(dir: impl AsRef<Path>, pid: u32) -> PathBuf {
    let path = dir
        .as_ref()
        .join(format!("{}{}{}", MAP_FILE_PREFIX, pid, MAP_FILE_SUFFIX));
    debug!("Symbol map path for pid {}: {}", pid, path.display());
    path
}
