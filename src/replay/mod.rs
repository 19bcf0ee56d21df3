//! Replay of recorded compilation events.
//!
//! This module handles:
//! - Loading a recorded event log from JSON
//! - Building the method table that stands in for runtime metadata
//! - Feeding events, in order, to a `CompilationEventHandler`

pub mod events;

pub use events::{EventLog, RecordedCompileInfo, RecordedEvent, RecordedMethod};

use crate::engine::CompilationEventHandler;
use crate::runtime::{MethodResolver, MethodTable};
use crate::utils::config::EVENT_LOG_VERSION;
use crate::utils::error::EventLogError;
use log::{debug, info};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load and check an event log file
///
/// **Public** - main entry point for replay input
///
/// # Errors
/// * `EventLogError::Io` - File cannot be read
/// * `EventLogError::JsonError` - Invalid JSON structure
/// * `EventLogError::UnsupportedVersion` - Incompatible major version
pub fn load_event_log(input_path: impl AsRef<Path>) -> Result<EventLog, EventLogError> {
    let input_path = input_path.as_ref();

    debug!("Reading event log from: {}", input_path.display());

    let file = File::open(input_path)?;
    let log: EventLog = serde_json::from_reader(BufReader::new(file))?;

    check_version(&log.version)?;

    debug!(
        "Event log loaded: version {}, {} methods, {} events",
        log.version,
        log.methods.len(),
        log.events.len()
    );

    Ok(log)
}

/// Only logs with the same major version are accepted
fn check_version(version: &str) -> Result<(), EventLogError> {
    let major = |v: &str| v.split('.').next().map(str::to_owned);
    if major(version) == major(EVENT_LOG_VERSION) {
        Ok(())
    } else {
        Err(EventLogError::UnsupportedVersion(version.to_string()))
    }
}

/// Build the method table of a log
///
/// # Errors
/// * `EventLogError::DuplicateMethod` - Two rows share an id
pub fn method_table(log: &EventLog) -> Result<MethodTable, EventLogError> {
    let mut table = MethodTable::new();
    for method in &log.methods {
        if table.insert(method.id, method.signature.clone()).is_some() {
            return Err(EventLogError::DuplicateMethod(method.id));
        }
    }
    Ok(table)
}

/// Counts of replayed events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub compiled_units: usize,
    pub dynamic_stubs: usize,
}

/// Deliver every event of `log` to `handler`
///
/// **Public** - drives a handler exactly as a host runtime would, on the
/// calling thread
pub fn replay_events(
    log: &EventLog,
    metadata: &dyn MethodResolver,
    handler: &dyn CompilationEventHandler,
) -> ReplaySummary {
    let mut summary = ReplaySummary::default();

    for event in &log.events {
        match event {
            RecordedEvent::DynamicCodeGenerated {
                name,
                address,
                length,
            } => {
                handler.on_dynamic_code(name, *address, *length);
                summary.dynamic_stubs += 1;
            }
            RecordedEvent::CompiledMethodLoad { .. } => {
                if let Some(unit) = event.to_compiled_unit() {
                    handler.on_compiled_unit(metadata, &unit);
                    summary.compiled_units += 1;
                }
            }
        }
    }

    info!(
        "Replayed {} compiled units and {} dynamic stubs",
        summary.compiled_units, summary.dynamic_stubs
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MethodId, MethodSignature};

    fn log_with_methods(ids: &[u64]) -> EventLog {
        EventLog {
            version: EVENT_LOG_VERSION.to_string(),
            pid: None,
            methods: ids
                .iter()
                .map(|&id| RecordedMethod {
                    id: MethodId(id),
                    signature: MethodSignature::new("LFoo;", format!("m{}", id), "()V"),
                })
                .collect(),
            events: vec![],
        }
    }

    #[test]
    fn test_check_version() {
        assert!(check_version("1.0.0").is_ok());
        assert!(check_version("1.4.2").is_ok());
        assert!(check_version("2.0.0").is_err());
    }

    #[test]
    fn test_method_table_rejects_duplicates() {
        assert_eq!(method_table(&log_with_methods(&[1, 2])).unwrap().len(), 2);
        assert!(matches!(
            method_table(&log_with_methods(&[1, 1])),
            Err(EventLogError::DuplicateMethod(MethodId(1)))
        ));
    }
}
