//! Record sink trait and the in-memory sink

use crate::records::Record;
use crate::storage::StorageError;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for emitted records
///
/// The coordinator owns its sinks and calls them from a single task, so
/// implementations need no internal synchronization.
pub trait RecordSink {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Persists or forwards one record
    fn emit(&mut self, record: &Record) -> OutputResult<()>;

    /// Flushes buffered output at the end of a run
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

/// Collects records in memory behind a shared handle
///
/// ```
/// use game_crawler::output::{MemorySink, RecordSink};
///
/// let sink = MemorySink::new();
/// let handle = sink.handle();
/// let boxed: Box<dyn RecordSink + Send> = Box::new(sink);
/// assert_eq!(boxed.name(), "memory");
/// assert!(handle.lock().unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<Record>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the collected records
    pub fn handle(&self) -> Arc<Mutex<Vec<Record>>> {
        Arc::clone(&self.records)
    }
}

impl RecordSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn emit(&mut self, record: &Record) -> OutputResult<()> {
        self.records
            .lock()
            .map_err(|_| OutputError::Write("memory sink lock poisoned".to_string()))?
            .push(record.clone());
        Ok(())
    }
}
