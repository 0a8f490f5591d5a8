//! Logging capability handed to each component at construction
//!
//! Components never reach for a global logger themselves. They receive an
//! [`AuditSink`] and emit one record per operation through it. The binary
//! wires in [`LogSink`], which forwards to the `log` facade; tests use
//! [`MemorySink`] to inspect what was recorded.

use log::Level;
use std::sync::{Arc, Mutex};

pub trait AuditSink {
    fn record(&self, level: Level, message: &str);
}

impl<T: AuditSink + ?Sized> AuditSink for &T {
    fn record(&self, level: Level, message: &str) {
        (**self).record(level, message)
    }
}

impl<T: AuditSink + ?Sized> AuditSink for Arc<T> {
    fn record(&self, level: Level, message: &str) {
        (**self).record(level, message)
    }
}

/// Forwards records to whatever logger the host installed
#[derive(Debug, Clone)]
pub struct LogSink {
    target: &'static str,
}

impl LogSink {
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new("toolbelt")
    }
}

impl AuditSink for LogSink {
    fn record(&self, level: Level, message: &str) {
        log::log!(target: self.target, level, "{}", message);
    }
}

/// Keeps every record in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(Level, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(Level, String)> {
        self.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|(_, m)| m.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Level, String)>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AuditSink for MemorySink {
    fn record(&self, level: Level, message: &str) {
        self.lock().push((level, message.to_string()));
    }
}
