//! In-memory key-value store
//!
//! Every call except the size helpers emits exactly one record through the
//! injected [`AuditSink`].

use crate::audit::AuditSink;
use log::Level;
use std::collections::BTreeMap;

/// Returned by [`KeyValueStore::get`] for absent keys
pub const NOT_FOUND: &str = "Key not found";

#[derive(Debug)]
pub struct KeyValueStore<S: AuditSink> {
    data: BTreeMap<String, String>,
    sink: S,
}

impl<S: AuditSink> KeyValueStore<S> {
    pub fn new(sink: S) -> Self {
        sink.record(Level::Info, "KeyValueStore initialized");
        Self {
            data: BTreeMap::new(),
            sink,
        }
    }

    /// Insert or overwrite the value for `key`
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.sink
            .record(Level::Info, &format!("Added/Updated key: {}", key));
        self.data.insert(key, value.into());
    }

    /// Value for `key`, or [`NOT_FOUND`]
    pub fn get(&self, key: &str) -> &str {
        self.sink
            .record(Level::Info, &format!("Retrieved key: {}", key));
        self.data.get(key).map(String::as_str).unwrap_or(NOT_FOUND)
    }

    pub fn delete(&mut self, key: &str) {
        if self.data.remove(key).is_some() {
            self.sink
                .record(Level::Info, &format!("Deleted key: {}", key));
        } else {
            self.sink
                .record(Level::Debug, &format!("Delete ignored, no key: {}", key));
        }
    }

    /// Snapshot of all entries, ordered by key
    pub fn list(&self) -> BTreeMap<String, String> {
        self.sink.record(Level::Info, "Listed all data");
        self.data.clone()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
