use std::collections::HashSet;
use std::sync::Mutex;

/// Set of keys already handed to a frontier
///
/// Shared by all workers of a stage. The membership test and the insert
/// happen under one lock, so two workers can never both see a key as new.
#[derive(Debug, Default)]
pub struct DedupStore {
    seen: Mutex<HashSet<String>>,
}

impl DedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as seen
    ///
    /// Returns true if the key was not seen before.
    pub fn seen_and_mark(&self, key: &str) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());
        if seen.contains(key) {
            return false;
        }
        seen.insert(key.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
