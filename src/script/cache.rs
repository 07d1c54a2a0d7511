//! Bounded parse cache keyed by the content hash of the script text.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::ParseError;
use super::ast::ScriptTree;
use super::parser::parse_script;

/// Capacity used when the configuration does not name one.
pub const DEFAULT_CACHE_CAPACITY: usize = 16;

type Entry = Result<Arc<ScriptTree>, ParseError>;

/// Parsed scripts and parse failures, shared across invocations.
///
/// Entries are immutable once inserted, so callers holding an `Arc` are never
/// affected by later evictions. A capacity of zero disables caching.
#[derive(Debug)]
pub struct ParseCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<blake3::Hash, Entry>,
    order: VecDeque<blake3::Hash>,
}

impl ParseCache {
    /// Create a cache holding at most `capacity` scripts.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Return the parse result for `text`, parsing it on a miss.
    pub fn get_or_parse(&self, text: &str) -> Entry {
        let key = blake3::hash(text.as_bytes());
        if let Some(entry) = self.inner.lock().entries.get(&key) {
            debug!(key = %key.to_hex(), "parse cache hit");
            return entry.clone();
        }

        debug!(key = %key.to_hex(), "parse cache miss");
        let entry = parse_script(text).map(Arc::new);
        if self.capacity == 0 {
            return entry;
        }

        let mut inner = self.inner.lock();
        if !inner.entries.contains_key(&key) {
            while inner.order.len() >= self.capacity {
                if let Some(oldest) = inner.order.pop_front() {
                    inner.entries.remove(&oldest);
                }
            }
            inner.order.push_back(key);
            inner.entries.insert(key, entry.clone());
        }
        entry
    }

    /// Number of cached scripts.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }
}

impl Default for ParseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
