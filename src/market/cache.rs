//! TTL cache for market data query results.
//!
//! An explicit, injectable component rather than process-wide state, with a
//! pluggable clock so tests can control expiry.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Time source for cache expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Thread-safe key/value cache with a single TTL.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
    clock: Box<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Box::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Box<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(key)?;
        if self.clock.now().duration_since(entry.inserted_at) > self.ttl {
            None
        } else {
            Some(entry.value.clone())
        }
    }

    pub fn insert(&self, key: impl Into<String>, value: V) {
        if let Ok(mut entries) = self.entries.write() {
            // Opportunistic cleanup keeps the map bounded across query
            // families.
            let now = self.clock.now();
            let ttl = self.ttl;
            entries.retain(|_, e| now.duration_since(e.inserted_at) <= ttl);
            entries.insert(
                key.into(),
                CacheEntry {
                    value,
                    inserted_at: now,
                },
            );
        }
    }

    pub fn invalidate(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
