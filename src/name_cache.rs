//! Artist id → display name lookup.
//!
//! Populated from search hits and song credits, consulted when an artist is
//! opened by id so the last-resort name search has something to go on.
//! Entries expire after a TTL (checked on read); when the map grows past its
//! capacity the oldest 20% of entries are dropped.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::debug;

/// Default time-to-live for a cached name.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Default maximum number of entries.
pub const DEFAULT_CAPACITY: usize = 1000;

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    inserted: Instant,
    /// Insertion order, used to find the oldest entries
    seq: u64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    next_seq: u64,
}

/// Bounded, thread-safe name cache.
#[derive(Debug)]
pub struct ArtistNameCache {
    inner: RwLock<Inner>,
    ttl: Duration,
    capacity: usize,
}

impl ArtistNameCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Name for `artist_id`, unless missing or expired.
    pub fn get(&self, artist_id: &str) -> Option<String> {
        self.get_at(artist_id, Instant::now())
    }

    /// Remember `name` for `artist_id`. Blank ids or names are ignored.
    pub fn insert(&self, artist_id: &str, name: &str) {
        self.insert_at(artist_id, name, Instant::now());
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_at(&self, artist_id: &str, now: Instant) -> Option<String> {
        {
            let inner = self.inner.read();
            let entry = inner.entries.get(artist_id)?;
            if now.saturating_duration_since(entry.inserted) < self.ttl {
                return Some(entry.name.clone());
            }
        }

        // Expired: drop it so the map doesn't fill with stale names
        let mut inner = self.inner.write();
        if inner
            .entries
            .get(artist_id)
            .is_some_and(|e| now.saturating_duration_since(e.inserted) >= self.ttl)
        {
            inner.entries.remove(artist_id);
        }
        None
    }

    fn insert_at(&self, artist_id: &str, name: &str, now: Instant) {
        let (artist_id, name) = (artist_id.trim(), name.trim());
        if artist_id.is_empty() || name.is_empty() {
            return;
        }

        let mut inner = self.inner.write();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.entries.insert(
            artist_id.to_string(),
            Entry {
                name: name.to_string(),
                inserted: now,
                seq,
            },
        );

        if inner.entries.len() > self.capacity {
            evict_oldest(&mut inner, self.capacity);
        }
    }
}

impl Default for ArtistNameCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}

/// Drop the oldest fifth of the entries (at least one).
fn evict_oldest(inner: &mut Inner, capacity: usize) {
    let drop_count = (capacity / 5).max(1);
    let mut by_age: Vec<(u64, String)> = inner
        .entries
        .iter()
        .map(|(id, entry)| (entry.seq, id.clone()))
        .collect();
    by_age.sort_unstable();

    for (_, id) in by_age.into_iter().take(drop_count) {
        inner.entries.remove(&id);
    }
    debug!(
        "Name cache evicted {} entries, {} remain",
        drop_count,
        inner.entries.len()
    );
}
