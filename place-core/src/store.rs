//! # Gazetteer store
//!
//! Two read interfaces the rest of the engine treats as opaque:
//! `place(id)` and `word(w)`. [`InMemoryStore`] holds both indices
//! directly (the common case, built once by [`crate::loader`]).
//! [`CachedStore`] wraps an arbitrary [`Backend`] — typically something
//! backed by a remote key-value or SQL store — with size- and time-bounded
//! caches, so a real network-backed deployment gets the same trait object
//! the in-memory tests use.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use crate::model::Place;

/// Read-only lookups the resolver needs. Implemented by [`InMemoryStore`]
/// and [`CachedStore`].
pub trait GazetteerStore: Send + Sync {
    /// Looks up a place by id. Absent is a logged anomaly, not fatal
    /// (`spec.md` §4.1) — implementations must not panic on a missing id.
    fn place(&self, id: i64) -> Option<Place>;

    /// Looks up the ids of places whose name or any alt-name contains
    /// `word`. Absent means no place contains that word.
    fn word(&self, word: &str) -> Option<Vec<i64>>;
}

/// Both indices held in memory; lookups are direct.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    places: HashMap<i64, Place>,
    words: HashMap<String, Vec<i64>>,
}

impl InMemoryStore {
    pub fn from_places(places: Vec<Place>, words: HashMap<String, Vec<i64>>) -> Self {
        let places = places.into_iter().map(|p| (p.id, p)).collect();
        Self { places, words }
    }
}

impl GazetteerStore for InMemoryStore {
    fn place(&self, id: i64) -> Option<Place> {
        self.places.get(&id).cloned()
    }

    fn word(&self, word: &str) -> Option<Vec<i64>> {
        self.words.get(word).cloned()
    }
}

/// Maximum resident entries per cache (`spec.md` §4.1).
pub const PLACE_CACHE_MAX_SIZE: u64 = 50_000;
pub const WORD_CACHE_MAX_SIZE: u64 = 50_000;
/// Entry time-to-live after write (`spec.md` §4.1).
pub const CACHE_TTL: Duration = Duration::from_secs(3600);

/// One round trip to a remote backend. A failed lookup logs and returns
/// `None` via the caller (see [`CachedStore`]) — it never bubbles up as an
/// error, matching `spec.md` §7's "backing store I/O failure" category.
pub trait Backend: Send + Sync {
    fn load_place(&self, id: i64) -> Result<Option<Place>, String>;
    fn load_word(&self, word: &str) -> Result<Option<Vec<i64>>, String>;
}

/// Wraps a [`Backend`] with size- and time-bounded caches. Concurrent
/// readers share the cache safely; concurrent misses for the same key may
/// each issue a backend load (duplicate work is acceptable, not required
/// to coalesce, per `spec.md` §5).
pub struct CachedStore<B: Backend> {
    backend: Arc<B>,
    places: Cache<i64, Option<Place>>,
    words: Cache<String, Option<Vec<i64>>>,
}

impl<B: Backend> CachedStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
            places: Cache::builder()
                .max_capacity(PLACE_CACHE_MAX_SIZE)
                .time_to_live(CACHE_TTL)
                .build(),
            words: Cache::builder()
                .max_capacity(WORD_CACHE_MAX_SIZE)
                .time_to_live(CACHE_TTL)
                .build(),
        }
    }
}

impl<B: Backend> GazetteerStore for CachedStore<B> {
    fn place(&self, id: i64) -> Option<Place> {
        if let Some(hit) = self.places.get(&id) {
            return hit;
        }
        let loaded = match self.backend.load_place(id) {
            Ok(v) => v,
            Err(cause) => {
                tracing::warn!(id, cause = %cause, "place backend load failed");
                None
            }
        };
        self.places.insert(id, loaded.clone());
        loaded
    }

    fn word(&self, word: &str) -> Option<Vec<i64>> {
        if let Some(hit) = self.words.get(word) {
            return hit;
        }
        let loaded = match self.backend.load_word(word) {
            Ok(v) => v,
            Err(cause) => {
                tracing::warn!(word, cause = %cause, "word backend load failed");
                None
            }
        };
        self.words.insert(word.to_string(), loaded.clone());
        loaded
    }
}
