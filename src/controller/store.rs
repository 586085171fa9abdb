//! Match storage.
//!
//! Each match sits behind its own mutex, so commands against different
//! matches never contend and commands against the same match run one at a
//! time. The store itself only hands out shared handles.

use std::hash::BuildHasherDefault;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use rustc_hash::FxHasher;

use crate::core::{EngineError, EngineResult, Match, MatchId};

/// Shared, individually locked match.
pub type SharedMatch = Arc<Mutex<Match>>;

/// Storage for live matches, supplied by the caller.
pub trait MatchStore: Send + Sync {
    /// Reserve a fresh match id.
    fn next_id(&self) -> MatchId;

    /// Store a match, replacing any match with the same id.
    fn insert(&self, m: Match) -> SharedMatch;

    /// Store a match only if its id is free. Check and insert are one
    /// atomic step.
    fn insert_new(&self, m: Match) -> EngineResult<SharedMatch>;

    /// Get a handle to a stored match.
    fn get(&self, id: MatchId) -> Option<SharedMatch>;

    /// Remove a match, returning its handle.
    fn remove(&self, id: MatchId) -> Option<SharedMatch>;

    /// Number of stored matches.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-process store backed by a concurrent map.
pub struct InMemoryMatchStore {
    matches: DashMap<MatchId, SharedMatch, BuildHasherDefault<FxHasher>>,
    next_id: AtomicU64,
}

impl InMemoryMatchStore {
    /// Create an empty store. Ids start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            matches: DashMap::with_hasher(BuildHasherDefault::default()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Keep later ids clear of a restored one.
    fn reserve_past(&self, id: MatchId) {
        self.next_id.fetch_max(id.0.saturating_add(1), Ordering::Relaxed);
    }

    /// Ids of every stored match, in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<MatchId> {
        let mut ids: Vec<MatchId> = self.matches.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for InMemoryMatchStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchStore for InMemoryMatchStore {
    fn next_id(&self) -> MatchId {
        MatchId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn insert(&self, m: Match) -> SharedMatch {
        let id = m.id;
        self.reserve_past(id);
        let shared = Arc::new(Mutex::new(m));
        self.matches.insert(id, Arc::clone(&shared));
        shared
    }

    fn insert_new(&self, m: Match) -> EngineResult<SharedMatch> {
        let id = m.id;
        match self.matches.entry(id) {
            Entry::Occupied(_) => Err(EngineError::MatchExists(id)),
            Entry::Vacant(slot) => {
                self.reserve_past(id);
                let shared = Arc::new(Mutex::new(m));
                slot.insert(Arc::clone(&shared));
                Ok(shared)
            }
        }
    }

    fn get(&self, id: MatchId) -> Option<SharedMatch> {
        self.matches.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    fn remove(&self, id: MatchId) -> Option<SharedMatch> {
        self.matches.remove(&id).map(|(_, shared)| shared)
    }

    fn len(&self) -> usize {
        self.matches.len()
    }
}
