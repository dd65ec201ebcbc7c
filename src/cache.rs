// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Bounded LRU cache of full document content.
//!
//! The index only ever stores document ids. Full text lives here, at most
//! `capacity` documents at a time, and is re-fetched from the document source
//! after eviction. Evicting a document never touches its postings.
//!
//! All operations take one mutex around an `lru::LruCache` (hash map plus
//! recency list), so get and set are O(1).

use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::document::{Document, DocumentSource};
use crate::types::DocId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub len: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

pub struct DocumentCache {
    entries: Mutex<LruCache<DocId, Arc<Document>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl DocumentCache {
    /// A cache holding at most `capacity` documents (a zero capacity holds one).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a document, marking it most recently used on a hit.
    pub fn get(&self, id: DocId) -> Option<Arc<Document>> {
        let found = self.entries.lock().get(&id).cloned();
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Insert or replace a document as most recently used.
    ///
    /// Returns the id evicted to make room, if any.
    pub fn set(&self, id: DocId, document: Arc<Document>) -> Option<DocId> {
        let evicted = self.entries.lock().push(id, document);
        match evicted {
            // push hands back the old value when the key was already present
            Some((old, _)) if old != id => {
                tracing::trace!(evicted = %old, inserted = %id, "document cache eviction");
                Some(old)
            }
            _ => None,
        }
    }

    /// Cached document, or fill from `source` on a miss.
    pub fn get_or_load(&self, id: DocId, source: &dyn DocumentSource) -> Option<Arc<Document>> {
        if let Some(document) = self.get(id) {
            return Some(document);
        }
        let document = source.load(id)?;
        self.set(id, Arc::clone(&document));
        Some(document)
    }

    pub fn remove(&self, id: DocId) -> Option<Arc<Document>> {
        self.entries.lock().pop(&id)
    }

    /// Whether `document` is still the cached content for `id`. Leaves recency alone.
    pub fn is_current(&self, id: DocId, document: &Arc<Document>) -> bool {
        self.entries
            .lock()
            .peek(&id)
            .is_some_and(|cached| Arc::ptr_eq(cached, document))
    }

    /// Membership check that leaves recency alone.
    pub fn contains(&self, id: DocId) -> bool {
        self.entries.lock().contains(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    /// Cached ids from most to least recently used.
    pub fn ids(&self) -> Vec<DocId> {
        self.entries.lock().iter().map(|(id, _)| *id).collect()
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock();
        CacheStats {
            len: entries.len(),
            capacity: entries.cap().get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl std::fmt::Debug for DocumentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentCache")
            .field("stats", &self.stats())
            .finish()
    }
}
