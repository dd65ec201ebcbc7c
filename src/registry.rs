// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Lightweight registry of indexed documents.
//!
//! One small entry per document (id, title, size, timestamps, status) and no
//! content. The registry is unbounded in count. Every posting's document id
//! must have an entry here, which the query processor checks before trusting
//! a document's postings.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;

use crate::types::DocId;

/// Where a document is in its indexing lifecycle.
///
/// ```text
/// Unindexed ──▶ Indexing ──▶ Ready
///                  │           │ ▲
///                  ▼           ▼ │
///               Failed ◀── Reindexing
/// ```
///
/// `Removed` isn't a status: removal deletes the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum IndexStatus {
    Indexing,
    Reindexing,
    Ready { truncated: bool },
    Failed { reason: String },
}

impl IndexStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, IndexStatus::Ready { .. })
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, IndexStatus::Ready { truncated: true })
    }

    pub fn label(&self) -> &'static str {
        match self {
            IndexStatus::Indexing => "indexing",
            IndexStatus::Reindexing => "reindexing",
            IndexStatus::Ready { truncated: false } => "ready",
            IndexStatus::Ready { truncated: true } => "truncated",
            IndexStatus::Failed { .. } => "failed",
        }
    }
}

/// Metadata for one document. Holds no content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    pub id: DocId,
    pub title: String,
    /// Content length in characters.
    pub size: usize,
    pub indexed_at: DateTime<Utc>,
    pub status: IndexStatus,
    /// Bumped on every indexing attempt.
    pub revision: u64,
}

#[derive(Debug, Default)]
pub struct DocumentRegistry {
    entries: RwLock<HashMap<DocId, DocumentRef>>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a document as being (re)indexed and return its new revision.
    ///
    /// A document that was already known moves to `Reindexing`; its previous
    /// postings stay searchable until the new ones are published.
    pub fn begin(&self, id: DocId, title: &str, size: usize) -> u64 {
        let mut entries = self.entries.write();
        let now = Utc::now();
        match entries.get_mut(&id) {
            Some(entry) => {
                entry.title = title.to_string();
                entry.size = size;
                entry.status = IndexStatus::Reindexing;
                entry.revision += 1;
                entry.revision
            }
            None => {
                entries.insert(
                    id,
                    DocumentRef {
                        id,
                        title: title.to_string(),
                        size,
                        indexed_at: now,
                        status: IndexStatus::Indexing,
                        revision: 1,
                    },
                );
                1
            }
        }
    }

    /// Record the outcome of an indexing attempt.
    pub fn finish(&self, id: DocId, status: IndexStatus) {
        if let Some(entry) = self.entries.write().get_mut(&id) {
            if status.is_ready() {
                entry.indexed_at = Utc::now();
            }
            entry.status = status;
        }
    }

    pub fn remove(&self, id: DocId) -> Option<DocumentRef> {
        self.entries.write().remove(&id)
    }

    pub fn get(&self, id: DocId) -> Option<DocumentRef> {
        self.entries.read().get(&id).cloned()
    }

    pub fn status(&self, id: DocId) -> Option<IndexStatus> {
        self.entries.read().get(&id).map(|entry| entry.status.clone())
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.entries.read().contains_key(&id)
    }

    /// All entries, ordered by id.
    pub fn list(&self) -> Vec<DocumentRef> {
        let mut entries: Vec<DocumentRef> = self.entries.read().values().cloned().collect();
        entries.sort_by_key(|entry| entry.id);
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
