// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Turns a parsed document into postings and publishes them.
//!
//! # Pipeline
//!
//! ```text
//! Document ──▶ validate structure ──▶ tokenize ──▶ classify ──▶ publish
//!                     │                   │
//!                     ▼                   ▼
//!               Failed status     size/time budget ──▶ truncated
//! ```
//!
//! Indexing never fails loudly. A bad document ends up with a `Failed` status
//! in the registry and no postings; an oversized one is indexed up to its budget
//! and flagged `truncated`.
//!
//! Writes for one document id are serialized by a per-id writer lock. Writes for
//! different ids run concurrently and only meet at the index's publish step.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::IndexLimits;
use crate::document::Document;
use crate::error::SearchError;
use crate::index::{DocumentPostings, SearchIndex, StructuralEntry};
use crate::registry::{DocumentRegistry, IndexStatus};
use crate::types::DocId;
use crate::utils::Tokens;

/// Tokens between wall-clock checks.
const BUDGET_CHECK_INTERVAL: usize = 1024;

/// Outcome of one `index_document` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexReport {
    pub id: DocId,
    pub status: IndexStatus,
    /// Distinct surface terms published.
    pub terms: usize,
    /// Occurrences published.
    pub postings: usize,
    pub truncated: bool,
    pub elapsed: Duration,
}

pub struct DocumentIndexer {
    index: Arc<SearchIndex>,
    registry: Arc<DocumentRegistry>,
    limits: IndexLimits,
    writers: Mutex<HashMap<DocId, Arc<Mutex<()>>>>,
}

impl DocumentIndexer {
    pub fn new(index: Arc<SearchIndex>, registry: Arc<DocumentRegistry>, limits: IndexLimits) -> Self {
        Self {
            index,
            registry,
            limits,
            writers: Mutex::new(HashMap::new()),
        }
    }

    pub fn limits(&self) -> IndexLimits {
        self.limits
    }

    fn writer(&self, id: DocId) -> Arc<Mutex<()>> {
        Arc::clone(self.writers.lock().entry(id).or_default())
    }

    /// Index (or reindex) a document, replacing any postings it had.
    pub fn index_document(&self, document: &Document) -> IndexReport {
        let start = Instant::now();
        let id = document.id;
        let writer = self.writer(id);
        let _guard = writer.lock();

        let content_len = document.content.chars().count();
        let revision = self.registry.begin(id, &document.title, content_len);
        tracing::debug!(doc = %id, revision, chars = content_len, "indexing document");

        if let Err(violation) = document.structure.validate(content_len) {
            let err = SearchError::InvalidStructure { id, violation };
            tracing::warn!(doc = %id, "{}", err);
            // Stale postings would still be searchable under a failed status
            self.index.remove(id);
            let status = IndexStatus::Failed {
                reason: err.to_string(),
            };
            self.registry.finish(id, status.clone());
            return IndexReport {
                id,
                status,
                terms: 0,
                postings: 0,
                truncated: false,
                elapsed: start.elapsed(),
            };
        }

        let (postings, truncated) = self.build(document, start);
        let terms = postings.term_count();
        let posting_count = postings.posting_count();
        if truncated {
            tracing::warn!(
                doc = %id,
                indexed_tokens = postings.token_count(),
                "document exceeded its indexing budget; index truncated"
            );
        }

        self.index.publish(postings);
        let status = IndexStatus::Ready { truncated };
        self.registry.finish(id, status.clone());

        let elapsed = start.elapsed();
        tracing::debug!(
            doc = %id,
            terms,
            postings = posting_count,
            elapsed_us = elapsed.as_micros() as u64,
            "indexed document"
        );
        IndexReport {
            id,
            status,
            terms,
            postings: posting_count,
            truncated,
            elapsed,
        }
    }

    /// Tokenize and classify. Stops early at the size or time budget.
    fn build(&self, document: &Document, start: Instant) -> (DocumentPostings, bool) {
        let structure = StructuralEntry::from_structure(&document.structure);
        let mut builder = DocumentPostings::builder(document.id, structure);
        let max_chars = self.limits.max_chars.min(u32::MAX as usize);
        let mut truncated = false;

        for (n, token) in Tokens::new(&document.content).enumerate() {
            if token.offset + token.length > max_chars {
                truncated = true;
                break;
            }
            if n % BUDGET_CHECK_INTERVAL == 0 && start.elapsed() >= self.limits.time_budget {
                truncated = true;
                break;
            }
            builder.add(token.text, token.offset, token.length, token.line);
        }

        (builder.finish(truncated), truncated)
    }

    /// Drop a document's postings and its registry entry.
    ///
    /// Postings go first, so no posting outlives its registry entry.
    pub fn remove_document(&self, id: DocId) -> bool {
        let writer = self.writer(id);
        let guard = writer.lock();
        let had_postings = self.index.remove(id).is_some();
        let had_entry = self.registry.remove(id).is_some();
        let removed = had_postings || had_entry;
        {
            // Held only by the map and this call: no other writer is queued on it
            let mut writers = self.writers.lock();
            if Arc::strong_count(&writer) == 2 {
                writers.remove(&id);
            }
        }
        drop(guard);
        if removed {
            tracing::debug!(doc = %id, "removed document");
        }
        removed
    }
}
