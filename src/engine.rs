// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The engine as the rest of the application sees it.
//!
//! `SearchEngine` owns one of each component and wires them together:
//!
//! ```text
//!                 ┌──────────────┐   publish   ┌─────────────┐
//! Document ──────▶│   Indexer    │────────────▶│ SearchIndex │◀──┐
//!     │           └──────┬───────┘             └─────────────┘   │ snapshot
//!     │                  │ status                                │
//!     │           ┌──────▼───────┐                        ┌──────┴───────┐
//!     │           │   Registry   │◀───────────────────────│QueryProcessor│──▶ results
//!     │           └──────────────┘        validate        └──────────────┘
//!     │ set       ┌──────────────┐   get / fill on miss   ┌──────────────┐
//!     └──────────▶│DocumentCache │◀───────────────────────│ Highlighter  │──▶ snippets
//!                 └──────────────┘                        └──────────────┘
//! ```
//!
//! Nothing here is global. Build as many engines as you like; each one is
//! independent.

use serde::Serialize;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::cache::{CacheStats, DocumentCache};
use crate::config::EngineConfig;
use crate::document::{Document, DocumentSource, OpenDocuments};
use crate::error::{Result, SearchError};
use crate::highlight::{LazySnippet, ResultHighlighter, Snippet};
use crate::history::PerformanceHistory;
use crate::index::{IndexStats, SearchIndex};
use crate::indexer::{DocumentIndexer, IndexReport};
use crate::registry::DocumentRegistry;
use crate::search::{QueryGenerations, QueryProcessor, QueryToken};
use crate::types::{DocId, SearchOptions, SearchResult, SearchScope};

/// Operation name recorded in the performance history.
pub const INDEX_OPERATION: &str = "index";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    pub index: IndexStats,
    pub cache: CacheStats,
    pub registered: usize,
    pub cached_snippets: usize,
}

pub struct SearchEngine {
    config: EngineConfig,
    index: Arc<SearchIndex>,
    registry: Arc<DocumentRegistry>,
    cache: Arc<DocumentCache>,
    history: Arc<PerformanceHistory>,
    indexer: DocumentIndexer,
    processor: QueryProcessor,
    highlighter: ResultHighlighter,
    generations: QueryGenerations,
}

impl SearchEngine {
    /// Build an engine. `source` supplies content the cache no longer holds.
    pub fn new(config: EngineConfig, source: Arc<dyn DocumentSource>) -> Self {
        let config = config.sanitized();
        let index = Arc::new(SearchIndex::new());
        let registry = Arc::new(DocumentRegistry::new());
        let cache = Arc::new(DocumentCache::new(config.cache_capacity));
        let history = Arc::new(PerformanceHistory::new(config.history_capacity));

        let indexer = DocumentIndexer::new(
            Arc::clone(&index),
            Arc::clone(&registry),
            config.index_limits(),
        );
        let processor = QueryProcessor::new(
            Arc::clone(&index),
            Arc::clone(&registry),
            Arc::clone(&history),
            &config,
        );
        let highlighter =
            ResultHighlighter::new(Arc::clone(&cache), source, config.snippet_cache_capacity);

        Self {
            config,
            index,
            registry,
            cache,
            history,
            indexer,
            processor,
            highlighter,
            generations: QueryGenerations::new(),
        }
    }

    // =========================================================================
    // INDEXING
    // =========================================================================

    /// Index or reindex one document.
    ///
    /// On success the document also goes into the content cache. Snippets
    /// computed from its previous content are dropped either way.
    pub fn index_document(&self, document: Document) -> IndexReport {
        let id = document.id;
        let report = self
            .history
            .time(INDEX_OPERATION, || self.indexer.index_document(&document));
        if report.status.is_ready() {
            self.cache.set(id, Arc::new(document));
        } else {
            self.cache.remove(id);
        }
        self.highlighter.invalidate(id);
        report
    }

    /// Index a batch, in parallel with the `parallel` feature. Reports come
    /// back in input order.
    pub fn index_documents(&self, documents: Vec<Document>) -> Vec<IndexReport> {
        #[cfg(feature = "parallel")]
        let reports = documents
            .into_par_iter()
            .map(|document| self.index_document(document))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let reports = documents
            .into_iter()
            .map(|document| self.index_document(document))
            .collect();
        reports
    }

    /// Forget a document: postings, registry entry, cached content, snippets.
    pub fn remove_document(&self, id: DocId) -> bool {
        let removed = self.indexer.remove_document(id);
        self.cache.remove(id);
        self.highlighter.invalidate(id);
        removed
    }

    // =========================================================================
    // SEARCH
    // =========================================================================

    /// Start a query, superseding any query still in flight.
    pub fn begin_query(&self) -> QueryToken {
        self.generations.begin()
    }

    /// Run a query as the newest one.
    pub fn search(
        &self,
        query: &str,
        options: &SearchOptions,
        tabs: &dyn OpenDocuments,
    ) -> Result<Vec<SearchResult>> {
        let token = self.begin_query();
        self.search_with(query, options, tabs, &token)
    }

    /// Run a query under a token from [`begin_query`](Self::begin_query).
    ///
    /// Returns `Err(Superseded)` if another query began before this one finished.
    pub fn search_with(
        &self,
        query: &str,
        options: &SearchOptions,
        tabs: &dyn OpenDocuments,
        token: &QueryToken,
    ) -> Result<Vec<SearchResult>> {
        let options = options.sanitized(&self.config);
        let outcome = match options.scope {
            SearchScope::CurrentDocument => {
                let id = tabs.current().ok_or(SearchError::NoCurrentDocument)?;
                self.processor.search_document(query, id, &options, token)
            }
            SearchScope::AllOpenDocuments => {
                let open = tabs.open_documents();
                self.processor.search_documents(query, &open, &options, token)
            }
        };
        if let Err(SearchError::Superseded { generation }) = &outcome {
            tracing::debug!(generation, query, "query superseded; results dropped");
        }
        outcome
    }

    /// Lazy snippet accessor for a result, sized by `options.context_length`.
    pub fn highlight(&self, result: &SearchResult, options: &SearchOptions) -> LazySnippet<'_> {
        let options = options.sanitized(&self.config);
        self.highlighter.highlight(result, options.context_chars())
    }

    /// The snippet for a result, or `None` when the options ask for no context.
    pub fn snippet(
        &self,
        result: &SearchResult,
        options: &SearchOptions,
    ) -> Result<Option<Arc<Snippet>>> {
        if !options.include_context {
            return Ok(None);
        }
        self.highlight(result, options).get().map(Some)
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn registry(&self) -> &DocumentRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    pub fn history(&self) -> &PerformanceHistory {
        &self.history
    }

    pub fn processor(&self) -> &QueryProcessor {
        &self.processor
    }

    pub fn highlighter(&self) -> &ResultHighlighter {
        &self.highlighter
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            index: self.index.stats(),
            cache: self.cache.stats(),
            registered: self.registry.len(),
            cached_snippets: self.highlighter.cached_snippets(),
        }
    }
}
