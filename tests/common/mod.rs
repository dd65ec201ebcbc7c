//! Shared test utilities and fixtures.

#![allow(dead_code)]

use quire::{
    DocId, Document, EngineConfig, SearchEngine, SearchOptions, SearchResult, SearchScope, TabSet,
};
use std::sync::Arc;

// Re-export canonical test utilities from quire::testing
pub use quire::testing::{
    make_document, make_outlined_document, outline, MemorySource, SETUP_CONTENT,
};

// ============================================================================
// ENGINE FIXTURES
// ============================================================================

/// An engine plus the source it reloads evicted content from.
pub struct Fixture {
    pub engine: SearchEngine,
    pub source: Arc<MemorySource>,
}

impl Fixture {
    /// Index a document and register its content with the source.
    pub fn add(&self, document: Document) {
        self.source.insert(document.clone());
        let report = self.engine.index_document(document);
        assert!(report.status.is_ready(), "indexing failed: {:?}", report.status);
    }

    /// Search every indexed document.
    pub fn search_all(&self, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
        let options = SearchOptions {
            scope: SearchScope::AllOpenDocuments,
            ..options.clone()
        };
        let tabs = TabSet::new(None, self.engine.index().document_ids());
        self.engine.search(query, &options, &tabs).unwrap()
    }

    /// Search a single document as the current one.
    pub fn search_one(&self, query: &str, id: u32, options: &SearchOptions) -> Vec<SearchResult> {
        let options = SearchOptions {
            scope: SearchScope::CurrentDocument,
            ..options.clone()
        };
        let tabs = TabSet::new(Some(DocId(id)), vec![DocId(id)]);
        self.engine.search(query, &options, &tabs).unwrap()
    }
}

pub fn fixture() -> Fixture {
    fixture_with(EngineConfig::default())
}

pub fn fixture_with(config: EngineConfig) -> Fixture {
    let source = Arc::new(MemorySource::default());
    let engine = SearchEngine::new(config, source.clone());
    Fixture { engine, source }
}

/// Options with `whole_words` set, everything else default.
pub fn whole_words() -> SearchOptions {
    SearchOptions {
        whole_words: true,
        ..SearchOptions::default()
    }
}

/// Offsets of results, in rank order.
pub fn offsets(results: &[SearchResult]) -> Vec<u32> {
    results.iter().map(|r| r.position.global_offset).collect()
}

/// The text each result covers in `content`.
pub fn matched_text(content: &str, result: &SearchResult) -> String {
    content
        .chars()
        .skip(result.position.global_offset as usize)
        .take(result.position.length as usize)
        .collect()
}
