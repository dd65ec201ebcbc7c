//! In-memory full-text search over open documents.
//!
//! The engine indexes parsed documents into an inverted index plus a
//! structural index (headings, code blocks, links), answers ranked queries with
//! exact, fuzzy and structural matches, and computes highlighted snippets only
//! when a result is actually shown.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ document.rs │────▶│  indexer.rs  │────▶│   index.rs   │
//! │ (Document,  │     │ (tokenize,   │     │ (postings,   │
//! │  Structure) │     │  classify)   │     │  structure)  │
//! └─────────────┘     └──────┬───────┘     └──────┬───────┘
//!                            │                    │
//!                            ▼                    ▼
//!                     ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//!                     │ registry.rs  │────▶│  search/     │────▶│ highlight.rs │
//!                     │ (DocumentRef,│     │ (exact/fuzzy,│     │ (lazy        │
//!                     │  status)     │     │  rank)       │     │  snippets)   │
//!                     └──────────────┘     └──────────────┘     └──────┬───────┘
//!                                                                      │
//!                                                               ┌──────▼───────┐
//!                                                               │   cache.rs   │
//!                                                               │ (LRU content)│
//!                                                               └──────────────┘
//! ```
//!
//! | Module      | Role                                             |
//! |-------------|--------------------------------------------------|
//! | `utils`     | Case folding, tokenizer, folded substring search |
//! | `fuzzy`     | Edit distance and approximate term matching      |
//! | `scoring`   | Occurrence scores and result ordering            |
//! | `index`     | Swap-on-write inverted and structural index      |
//! | `indexer`   | Document → postings, budgets, status             |
//! | `search`    | Query processor and query supersession           |
//! | `highlight` | Snippet computation with its own FIFO cache      |
//! | `cache`     | Bounded LRU of document content                  |
//! | `history`   | Bounded timing samples per operation             |
//! | `engine`    | Everything above, wired together                 |
//!
//! # Usage
//!
//! ```ignore
//! use quire::{EngineConfig, SearchEngine, SearchOptions, TabSet};
//!
//! let engine = SearchEngine::new(EngineConfig::default(), source);
//! engine.index_document(document);
//!
//! let tabs = TabSet::new(Some(document_id), vec![document_id]);
//! let results = engine.search("setup", &SearchOptions::default(), &tabs)?;
//! let snippet = engine.highlight(&results[0], &SearchOptions::default()).get()?;
//! ```

// Module declarations
pub mod cache;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod fuzzy;
pub mod highlight;
pub mod history;
pub mod index;
pub mod indexer;
pub mod registry;
pub mod scoring;
pub mod search;
pub mod testing;
mod types;
pub mod utils;

// Re-exports for public API
pub use cache::{CacheStats, DocumentCache};
pub use config::{EngineConfig, IndexLimits, DEFAULT_FUZZY_THRESHOLD, DEFAULT_FUZZY_TRIGGER};
pub use document::{
    Document, DocumentSource, HeadingRange, OpenDocuments, Span, Structure, StructureViolation,
    TabSet,
};
pub use engine::{EngineStats, SearchEngine, INDEX_OPERATION};
pub use error::{Result, SearchError};
pub use fuzzy::{
    edit_distance, levenshtein_within, similarity, FuzzyMatch, FuzzyMatcher,
};
pub use highlight::{LazySnippet, ResultHighlighter, Snippet};
pub use history::{PerformanceHistory, TimingSummary};
pub use index::{DocumentPostings, IndexStats, SearchIndex, StructuralEntry};
pub use indexer::{DocumentIndexer, IndexReport};
pub use registry::{DocumentRef, DocumentRegistry, IndexStatus};
pub use scoring::{occurrence_score, EXACT_BASE_SCORE, HEADING_BONUS, STRUCTURAL_BONUS};
pub use search::{QueryGenerations, QueryProcessor, QueryToken, SEARCH_OPERATION};
pub use types::{
    DocId, ElementType, MatchType, Position, SearchOptions, SearchResult, SearchScope,
};
pub use utils::{fold, query_terms};
