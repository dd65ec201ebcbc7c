// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for indexing, querying and highlighting.
//!
//! Most of these never reach the caller. Indexing failures become a per-document
//! status in the registry, per-document search failures are logged and dropped
//! from multi-document results, and an empty index answers with no results.
//! What's left to propagate are structural failures (dangling postings, a scope
//! that names nothing) and supersession.

use thiserror::Error;

use crate::document::StructureViolation;
use crate::types::DocId;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Query issued before any document was indexed.
    #[error("search index is empty; nothing has been indexed yet")]
    IndexNotReady,

    #[error("document {0} is not indexed")]
    DocumentNotIndexed(DocId),

    /// The last indexing attempt for this document failed; it stays unsearchable
    /// until it is indexed again.
    #[error("indexing document {id} failed: {reason}")]
    IndexingFailed { id: DocId, reason: String },

    #[error("document {id} has invalid structure: {violation}")]
    InvalidStructure {
        id: DocId,
        #[source]
        violation: StructureViolation,
    },

    /// Postings exist for a document the registry doesn't know about.
    #[error("postings reference unregistered document {0}")]
    DanglingPosting(DocId),

    #[error("current-document search requested but no document is current")]
    NoCurrentDocument,

    /// A newer query started while this one was running.
    #[error("query generation {generation} was superseded")]
    Superseded { generation: u64 },

    #[error("content for document {0} is unavailable")]
    ContentUnavailable(DocId),

    #[error("offset {offset} is past the end of document {id}")]
    OffsetOutOfBounds { id: DocId, offset: usize },

    /// One document failed during a multi-document search. Logged, never returned.
    #[error("search failed for document {id}: {source}")]
    PerDocumentSearchFailure {
        id: DocId,
        #[source]
        source: Box<SearchError>,
    },
}

pub type Result<T> = std::result::Result<T, SearchError>;
