// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query execution: where the rubber meets the road.
//!
//! Per document, a query runs through the same steps:
//!
//! ```text
//! query ──▶ terms ──▶ exact postings ──┬──▶ filter ──▶ score ──▶ rank ──▶ truncate
//!                          │           │
//!                          ▼           │
//!                 sparse? fuzzy terms ─┘
//! ```
//!
//! 1. Normalize and split the query into distinct terms.
//! 2. Exact postings per term: whole tokens, or (without `whole_words`) the term
//!    inside larger tokens too.
//! 3. A term with fewer exact occurrences than the fuzzy trigger also pulls in
//!    vocabulary terms within the similarity threshold.
//! 4. `headings_only` drops non-heading occurrences.
//! 5. Every surviving occurrence becomes one scored result.
//! 6. Rank, then truncate to `max_results`.
//!
//! A multi-term query that spells out a heading also yields one structural
//! result for that heading.
//!
//! Multi-document search repeats this per document (in parallel with the
//! `parallel` feature) and merges. A document that fails is logged and left out.
//!
//! Results carry positions and scores only. Snippets are the highlighter's job.

mod supersede;

pub use supersede::{QueryGenerations, QueryToken};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::{Result, SearchError};
use crate::fuzzy::FuzzyMatcher;
use crate::history::PerformanceHistory;
use crate::index::{DocumentPostings, SearchIndex};
use crate::registry::{DocumentRegistry, IndexStatus};
use crate::scoring::occurrence_score;
use crate::scoring::ranking::rank;
use crate::types::{DocId, ElementType, MatchType, Position, SearchOptions, SearchResult};
use crate::utils::{normalize_term, query_terms, Tokens};

/// Operation name recorded in the performance history.
pub const SEARCH_OPERATION: &str = "search";

/// A query split two ways: distinct terms for postings lookup, and the full
/// token sequence for matching against heading text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PreparedQuery {
    terms: Vec<String>,
    phrase: Vec<String>,
}

impl PreparedQuery {
    fn new(query: &str, case_sensitive: bool) -> Option<Self> {
        let terms = query_terms(query, case_sensitive);
        if terms.is_empty() {
            return None;
        }
        let phrase = Tokens::new(query)
            .map(|token| normalize_term(token.text, case_sensitive))
            .collect();
        Some(Self { terms, phrase })
    }
}

pub struct QueryProcessor {
    index: Arc<SearchIndex>,
    registry: Arc<DocumentRegistry>,
    history: Arc<PerformanceHistory>,
    matcher: FuzzyMatcher,
    fuzzy_trigger: usize,
}

impl QueryProcessor {
    pub fn new(
        index: Arc<SearchIndex>,
        registry: Arc<DocumentRegistry>,
        history: Arc<PerformanceHistory>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            index,
            registry,
            history,
            matcher: FuzzyMatcher::new(config.fuzzy_threshold),
            fuzzy_trigger: config.fuzzy_trigger,
        }
    }

    pub fn matcher(&self) -> &FuzzyMatcher {
        &self.matcher
    }

    /// Search one document. Any failure for that document is returned.
    pub fn search_document(
        &self,
        query: &str,
        id: DocId,
        options: &SearchOptions,
        token: &QueryToken,
    ) -> Result<Vec<SearchResult>> {
        self.history.time(SEARCH_OPERATION, || {
            let Some(prepared) = self.prepare(query, options) else {
                return Ok(Vec::new());
            };
            token.check()?;
            // Registry first: a removal drops the postings before the entry
            let status = self.registry.status(id);
            let Some(postings) = self.resolve(id, status, self.index.document(id))? else {
                return Ok(Vec::new());
            };
            let mut results = self.document_results(&prepared, &postings, options, token)?;
            rank(&mut results, options.max_results);
            token.deliver(results)
        })
    }

    /// Search several documents and merge.
    ///
    /// A document that can't be searched (never indexed, failed, dangling) is
    /// logged as a `PerDocumentSearchFailure` and excluded. Only supersession
    /// aborts the whole search.
    pub fn search_documents(
        &self,
        query: &str,
        ids: &[DocId],
        options: &SearchOptions,
        token: &QueryToken,
    ) -> Result<Vec<SearchResult>> {
        self.history.time(SEARCH_OPERATION, || {
            let Some(prepared) = self.prepare(query, options) else {
                return Ok(Vec::new());
            };

            let mut seen = HashSet::new();
            let ids: Vec<DocId> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();
            let statuses: Vec<Option<IndexStatus>> =
                ids.iter().map(|id| self.registry.status(*id)).collect();
            // Every document's postings come from one read of the index
            let snapshot: Vec<_> = self
                .index
                .snapshot(&ids)
                .into_iter()
                .zip(statuses)
                .map(|((id, postings), status)| (id, status, postings))
                .collect();

            let search_one = |entry: (DocId, Option<IndexStatus>, Option<Arc<DocumentPostings>>)| {
                let (id, status, postings) = entry;
                let outcome = token.check().and_then(|()| {
                    match self.resolve(id, status, postings)? {
                        Some(postings) => self.document_results(&prepared, &postings, options, token),
                        None => Ok(Vec::new()),
                    }
                });
                (id, outcome)
            };

            #[cfg(feature = "parallel")]
            let outcomes: Vec<(DocId, Result<Vec<SearchResult>>)> =
                snapshot.into_par_iter().map(search_one).collect();
            #[cfg(not(feature = "parallel"))]
            let outcomes: Vec<(DocId, Result<Vec<SearchResult>>)> =
                snapshot.into_iter().map(search_one).collect();

            let mut results = Vec::new();
            for (id, outcome) in outcomes {
                match outcome {
                    Ok(found) => results.extend(found),
                    Err(err @ SearchError::Superseded { .. }) => return Err(err),
                    Err(err) => {
                        let failure = SearchError::PerDocumentSearchFailure {
                            id,
                            source: Box::new(err),
                        };
                        tracing::warn!("{}", failure);
                    }
                }
            }
            rank(&mut results, options.max_results);
            token.deliver(results)
        })
    }

    /// Split the query, or `None` when there is nothing to search for.
    fn prepare(&self, query: &str, options: &SearchOptions) -> Option<PreparedQuery> {
        if self.index.is_empty() {
            tracing::debug!("{}", SearchError::IndexNotReady);
            return None;
        }
        PreparedQuery::new(query, options.case_sensitive)
    }

    /// Check a document's postings against the registry before trusting them.
    ///
    /// `status` must be read before `postings`. `Ok(None)` means the document
    /// is still being indexed for the first time and has nothing to answer with.
    fn resolve(
        &self,
        id: DocId,
        status: Option<IndexStatus>,
        postings: Option<Arc<DocumentPostings>>,
    ) -> Result<Option<Arc<DocumentPostings>>> {
        match (status, postings) {
            (None, Some(postings)) => match self.registry.status(id) {
                // Registered and published between the two reads
                Some(status) => self.resolve(id, Some(status), Some(postings)),
                None if self.index.contains(id) => Err(SearchError::DanglingPosting(id)),
                // Removed between the two reads
                None => Err(SearchError::DocumentNotIndexed(id)),
            },
            (None, None) => Err(SearchError::DocumentNotIndexed(id)),
            (Some(IndexStatus::Failed { reason }), _) => {
                Err(SearchError::IndexingFailed { id, reason })
            }
            // A document being reindexed keeps answering from its previous postings
            (Some(_), Some(postings)) => Ok(Some(postings)),
            (Some(IndexStatus::Indexing), None) => {
                tracing::debug!(doc = %id, "{}", SearchError::IndexNotReady);
                Ok(None)
            }
            (Some(_), None) => Err(SearchError::DocumentNotIndexed(id)),
        }
    }

    /// Unranked results for one document.
    fn document_results(
        &self,
        prepared: &PreparedQuery,
        postings: &DocumentPostings,
        options: &SearchOptions,
        token: &QueryToken,
    ) -> Result<Vec<SearchResult>> {
        let case_sensitive = options.case_sensitive;
        let mut results = Vec::new();
        let mut push = |position: Position, match_type: MatchType, terms: usize| {
            if options.headings_only && !position.element.is_heading() {
                return;
            }
            results.push(SearchResult {
                doc_id: position.doc_id,
                score: occurrence_score(&match_type, position.element, terms),
                position,
                match_type,
            });
        };

        for term in &prepared.terms {
            token.check()?;

            let exact = if options.whole_words {
                postings.lookup(term, case_sensitive)
            } else {
                postings.lookup_substring(term, case_sensitive)
            };
            let exact_count = exact.len();
            for position in exact {
                push(position, MatchType::Exact, 1);
            }

            if exact_count >= self.fuzzy_trigger {
                continue;
            }
            // Tokens containing the term already matched as substrings
            let candidates = postings
                .vocabulary(case_sensitive)
                .into_iter()
                .filter(|candidate| {
                    *candidate != term.as_str()
                        && (options.whole_words || !candidate.contains(term.as_str()))
                });
            for found in self.matcher.matches(term, candidates) {
                let match_type = MatchType::Fuzzy {
                    similarity: found.similarity,
                };
                for position in postings.lookup(&found.term, case_sensitive) {
                    push(position, match_type, 1);
                }
            }
        }

        if prepared.phrase.len() > 1 {
            for heading in &postings.structure().headings {
                if !heading.matches_phrase(&prepared.phrase, case_sensitive) {
                    continue;
                }
                let position = Position {
                    doc_id: postings.id(),
                    global_offset: heading.span.start as u32,
                    length: (heading.span.end - heading.span.start) as u32,
                    line: heading.line,
                    element: ElementType::Heading(heading.level),
                };
                push(position, MatchType::Structural, prepared.phrase.len());
            }
        }

        Ok(results)
    }
}
