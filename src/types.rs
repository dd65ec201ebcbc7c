// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks shared by the index, the query processor and the highlighter.
//!
//! A `Position` is one physical occurrence of a token. It carries a document id,
//! never a reference to the document itself, so the content cache can evict a
//! document while its postings stay searchable.
//!
//! # Invariants
//!
//! - **Position**: `global_offset + length <= content.chars().count()` for the
//!   content the position was indexed from. Offsets count Unicode scalar values
//!   across the whole document, newlines included, not bytes and not per line.
//! - **SearchResult**: `score` is never clamped. A heading occurrence scores
//!   `base + 1.0` no matter how large that gets.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::EngineConfig;

// =============================================================================
// NEWTYPES
// =============================================================================

/// Type-safe document identifier.
///
/// Ids come from the document model (the tab/file collaborator owns them), so
/// there's no bounds-checked constructor here, just a wrapper that keeps a
/// character offset from being passed where a document is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct DocId(pub u32);

impl DocId {
    /// Get the underlying value.
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for DocId {
    fn from(id: u32) -> Self {
        DocId(id)
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// POSITIONS
// =============================================================================

/// Which structural element encloses an occurrence.
///
/// **Gotcha**: the derived `Ord` exists for deterministic ordering only. Ranking
/// goes through `scoring::occurrence_score`, where a heading earns its bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Heading with its level (1 = `#`, 6 = `######`).
    Heading(u8),
    Body,
    Code,
    Link,
}

impl ElementType {
    #[inline]
    pub fn is_heading(self) -> bool {
        matches!(self, ElementType::Heading(_))
    }

    pub fn heading_level(self) -> Option<u8> {
        match self {
            ElementType::Heading(level) => Some(level),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Heading(_) => "heading",
            ElementType::Body => "body",
            ElementType::Code => "code",
            ElementType::Link => "link",
        }
    }
}

/// One occurrence of a term in a document.
///
/// `u32` fields keep a posting at 20 bytes. A document past 4G characters would
/// have been truncated by the indexer long before that matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub doc_id: DocId,
    /// Character offset from the start of the document.
    pub global_offset: u32,
    /// Length of the occurrence in characters.
    pub length: u32,
    /// 1-based line number.
    pub line: u32,
    pub element: ElementType,
}

impl Position {
    /// Character offset one past the end of the occurrence.
    #[inline]
    pub fn end(&self) -> u32 {
        self.global_offset + self.length
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// How a result matched the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum MatchType {
    /// The query term, as a whole token or (without `whole_words`) inside one.
    Exact,
    /// A vocabulary term within the fuzzy threshold.
    Fuzzy { similarity: f64 },
    /// The whole query equals a heading's text.
    Structural,
}

/// One ranked occurrence. Positions and scores only: snippets come from the
/// highlighter when (and if) a result is displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub doc_id: DocId,
    pub position: Position,
    pub score: f64,
    pub match_type: MatchType,
}

// =============================================================================
// OPTIONS
// =============================================================================

/// Which documents a query covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchScope {
    #[default]
    CurrentDocument,
    AllOpenDocuments,
}

/// Query options as the settings layer hands them over.
///
/// `context_length` is signed because that's how it arrives from outside; a
/// negative value is an `InvalidOptions` case that `sanitized` corrects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub whole_words: bool,
    pub headings_only: bool,
    pub include_context: bool,
    /// Snippet width in characters, split around the match.
    pub context_length: i64,
    pub max_results: usize,
    pub scope: SearchScope,
}

impl Default for SearchOptions {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            case_sensitive: false,
            whole_words: false,
            headings_only: false,
            include_context: true,
            context_length: config.default_context_length as i64,
            max_results: config.default_max_results,
            scope: SearchScope::CurrentDocument,
        }
    }
}

impl SearchOptions {
    /// Replace out-of-range values with the configured defaults.
    ///
    /// Invalid options are corrected here rather than surfaced: a negative
    /// `context_length` or a zero `max_results` falls back to the default and
    /// logs a warning.
    pub fn sanitized(&self, config: &EngineConfig) -> SearchOptions {
        let mut options = self.clone();
        if options.context_length < 0 {
            tracing::warn!(
                context_length = options.context_length,
                "negative contextLength, using default {}",
                config.default_context_length
            );
            options.context_length = config.default_context_length as i64;
        }
        if options.max_results == 0 {
            tracing::warn!(
                "maxResults of 0, using default {}",
                config.default_max_results
            );
            options.max_results = config.default_max_results;
        }
        options
    }

    /// Context width in characters (zero if the value was never sanitized).
    pub fn context_chars(&self) -> usize {
        usize::try_from(self.context_length).unwrap_or(0)
    }
}
