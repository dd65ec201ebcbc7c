// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! On-demand snippets for search results.
//!
//! Search results don't carry text. When the UI actually shows a result it asks
//! for a [`LazySnippet`], which does nothing until `get()` is called. Then it
//! pulls the document's content from the content cache (filling the cache from
//! the document source on a miss), cuts `context_length` characters around the
//! match, and memoizes the result.
//!
//! Computed snippets also go into a small FIFO cache shared by all accessors,
//! so scrolling back over the same results doesn't recompute them.
//!
//! Highlighting only reads shared state. The one exception is the content
//! cache fill, which goes through the cache's own lock.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::ops::Range;
use std::sync::{Arc, OnceLock};

use crate::cache::DocumentCache;
use crate::document::{Document, DocumentSource};
use crate::error::{Result, SearchError};
use crate::types::{DocId, Position, SearchResult};

/// Marker for context clipped on either side.
pub const ELLIPSIS: &str = "…";

/// A match with the text around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    /// Context text with line breaks flattened to spaces.
    pub text: String,
    /// Character range of the match within `text`.
    pub highlight: Range<usize>,
    /// Content was cut before the snippet.
    pub leading_ellipsis: bool,
    /// Content was cut after the snippet.
    pub trailing_ellipsis: bool,
}

impl Snippet {
    /// The matched text itself.
    pub fn matched(&self) -> String {
        self.text
            .chars()
            .skip(self.highlight.start)
            .take(self.highlight.len())
            .collect()
    }

    /// Wrap the match in `open`/`close` and mark clipped ends with an ellipsis.
    pub fn render(&self, open: &str, close: &str) -> String {
        let mut out = String::with_capacity(self.text.len() + open.len() + close.len() + 8);
        if self.leading_ellipsis {
            out.push_str(ELLIPSIS);
        }
        for (i, c) in self.text.chars().enumerate() {
            if i == self.highlight.start {
                out.push_str(open);
            }
            if i == self.highlight.end {
                out.push_str(close);
            }
            out.push(c);
        }
        if self.highlight.end >= self.text.chars().count() {
            out.push_str(close);
        }
        if self.trailing_ellipsis {
            out.push_str(ELLIPSIS);
        }
        out
    }
}

/// Cut a snippet out of `content`.
///
/// The context is split evenly around the match, with any odd character going
/// after it. Near either end of the document the window is simply shorter.
pub fn build_snippet(content: &str, offset: usize, length: usize, context_length: usize) -> Option<Snippet> {
    let chars: Vec<char> = content.chars().collect();
    let end = offset.checked_add(length)?;
    if end > chars.len() {
        return None;
    }
    let before = context_length / 2;
    let after = context_length - before;
    let from = offset.saturating_sub(before);
    let to = end.saturating_add(after).min(chars.len());

    let text = chars[from..to]
        .iter()
        .map(|c| if matches!(c, '\n' | '\r') { ' ' } else { *c })
        .collect();
    Some(Snippet {
        text,
        highlight: (offset - from)..(end - from),
        leading_ellipsis: from > 0,
        trailing_ellipsis: to < chars.len(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SnippetKey {
    doc: DocId,
    offset: u32,
    length: u32,
    context: usize,
}

impl SnippetKey {
    fn new(position: &Position, context: usize) -> Self {
        Self {
            doc: position.doc_id,
            offset: position.global_offset,
            length: position.length,
            context,
        }
    }
}

/// Fixed-capacity snippet store, evicting oldest-first.
struct SnippetCache {
    capacity: usize,
    order: VecDeque<SnippetKey>,
    entries: HashMap<SnippetKey, Arc<Snippet>>,
}

impl SnippetCache {
    fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            order: VecDeque::new(),
            entries: HashMap::new(),
        }
    }

    fn get(&self, key: &SnippetKey) -> Option<Arc<Snippet>> {
        self.entries.get(key).cloned()
    }

    fn insert(&mut self, key: SnippetKey, snippet: Arc<Snippet>) {
        if self.entries.insert(key, snippet).is_some() {
            return;
        }
        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    fn invalidate(&mut self, doc: DocId) {
        self.order.retain(|key| key.doc != doc);
        self.entries.retain(|key, _| key.doc != doc);
    }
}

pub struct ResultHighlighter {
    documents: Arc<DocumentCache>,
    source: Arc<dyn DocumentSource>,
    snippets: Mutex<SnippetCache>,
}

impl ResultHighlighter {
    pub fn new(documents: Arc<DocumentCache>, source: Arc<dyn DocumentSource>, capacity: usize) -> Self {
        Self {
            documents,
            source,
            snippets: Mutex::new(SnippetCache::new(capacity)),
        }
    }

    /// A lazy accessor for one result's snippet. Nothing is computed yet.
    pub fn highlight(&self, result: &SearchResult, context_length: usize) -> LazySnippet<'_> {
        LazySnippet {
            highlighter: self,
            position: result.position,
            context_length,
            value: OnceLock::new(),
        }
    }

    /// Compute (or fetch) the snippet for `position` right away.
    pub fn snippet(&self, position: &Position, context_length: usize) -> Result<Arc<Snippet>> {
        let key = SnippetKey::new(position, context_length);
        if let Some(snippet) = self.snippets.lock().get(&key) {
            return Ok(snippet);
        }

        let id = position.doc_id;
        let document = self
            .documents
            .get_or_load(id, self.source.as_ref())
            .ok_or(SearchError::ContentUnavailable(id))?;
        let snippet = build_snippet(
            &document.content,
            position.global_offset as usize,
            position.length as usize,
            context_length,
        )
        .ok_or(SearchError::OffsetOutOfBounds {
            id,
            offset: position.end() as usize,
        })?;

        let snippet = Arc::new(snippet);
        self.remember(key, Arc::clone(&snippet), &document);
        Ok(snippet)
    }

    /// Cache a snippet built from `document`, unless that content was replaced
    /// while it was being built.
    ///
    /// Content changes go into the content cache before `invalidate`, so a
    /// snippet of the old content is either dropped here or by `invalidate`.
    fn remember(&self, key: SnippetKey, snippet: Arc<Snippet>, document: &Arc<Document>) {
        let mut snippets = self.snippets.lock();
        if self.documents.is_current(key.doc, document) {
            snippets.insert(key, snippet);
        }
    }

    /// Forget snippets for a document whose content changed or went away.
    /// Call after the content cache has been updated.
    pub fn invalidate(&self, id: DocId) {
        self.snippets.lock().invalidate(id);
    }

    pub fn cached_snippets(&self) -> usize {
        self.snippets.lock().entries.len()
    }

    pub fn capacity(&self) -> usize {
        self.snippets.lock().capacity
    }
}

/// Deferred snippet for one result. Computed on the first successful `get()`.
pub struct LazySnippet<'a> {
    highlighter: &'a ResultHighlighter,
    position: Position,
    context_length: usize,
    value: OnceLock<Arc<Snippet>>,
}

impl LazySnippet<'_> {
    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn is_computed(&self) -> bool {
        self.value.get().is_some()
    }

    /// The snippet, computing it on first call. Errors aren't memoized, so a
    /// later call can succeed once content is available again.
    pub fn get(&self) -> Result<Arc<Snippet>> {
        if let Some(snippet) = self.value.get() {
            return Ok(Arc::clone(snippet));
        }
        let snippet = self
            .highlighter
            .snippet(&self.position, self.context_length)?;
        Ok(Arc::clone(self.value.get_or_init(|| snippet)))
    }
}
