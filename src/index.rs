// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Inverted and structural index.
//!
//! Two views over the same postings:
//!
//! - **term → postings**: every document's occurrences of a surface term
//! - **document → postings**: one immutable [`DocumentPostings`] per document,
//!   holding its term map, a case-folded lookup and its structural entry
//!
//! # Swap-on-write
//!
//! A document's postings are built entirely outside the lock and published as
//! one `Arc`. Publishing unlinks the previous version and links the new one
//! under a single write-lock acquisition, so a reader sees either the old set
//! or the new one and never a mix. Readers clone the `Arc` out of the lock and
//! work lock-free from there.
//!
//! Mutation is whole-document only. There is no way to remove a single term
//! from a published document.

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::document::{HeadingRange, Span, Structure};
use crate::types::{DocId, ElementType, Position};
use crate::utils::{find_folded, fold, normalize_term};

// =============================================================================
// STRUCTURAL ENTRY
// =============================================================================

/// A heading as the structural index keeps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingEntry {
    pub level: u8,
    pub span: Span,
    /// Line of the heading's first token (0 if it has none).
    pub line: u32,
    /// Surface tokens inside the heading, in order.
    pub tokens: Vec<String>,
}

impl HeadingEntry {
    /// Does the heading's text equal `phrase` (already normalized per `case_sensitive`)?
    pub fn matches_phrase(&self, phrase: &[String], case_sensitive: bool) -> bool {
        self.tokens.len() == phrase.len()
            && self
                .tokens
                .iter()
                .zip(phrase)
                .all(|(token, term)| normalize_term(token, case_sensitive) == *term)
    }

    /// Heading text as displayed: tokens joined by single spaces.
    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }
}

/// Headings, code blocks and links of one document, each sorted by start.
///
/// Ranges of one kind never overlap (the indexer validates that first), so
/// locating an offset is a binary search per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuralEntry {
    pub headings: Vec<HeadingEntry>,
    pub code_blocks: Vec<Span>,
    pub links: Vec<Span>,
}

impl StructuralEntry {
    pub fn from_structure(structure: &Structure) -> Self {
        let mut headings: Vec<HeadingEntry> = structure
            .headings
            .iter()
            .map(|h: &HeadingRange| HeadingEntry {
                level: h.level,
                span: h.span(),
                line: 0,
                tokens: Vec::new(),
            })
            .collect();
        headings.sort_by_key(|h| h.span);
        let mut code_blocks = structure.code_blocks.clone();
        code_blocks.sort();
        let mut links = structure.links.clone();
        links.sort();
        Self {
            headings,
            code_blocks,
            links,
        }
    }

    /// Index of the heading containing `offset`.
    pub fn heading_at(&self, offset: usize) -> Option<usize> {
        let idx = self.headings.partition_point(|h| h.span.start <= offset);
        (idx > 0 && self.headings[idx - 1].span.contains(offset)).then(|| idx - 1)
    }

    /// Element enclosing `offset`. Where ranges nest, heading wins over code,
    /// code over link.
    pub fn element_at(&self, offset: usize) -> ElementType {
        if let Some(idx) = self.heading_at(offset) {
            return ElementType::Heading(self.headings[idx].level);
        }
        if span_containing(&self.code_blocks, offset) {
            return ElementType::Code;
        }
        if span_containing(&self.links, offset) {
            return ElementType::Link;
        }
        ElementType::Body
    }
}

fn span_containing(spans: &[Span], offset: usize) -> bool {
    let idx = spans.partition_point(|s| s.start <= offset);
    idx > 0 && spans[idx - 1].contains(offset)
}

// =============================================================================
// DOCUMENT POSTINGS
// =============================================================================

/// Everything the index knows about one document, immutable once built.
#[derive(Debug, Clone)]
pub struct DocumentPostings {
    id: DocId,
    /// Surface term → occurrences, sorted by offset.
    terms: HashMap<String, Arc<[Position]>>,
    /// Folded term → surface terms that fold to it, sorted.
    folded: HashMap<String, Vec<String>>,
    structure: StructuralEntry,
    token_count: usize,
    truncated: bool,
}

impl DocumentPostings {
    pub fn builder(id: DocId, structure: StructuralEntry) -> PostingsBuilder {
        PostingsBuilder {
            id,
            terms: HashMap::new(),
            structure,
            token_count: 0,
        }
    }

    pub fn id(&self) -> DocId {
        self.id
    }

    pub fn structure(&self) -> &StructuralEntry {
        &self.structure
    }

    pub fn token_count(&self) -> usize {
        self.token_count
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Lookup keys: surface terms when case-sensitive, folded terms otherwise.
    pub fn vocabulary(&self, case_sensitive: bool) -> Vec<&str> {
        if case_sensitive {
            self.terms.keys().map(String::as_str).collect()
        } else {
            self.folded.keys().map(String::as_str).collect()
        }
    }

    /// Whole-token occurrences of `key` (a surface term, or a folded one).
    pub fn lookup(&self, key: &str, case_sensitive: bool) -> Vec<Position> {
        if case_sensitive {
            return self
                .terms
                .get(key)
                .map(|positions| positions.to_vec())
                .unwrap_or_default();
        }
        let mut positions: Vec<Position> = self
            .folded
            .get(key)
            .into_iter()
            .flatten()
            .filter_map(|surface| self.terms.get(surface))
            .flat_map(|positions| positions.iter().copied())
            .collect();
        positions.sort();
        positions
    }

    /// Occurrences of `needle` anywhere inside a token, at the needle's own
    /// offset and length. Includes whole-token matches.
    pub fn lookup_substring(&self, needle: &str, case_sensitive: bool) -> Vec<Position> {
        let mut positions = Vec::new();
        for (surface, occurrences) in &self.terms {
            for (start, length) in find_folded(surface, needle, case_sensitive) {
                positions.extend(occurrences.iter().map(|pos| Position {
                    global_offset: pos.global_offset + start as u32,
                    length: length as u32,
                    ..*pos
                }));
            }
        }
        positions.sort();
        positions
    }

    /// Total occurrences across all terms.
    pub fn posting_count(&self) -> usize {
        self.terms.values().map(|positions| positions.len()).sum()
    }

    /// The full posting set in a canonical order, for comparing two builds.
    pub fn posting_set(&self) -> BTreeMap<String, Vec<Position>> {
        self.terms
            .iter()
            .map(|(term, positions)| (term.clone(), positions.to_vec()))
            .collect()
    }
}

/// Accumulates a document's postings before they are published.
pub struct PostingsBuilder {
    id: DocId,
    terms: HashMap<String, Vec<Position>>,
    structure: StructuralEntry,
    token_count: usize,
}

impl PostingsBuilder {
    /// Element at `offset` in the document being built.
    pub fn element_at(&self, offset: usize) -> ElementType {
        self.structure.element_at(offset)
    }

    /// Add one occurrence of `surface` at `offset`.
    pub fn add(&mut self, surface: &str, offset: usize, length: usize, line: usize) {
        let element = self.structure.element_at(offset);
        if element.is_heading() {
            if let Some(idx) = self.structure.heading_at(offset) {
                let heading = &mut self.structure.headings[idx];
                if heading.tokens.is_empty() {
                    heading.line = line as u32;
                }
                heading.tokens.push(surface.to_string());
            }
        }
        let position = Position {
            doc_id: self.id,
            global_offset: offset as u32,
            length: length as u32,
            line: line as u32,
            element,
        };
        match self.terms.get_mut(surface) {
            Some(positions) => positions.push(position),
            None => {
                self.terms.insert(surface.to_string(), vec![position]);
            }
        }
        self.token_count += 1;
    }

    pub fn token_count(&self) -> usize {
        self.token_count
    }

    pub fn finish(self, truncated: bool) -> DocumentPostings {
        let mut folded: HashMap<String, Vec<String>> = HashMap::new();
        for surface in self.terms.keys() {
            folded.entry(fold(surface)).or_default().push(surface.clone());
        }
        for surfaces in folded.values_mut() {
            surfaces.sort();
        }
        // Tokens arrive in document order, so each list is already sorted
        let terms = self
            .terms
            .into_iter()
            .map(|(term, positions)| (term, Arc::from(positions)))
            .collect();
        DocumentPostings {
            id: self.id,
            terms,
            folded,
            structure: self.structure,
            token_count: self.token_count,
            truncated,
        }
    }
}

// =============================================================================
// SEARCH INDEX
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub documents: usize,
    /// Distinct surface terms across all documents.
    pub terms: usize,
    pub postings: usize,
}

#[derive(Debug, Default)]
struct IndexState {
    terms: HashMap<String, HashMap<DocId, Arc<[Position]>>>,
    documents: HashMap<DocId, Arc<DocumentPostings>>,
}

impl IndexState {
    fn unlink(&mut self, old: &DocumentPostings) {
        for term in old.terms.keys() {
            if let Some(by_doc) = self.terms.get_mut(term) {
                by_doc.remove(&old.id);
                if by_doc.is_empty() {
                    self.terms.remove(term);
                }
            }
        }
    }
}

/// The shared index. Constructed explicitly and handed to whoever needs it.
#[derive(Debug, Default)]
pub struct SearchIndex {
    state: RwLock<IndexState>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a document's postings in one step. Returns the previous version.
    pub fn publish(&self, postings: DocumentPostings) -> Option<Arc<DocumentPostings>> {
        let postings = Arc::new(postings);
        let id = postings.id;
        let mut state = self.state.write();
        let previous = state.documents.insert(id, Arc::clone(&postings));
        if let Some(old) = &previous {
            state.unlink(old);
        }
        for (term, positions) in &postings.terms {
            state
                .terms
                .entry(term.clone())
                .or_default()
                .insert(id, Arc::clone(positions));
        }
        previous
    }

    /// Drop every posting and the structural entry for `id`.
    pub fn remove(&self, id: DocId) -> Option<Arc<DocumentPostings>> {
        let mut state = self.state.write();
        let removed = state.documents.remove(&id)?;
        state.unlink(&removed);
        Some(removed)
    }

    /// Current postings for one document.
    pub fn document(&self, id: DocId) -> Option<Arc<DocumentPostings>> {
        self.state.read().documents.get(&id).cloned()
    }

    /// Postings for several documents, taken under one read lock.
    pub fn snapshot(&self, ids: &[DocId]) -> Vec<(DocId, Option<Arc<DocumentPostings>>)> {
        let state = self.state.read();
        ids.iter()
            .map(|id| (*id, state.documents.get(id).cloned()))
            .collect()
    }

    /// Every occurrence of the surface term `term`, ordered by document then offset.
    pub fn postings(&self, term: &str) -> Vec<Position> {
        let state = self.state.read();
        let mut positions: Vec<Position> = state
            .terms
            .get(term)
            .into_iter()
            .flat_map(|by_doc| by_doc.values())
            .flat_map(|positions| positions.iter().copied())
            .collect();
        positions.sort();
        positions
    }

    /// Documents containing the surface term `term`, sorted.
    pub fn documents_with_term(&self, term: &str) -> Vec<DocId> {
        let state = self.state.read();
        let mut ids: Vec<DocId> = state
            .terms
            .get(term)
            .map(|by_doc| by_doc.keys().copied().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    pub fn document_ids(&self) -> Vec<DocId> {
        let mut ids: Vec<DocId> = self.state.read().documents.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.state.read().documents.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.state.read().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().documents.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        let state = self.state.read();
        IndexStats {
            documents: state.documents.len(),
            terms: state.terms.len(),
            postings: state.documents.values().map(|d| d.posting_count()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postings(id: u32, words: &[(&str, usize)]) -> DocumentPostings {
        let mut builder = DocumentPostings::builder(DocId(id), StructuralEntry::default());
        for (word, offset) in words {
            builder.add(word, *offset, word.chars().count(), 1);
        }
        builder.finish(false)
    }

    #[test]
    fn test_element_at_prefers_heading_then_code_then_link() {
        let structure = Structure {
            headings: vec![HeadingRange { level: 2, start: 0, end: 10 }],
            code_blocks: vec![Span::new(5, 20)],
            links: vec![Span::new(15, 30)],
        };
        let entry = StructuralEntry::from_structure(&structure);
        assert_eq!(entry.element_at(6), ElementType::Heading(2));
        assert_eq!(entry.element_at(12), ElementType::Code);
        assert_eq!(entry.element_at(16), ElementType::Code);
        assert_eq!(entry.element_at(25), ElementType::Link);
        assert_eq!(entry.element_at(30), ElementType::Body);
    }

    #[test]
    fn test_heading_tokens_collected_in_order() {
        let structure = Structure {
            headings: vec![HeadingRange { level: 1, start: 0, end: 17 }],
            ..Structure::default()
        };
        let mut builder =
            DocumentPostings::builder(DocId(0), StructuralEntry::from_structure(&structure));
        builder.add("Getting", 2, 7, 1);
        builder.add("Started", 10, 7, 1);
        builder.add("body", 20, 4, 2);
        let built = builder.finish(false);

        let heading = &built.structure().headings[0];
        assert_eq!(heading.text(), "Getting Started");
        assert_eq!(heading.line, 1);
        assert!(heading.matches_phrase(&["getting".into(), "started".into()], false));
        assert!(!heading.matches_phrase(&["getting".into(), "started".into()], true));
    }

    #[test]
    fn test_lookup_folds_surface_variants() {
        let built = postings(0, &[("Setup", 2), ("setup", 16), ("SETUP", 30)]);
        assert_eq!(built.lookup("setup", false).len(), 3);
        assert_eq!(built.lookup("Setup", true).len(), 1);
        assert!(built.lookup("setup", true).iter().all(|p| p.global_offset == 16));
    }

    #[test]
    fn test_lookup_substring_reports_inner_offsets() {
        let built = postings(0, &[("concatenate", 0), ("cats", 16)]);
        let hits = built.lookup_substring("cat", false);
        let spans: Vec<(u32, u32)> = hits.iter().map(|p| (p.global_offset, p.length)).collect();
        assert_eq!(spans, vec![(3, 3), (16, 3)]);
    }

    #[test]
    fn test_publish_replaces_previous_version() {
        let index = SearchIndex::new();
        index.publish(postings(1, &[("alpha", 0), ("beta", 6)]));
        assert_eq!(index.documents_with_term("alpha"), vec![DocId(1)]);

        let previous = index.publish(postings(1, &[("gamma", 0)]));
        assert!(previous.is_some());
        assert!(index.postings("alpha").is_empty());
        assert!(index.postings("beta").is_empty());
        assert_eq!(index.postings("gamma").len(), 1);
        assert_eq!(index.stats(), IndexStats { documents: 1, terms: 1, postings: 1 });
    }

    #[test]
    fn test_remove_leaves_other_documents() {
        let index = SearchIndex::new();
        index.publish(postings(1, &[("shared", 0), ("only", 7)]));
        index.publish(postings(2, &[("shared", 0)]));

        assert!(index.remove(DocId(1)).is_some());
        assert!(index.postings("only").is_empty());
        assert_eq!(index.documents_with_term("shared"), vec![DocId(2)]);
        assert!(index.remove(DocId(1)).is_none());
        assert_eq!(index.document_ids(), vec![DocId(2)]);
    }

    #[test]
    fn test_posting_set_is_canonical() {
        let a = postings(3, &[("b", 2), ("a", 0), ("b", 4)]);
        let b = postings(3, &[("b", 2), ("a", 0), ("b", 4)]);
        assert_eq!(a.posting_set(), b.posting_set());
        assert_eq!(a.posting_count(), 3);
        assert_eq!(a.term_count(), 2);
    }
}
