//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical implementations of test helpers to avoid duplication.

#![doc(hidden)]

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::document::{Document, DocumentSource, HeadingRange, Span, Structure};
use crate::types::DocId;

/// Three occurrences of "setup": one in the heading, two in the body.
pub const SETUP_CONTENT: &str = "# Setup\nRun the setup script.\nSetup complete.";

/// Create a document with no structural metadata.
///
/// This is the canonical implementation used across all tests.
pub fn make_document(id: u32, content: &str) -> Document {
    Document {
        id: DocId(id),
        title: format!("Doc {}", id),
        content: content.to_string(),
        structure: Structure::default(),
    }
}

/// Create a document whose structure is read off markdown-ish markers in
/// `content` (see [`outline`]).
pub fn make_outlined_document(id: u32, content: &str) -> Document {
    Document {
        structure: outline(content),
        ..make_document(id, content)
    }
}

/// A minimal stand-in for the markdown parser.
///
/// - a line starting with 1 to 6 `#` and a space is a heading spanning the line
/// - lines from a ```` ``` ```` fence to the closing fence are one code block
/// - `[text](target)` outside code is a link
pub fn outline(content: &str) -> Structure {
    let mut structure = Structure::default();
    let mut offset = 0;
    let mut fence_start: Option<usize> = None;

    for line in content.split('\n') {
        let len = line.chars().count();
        if line.starts_with("```") {
            match fence_start.take() {
                Some(start) => structure.code_blocks.push(Span::new(start, offset + len)),
                None => fence_start = Some(offset),
            }
        } else if fence_start.is_none() {
            let hashes = line.chars().take_while(|c| *c == '#').count();
            if (1..=6).contains(&hashes) && line[hashes..].starts_with(' ') {
                structure.headings.push(HeadingRange {
                    level: hashes as u8,
                    start: offset,
                    end: offset + len,
                });
            } else {
                structure.links.extend(link_spans(line, offset));
            }
        }
        offset += len + 1;
    }
    structure
}

fn link_spans(line: &str, line_offset: usize) -> Vec<Span> {
    let chars: Vec<char> = line.chars().collect();
    let mut spans = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '[' {
            let close = (i..chars.len()).find(|&j| chars[j] == ']');
            if let Some(close) = close {
                if chars.get(close + 1) == Some(&'(') {
                    if let Some(end) = (close + 2..chars.len()).find(|&j| chars[j] == ')') {
                        spans.push(Span::new(line_offset + i, line_offset + end + 1));
                        i = end + 1;
                        continue;
                    }
                }
            }
        }
        i += 1;
    }
    spans
}

/// In-memory document source that counts loads.
#[derive(Default)]
pub struct MemorySource {
    documents: RwLock<HashMap<DocId, Arc<Document>>>,
    loads: AtomicUsize,
}

impl MemorySource {
    pub fn new(documents: impl IntoIterator<Item = Document>) -> Self {
        let source = Self::default();
        for document in documents {
            source.insert(document);
        }
        source
    }

    pub fn insert(&self, document: Document) {
        self.documents.write().insert(document.id, Arc::new(document));
    }

    pub fn remove(&self, id: DocId) {
        self.documents.write().remove(&id);
    }

    /// How many times `load` was called.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

impl DocumentSource for MemorySource {
    fn load(&self, id: DocId) -> Option<Arc<Document>> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        self.documents.read().get(&id).cloned()
    }
}
