// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The document model handed over by the parser, and the two collaborators the
//! engine consumes: a source of document content and the set of open tabs.
//!
//! Structural ranges are character offsets into `content` (not bytes), half-open
//! `[start, end)`. Ranges of one kind must not overlap; headings, code blocks
//! and links may nest inside each other.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::types::DocId;

/// A parsed document: content plus where its headings, code blocks and links are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub structure: Structure,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Structure {
    #[serde(default)]
    pub headings: Vec<HeadingRange>,
    #[serde(default)]
    pub code_blocks: Vec<Span>,
    #[serde(default)]
    pub links: Vec<Span>,
}

/// Half-open character range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingRange {
    pub level: u8,
    pub start: usize,
    pub end: usize,
}

impl HeadingRange {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// The first structural invariant a document breaks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureViolation {
    #[error("{kind} range {start}..{end} is empty or inverted")]
    EmptyRange {
        kind: &'static str,
        start: usize,
        end: usize,
    },
    #[error("{kind} range {start}..{end} exceeds content length {len}")]
    OutOfBounds {
        kind: &'static str,
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("{kind} ranges overlap at offset {offset}")]
    Overlapping { kind: &'static str, offset: usize },
    #[error("heading level {level} outside 1..=6")]
    InvalidHeadingLevel { level: u8 },
}

impl Structure {
    /// Check every range against the content length (in characters).
    pub fn validate(&self, content_len: usize) -> Result<(), StructureViolation> {
        for heading in &self.headings {
            if !(1..=6).contains(&heading.level) {
                return Err(StructureViolation::InvalidHeadingLevel {
                    level: heading.level,
                });
            }
        }
        let headings: Vec<Span> = self.headings.iter().map(HeadingRange::span).collect();
        check_spans("heading", &headings, content_len)?;
        check_spans("code block", &self.code_blocks, content_len)?;
        check_spans("link", &self.links, content_len)?;
        Ok(())
    }
}

fn check_spans(
    kind: &'static str,
    spans: &[Span],
    content_len: usize,
) -> Result<(), StructureViolation> {
    for span in spans {
        if span.start >= span.end {
            return Err(StructureViolation::EmptyRange {
                kind,
                start: span.start,
                end: span.end,
            });
        }
        if span.end > content_len {
            return Err(StructureViolation::OutOfBounds {
                kind,
                start: span.start,
                end: span.end,
                len: content_len,
            });
        }
    }
    let mut sorted: Vec<Span> = spans.to_vec();
    sorted.sort();
    for pair in sorted.windows(2) {
        if pair[1].start < pair[0].end {
            return Err(StructureViolation::Overlapping {
                kind,
                offset: pair[1].start,
            });
        }
    }
    Ok(())
}

// =============================================================================
// COLLABORATORS
// =============================================================================

/// Supplies document content when the content cache misses.
///
/// This is the file-access side of the application. The engine asks by id and
/// never sees a path or a file handle.
pub trait DocumentSource: Send + Sync {
    fn load(&self, id: DocId) -> Option<Arc<Document>>;
}

/// The open-tabs registry: which document is current and which are open.
pub trait OpenDocuments {
    fn current(&self) -> Option<DocId>;
    fn open_documents(&self) -> Vec<DocId>;
}

/// A fixed snapshot of open tabs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabSet {
    pub current: Option<DocId>,
    pub open: Vec<DocId>,
}

impl TabSet {
    pub fn new(current: Option<DocId>, open: Vec<DocId>) -> Self {
        Self { current, open }
    }
}

impl OpenDocuments for TabSet {
    fn current(&self) -> Option<DocId> {
        self.current
    }

    fn open_documents(&self) -> Vec<DocId> {
        self.open.clone()
    }
}
