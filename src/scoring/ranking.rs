// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result ranking: how search results get sorted.
//!
//! Score descending, then `(doc_id, global_offset)` ascending. The tie-breakers
//! make the order total, so the same query over the same index always comes
//! back in the same order, across documents and across runs.

use crate::types::SearchResult;
use std::cmp::Ordering;

/// Compare two search results for ranking.
///
/// Sort order:
/// 1. **Score** - higher wins
/// 2. **Doc ID** - lower wins
/// 3. **Offset** - earlier in the document wins
/// 4. **Length** - shorter wins (a substring hit and the whole token can share an offset)
pub fn compare_results(a: &SearchResult, b: &SearchResult) -> Ordering {
    match b.score.partial_cmp(&a.score) {
        Some(ord) if ord != Ordering::Equal => ord,
        _ => a
            .doc_id
            .cmp(&b.doc_id)
            .then_with(|| a.position.global_offset.cmp(&b.position.global_offset))
            .then_with(|| a.position.length.cmp(&b.position.length)),
    }
}

/// Sort results into rank order and keep the first `max_results`.
pub fn rank(results: &mut Vec<SearchResult>, max_results: usize) {
    results.sort_by(compare_results);
    results.truncate(max_results);
}
