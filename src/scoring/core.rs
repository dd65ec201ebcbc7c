// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The math behind search ranking.
//!
//! Each occurrence scores `base + bonus`, with no upper clamp:
//!
//! | Component  | Value        | When                                    |
//! |------------|--------------|-----------------------------------------|
//! | Base       | 1.0          | exact match (whole token or substring)  |
//! | Base       | similarity   | fuzzy match, in `[threshold, 1.0)`      |
//! | Heading    | +1.0         | occurrence inside a heading             |
//! | Structural | +1.0         | whole query equals a heading's text     |
//!
//! # Key Invariant: Heading Dominance
//!
//! ```text
//! EXACT + HEADING > EXACT                     (2.0 > 1.0)
//! threshold + HEADING > EXACT   for t > 0     (1.8 > 1.0 at the default)
//! ```
//!
//! A capped score (say `min(score, 1.0)`) would tie the first line and let
//! sort order decide, which is how heading hits used to end up below body text.

use crate::types::{ElementType, MatchType};

// =============================================================================
// SCORING CONSTANTS
// =============================================================================

/// Base score for an exact occurrence.
pub const EXACT_BASE_SCORE: f64 = 1.0;

/// Added when the occurrence sits inside a heading.
pub const HEADING_BONUS: f64 = 1.0;

/// Added to a structural (whole-heading) match.
pub const STRUCTURAL_BONUS: f64 = 1.0;

/// Static assertion that heading dominance holds.
/// Evaluated at compile time - if it fails, the crate won't build.
const _: () = {
    assert!(EXACT_BASE_SCORE + HEADING_BONUS > EXACT_BASE_SCORE);
    assert!(HEADING_BONUS > 0.0);
};

/// Score one occurrence.
///
/// `match_type` sets the base: 1.0 for exact, the similarity for fuzzy. A
/// structural match scores like an exact heading hit per query term, plus the
/// structural bonus, so `terms` only matters for that case.
pub fn occurrence_score(match_type: &MatchType, element: ElementType, terms: usize) -> f64 {
    let base = match match_type {
        MatchType::Exact => EXACT_BASE_SCORE,
        MatchType::Fuzzy { similarity } => *similarity,
        MatchType::Structural => EXACT_BASE_SCORE * terms as f64 + STRUCTURAL_BONUS,
    };
    let bonus = if element.is_heading() { HEADING_BONUS } else { 0.0 };
    base + bonus
}
