// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Approximate term matching against a vocabulary.

use serde::Serialize;
use std::cmp::Ordering;

use super::levenshtein::{edit_distance_within, max_distance_for};
use crate::config::DEFAULT_FUZZY_THRESHOLD;

/// A vocabulary term close enough to the query term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuzzyMatch {
    pub term: String,
    pub similarity: f64,
}

/// Ranks candidate terms by normalized edit-distance similarity.
///
/// Stateless apart from its default threshold; cheap to copy into each
/// query processor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatcher {
    threshold: f64,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_FUZZY_THRESHOLD)
    }
}

impl FuzzyMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Matches for `term` at the matcher's own threshold.
    pub fn matches<'c, I>(&self, term: &str, candidates: I) -> Vec<FuzzyMatch>
    where
        I: IntoIterator<Item = &'c str>,
    {
        self.find_approximate_matches(term, candidates, self.threshold)
    }

    /// Every candidate with `similarity >= threshold`, best first.
    ///
    /// Ties break on the term itself so the order is deterministic. Candidates
    /// whose length alone puts them out of reach are skipped before any DP runs:
    /// for a pair whose longer side has `n` characters, the length difference
    /// can't exceed `max_distance_for(threshold, n)`.
    pub fn find_approximate_matches<'c, I>(
        &self,
        term: &str,
        candidates: I,
        threshold: f64,
    ) -> Vec<FuzzyMatch>
    where
        I: IntoIterator<Item = &'c str>,
    {
        let term_len = term.chars().count();
        if term_len == 0 {
            return Vec::new();
        }

        let mut matches: Vec<FuzzyMatch> = candidates
            .into_iter()
            .filter_map(|candidate| {
                let candidate_len = candidate.chars().count();
                let longest = term_len.max(candidate_len);
                let budget = max_distance_for(threshold, longest);
                if term_len.abs_diff(candidate_len) > budget {
                    return None;
                }
                let distance = edit_distance_within(term, candidate, budget)?;
                let similarity = 1.0 - distance as f64 / longest as f64;
                (similarity >= threshold - 1e-12).then(|| FuzzyMatch {
                    term: candidate.to_string(),
                    similarity,
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.term.cmp(&b.term))
        });
        matches
    }
}
