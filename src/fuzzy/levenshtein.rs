// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Edit distance with an early-exit optimization.
//!
//! The distance is optimal string alignment: insertions, deletions,
//! substitutions, and transpositions of adjacent characters each cost one.
//! Transpositions matter for typing: "wrold" is one edit from "world", not two.
//!
//! The key insight for speed: `|len(a) - len(b)|` is a lower bound on edit
//! distance. If two strings differ in length by more than the bound, skip the
//! O(nm) DP entirely.

/// Edit distance between `a` and `b` if it is at most `max`, else `None`.
///
/// Two early-exit paths:
/// 1. If length difference exceeds `max`, return `None` immediately
/// 2. If every value in a DP row exceeds `max`, abandon the DP
///
/// Both are sound: a row minimum never decreases in later rows, transpositions
/// included (a transposition from row `i - 1` costs at least what a
/// substitution into row `i` does).
pub fn edit_distance_within(a: &str, b: &str, max: usize) -> Option<usize> {
    // Character counts, not byte lengths, for Unicode correctness
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.len().abs_diff(b.len()) > max {
        return None;
    }
    if a.is_empty() || b.is_empty() {
        return Some(a.len().max(b.len()));
    }

    let mut prev_prev: Vec<usize> = vec![0; b.len() + 1];
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        let mut min_row = curr[0];

        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut value = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                value = value.min(prev_prev[j - 2] + 1);
            }
            curr[j] = value;
            min_row = min_row.min(value);
        }

        // Early-exit: if minimum in this row exceeds max, no point continuing
        if min_row > max {
            return None;
        }

        std::mem::swap(&mut prev_prev, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }

    let distance = prev[b.len()];
    (distance <= max).then_some(distance)
}

/// Unbounded edit distance.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let bound = a.chars().count().max(b.chars().count());
    // Never exceeds the longer length, so the bounded form always answers
    edit_distance_within(a, b, bound).unwrap_or(bound)
}

/// Normalized similarity: `1 - distance / max(len(a), len(b))`.
///
/// Two empty strings are identical (1.0).
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - edit_distance(a, b) as f64 / longest as f64
}

/// Largest edit distance that still reaches `threshold` for strings whose
/// longer side has `longest` characters.
///
/// The epsilon absorbs float error in `(1 - t) * n`: with t = 0.8 and n = 5 the
/// product is 0.9999999999999998, and one edit must still be allowed.
pub fn max_distance_for(threshold: f64, longest: usize) -> usize {
    let budget = (1.0 - threshold) * longest as f64;
    (budget + 1e-9).floor().max(0.0) as usize
}

/// Are these strings within `max` edits of each other?
pub fn levenshtein_within(a: &str, b: &str, max: usize) -> bool {
    edit_distance_within(a, b, max).is_some()
}
