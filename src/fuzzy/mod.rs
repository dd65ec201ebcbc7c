// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzzy search: typo tolerance via edit distance.
//!
//! `levenshtein` holds the bounded distance and the similarity formula;
//! `matcher` ranks a vocabulary against a query term with length pruning.

mod levenshtein;
mod matcher;

pub use levenshtein::*;
pub use matcher::*;
