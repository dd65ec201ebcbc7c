// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoring and ranking: how search results get their numbers.
//!
//! The key insight is that scores are summed per occurrence and never capped.
//! A heading occurrence earns its bonus on top of whatever the match itself is
//! worth, so it can't be flattened to the same value as a body occurrence.

mod core;
pub mod ranking;

pub use self::core::*;
