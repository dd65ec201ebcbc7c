// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Latest-query-wins cancellation.
//!
//! Every query takes a generation number. Starting a new query bumps the shared
//! counter, and any query holding an older number is superseded. Running queries
//! check their token between terms and between documents, and once more before
//! handing back results, and bail out with `SearchError::Superseded`. They have no side effects to undo: the index is
//! read-only to them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{Result, SearchError};

/// Source of query generations. Clones share the counter.
#[derive(Debug, Clone, Default)]
pub struct QueryGenerations {
    latest: Arc<AtomicU64>,
}

impl QueryGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new query, superseding every earlier one.
    pub fn begin(&self) -> QueryToken {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        QueryToken {
            generation,
            latest: Some(Arc::clone(&self.latest)),
        }
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }
}

/// A query's claim to be the latest.
#[derive(Debug, Clone)]
pub struct QueryToken {
    generation: u64,
    latest: Option<Arc<AtomicU64>>,
}

impl QueryToken {
    /// A token no other query can supersede.
    pub fn detached() -> Self {
        Self {
            generation: 0,
            latest: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_superseded(&self) -> bool {
        self.latest
            .as_ref()
            .is_some_and(|latest| latest.load(Ordering::Acquire) != self.generation)
    }

    /// `Err(Superseded)` once a newer query has started.
    #[inline]
    pub fn check(&self) -> Result<()> {
        if self.is_superseded() {
            return Err(SearchError::Superseded {
                generation: self.generation,
            });
        }
        Ok(())
    }

    /// Hand back finished results, unless a newer query started while they
    /// were being computed.
    #[inline]
    pub fn deliver<T>(&self, results: T) -> Result<T> {
        self.check().map(|()| results)
    }
}
