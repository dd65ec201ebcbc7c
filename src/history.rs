// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Bounded timing history per operation.
//!
//! Each operation name ("index", "search", ...) gets its own ring of the most
//! recent samples. Memory is `operations × capacity` durations no matter how
//! long the engine runs.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

/// Diagnostics over the samples currently held for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimingSummary {
    pub count: usize,
    pub average: Duration,
    pub min: Duration,
    pub max: Duration,
    /// Most recent sample.
    pub last: Duration,
}

#[derive(Debug)]
pub struct PerformanceHistory {
    capacity: usize,
    samples: Mutex<HashMap<String, VecDeque<Duration>>>,
}

impl PerformanceHistory {
    /// A history keeping `capacity` samples per operation (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            samples: Mutex::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record one sample, dropping the oldest once the ring is full.
    pub fn record(&self, operation: &str, duration: Duration) {
        let mut samples = self.samples.lock();
        let ring = samples
            .entry(operation.to_string())
            .or_insert_with(|| VecDeque::with_capacity(self.capacity));
        if ring.len() == self.capacity {
            ring.pop_front();
        }
        ring.push_back(duration);
    }

    /// Run `f` and record how long it took.
    pub fn time<T>(&self, operation: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let value = f();
        self.record(operation, start.elapsed());
        value
    }

    /// Samples for `operation`, oldest first.
    pub fn samples(&self, operation: &str) -> Vec<Duration> {
        self.samples
            .lock()
            .get(operation)
            .map(|ring| ring.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn summary(&self, operation: &str) -> Option<TimingSummary> {
        let samples = self.samples.lock();
        let ring = samples.get(operation)?;
        let last = *ring.back()?;
        let total: Duration = ring.iter().sum();
        Some(TimingSummary {
            count: ring.len(),
            average: total / ring.len() as u32,
            min: ring.iter().copied().min().unwrap_or(last),
            max: ring.iter().copied().max().unwrap_or(last),
            last,
        })
    }

    /// Recorded operation names, sorted.
    pub fn operations(&self) -> Vec<String> {
        let mut names: Vec<String> = self.samples.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn clear(&self) {
        self.samples.lock().clear();
    }
}

impl Default for PerformanceHistory {
    fn default() -> Self {
        Self::new(crate::config::EngineConfig::default().history_capacity)
    }
}
