// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Engine configuration: cache sizes, fuzzy policy, indexing budgets.
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Values that would break an invariant (a zero-capacity cache, a
//! threshold outside `(0, 1]`) are corrected by `sanitized` with a warning.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Below this many exact occurrences of a term in a document, fuzzy matching
/// joins in. Three keeps typo tolerance for rare words without diluting
/// results for terms the document clearly contains.
pub const DEFAULT_FUZZY_TRIGGER: usize = 3;

/// Minimum normalized similarity for a fuzzy match.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Full documents held in the LRU content cache.
    pub cache_capacity: usize,
    /// Computed snippets held by the highlighter.
    pub snippet_cache_capacity: usize,
    /// Samples kept per operation in the performance history.
    pub history_capacity: usize,
    pub fuzzy_threshold: f64,
    pub fuzzy_trigger: usize,
    /// Characters indexed per document before it is flagged truncated.
    pub max_indexed_chars: usize,
    /// Wall-clock budget for indexing one document, in milliseconds.
    pub index_time_budget_ms: u64,
    pub default_max_results: usize,
    pub default_context_length: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 10,
            snippet_cache_capacity: 50,
            history_capacity: 20,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            fuzzy_trigger: DEFAULT_FUZZY_TRIGGER,
            max_indexed_chars: 4 * 1024 * 1024,
            index_time_budget_ms: 2_000,
            default_max_results: 200,
            default_context_length: 80,
        }
    }
}

/// Limits the indexer enforces per document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexLimits {
    pub max_chars: usize,
    pub time_budget: Duration,
}

impl Default for IndexLimits {
    fn default() -> Self {
        EngineConfig::default().index_limits()
    }
}

impl EngineConfig {
    /// Load a JSON config file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, String> {
        let raw = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
        let config: EngineConfig = serde_json::from_str(&raw)
            .map_err(|e| format!("Invalid config JSON in {}: {}", path.display(), e))?;
        Ok(config.sanitized())
    }

    /// Correct values that would violate an invariant.
    pub fn sanitized(mut self) -> Self {
        let defaults = EngineConfig::default();
        for (name, value, fallback) in [
            ("cacheCapacity", &mut self.cache_capacity, defaults.cache_capacity),
            (
                "snippetCacheCapacity",
                &mut self.snippet_cache_capacity,
                defaults.snippet_cache_capacity,
            ),
            ("historyCapacity", &mut self.history_capacity, defaults.history_capacity),
            (
                "defaultMaxResults",
                &mut self.default_max_results,
                defaults.default_max_results,
            ),
        ] {
            if *value == 0 {
                tracing::warn!("{} must be positive, using {}", name, fallback);
                *value = fallback;
            }
        }
        if !(self.fuzzy_threshold > 0.0 && self.fuzzy_threshold <= 1.0) {
            tracing::warn!(
                threshold = self.fuzzy_threshold,
                "fuzzyThreshold outside (0, 1], using {}",
                DEFAULT_FUZZY_THRESHOLD
            );
            self.fuzzy_threshold = DEFAULT_FUZZY_THRESHOLD;
        }
        self
    }

    pub fn index_limits(&self) -> IndexLimits {
        IndexLimits {
            max_chars: self.max_indexed_chars,
            time_budget: Duration::from_millis(self.index_time_budget_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"cacheCapacity": 3}"#).unwrap();
        assert_eq!(config.cache_capacity, 3);
        assert_eq!(config.snippet_cache_capacity, 50);
        assert_eq!(config.fuzzy_trigger, DEFAULT_FUZZY_TRIGGER);
    }

    #[test]
    fn test_sanitized_fixes_zero_capacity_and_bad_threshold() {
        let config = EngineConfig {
            cache_capacity: 0,
            fuzzy_threshold: 1.5,
            ..EngineConfig::default()
        }
        .sanitized();
        assert_eq!(config.cache_capacity, 10);
        assert_eq!(config.fuzzy_threshold, DEFAULT_FUZZY_THRESHOLD);
    }

    #[test]
    fn test_index_limits_from_config() {
        let config = EngineConfig {
            max_indexed_chars: 100,
            index_time_budget_ms: 5,
            ..EngineConfig::default()
        };
        let limits = config.index_limits();
        assert_eq!(limits.max_chars, 100);
        assert_eq!(limits.time_budget, Duration::from_millis(5));
    }
}
