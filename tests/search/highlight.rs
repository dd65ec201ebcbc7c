//! Lazy snippets: deferred computation, cache eviction and refetch.

use super::common::{fixture, fixture_with, make_document, make_outlined_document, SETUP_CONTENT};
use quire::{DocId, EngineConfig, SearchError, SearchOptions};

#[test]
fn test_snippet_is_computed_on_first_access() {
    let f = fixture();
    f.add(make_outlined_document(1, SETUP_CONTENT));
    let options = SearchOptions::default();
    let results = f.search_one("setup", 1, &options);
    assert_eq!(f.engine.highlighter().cached_snippets(), 0);

    let lazy = f.engine.highlight(&results[0], &options);
    assert!(!lazy.is_computed());
    assert_eq!(f.engine.highlighter().cached_snippets(), 0);

    let snippet = lazy.get().unwrap();
    assert!(lazy.is_computed());
    assert_eq!(snippet.matched(), "Setup");
    assert_eq!(f.engine.highlighter().cached_snippets(), 1);
}

#[test]
fn test_snippet_context_and_ellipses() {
    let f = fixture();
    f.add(make_document(1, "hello world"));
    let options = SearchOptions {
        context_length: 4,
        ..SearchOptions::default()
    };
    let results = f.search_one("wrold", 1, &options);

    let snippet = f.engine.highlight(&results[0], &options).get().unwrap();
    assert_eq!(snippet.text, "o world");
    assert_eq!(snippet.highlight, 2..7);
    assert!(snippet.leading_ellipsis);
    assert!(!snippet.trailing_ellipsis);
    assert_eq!(snippet.render("[", "]"), "…o [world]");
}

#[test]
fn test_snippet_flattens_line_breaks() {
    let f = fixture();
    f.add(make_outlined_document(1, SETUP_CONTENT));
    let options = SearchOptions {
        context_length: 20,
        ..SearchOptions::default()
    };
    let results = f.search_one("setup", 1, &options);
    for result in &results {
        let snippet = f.engine.highlight(result, &options).get().unwrap();
        assert!(!snippet.text.contains('\n'), "{:?}", snippet.text);
    }
}

#[test]
fn test_no_context_requested_means_no_snippet() {
    let f = fixture();
    f.add(make_document(1, "hello world"));
    let options = SearchOptions {
        include_context: false,
        ..SearchOptions::default()
    };
    let results = f.search_one("world", 1, &options);
    assert!(f.engine.snippet(&results[0], &options).unwrap().is_none());
}

#[test]
fn test_evicted_content_is_refetched_for_snippets() {
    let f = fixture_with(EngineConfig {
        cache_capacity: 1,
        ..EngineConfig::default()
    });
    f.add(make_document(1, "first document body"));
    f.add(make_document(2, "second document body"));
    assert!(!f.engine.cache().contains(DocId(1)));

    // Eviction doesn't affect searchability
    let options = SearchOptions::default();
    let results = f.search_one("first", 1, &options);
    assert_eq!(results.len(), 1);

    let loads_before = f.source.loads();
    let snippet = f.engine.highlight(&results[0], &options).get().unwrap();
    assert_eq!(snippet.matched(), "first");
    assert_eq!(f.source.loads(), loads_before + 1);
    assert!(f.engine.cache().contains(DocId(1)));
    assert!(!f.engine.cache().contains(DocId(2)));
}

#[test]
fn test_unavailable_content_is_retried_later() {
    let f = fixture_with(EngineConfig {
        cache_capacity: 1,
        ..EngineConfig::default()
    });
    let document = make_document(1, "first document body");
    f.add(document.clone());
    f.add(make_document(2, "second document body"));
    f.source.remove(DocId(1));

    let options = SearchOptions::default();
    let results = f.search_one("first", 1, &options);
    let lazy = f.engine.highlight(&results[0], &options);
    assert!(matches!(lazy.get(), Err(SearchError::ContentUnavailable(DocId(1)))));
    assert!(!lazy.is_computed());

    f.source.insert(document);
    assert_eq!(lazy.get().unwrap().matched(), "first");
}

#[test]
fn test_reindex_invalidates_cached_snippets() {
    let f = fixture();
    f.add(make_document(1, "alpha beta"));
    let options = SearchOptions::default();
    let results = f.search_one("beta", 1, &options);
    f.engine.highlight(&results[0], &options).get().unwrap();
    assert_eq!(f.engine.highlighter().cached_snippets(), 1);

    f.add(make_document(1, "gamma beta"));
    assert_eq!(f.engine.highlighter().cached_snippets(), 0);

    let results = f.search_one("beta", 1, &options);
    let snippet = f.engine.highlight(&results[0], &options).get().unwrap();
    assert_eq!(snippet.text, "gamma beta");
}

#[test]
fn test_snippet_cache_is_bounded() {
    let f = fixture_with(EngineConfig {
        snippet_cache_capacity: 2,
        ..EngineConfig::default()
    });
    f.add(make_document(1, "word word word word"));
    let options = SearchOptions::default();
    let results = f.search_one("word", 1, &options);
    assert_eq!(results.len(), 4);

    for result in &results {
        f.engine.highlight(result, &options).get().unwrap();
    }
    assert_eq!(f.engine.highlighter().cached_snippets(), 2);
    assert_eq!(f.engine.stats().cached_snippets, 2);
}
