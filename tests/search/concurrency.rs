//! Concurrent indexing and querying, and query supersession.

use super::common::{fixture, make_document, whole_words};
use quire::{DocId, MatchType, QueryToken, SearchError, SearchOptions, SearchScope, TabSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

#[test]
fn test_parallel_indexing_of_distinct_documents() {
    let f = fixture();
    thread::scope(|scope| {
        for worker in 0..8u32 {
            let f = &f;
            scope.spawn(move || {
                for n in 0..10u32 {
                    let id = worker * 100 + n;
                    f.add(make_document(id, &format!("shared marker{} text", id)));
                }
            });
        }
    });

    assert_eq!(f.engine.index().len(), 80);
    assert_eq!(f.engine.registry().len(), 80);

    let options = SearchOptions {
        max_results: 1000,
        ..whole_words()
    };
    assert_eq!(f.search_all("shared", &options).len(), 80);

    // Neighbouring markers are one edit away and come back as fuzzy hits
    let results = f.search_all("marker305", &options);
    let exact: Vec<_> = results
        .iter()
        .filter(|r| r.match_type == MatchType::Exact)
        .collect();
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].doc_id, DocId(305));
    assert_eq!(results[0].doc_id, DocId(305));
}

#[test]
fn test_batch_indexing_keeps_input_order() {
    let f = fixture();
    let documents: Vec<_> = (0..20).rev().map(|id| make_document(id, "batch")).collect();
    let reports = f.engine.index_documents(documents);

    let ids: Vec<u32> = reports.iter().map(|r| r.id.get()).collect();
    assert_eq!(ids, (0..20).rev().collect::<Vec<_>>());
    assert!(reports.iter().all(|r| r.status.is_ready()));
}

#[test]
fn test_readers_never_see_a_half_built_document() {
    let f = fixture();
    f.add(make_document(1, "alpha one"));
    let done = AtomicBool::new(false);
    let tabs = TabSet::new(Some(DocId(1)), vec![DocId(1)]);

    thread::scope(|scope| {
        scope.spawn(|| {
            for round in 0..200 {
                let content = if round % 2 == 0 { "alpha two" } else { "alpha one" };
                f.add(make_document(1, content));
            }
            done.store(true, Ordering::Release);
        });

        for _ in 0..4 {
            scope.spawn(|| {
                // Detached tokens keep the readers from superseding each other
                let token = QueryToken::detached();
                while !done.load(Ordering::Acquire) {
                    let results = f
                        .engine
                        .search_with("alpha", &whole_words(), &tabs, &token)
                        .unwrap();
                    assert_eq!(results.len(), 1);
                    assert_eq!(results[0].position.global_offset, 0);
                }
            });
        }
    });

    assert_eq!(f.engine.registry().get(DocId(1)).unwrap().revision, 201);
}

#[test]
fn test_newer_query_supersedes_older() {
    let f = fixture();
    f.add(make_document(1, "alpha beta"));
    let options = SearchOptions {
        scope: SearchScope::AllOpenDocuments,
        ..SearchOptions::default()
    };
    let tabs = TabSet::new(None, vec![DocId(1)]);

    let stale = f.engine.begin_query();
    let fresh = f.engine.begin_query();
    assert!(stale.is_superseded());

    let err = f
        .engine
        .search_with("alpha", &options, &tabs, &stale)
        .unwrap_err();
    assert!(matches!(err, SearchError::Superseded { .. }));

    let results = f.engine.search_with("alpha", &options, &tabs, &fresh).unwrap();
    assert_eq!(results.len(), 1);
}

#[test]
fn test_concurrent_queries_complete_or_are_superseded() {
    let f = fixture();
    for id in 0..10 {
        f.add(make_document(id, "the quick brown fox jumps over the lazy dog"));
    }
    let options = SearchOptions {
        scope: SearchScope::AllOpenDocuments,
        max_results: 1000,
        ..whole_words()
    };
    let tabs = TabSet::new(None, f.engine.index().document_ids());

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..25 {
                    match f.engine.search("fox", &options, &tabs) {
                        Ok(results) => assert_eq!(results.len(), 10),
                        Err(SearchError::Superseded { .. }) => {}
                        Err(other) => panic!("unexpected error: {}", other),
                    }
                }
            });
        }
    });
}
