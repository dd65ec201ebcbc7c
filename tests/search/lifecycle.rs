//! Indexing lifecycle: reindex, removal, failure and truncation.

use super::common::{fixture, fixture_with, make_document, whole_words};
use quire::{
    DocId, Document, EngineConfig, HeadingRange, IndexStatus, SearchError, SearchOptions,
    SearchScope, Structure, TabSet,
};

fn broken_document(id: u32) -> Document {
    Document {
        structure: Structure {
            headings: vec![HeadingRange {
                level: 1,
                start: 0,
                end: 999,
            }],
            ..Structure::default()
        },
        ..make_document(id, "short text")
    }
}

#[test]
fn test_reindex_drops_stale_postings() {
    let f = fixture();
    f.add(make_document(1, "old words here"));
    f.add(make_document(1, "new text"));

    assert!(f.search_all("old", &whole_words()).is_empty());
    assert_eq!(f.search_all("new", &whole_words()).len(), 1);

    let entry = f.engine.registry().get(DocId(1)).unwrap();
    assert_eq!(entry.revision, 2);
    assert_eq!(entry.size, 8);
    assert_eq!(entry.status, IndexStatus::Ready { truncated: false });
}

#[test]
fn test_reindex_same_content_is_idempotent() {
    let f = fixture();
    let document = make_document(1, "alpha beta\ngamma alpha");
    f.add(document.clone());
    let before = f.engine.index().document(DocId(1)).unwrap().posting_set();

    f.add(document);
    let after = f.engine.index().document(DocId(1)).unwrap().posting_set();
    assert_eq!(before, after);
    assert_eq!(f.engine.index().stats().postings, 4);
}

#[test]
fn test_remove_leaves_other_documents_searchable() {
    let f = fixture();
    f.add(make_document(1, "shared term"));
    f.add(make_document(2, "shared term"));

    assert!(f.engine.remove_document(DocId(1)));
    assert!(!f.engine.remove_document(DocId(1)));

    let results = f.search_all("shared", &whole_words());
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].doc_id, DocId(2));
    assert!(f.engine.registry().get(DocId(1)).is_none());
    assert!(!f.engine.cache().contains(DocId(1)));
    assert_eq!(f.engine.index().documents_with_term("shared"), vec![DocId(2)]);
}

#[test]
fn test_invalid_structure_marks_document_failed() {
    let f = fixture();
    let report = f.engine.index_document(broken_document(2));

    assert!(matches!(report.status, IndexStatus::Failed { .. }));
    assert!(!f.engine.index().contains(DocId(2)));
    assert!(!f.engine.cache().contains(DocId(2)));
    assert!(matches!(
        f.engine.registry().status(DocId(2)),
        Some(IndexStatus::Failed { .. })
    ));
}

#[test]
fn test_failed_document_is_excluded_from_multi_document_search() {
    let f = fixture();
    f.add(make_document(1, "short text"));
    f.engine.index_document(broken_document(2));

    let options = SearchOptions {
        scope: SearchScope::AllOpenDocuments,
        ..whole_words()
    };
    // 3 was never indexed at all
    let tabs = TabSet::new(None, vec![DocId(1), DocId(2), DocId(3)]);
    let results = f.engine.search("text", &options, &tabs).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].doc_id, DocId(1));
}

#[test]
fn test_failed_current_document_reports_reason() {
    let f = fixture();
    f.add(make_document(1, "short text"));
    f.engine.index_document(broken_document(2));

    let tabs = TabSet::new(Some(DocId(2)), vec![DocId(2)]);
    let err = f
        .engine
        .search("text", &SearchOptions::default(), &tabs)
        .unwrap_err();
    match err {
        SearchError::IndexingFailed { id, reason } => {
            assert_eq!(id, DocId(2));
            assert!(reason.contains("invalid structure"), "{}", reason);
        }
        other => panic!("expected IndexingFailed, got {:?}", other),
    }
}

#[test]
fn test_fixing_a_failed_document_makes_it_searchable() {
    let f = fixture();
    f.engine.index_document(broken_document(2));
    f.add(make_document(2, "short text"));

    assert_eq!(f.search_one("short", 2, &whole_words()).len(), 1);
}

#[test]
fn test_oversized_document_is_truncated_but_searchable() {
    let f = fixture_with(EngineConfig {
        max_indexed_chars: 10,
        ..EngineConfig::default()
    });
    let report = f
        .engine
        .index_document(make_document(1, "alpha beta gamma delta"));
    assert_eq!(report.status, IndexStatus::Ready { truncated: true });
    assert!(report.truncated);

    let tabs = TabSet::new(Some(DocId(1)), vec![DocId(1)]);
    let found = f.engine.search("beta", &whole_words(), &tabs).unwrap();
    assert_eq!(found.len(), 1);
    let missing = f.engine.search("gamma", &whole_words(), &tabs).unwrap();
    assert!(missing.is_empty());
}
