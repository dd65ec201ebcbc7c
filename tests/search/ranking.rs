//! Result ordering: heading dominance, tie-breaks, truncation.

use super::common::{fixture, make_document, make_outlined_document, whole_words};
use quire::{DocId, MatchType, SearchOptions};

#[test]
fn test_heading_hit_outranks_body_hit_in_lower_doc_id() {
    let f = fixture();
    f.add(make_document(1, "install the plugin"));
    f.add(make_outlined_document(2, "# Plugin\ntext"));

    let results = f.search_all("plugin", &SearchOptions::default());
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].doc_id, DocId(2));
    assert_eq!(results[0].score, 2.0);
    assert_eq!(results[1].doc_id, DocId(1));
    assert_eq!(results[1].score, 1.0);
}

#[test]
fn test_equal_scores_order_by_document_then_offset() {
    let f = fixture();
    f.add(make_document(3, "alpha beta alpha"));
    f.add(make_document(1, "alpha beta alpha"));

    let results = f.search_all("alpha", &whole_words());
    let order: Vec<(u32, u32)> = results
        .iter()
        .map(|r| (r.doc_id.get(), r.position.global_offset))
        .collect();
    assert_eq!(order, vec![(1, 0), (1, 11), (3, 0), (3, 11)]);
}

#[test]
fn test_exact_outranks_fuzzy() {
    let f = fixture();
    f.add(make_document(1, "hello world wrold"));

    let results = f.search_all("world", &SearchOptions::default());
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].match_type, MatchType::Exact);
    assert_eq!(results[0].position.global_offset, 6);
    assert_eq!(results[1].match_type, MatchType::Fuzzy { similarity: 0.8 });
    assert_eq!(results[1].position.global_offset, 12);
}

#[test]
fn test_scores_are_not_capped() {
    let f = fixture();
    f.add(make_outlined_document(1, "# Release Notes Archive\nbody"));

    let results = f.search_all("release notes archive", &SearchOptions::default());
    assert_eq!(results[0].match_type, MatchType::Structural);
    // three terms, structural bonus, heading bonus
    assert_eq!(results[0].score, 5.0);
    assert!(results.iter().all(|r| r.score > 1.0));
}

#[test]
fn test_max_results_truncates_globally() {
    let f = fixture();
    for id in 1..=5 {
        f.add(make_document(id, "note note"));
    }

    let options = SearchOptions {
        max_results: 3,
        ..whole_words()
    };
    let results = f.search_all("note", &options);
    let order: Vec<(u32, u32)> = results
        .iter()
        .map(|r| (r.doc_id.get(), r.position.global_offset))
        .collect();
    assert_eq!(order, vec![(1, 0), (1, 5), (2, 0)]);
}

#[test]
fn test_repeated_query_is_deterministic() {
    let f = fixture();
    for id in 1..=4 {
        f.add(make_outlined_document(
            id,
            "# Setup guide\nsetup steps\n```\nsetup()\n```\n[setup](setup.md)",
        ));
    }

    let first = f.search_all("setup", &SearchOptions::default());
    for _ in 0..5 {
        assert_eq!(f.search_all("setup", &SearchOptions::default()), first);
    }
    assert!(first.windows(2).all(|w| w[0].score >= w[1].score));
}
