//! End-to-end query scenarios: exact, substring, fuzzy and structural matches.

use super::common::{
    fixture, make_document, make_outlined_document, matched_text, offsets, whole_words,
    SETUP_CONTENT,
};
use quire::{DocId, ElementType, MatchType, SearchError, SearchOptions, TabSet};

// ============================================================================
// EXACT MATCHES
// ============================================================================

#[test]
fn test_setup_finds_heading_and_body_occurrences() {
    let f = fixture();
    f.add(make_outlined_document(1, SETUP_CONTENT));

    let results = f.search_one("setup", 1, &SearchOptions::default());
    assert_eq!(results.len(), 3);

    // Heading occurrence ranks first
    assert_eq!(results[0].position.element, ElementType::Heading(1));
    assert_eq!(results[0].position.global_offset, 2);
    assert_eq!(results[0].position.line, 1);
    assert_eq!(results[0].score, 2.0);

    assert_eq!(offsets(&results[1..]), vec![16, 30]);
    assert_eq!(results[1].position.line, 2);
    assert_eq!(results[2].position.line, 3);
    for result in &results[1..] {
        assert_eq!(result.position.element, ElementType::Body);
        assert_eq!(result.score, 1.0);
    }

    for result in &results {
        assert_eq!(result.match_type, MatchType::Exact);
        assert_eq!(matched_text(SETUP_CONTENT, result).to_lowercase(), "setup");
    }
}

#[test]
fn test_whole_words_toggles_substring_matches() {
    let f = fixture();
    let content = "concatenate the cats";
    f.add(make_document(2, content));

    let loose = f.search_one("cat", 2, &SearchOptions::default());
    assert_eq!(offsets(&loose), vec![3, 16]);
    for result in &loose {
        assert_eq!(matched_text(content, result), "cat");
    }

    assert!(f.search_one("cat", 2, &whole_words()).is_empty());
}

#[test]
fn test_whole_words_finds_standalone_token() {
    let f = fixture();
    f.add(make_document(3, "the cat sat on a mat"));

    let results = f.search_one("cat", 3, &whole_words());
    assert_eq!(offsets(&results), vec![4]);
    assert_eq!(results[0].position.length, 3);
}

#[test]
fn test_query_punctuation_is_ignored() {
    let f = fixture();
    f.add(make_document(4, "Run the setup script."));

    let results = f.search_one("setup.", 4, &whole_words());
    assert_eq!(offsets(&results), vec![8]);
}

#[cfg(feature = "unicode-normalization")]
#[test]
fn test_diacritics_fold_away() {
    let f = fixture();
    let content = "Café au lait";
    f.add(make_document(5, content));

    let results = f.search_one("cafe", 5, &whole_words());
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].position.global_offset, 0);
    assert_eq!(matched_text(content, &results[0]), "Café");
}

// ============================================================================
// FUZZY MATCHES
// ============================================================================

#[test]
fn test_transposed_letters_match_fuzzily() {
    let f = fixture();
    f.add(make_document(6, "hello world"));

    let results = f.search_one("wrold", 6, &SearchOptions::default());
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].match_type, MatchType::Fuzzy { similarity: 0.8 });
    assert_eq!(results[0].score, 0.8);
    assert_eq!(results[0].position.global_offset, 6);
    assert_eq!(results[0].position.length, 5);
}

#[test]
fn test_absent_term_returns_nothing() {
    let f = fixture();
    f.add(make_document(7, "hello world"));

    assert!(f.search_one("zebra", 7, &SearchOptions::default()).is_empty());
    assert!(f.search_one("   ...  ", 7, &SearchOptions::default()).is_empty());
}

// ============================================================================
// STRUCTURAL MATCHES
// ============================================================================

#[test]
fn test_query_spelling_out_heading_adds_structural_result() {
    let f = fixture();
    f.add(make_outlined_document(8, "# Getting Started\nRead this first."));

    let results = f.search_one("getting started", 8, &SearchOptions::default());
    assert_eq!(results.len(), 3);

    let structural = &results[0];
    assert_eq!(structural.match_type, MatchType::Structural);
    assert_eq!(structural.score, 4.0);
    assert_eq!(structural.position.global_offset, 0);
    assert_eq!(structural.position.length, 17);

    assert_eq!(offsets(&results[1..]), vec![2, 10]);
    assert!(results[1..].iter().all(|r| r.score == 2.0));
}

#[test]
fn test_headings_only_drops_body_occurrences() {
    let f = fixture();
    f.add(make_outlined_document(9, SETUP_CONTENT));

    let options = SearchOptions {
        headings_only: true,
        ..SearchOptions::default()
    };
    let results = f.search_one("setup", 9, &options);
    assert_eq!(results.len(), 1);
    assert!(results[0].position.element.is_heading());
}

// ============================================================================
// SCOPE ERRORS
// ============================================================================

#[test]
fn test_empty_index_answers_with_no_results() {
    let f = fixture();
    let tabs = TabSet::new(Some(DocId(1)), vec![DocId(1)]);
    let results = f.engine.search("setup", &SearchOptions::default(), &tabs).unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_current_scope_without_current_document() {
    let f = fixture();
    f.add(make_document(1, "text"));

    let tabs = TabSet::new(None, vec![DocId(1)]);
    let err = f
        .engine
        .search("text", &SearchOptions::default(), &tabs)
        .unwrap_err();
    assert!(matches!(err, SearchError::NoCurrentDocument));
}

#[test]
fn test_current_document_never_indexed() {
    let f = fixture();
    f.add(make_document(1, "text"));

    let tabs = TabSet::new(Some(DocId(9)), vec![DocId(9)]);
    let err = f
        .engine
        .search("text", &SearchOptions::default(), &tabs)
        .unwrap_err();
    assert!(matches!(err, SearchError::DocumentNotIndexed(DocId(9))));
}

#[test]
fn test_invalid_options_fall_back_to_defaults() {
    let f = fixture();
    f.add(make_outlined_document(1, SETUP_CONTENT));

    let options = SearchOptions {
        context_length: -5,
        max_results: 0,
        ..SearchOptions::default()
    };
    let results = f.search_one("setup", 1, &options);
    assert_eq!(results.len(), 3);

    let snippet = f.engine.highlight(&results[0], &options).get().unwrap();
    assert_eq!(snippet.matched(), "Setup");
}
