//! Text processing: case folding, tokenization, and folded substring search.
//!
//! Folding is defined per character so that a token's folded form can be
//! mapped back onto its original characters. That matters for substring hits:
//! "Café" folds to "cafe", and a match on "fe" has to land on "fé" in the
//! original text, at the original character offset.

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::UnicodeNormalization;

/// Word boundary detection: checks if character is a word separator.
#[inline]
pub fn is_word_boundary(c: char) -> bool {
    !c.is_alphanumeric()
}

/// Fold one character into `out`: strip diacritics, then lowercase.
///
/// # Algorithm (with unicode-normalization feature)
///
/// 1. NFD normalize (decompose into base + combining marks)
/// 2. Drop combining marks
/// 3. Lowercase what's left
///
/// Without the feature, only step 3 runs.
#[cfg(feature = "unicode-normalization")]
pub fn fold_char_into(c: char, out: &mut String) {
    if c.is_ascii() {
        out.push(c.to_ascii_lowercase());
        return;
    }
    for d in std::iter::once(c).nfd() {
        if !is_combining_mark(d) {
            out.extend(d.to_lowercase());
        }
    }
}

#[cfg(not(feature = "unicode-normalization"))]
pub fn fold_char_into(c: char, out: &mut String) {
    out.extend(c.to_lowercase());
}

/// Case-fold a string for case-insensitive matching.
///
/// - "Setup" → "setup"
/// - "café" → "cafe" (with unicode-normalization)
pub fn fold(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        fold_char_into(c, &mut out);
    }
    out
}

/// Normalize a term for lookup: folded unless the search is case-sensitive.
pub fn normalize_term(value: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        value.to_string()
    } else {
        fold(value)
    }
}

/// Check if a character is a combining mark (diacritic).
#[cfg(feature = "unicode-normalization")]
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1AB0}'..='\u{1AFF}' |  // Combining Diacritical Marks Extended
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}

// =============================================================================
// TOKENIZER
// =============================================================================

/// A token with its location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    /// Character offset from the start of the text.
    pub offset: usize,
    /// Length in characters.
    pub length: usize,
    /// 1-based line number.
    pub line: usize,
}

/// Streaming tokenizer over alphanumeric runs.
///
/// Offsets are cumulative across lines: newlines count as one character each,
/// so `offset` indexes the document as a whole. Being an iterator lets the
/// indexer stop early when a budget runs out.
pub struct Tokens<'a> {
    text: &'a str,
    chars: std::str::CharIndices<'a>,
    char_pos: usize,
    line: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.char_indices(),
            char_pos: 0,
            line: 1,
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        // Skip separators, counting lines as we go
        let (start_byte, start_char) = loop {
            let (byte, c) = self.chars.next()?;
            let pos = self.char_pos;
            self.char_pos += 1;
            if !is_word_boundary(c) {
                break (byte, pos);
            }
            if c == '\n' {
                self.line += 1;
            }
        };

        let line = self.line;
        let mut end_byte = self.text.len();
        loop {
            match self.chars.next() {
                Some((byte, c)) if is_word_boundary(c) => {
                    end_byte = byte;
                    self.char_pos += 1;
                    if c == '\n' {
                        self.line += 1;
                    }
                    break;
                }
                Some(_) => self.char_pos += 1,
                None => break,
            }
        }

        let text = &self.text[start_byte..end_byte];
        let length = if end_byte == self.text.len() {
            self.char_pos - start_char
        } else {
            // char_pos already stepped past the separator
            self.char_pos - start_char - 1
        };
        Some(Token {
            text,
            offset: start_char,
            length,
            line,
        })
    }
}

/// Split a query into distinct terms, in first-seen order.
///
/// Uses the document tokenizer so "setup." finds what indexing stored as "setup".
pub fn query_terms(query: &str, case_sensitive: bool) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for token in Tokens::new(query) {
        let term = normalize_term(token.text, case_sensitive);
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

/// Find `needle` inside `surface`, comparing folded text unless `case_sensitive`.
///
/// Returns `(char_offset, char_length)` pairs measured in the *original*
/// surface, non-overlapping, left to right. `needle` must already be
/// normalized the same way.
pub fn find_folded(surface: &str, needle: &str, case_sensitive: bool) -> Vec<(usize, usize)> {
    if needle.is_empty() {
        return Vec::new();
    }

    // Folded characters paired with the index of the original char they came from
    let mut folded: Vec<(char, usize)> = Vec::with_capacity(surface.len());
    let mut piece = String::new();
    for (i, c) in surface.chars().enumerate() {
        if case_sensitive {
            folded.push((c, i));
        } else {
            piece.clear();
            fold_char_into(c, &mut piece);
            folded.extend(piece.chars().map(|f| (f, i)));
        }
    }

    let needle: Vec<char> = needle.chars().collect();
    let mut hits = Vec::new();
    let mut i = 0;
    while i + needle.len() <= folded.len() {
        let window = &folded[i..i + needle.len()];
        if window.iter().map(|(c, _)| *c).eq(needle.iter().copied()) {
            let start = window[0].1;
            let end = window[needle.len() - 1].1 + 1;
            hits.push((start, end - start));
            i += needle.len();
        } else {
            i += 1;
        }
    }
    hits
}
