//! Sentence boundary splitting.
//!
//! Best-effort regex boundary: sentence-terminal punctuation followed by
//! whitespace, or end of text. Abbreviation handling is deliberately out:
//! clinical notes are short declarative prose and the downstream dedup is
//! tolerant of an occasional over-split. The regex is an implementation
//! detail; callers only see the iterator.

use regex::Regex;

/// Splits raw text into trimmed, non-empty sentences.
pub struct SentenceSplitter {
    boundary: Regex,
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceSplitter {
    pub fn new() -> Self {
        // Fixed literal; cannot fail to compile.
        let boundary = Regex::new(r"[.!?]\s+").expect("sentence boundary pattern is valid");
        Self { boundary }
    }

    /// Lazy, finite, restartable sequence of sentences in source order.
    ///
    /// Empty or whitespace-only input yields an empty sequence. Each
    /// returned slice keeps its terminal punctuation and original casing.
    pub fn split<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let mut rest = text;
        std::iter::from_fn(move || loop {
            if rest.is_empty() {
                return None;
            }
            match self.boundary.find(rest) {
                Some(m) => {
                    let (head, tail) = rest.split_at(m.end());
                    rest = tail;
                    let sentence = head.trim();
                    if !sentence.is_empty() {
                        return Some(sentence);
                    }
                }
                None => {
                    let sentence = rest.trim();
                    rest = "";
                    if !sentence.is_empty() {
                        return Some(sentence);
                    }
                    return None;
                }
            }
        })
    }
}
