//! Text normalization, tokenization and word multisets

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lowercase the text and drop everything that is not an ASCII letter or whitespace.
///
/// Digits and punctuation vanish entirely, so `"C++ 3.0"` normalizes to `"c "`.
pub fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect()
}

/// Normalize and split on whitespace
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Characters that continue a word for whole-word matching
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True when `text[start..end]` is not glued to a word character on either side
pub fn has_word_boundaries(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start].chars().next_back().map_or(true, |c| !is_word_char(c));
    let after_ok = text[end..].chars().next().map_or(true, |c| !is_word_char(c));
    before_ok && after_ok
}

/// Case-insensitive whole-word search for a phrase.
///
/// A phrase may itself contain spaces or symbols (`"machine learning"`, `"c++"`);
/// only its two ends are checked against neighbouring word characters.
pub fn contains_whole_word(text: &str, phrase: &str) -> bool {
    let phrase = phrase.trim().to_lowercase();
    if phrase.is_empty() {
        return false;
    }
    let text = text.to_lowercase();
    text.match_indices(phrase.as_str())
        .any(|(start, matched)| has_word_boundaries(&text, start, start + matched.len()))
}

/// Token → occurrence count
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordMultiset {
    counts: BTreeMap<String, usize>,
}

impl WordMultiset {
    pub fn from_text(text: &str) -> Self {
        tokenize(text).into_iter().collect()
    }

    pub fn count(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct tokens
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.counts.contains_key(token)
    }

    /// Distinct tokens in ascending order
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(token, count)| (token.as_str(), *count))
    }

    /// Size of the multiset intersection: Σ min(self[t], other[t])
    pub fn overlap(&self, other: &WordMultiset) -> usize {
        self.iter()
            .map(|(token, count)| count.min(other.count(token)))
            .sum()
    }
}

impl FromIterator<String> for WordMultiset {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut counts = BTreeMap::new();
        for token in iter {
            *counts.entry(token).or_insert(0) += 1;
        }
        Self { counts }
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for WordMultiset {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        let mut counts = BTreeMap::new();
        for (token, count) in iter {
            if count > 0 {
                *counts.entry(token.into()).or_insert(0) += count;
            }
        }
        Self { counts }
    }
}
