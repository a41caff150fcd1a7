//! Phrase normalization, stop-word filtering, and prefix expansion.

use std::collections::HashSet;

/// Minimum letters a word needs to be indexed (and the shortest prefix).
pub const MIN_LETTERS: usize = 2;

/// Words never indexed or matched.
pub const DEFAULT_STOP_WORDS: &[&str] = &["and", "or", "the"];

/// Turns raw phrases into a canonical, comparable set of searchable prefixes.
///
/// Stop words and the minimum-letters threshold are fixed at construction;
/// both `store` and `remove` must run the same filter so the prefixes removed
/// match the prefixes written.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    min_letters: usize,
    stop_words: HashSet<String>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(
            MIN_LETTERS,
            DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()),
        )
    }
}

impl Tokenizer {
    /// Create a tokenizer with an explicit filter configuration.
    pub fn new(min_letters: usize, stop_words: impl IntoIterator<Item = String>) -> Self {
        Self {
            min_letters,
            stop_words: stop_words.into_iter().collect(),
        }
    }

    /// Normalize a phrase: lowercase, turn `,` / `, ` into `_`, and strip
    /// everything outside `[a-z0-9_ ]`.
    ///
    /// The comma rule keeps inverted names as one token, so "Smith, John"
    /// normalizes to "smith_john" instead of two words.
    pub fn normalize(&self, phrase: &str) -> String {
        let mut out = String::with_capacity(phrase.len());
        let mut chars = phrase.chars().peekable();

        while let Some(c) = chars.next() {
            if c == ',' {
                if chars.peek() == Some(&' ') {
                    chars.next();
                }
                out.push('_');
                continue;
            }
            for lc in c.to_lowercase() {
                if matches!(lc, 'a'..='z' | '0'..='9' | '_' | ' ') {
                    out.push(lc);
                }
            }
        }

        out
    }

    /// Split a normalized phrase into the words worth indexing.
    ///
    /// Splits on single spaces, drops stop words and words shorter than the
    /// minimum. Order and duplicates are preserved.
    pub fn words(&self, normalized: &str) -> Vec<String> {
        normalized
            .split(' ')
            .filter(|w| w.len() >= self.min_letters && !self.stop_words.contains(*w))
            .map(|w| w.to_string())
            .collect()
    }

    /// Every prefix of `word` from the minimum length up to the full word,
    /// e.g. "care" gives ["ca", "car", "care"].
    ///
    /// A word shorter than the minimum yields nothing; `words` already
    /// filters these but direct callers may pass arbitrary tokens. Lengths
    /// count characters, so non-ASCII input never splits a char.
    pub fn word_prefixes(&self, word: &str) -> Vec<String> {
        let mut prefixes = Vec::new();
        let mut chars_seen = 0;
        for (i, c) in word.char_indices() {
            chars_seen += 1;
            if chars_seen >= self.min_letters {
                prefixes.push(word[..i + c.len_utf8()].to_string());
            }
        }
        prefixes
    }

    /// Prefixes for a sequence of words, concatenated in order.
    ///
    /// Duplicates are allowed; the sorted-set writes downstream dedupe
    /// naturally.
    pub fn phrase_prefixes<W: AsRef<str>>(&self, words: &[W]) -> Vec<String> {
        words
            .iter()
            .flat_map(|w| self.word_prefixes(w.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_strips() {
        let t = Tokenizer::default();
        assert_eq!(t.normalize("Hello World!"), "hello world");
        assert_eq!(t.normalize("café-bar #9"), "cafbar 9");
    }

    #[test]
    fn test_normalize_comma_joins_names() {
        let t = Tokenizer::default();
        assert_eq!(t.normalize("Smith, John"), "smith_john");
        assert_eq!(t.normalize("smith,john"), "smith_john");
    }

    #[test]
    fn test_words_filters_stop_words_and_short_tokens() {
        let t = Tokenizer::default();
        assert_eq!(
            t.words("the cat and a dog or i"),
            vec!["cat".to_string(), "dog".to_string()]
        );
    }

    #[test]
    fn test_words_preserves_order_and_duplicates() {
        let t = Tokenizer::default();
        assert_eq!(
            t.words("cars cat cars"),
            vec!["cars".to_string(), "cat".to_string(), "cars".to_string()]
        );
    }

    #[test]
    fn test_word_prefixes() {
        let t = Tokenizer::default();
        assert_eq!(t.word_prefixes("care"), vec!["ca", "car", "care"]);
        assert_eq!(t.word_prefixes("ca"), vec!["ca"]);
    }

    #[test]
    fn test_word_prefixes_short_word_yields_nothing() {
        let t = Tokenizer::default();
        assert!(t.word_prefixes("a").is_empty());
        assert!(t.word_prefixes("").is_empty());
    }

    #[test]
    fn test_word_prefixes_non_ascii_input() {
        let t = Tokenizer::default();
        assert_eq!(t.word_prefixes("ééé"), vec!["éé", "ééé"]);
        assert!(t.word_prefixes("é").is_empty());
    }

    #[test]
    fn test_phrase_prefixes_concatenates_in_order() {
        let t = Tokenizer::default();
        assert_eq!(
            t.phrase_prefixes(&["cat", "car"]),
            vec!["ca", "cat", "ca", "car"]
        );
    }
}
