//! Immutable BIP39 dictionary with word ↔ index lookup.
//!
//! The dictionary is supplied once at startup. Lookups are binary searches
//! over the sorted list, so a custom list must be sorted exactly the way
//! the canonical English list is.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeedError};

/// Number of words in every BIP39 dictionary.
pub const WORDLIST_LEN: usize = 2048;

/// Bits encoded by a single mnemonic word.
pub const BITS_PER_WORD: u32 = 11;

/// Position of a word in the dictionary: an 11-bit value in `[0, 2047]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct WordIndex(u16);

impl WordIndex {
    /// Largest valid index.
    pub const MAX: WordIndex = WordIndex((WORDLIST_LEN - 1) as u16);

    /// Wrap a raw index, rejecting anything that does not fit in 11 bits.
    pub fn new(index: u16) -> Result<Self> {
        if usize::from(index) < WORDLIST_LEN {
            Ok(Self(index))
        } else {
            Err(SeedError::Malformed(format!(
                "word index {index} exceeds {}",
                WORDLIST_LEN - 1
            )))
        }
    }

    /// Build an index from the low 11 bits of `bits`; higher bits are dropped.
    pub fn from_bits(bits: u32) -> Self {
        Self((bits & 0x7ff) as u16)
    }

    pub fn get(self) -> u16 {
        self.0
    }

    pub fn as_usize(self) -> usize {
        usize::from(self.0)
    }
}

impl TryFrom<u16> for WordIndex {
    type Error = SeedError;

    fn try_from(index: u16) -> Result<Self> {
        Self::new(index)
    }
}

impl From<WordIndex> for u16 {
    fn from(index: WordIndex) -> u16 {
        index.0
    }
}

impl std::fmt::Display for WordIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalize a typed word the way the entry screens do before lookup:
/// surrounding whitespace removed, lowercased.
pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Sorted 2048-word dictionary.
#[derive(Debug, Clone)]
pub struct WordlistIndex {
    words: Vec<Cow<'static, str>>,
}

impl WordlistIndex {
    /// Build an index from a supplied dictionary.
    ///
    /// The list must contain exactly 2048 non-empty lowercase words in
    /// strictly ascending order.
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<Cow<'static, str>> =
            words.into_iter().map(|w| Cow::Owned(w.into())).collect();
        Self::validate(&words)?;
        Ok(Self { words })
    }

    /// The canonical English BIP39 dictionary.
    pub fn english() -> Self {
        let words = bip39::Language::English
            .word_list()
            .iter()
            .map(|w| Cow::Borrowed(*w))
            .collect();
        Self { words }
    }

    fn validate(words: &[Cow<'static, str>]) -> Result<()> {
        if words.len() != WORDLIST_LEN {
            return Err(SeedError::Malformed(format!(
                "wordlist has {} words, expected {WORDLIST_LEN}",
                words.len()
            )));
        }
        if let Some(bad) = words
            .iter()
            .find(|w| w.is_empty() || w.chars().any(|c| c.is_uppercase() || c.is_whitespace()))
        {
            return Err(SeedError::Malformed(format!(
                "wordlist entry {bad:?} is not a lowercase word"
            )));
        }
        if let Some(pair) = words.windows(2).find(|p| p[0] >= p[1]) {
            return Err(SeedError::Malformed(format!(
                "wordlist not strictly sorted at {:?} / {:?}",
                pair[0], pair[1]
            )));
        }
        Ok(())
    }

    /// Resolve a word to its dictionary position.
    ///
    /// The word must already be normalized; see [`normalize_word`].
    pub fn lookup(&self, word: &str) -> Result<WordIndex> {
        self.words
            .binary_search_by(|probe| (**probe).cmp(word))
            .map(|i| WordIndex(i as u16))
            .map_err(|_| SeedError::InvalidWord {
                word: word.to_string(),
            })
    }

    /// Direct positional access.
    pub fn word(&self, index: WordIndex) -> &str {
        &self.words[index.as_usize()]
    }

    pub fn contains(&self, word: &str) -> bool {
        self.lookup(word).is_ok()
    }

    /// All dictionary words starting with `prefix`, in dictionary order.
    ///
    /// Empty prefix returns the whole dictionary.
    pub fn complete_prefix(&self, prefix: &str) -> Vec<&str> {
        let start = self.words.partition_point(|w| &**w < prefix);
        self.words[start..]
            .iter()
            .take_while(|w| w.starts_with(prefix))
            .map(|w| &**w)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|w| &**w)
    }
}

impl Default for WordlistIndex {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_has_2048_sorted_words() {
        let wl = WordlistIndex::english();
        assert_eq!(wl.len(), WORDLIST_LEN);
        let words: Vec<&str> = wl.iter().collect();
        assert!(words.windows(2).all(|p| p[0] < p[1]));
    }

    #[test]
    fn test_lookup_known_positions() {
        let wl = WordlistIndex::english();
        assert_eq!(wl.lookup("abandon").unwrap().get(), 0);
        assert_eq!(wl.lookup("ability").unwrap().get(), 1);
        assert_eq!(wl.lookup("zoo").unwrap().get(), 2047);
    }

    #[test]
    fn test_lookup_roundtrip_every_word() {
        let wl = WordlistIndex::english();
        for i in 0..WORDLIST_LEN as u16 {
            let idx = WordIndex::new(i).unwrap();
            assert_eq!(wl.lookup(wl.word(idx)).unwrap(), idx);
        }
    }

    #[test]
    fn test_lookup_invalid_word() {
        let wl = WordlistIndex::english();
        let err = wl.lookup("bitcoin").unwrap_err();
        assert_eq!(
            err,
            SeedError::InvalidWord {
                word: "bitcoin".to_string()
            }
        );
        // Lookup is exact; normalization is the caller's job.
        assert!(wl.lookup("Abandon").is_err());
        assert!(wl.lookup(&normalize_word("  Abandon ")).is_ok());
    }

    #[test]
    fn test_word_index_bounds() {
        assert!(WordIndex::new(2047).is_ok());
        assert!(matches!(WordIndex::new(2048), Err(SeedError::Malformed(_))));
        assert_eq!(WordIndex::from_bits(0xffff).get(), 2047);
    }

    #[test]
    fn test_complete_prefix() {
        let wl = WordlistIndex::english();
        assert_eq!(wl.complete_prefix("zo"), vec!["zone", "zoo"]);
        assert_eq!(wl.complete_prefix("abando"), vec!["abandon"]);
        assert!(wl.complete_prefix("qq").is_empty());
        assert_eq!(wl.complete_prefix("").len(), WORDLIST_LEN);
    }

    #[test]
    fn test_custom_list_validation() {
        let english: Vec<String> = WordlistIndex::english().iter().map(str::to_string).collect();
        assert!(WordlistIndex::new(english.clone()).is_ok());

        let short = english[..2047].to_vec();
        assert!(matches!(WordlistIndex::new(short), Err(SeedError::Malformed(_))));

        let mut unsorted = english.clone();
        unsorted.swap(10, 11);
        assert!(matches!(WordlistIndex::new(unsorted), Err(SeedError::Malformed(_))));

        let mut upper = english;
        upper[0] = "ABANDON".to_string();
        assert!(matches!(WordlistIndex::new(upper), Err(SeedError::Malformed(_))));
    }
}
