//! Checksum completion: every final word that makes a partial mnemonic
//! a valid BIP39 mnemonic.
//!
//! The supplied words fix the first `concat_bits` bits of entropy. The
//! final word holds the remaining `varying_bits` entropy bits followed by
//! the checksum, i.e. the first `checksum_bits` bits of SHA-256 over the
//! complete entropy. Enumerating every value of the varying bits gives the
//! full candidate set:
//!
//! ```text
//! entropy(v)   = words[0..L] as 11-bit groups || v            (MSB first)
//! final(v)     = v || SHA-256(entropy(v))[..checksum_bits]
//! candidates   = [final(0), final(1), ..., final(2^varying_bits - 1)]
//! ```
//!
//! Results are recomputed on every call; the enumeration is at most 128
//! hashes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::length::{EntropySpec, MnemonicLength};
use crate::wordlist::{BITS_PER_WORD, WordIndex, WordlistIndex, normalize_word};

/// Validated words of a mnemonic that is missing its final word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialMnemonic {
    words: Vec<String>,
    indices: Vec<WordIndex>,
    spec: EntropySpec,
}

impl PartialMnemonic {
    /// Validate `words` against `wordlist`.
    ///
    /// Words are normalized (trimmed, lowercased) first.
    ///
    /// # Errors
    ///
    /// [`SeedError::UnsupportedLength`](crate::SeedError::UnsupportedLength)
    /// if one more word would not make a standard mnemonic length, then
    /// [`SeedError::InvalidWord`](crate::SeedError::InvalidWord) for the
    /// first word missing from the dictionary.
    pub fn new<S: AsRef<str>>(words: &[S], wordlist: &WordlistIndex) -> Result<Self> {
        let spec = EntropySpec::for_partial_len(words.len())?;
        let words: Vec<String> = words.iter().map(|w| normalize_word(w.as_ref())).collect();
        let indices = words
            .iter()
            .map(|w| wordlist.lookup(w))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            words,
            indices,
            spec,
        })
    }

    /// Split whitespace-separated text into words and validate them.
    pub fn parse(text: &str, wordlist: &WordlistIndex) -> Result<Self> {
        let words: Vec<&str> = text.split_whitespace().collect();
        Self::new(&words, wordlist)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn indices(&self) -> &[WordIndex] {
        &self.indices
    }

    pub fn spec(&self) -> &EntropySpec {
        &self.spec
    }

    /// Length of the completed mnemonic.
    pub fn length(&self) -> MnemonicLength {
        self.spec.length
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl std::fmt::Display for PartialMnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.words.join(" "))
    }
}

/// Ordered final-word candidates. Position `v` holds the word whose
/// varying bits equal `v`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSet {
    words: Vec<String>,
}

impl CandidateSet {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Candidate at zero-based position `v`.
    pub fn get(&self, v: usize) -> Option<&str> {
        self.words.get(v).map(String::as_str)
    }

    /// Zero-based position of `word`, if it is a valid completion.
    pub fn position(&self, word: &str) -> Option<usize> {
        self.words.iter().position(|w| w == word)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.position(word).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// `(final word number, word)` pairs, numbers starting at 1.
    pub fn numbered(&self) -> impl Iterator<Item = (u32, &str)> {
        self.iter().enumerate().map(|(i, w)| (i as u32 + 1, w))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.words
    }

    pub fn into_vec(self) -> Vec<String> {
        self.words
    }
}

impl From<Vec<String>> for CandidateSet {
    fn from(words: Vec<String>) -> Self {
        Self { words }
    }
}

/// Anything that can enumerate final-word candidates.
///
/// The grid-pattern flow, the free-text final-word flow and the word
/// checker all go through this seam; see [`crate::flows`].
pub trait CompletionSource {
    /// Dictionary the candidates are drawn from.
    fn wordlist(&self) -> &WordlistIndex;

    /// Every valid final word for `partial`, ordered by varying bits.
    fn compute_candidates(&self, partial: &PartialMnemonic) -> CandidateSet;
}

/// SHA-256 checksum completion over a BIP39 dictionary.
#[derive(Debug, Clone, Default)]
pub struct ChecksumCompletionEngine {
    wordlist: WordlistIndex,
}

impl ChecksumCompletionEngine {
    pub fn new(wordlist: WordlistIndex) -> Self {
        Self { wordlist }
    }

    /// Engine over the canonical English dictionary.
    pub fn english() -> Self {
        Self::new(WordlistIndex::english())
    }

    /// Validate raw words and enumerate their candidates.
    pub fn candidates_for<S: AsRef<str>>(&self, words: &[S]) -> Result<CandidateSet> {
        let partial = PartialMnemonic::new(words, &self.wordlist)?;
        Ok(self.compute_candidates(&partial))
    }
}

impl CompletionSource for ChecksumCompletionEngine {
    fn wordlist(&self) -> &WordlistIndex {
        &self.wordlist
    }

    fn compute_candidates(&self, partial: &PartialMnemonic) -> CandidateSet {
        let spec = partial.spec();
        let mut prefix = BitWriter::with_capacity(spec.entropy_bits as usize / 8);
        for index in partial.indices() {
            prefix.push(u32::from(index.get()), BITS_PER_WORD);
        }

        let words: Vec<String> = (0..spec.candidate_count() as u32)
            .map(|v| {
                let mut entropy = prefix.clone();
                entropy.push(v, spec.varying_bits);
                debug_assert_eq!(entropy.len, spec.entropy_bits as usize);

                let digest = Sha256::digest(&entropy.bytes);
                let checksum = u32::from(digest[0]) >> (8 - spec.checksum_bits);
                let index = WordIndex::from_bits((v << spec.checksum_bits) | checksum);
                self.wordlist.word(index).to_string()
            })
            .collect();

        log::trace!(
            "{} candidates for a {}-word partial mnemonic",
            words.len(),
            partial.len()
        );
        CandidateSet { words }
    }
}

/// MSB-first bit packer.
#[derive(Debug, Clone)]
struct BitWriter {
    bytes: Vec<u8>,
    len: usize,
}

impl BitWriter {
    fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            len: 0,
        }
    }

    /// Append the low `width` bits of `value`, most significant first.
    fn push(&mut self, value: u32, width: u32) {
        for shift in (0..width).rev() {
            if self.len % 8 == 0 {
                self.bytes.push(0);
            }
            if (value >> shift) & 1 == 1 {
                self.bytes[self.len / 8] |= 0x80 >> (self.len % 8);
            }
            self.len += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SeedError;

    fn engine() -> ChecksumCompletionEngine {
        ChecksumCompletionEngine::english()
    }

    fn repeat(word: &str, n: usize) -> Vec<&str> {
        vec![word; n]
    }

    #[test]
    fn test_bit_writer_packs_msb_first() {
        let mut w = BitWriter::with_capacity(2);
        w.push(0b101, 3);
        w.push(0b1, 1);
        w.push(0xff, 8);
        assert_eq!(w.len, 12);
        assert_eq!(w.bytes, vec![0b1011_1111, 0b1111_0000]);
    }

    #[test]
    fn test_all_zero_entropy_vectors() {
        // BIP39 reference vectors for all-zero entropy.
        let c12 = engine().candidates_for(&repeat("abandon", 11)).unwrap();
        assert_eq!(c12.len(), 128);
        assert_eq!(c12.get(0), Some("about"));

        let c24 = engine().candidates_for(&repeat("abandon", 23)).unwrap();
        assert_eq!(c24.len(), 8);
        assert_eq!(c24.get(0), Some("art"));
    }

    #[test]
    fn test_all_ones_entropy_vectors() {
        let c12 = engine().candidates_for(&repeat("zoo", 11)).unwrap();
        assert_eq!(c12.get(127), Some("wrong"));

        let c24 = engine().candidates_for(&repeat("zoo", 23)).unwrap();
        assert_eq!(c24.get(7), Some("vote"));
    }

    #[test]
    fn test_mixed_entropy_vector() {
        let partial = "legal winner thank year wave sausage worth useful legal winner thank";
        let wl = WordlistIndex::english();
        let p = PartialMnemonic::parse(partial, &wl).unwrap();
        let c = engine().compute_candidates(&p);
        // entropy 7f7f..7f: varying bits are the low seven bits of the last byte
        assert_eq!(c.get(0x7f), Some("yellow"));
    }

    #[test]
    fn test_deterministic() {
        let words = repeat("legal", 23);
        let a = engine().candidates_for(&words).unwrap();
        let b = engine().candidates_for(&words).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_candidate_counts_per_length() {
        for length in MnemonicLength::ALL {
            let words = repeat("ability", length.partial_len());
            let c = engine().candidates_for(&words).unwrap();
            assert_eq!(c.len(), length.spec().candidate_count());
        }
    }

    #[test]
    fn test_partial_mnemonic_errors() {
        let wl = WordlistIndex::english();
        assert_eq!(
            PartialMnemonic::new(&repeat("abandon", 12), &wl),
            Err(SeedError::UnsupportedLength { words: 12 })
        );
        let mut words = repeat("abandon", 11);
        words[4] = "satoshi";
        assert_eq!(
            PartialMnemonic::new(&words, &wl),
            Err(SeedError::InvalidWord {
                word: "satoshi".to_string()
            })
        );
    }

    #[test]
    fn test_partial_mnemonic_normalizes_words() {
        let wl = WordlistIndex::english();
        let mut words = repeat("abandon", 11);
        words[0] = "  ABANDON ";
        let p = PartialMnemonic::new(&words, &wl).unwrap();
        assert_eq!(p.words()[0], "abandon");
        assert_eq!(p.length(), MnemonicLength::Words12);
        assert_eq!(p.to_string().split(' ').count(), 11);
    }

    #[test]
    fn test_numbered_starts_at_one() {
        let c = engine().candidates_for(&repeat("abandon", 23)).unwrap();
        let numbered: Vec<(u32, &str)> = c.numbered().collect();
        assert_eq!(numbered[0], (1, "art"));
        assert_eq!(numbered.len(), 8);
        assert_eq!(c.position("art"), Some(0));
        assert!(!c.contains("abandon"));
    }
}
