//! User-facing flows built on a [`CompletionSource`].
//!
//! - Grid pattern: the user memorizes a grid pattern plus a final word
//!   number, and the number picks the candidate.
//! - Free-text final word: the user types a final word of their own and it
//!   is accepted only if it is a valid completion.
//! - Word checker: a full mnemonic is checked for dictionary membership,
//!   length and checksum, with every problem reported instead of raised.

use serde::{Deserialize, Serialize};

use crate::assembler::{assemble, select_by_index};
use crate::completion::{CompletionSource, PartialMnemonic};
use crate::error::{Result, SeedError};
use crate::length::MnemonicLength;
use crate::wordlist::normalize_word;

/// Candidate picked by a 1-based final word number.
///
/// # Errors
///
/// [`SeedError::OutOfRange`] if `number` is outside the partial mnemonic's
/// [`final_word_range`](crate::EntropySpec::final_word_range).
pub fn final_word_by_number<S>(source: &S, partial: &PartialMnemonic, number: u32) -> Result<String>
where
    S: CompletionSource + ?Sized,
{
    let range = partial.spec().final_word_range();
    if !range.contains(&number) {
        return Err(SeedError::OutOfRange {
            number: u64::from(number),
            min: u64::from(*range.start()),
            max: u64::from(*range.end()),
        });
    }
    let candidates = source.compute_candidates(partial);
    select_by_index(&candidates, number).map(str::to_string)
}

/// Outcome of checking a typed final word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalWordCheck {
    /// Normalized word that was checked.
    pub word: String,
    /// Whether the word completes the mnemonic with a valid checksum.
    pub accepted: bool,
    /// 1-based final word number of an accepted word.
    pub number: Option<u32>,
    /// Complete mnemonic, for an accepted word.
    pub mnemonic: Option<String>,
}

/// Check a user-chosen final word against the candidates of `partial`.
///
/// A word outside the dictionary is simply not accepted.
pub fn check_final_word<S>(source: &S, partial: &PartialMnemonic, word: &str) -> FinalWordCheck
where
    S: CompletionSource + ?Sized,
{
    let word = normalize_word(word);
    let candidates = source.compute_candidates(partial);
    match candidates.position(&word) {
        Some(v) => FinalWordCheck {
            mnemonic: Some(assemble(partial, &word)),
            number: Some(v as u32 + 1),
            accepted: true,
            word,
        },
        None => FinalWordCheck {
            word,
            accepted: false,
            number: None,
            mnemonic: None,
        },
    }
}

/// Word-checker report for a complete mnemonic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MnemonicCheck {
    /// Normalized input words.
    pub words: Vec<String>,
    pub word_count: usize,
    /// Whether `word_count` is a standard BIP39 length.
    pub length_supported: bool,
    /// Words missing from the dictionary, in input order.
    pub unknown_words: Vec<String>,
    /// Whether the final word carries a valid checksum. `false` whenever
    /// the length or a word is already invalid.
    pub checksum_valid: bool,
    /// Valid final words for the first `word_count - 1` words, when those
    /// form a well-formed partial mnemonic.
    pub candidates: Option<Vec<String>>,
}

impl MnemonicCheck {
    /// Whether the mnemonic passes every check.
    pub fn is_valid(&self) -> bool {
        self.length_supported && self.unknown_words.is_empty() && self.checksum_valid
    }
}

/// Check a complete mnemonic without failing on bad input.
pub fn check_mnemonic<S, W>(source: &S, words: &[W]) -> MnemonicCheck
where
    S: CompletionSource + ?Sized,
    W: AsRef<str>,
{
    let words: Vec<String> = words.iter().map(|w| normalize_word(w.as_ref())).collect();
    let word_count = words.len();
    let length_supported = MnemonicLength::from_word_count(word_count).is_ok();
    let wordlist = source.wordlist();
    let unknown_words: Vec<String> = words
        .iter()
        .filter(|w| !wordlist.contains(w))
        .cloned()
        .collect();

    let mut report = MnemonicCheck {
        words: Vec::new(),
        word_count,
        length_supported,
        unknown_words,
        checksum_valid: false,
        candidates: None,
    };

    if let Some((last, head)) = words.split_last() {
        if let Ok(partial) = PartialMnemonic::new(head, wordlist) {
            let candidates = source.compute_candidates(&partial);
            report.checksum_valid = candidates.contains(last);
            report.candidates = Some(candidates.into_vec());
        }
    }
    log::debug!(
        "checked {word_count}-word mnemonic: {} unknown, checksum {}",
        report.unknown_words.len(),
        if report.checksum_valid { "ok" } else { "bad" }
    );
    report.words = words;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::ChecksumCompletionEngine;
    use crate::wordlist::WordlistIndex;

    const LEGAL: &str = "legal winner thank year wave sausage worth useful legal winner thank";

    fn engine() -> ChecksumCompletionEngine {
        ChecksumCompletionEngine::english()
    }

    fn partial(text: &str) -> PartialMnemonic {
        PartialMnemonic::parse(text, &WordlistIndex::english()).unwrap()
    }

    #[test]
    fn test_final_word_by_number() {
        let p = partial(LEGAL);
        assert_eq!(final_word_by_number(&engine(), &p, 128).unwrap(), "yellow");
        assert_eq!(
            final_word_by_number(&engine(), &p, 129),
            Err(SeedError::OutOfRange {
                number: 129,
                min: 1,
                max: 128
            })
        );
        assert!(final_word_by_number(&engine(), &p, 0).is_err());
    }

    #[test]
    fn test_final_word_by_number_24_words() {
        let p = partial(&vec!["abandon"; 23].join(" "));
        assert_eq!(final_word_by_number(&engine(), &p, 1).unwrap(), "art");
        assert!(matches!(
            final_word_by_number(&engine(), &p, 9),
            Err(SeedError::OutOfRange { max: 8, .. })
        ));
    }

    #[test]
    fn test_flows_accept_trait_objects() {
        let e = engine();
        let source: &dyn CompletionSource = &e;
        let p = partial(LEGAL);
        assert_eq!(final_word_by_number(source, &p, 128).unwrap(), "yellow");
    }

    #[test]
    fn test_check_final_word_accepted() {
        let p = partial(LEGAL);
        let check = check_final_word(&engine(), &p, " Yellow ");
        assert!(check.accepted);
        assert_eq!(check.word, "yellow");
        assert_eq!(check.number, Some(128));
        assert_eq!(check.mnemonic.as_deref(), Some(format!("{LEGAL} yellow").as_str()));
    }

    #[test]
    fn test_check_final_word_rejected() {
        let p = partial(LEGAL);
        let candidates = engine().compute_candidates(&p);
        let wl = WordlistIndex::english();
        let outsider = wl.iter().find(|w| !candidates.contains(w)).unwrap();
        let check = check_final_word(&engine(), &p, outsider);
        assert!(!check.accepted);
        assert_eq!(check.number, None);
        assert_eq!(check.mnemonic, None);

        let not_a_word = check_final_word(&engine(), &p, "satoshi");
        assert!(!not_a_word.accepted);
    }

    #[test]
    fn test_check_mnemonic_valid() {
        let text = format!("{LEGAL} yellow");
        let words: Vec<&str> = text.split(' ').collect();
        let report = check_mnemonic(&engine(), &words);
        assert!(report.is_valid());
        assert_eq!(report.word_count, 12);
        assert_eq!(report.candidates.as_ref().map(Vec::len), Some(128));
    }

    #[test]
    fn test_check_mnemonic_bad_checksum() {
        let words = vec!["abandon"; 12];
        let report = check_mnemonic(&engine(), &words);
        assert!(report.length_supported);
        assert!(report.unknown_words.is_empty());
        assert!(!report.checksum_valid);
        assert!(!report.is_valid());
    }

    #[test]
    fn test_check_mnemonic_reports_problems() {
        let mut words = vec!["abandon"; 12];
        words[3] = "satoshi";
        words[7] = "NAKAMOTO";
        let report = check_mnemonic(&engine(), &words);
        assert_eq!(report.unknown_words, vec!["satoshi", "nakamoto"]);
        assert!(!report.checksum_valid);
        assert_eq!(report.candidates, None);

        let short = check_mnemonic(&engine(), &["abandon"; 5]);
        assert!(!short.length_supported);
        assert!(!short.checksum_valid);

        let empty: [&str; 0] = [];
        let nothing = check_mnemonic(&engine(), &empty);
        assert_eq!(nothing.word_count, 0);
        assert!(!nothing.is_valid());
    }
}
