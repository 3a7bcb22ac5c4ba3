//! Join a partial mnemonic with its final word, and pick final words.

use crate::completion::{CandidateSet, PartialMnemonic};
use crate::error::{Result, SeedError};
use crate::length::MnemonicLength;

/// Partial words in order, space-joined, followed by `chosen_word`.
pub fn assemble(partial: &PartialMnemonic, chosen_word: &str) -> String {
    let mut out = partial.to_string();
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(chosen_word);
    out
}

/// Candidate for a 1-based final word number.
///
/// # Errors
///
/// [`SeedError::OutOfRange`] unless `1 <= number <= candidates.len()`.
pub fn select_by_index(candidates: &CandidateSet, number: u32) -> Result<&str> {
    let max = candidates.len() as u64;
    let n = u64::from(number);
    if n == 0 || n > max {
        return Err(SeedError::OutOfRange {
            number: n,
            min: 1,
            max,
        });
    }
    candidates
        .get(number as usize - 1)
        .ok_or(SeedError::OutOfRange {
            number: n,
            min: 1,
            max,
        })
}

/// Candidate picked by scaling one random byte onto the set:
/// `round(byte / 255 * (len - 1))`.
///
/// Sets whose size does not divide 256 are picked slightly unevenly; the
/// same byte always picks the same position.
pub fn select_random(candidates: &CandidateSet, random_byte: u8) -> Result<&str> {
    if candidates.is_empty() {
        return Err(SeedError::OutOfRange {
            number: 0,
            min: 1,
            max: 0,
        });
    }
    let span = candidates.len() - 1;
    // Integer form of round-half-up(byte * span / 255).
    let position = (2 * usize::from(random_byte) * span + 255) / 510;
    candidates.get(position).ok_or(SeedError::OutOfRange {
        number: position as u64 + 1,
        min: 1,
        max: candidates.len() as u64,
    })
}

/// Whether `partial + chosen_word` is exactly `expected`, as used when a
/// user re-enters a memorized pattern to confirm a stored mnemonic.
pub fn verify(partial: &PartialMnemonic, chosen_word: &str, expected: &str) -> bool {
    assemble(partial, chosen_word) == expected
}

/// Random 1-based final word number for `length`: the low
/// `varying_bits` bits of `random_byte`, plus one.
pub fn random_final_word_number(length: MnemonicLength, random_byte: u8) -> u32 {
    let mask = (1u32 << length.spec().varying_bits) - 1;
    (u32::from(random_byte) & mask) + 1
}

/// One byte from the operating system's CSPRNG.
pub fn random_byte() -> Result<u8> {
    let mut buf = [0u8; 1];
    getrandom::fill(&mut buf)?;
    Ok(buf[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::ChecksumCompletionEngine;
    use crate::wordlist::WordlistIndex;

    fn partial(words: &[&str]) -> PartialMnemonic {
        PartialMnemonic::new(words, &WordlistIndex::english()).unwrap()
    }

    fn set(n: usize) -> CandidateSet {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().into()
    }

    #[test]
    fn test_assemble_and_verify() {
        let p = partial(&["abandon"; 11]);
        let m = assemble(&p, "about");
        assert_eq!(
            m,
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about"
        );
        assert!(verify(&p, "about", &m));
        assert!(!verify(&p, "absent", &m));
        assert!(!verify(&p, "about", &format!("{m} ")));
    }

    #[test]
    fn test_select_by_index_bounds() {
        let c = set(8);
        assert_eq!(select_by_index(&c, 1).unwrap(), "w0");
        assert_eq!(select_by_index(&c, 8).unwrap(), "w7");
        assert_eq!(
            select_by_index(&c, 0),
            Err(SeedError::OutOfRange {
                number: 0,
                min: 1,
                max: 8
            })
        );
        assert!(matches!(
            select_by_index(&c, 9),
            Err(SeedError::OutOfRange { number: 9, .. })
        ));
    }

    #[test]
    fn test_select_random_scaling() {
        let c = set(128);
        assert_eq!(select_random(&c, 0).unwrap(), "w0");
        assert_eq!(select_random(&c, 255).unwrap(), "w127");
        // 51 / 255 * 127 = 25.4
        assert_eq!(select_random(&c, 51).unwrap(), "w25");
        // 128 / 255 * 127 = 63.75
        assert_eq!(select_random(&c, 128).unwrap(), "w64");

        let c8 = set(8);
        // 18 / 255 * 7 = 0.494 -> 0, 19 / 255 * 7 = 0.52 -> 1
        assert_eq!(select_random(&c8, 18).unwrap(), "w0");
        assert_eq!(select_random(&c8, 19).unwrap(), "w1");
        assert_eq!(select_random(&c8, 255).unwrap(), "w7");

        assert!(select_random(&set(0), 10).is_err());
        assert_eq!(select_random(&set(1), 200).unwrap(), "w0");
    }

    #[test]
    fn test_select_random_matches_float_rounding() {
        for n in [1usize, 8, 16, 32, 64, 128] {
            let c = set(n);
            for byte in 0..=255u8 {
                let expected = (f64::from(byte) / 255.0 * (n - 1) as f64).round() as usize;
                assert_eq!(select_random(&c, byte).unwrap(), format!("w{expected}"));
            }
        }
    }

    #[test]
    fn test_random_final_word_number_range() {
        for byte in 0..=255u8 {
            let n12 = random_final_word_number(MnemonicLength::Words12, byte);
            assert!((1..=128).contains(&n12));
            let n24 = random_final_word_number(MnemonicLength::Words24, byte);
            assert!((1..=8).contains(&n24));
        }
        assert_eq!(random_final_word_number(MnemonicLength::Words12, 0xff), 128);
        assert_eq!(random_final_word_number(MnemonicLength::Words24, 0xf8), 1);
    }

    #[test]
    fn test_end_to_end_first_candidate_is_valid_bip39() {
        let words = [
            "legal", "winner", "thank", "year", "wave", "sausage", "worth", "useful", "legal",
            "winner", "thank",
        ];
        let p = partial(&words);
        let engine = ChecksumCompletionEngine::english();
        let c = crate::CompletionSource::compute_candidates(&engine, &p);
        assert_eq!(c.len(), 128);
        let chosen = select_by_index(&c, 1).unwrap();
        let mnemonic = assemble(&p, chosen);
        assert_eq!(mnemonic.split(' ').count(), 12);
        assert!(bip39::Mnemonic::parse_in_normalized(bip39::Language::English, &mnemonic).is_ok());
    }

    #[test]
    fn test_random_byte_draws() {
        assert!(random_byte().is_ok());
    }
}
