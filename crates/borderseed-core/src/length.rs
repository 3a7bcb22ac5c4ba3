//! Mnemonic lengths and the bit budget derived from them.
//!
//! For a partial mnemonic of `L` words:
//!
//! ```text
//! concat_bits   = 11 * L
//! checksum_bits = ceil((concat_bits + 11) / 33)
//! entropy_bits  = concat_bits + 11 - checksum_bits
//! varying_bits  = entropy_bits - concat_bits
//! ```
//!
//! The final word is `varying_bits` unknown entropy bits followed by the
//! checksum, so there are exactly `2^varying_bits` valid final words.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeedError};
use crate::wordlist::BITS_PER_WORD;

/// Standard BIP39 mnemonic lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum MnemonicLength {
    Words12,
    Words15,
    Words18,
    Words21,
    Words24,
}

impl MnemonicLength {
    pub const ALL: [MnemonicLength; 5] = [
        Self::Words12,
        Self::Words15,
        Self::Words18,
        Self::Words21,
        Self::Words24,
    ];

    /// Length of a complete mnemonic with `words` words.
    pub fn from_word_count(words: usize) -> Result<Self> {
        match words {
            12 => Ok(Self::Words12),
            15 => Ok(Self::Words15),
            18 => Ok(Self::Words18),
            21 => Ok(Self::Words21),
            24 => Ok(Self::Words24),
            _ => Err(SeedError::UnsupportedLength { words }),
        }
    }

    /// Length whose mnemonic is one word longer than `words`.
    pub fn from_partial_len(words: usize) -> Result<Self> {
        Self::from_word_count(words + 1).map_err(|_| SeedError::UnsupportedLength { words })
    }

    pub fn word_count(self) -> usize {
        match self {
            Self::Words12 => 12,
            Self::Words15 => 15,
            Self::Words18 => 18,
            Self::Words21 => 21,
            Self::Words24 => 24,
        }
    }

    /// Words a user supplies before the final (checksum) word.
    pub fn partial_len(self) -> usize {
        self.word_count() - 1
    }

    pub fn spec(self) -> EntropySpec {
        EntropySpec::derive(self)
    }

    /// Entropy carried by a mnemonic of this length.
    pub fn entropy_bits(self) -> u32 {
        self.spec().entropy_bits
    }

    /// Entropy bytes an external encoder needs for this length.
    pub fn entropy_bytes(self) -> usize {
        (self.entropy_bits() / 8) as usize
    }
}

impl TryFrom<usize> for MnemonicLength {
    type Error = SeedError;

    fn try_from(words: usize) -> Result<Self> {
        Self::from_word_count(words)
    }
}

impl From<MnemonicLength> for usize {
    fn from(length: MnemonicLength) -> usize {
        length.word_count()
    }
}

impl std::fmt::Display for MnemonicLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} words", self.word_count())
    }
}

impl std::str::FromStr for MnemonicLength {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self> {
        let words: usize = s
            .trim()
            .parse()
            .map_err(|_| SeedError::Malformed(format!("'{s}' is not a word count")))?;
        Self::from_word_count(words)
    }
}

/// Bit budget of a partial mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntropySpec {
    /// Length of the completed mnemonic.
    pub length: MnemonicLength,
    /// Bits encoded by the supplied words.
    pub concat_bits: u32,
    /// Checksum bits carried by the final word.
    pub checksum_bits: u32,
    /// Entropy bits of the complete mnemonic.
    pub entropy_bits: u32,
    /// Entropy bits left undetermined by the supplied words.
    pub varying_bits: u32,
}

impl EntropySpec {
    /// Budget for a partial mnemonic of `partial_len` words.
    ///
    /// # Errors
    ///
    /// [`SeedError::UnsupportedLength`] unless `partial_len + 1` is a
    /// standard mnemonic length.
    pub fn for_partial_len(partial_len: usize) -> Result<Self> {
        MnemonicLength::from_partial_len(partial_len).map(Self::derive)
    }

    fn derive(length: MnemonicLength) -> Self {
        let concat_bits = length.partial_len() as u32 * BITS_PER_WORD;
        let checksum_bits = (concat_bits + BITS_PER_WORD).div_ceil(33);
        let entropy_bits = concat_bits + BITS_PER_WORD - checksum_bits;
        Self {
            length,
            concat_bits,
            checksum_bits,
            entropy_bits,
            varying_bits: entropy_bits - concat_bits,
        }
    }

    /// Number of valid final words.
    pub fn candidate_count(&self) -> usize {
        1 << self.varying_bits
    }

    /// Valid 1-based "final word number" inputs.
    pub fn final_word_range(&self) -> RangeInclusive<u32> {
        1..=(1u32 << self.varying_bits)
    }

    /// Words supplied before the final word.
    pub fn partial_len(&self) -> usize {
        self.length.partial_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_for_12_words() {
        let spec = EntropySpec::for_partial_len(11).unwrap();
        assert_eq!(spec.concat_bits, 121);
        assert_eq!(spec.checksum_bits, 4);
        assert_eq!(spec.entropy_bits, 128);
        assert_eq!(spec.varying_bits, 7);
        assert_eq!(spec.candidate_count(), 128);
        assert_eq!(spec.final_word_range(), 1..=128);
    }

    #[test]
    fn test_spec_for_24_words() {
        let spec = EntropySpec::for_partial_len(23).unwrap();
        assert_eq!(spec.checksum_bits, 8);
        assert_eq!(spec.entropy_bits, 256);
        assert_eq!(spec.varying_bits, 3);
        assert_eq!(spec.candidate_count(), 8);
        assert_eq!(spec.final_word_range(), 1..=8);
    }

    #[test]
    fn test_intermediate_lengths() {
        let expected = [(14, 5, 160, 6), (17, 6, 192, 5), (20, 7, 224, 4)];
        for (l, cs, ent, vary) in expected {
            let spec = EntropySpec::for_partial_len(l).unwrap();
            assert_eq!((spec.checksum_bits, spec.entropy_bits, spec.varying_bits), (cs, ent, vary));
            assert_eq!(spec.entropy_bits % 8, 0);
        }
    }

    #[test]
    fn test_unsupported_lengths() {
        for l in [0, 1, 10, 12, 13, 22, 24, 100] {
            assert_eq!(
                EntropySpec::for_partial_len(l),
                Err(SeedError::UnsupportedLength { words: l })
            );
        }
    }

    #[test]
    fn test_length_roundtrips() {
        for length in MnemonicLength::ALL {
            assert_eq!(MnemonicLength::from_word_count(length.word_count()), Ok(length));
            assert_eq!(length.spec().length, length);
            assert_eq!(length.spec().partial_len(), length.word_count() - 1);
            assert_eq!(length.spec().varying_bits + length.spec().checksum_bits, 11);
        }
        assert_eq!(MnemonicLength::Words12.entropy_bytes(), 16);
        assert_eq!(MnemonicLength::Words24.entropy_bytes(), 32);
        assert_eq!("24".parse::<MnemonicLength>(), Ok(MnemonicLength::Words24));
        assert!("13".parse::<MnemonicLength>().is_err());
        assert!("twelve".parse::<MnemonicLength>().is_err());
    }
}
