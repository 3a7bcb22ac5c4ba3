//! Error type shared by every borderseed-core operation.
//!
//! All failures are synchronous validation errors raised to the immediate
//! caller. None of them are transient, so retrying with the same input
//! always fails the same way.

/// Unified error type for wordlist lookups, entropy collection and
/// checksum completion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeedError {
    /// Word is not in the BIP39 dictionary.
    #[error("invalid word: {word:?} is not in the wordlist")]
    InvalidWord { word: String },

    /// Partial (or full) mnemonic has a word count that no supported
    /// mnemonic length accepts.
    #[error("unsupported mnemonic length: {words} words")]
    UnsupportedLength { words: usize },

    /// A 1-based selection number fell outside its valid range.
    #[error("number {number} out of range {min}..={max}")]
    OutOfRange { number: u64, min: u64, max: u64 },

    /// Structurally invalid input (oversized entropy value, zero-sided
    /// die, unsorted wordlist, ...).
    #[error("malformed input: {0}")]
    Malformed(String),

    /// The operating system refused to hand out random bytes.
    #[error("entropy unavailable: {0}")]
    EntropyUnavailable(String),
}

impl From<getrandom::Error> for SeedError {
    fn from(e: getrandom::Error) -> Self {
        SeedError::EntropyUnavailable(e.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SeedError>;
