//! # borderseed-core
//!
//! **Turn dice rolls into mnemonics, and grid patterns into final words.**
//!
//! `borderseed-core` is the entropy-collection and BIP39 checksum-completion
//! engine behind Border Wallet style seed generation:
//!
//! - physical randomness (coin flips, d6 and d20 rolls) is converted into
//!   unbiased bits and accumulated into a bit-exact entropy payload;
//! - a mnemonic that is one word short of a standard BIP39 length is
//!   completed by enumerating every dictionary word that yields a valid
//!   checksum.
//!
//! ## Quick Start
//!
//! ```
//! use borderseed_core::{ChecksumCompletionEngine, assemble, select_by_index};
//! use borderseed_core::{PartialMnemonic, WordlistIndex};
//!
//! let wordlist = WordlistIndex::english();
//! let partial = PartialMnemonic::parse(
//!     "legal winner thank year wave sausage worth useful legal winner thank",
//!     &wordlist,
//! )
//! .unwrap();
//!
//! let engine = ChecksumCompletionEngine::english();
//! let candidates = engine.candidates_for(partial.words()).unwrap();
//! assert_eq!(candidates.len(), 128);
//!
//! let mnemonic = assemble(&partial, select_by_index(&candidates, 128).unwrap());
//! assert!(mnemonic.ends_with("yellow"));
//! ```
//!
//! ## Architecture
//!
//! Rolls → Extractor → Bit buffer → Entropy bytes (→ external encoder)
//!
//! Partial mnemonic → Completion engine → Candidates → Assembler
//!
//! Every operation is synchronous and free of I/O. The only mutable state
//! is the caller-owned [`EntropyBitBuffer`] of a collection session.

pub mod assembler;
pub mod buffer;
pub mod completion;
pub mod error;
pub mod extractor;
pub mod flows;
pub mod grid;
pub mod length;
pub mod session;
pub mod wordlist;

pub use assembler::{
    assemble, random_byte, random_final_word_number, select_by_index, select_random, verify,
};
pub use buffer::{EntropyBitBuffer, MAX_BITS};
pub use completion::{CandidateSet, ChecksumCompletionEngine, CompletionSource, PartialMnemonic};
pub use error::{Result, SeedError};
pub use extractor::{Contribution, PhysicalSource, expected_bits, extract};
pub use flows::{FinalWordCheck, MnemonicCheck, check_final_word, check_mnemonic, final_word_by_number};
pub use grid::{CellFormat, EntropyGrid, GridCell, GridConfig, parse_pattern};
pub use length::{EntropySpec, MnemonicLength};
pub use session::{CollectionConfig, CollectionSession, CollectionSummary, RollRecord};
pub use wordlist::{BITS_PER_WORD, WORDLIST_LEN, WordIndex, WordlistIndex, normalize_word};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
