//! Physical entropy collection sessions.
//!
//! A session owns one [`EntropyBitBuffer`] sized for the target mnemonic,
//! records every roll fed into it, and exports the finished entropy. Undo
//! goes through the roll log, so rolls that carried no bits (the tail
//! block of an odd die, or rolls after the buffer filled up) are undone
//! without touching the buffer.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::buffer::EntropyBitBuffer;
use crate::error::{Result, SeedError};
use crate::extractor::{Contribution, PhysicalSource};
use crate::length::MnemonicLength;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Configuration for a collection session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Mnemonic the entropy is collected for; fixes the bit budget.
    pub length: MnemonicLength,
    /// Top up unfinished entropy with random bytes on export.
    pub pad_with_os_random: bool,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            length: MnemonicLength::Words12,
            pad_with_os_random: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Rolls
// ---------------------------------------------------------------------------

/// One physical event and what it added to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRecord {
    pub source: PhysicalSource,
    /// Zero-based outcome.
    pub outcome: u32,
    pub contribution: Option<Contribution>,
    /// Bits the buffer actually kept (less than the contribution at the cap).
    pub consumed: u32,
}

/// Progress report for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub length: MnemonicLength,
    pub rolls: usize,
    pub bits_collected: u32,
    pub bits_needed: u32,
    pub complete: bool,
    pub hex: String,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Entropy collection for a single mnemonic.
#[derive(Debug, Clone)]
pub struct CollectionSession {
    config: CollectionConfig,
    buffer: EntropyBitBuffer,
    rolls: Vec<RollRecord>,
}

impl CollectionSession {
    pub fn new(config: CollectionConfig) -> Self {
        let buffer = EntropyBitBuffer::for_length(config.length);
        Self {
            config,
            buffer,
            rolls: Vec::new(),
        }
    }

    /// Feed one zero-based outcome of `source`.
    ///
    /// # Errors
    ///
    /// [`SeedError::Malformed`] if the outcome is out of range for the
    /// source. Nothing is recorded.
    pub fn record(&mut self, source: PhysicalSource, outcome: u32) -> Result<RollRecord> {
        let contribution = source.extract(outcome)?;
        let consumed = self.buffer.push_contribution(contribution)?;
        let record = RollRecord {
            source,
            outcome,
            contribution,
            consumed,
        };
        log::trace!(
            "{source} outcome {outcome}: {consumed} bits, {}/{} collected",
            self.buffer.bit_count(),
            self.buffer.limit()
        );
        self.rolls.push(record);
        Ok(record)
    }

    /// Undo the most recent roll.
    pub fn undo(&mut self) -> Option<RollRecord> {
        let record = self.rolls.pop()?;
        if record.consumed > 0 {
            self.buffer.pop();
        }
        Some(record)
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    pub fn buffer(&self) -> &EntropyBitBuffer {
        &self.buffer
    }

    pub fn rolls(&self) -> &[RollRecord] {
        &self.rolls
    }

    pub fn is_complete(&self) -> bool {
        self.buffer.is_full()
    }

    pub fn summary(&self) -> CollectionSummary {
        CollectionSummary {
            length: self.config.length,
            rolls: self.rolls.len(),
            bits_collected: self.buffer.bit_count(),
            bits_needed: self.buffer.limit(),
            complete: self.is_complete(),
            hex: self.buffer.to_hex(),
        }
    }

    /// Entropy for the target mnemonic, `length.entropy_bytes()` long.
    ///
    /// Unfinished entropy is padded from `rng` when the config allows it.
    ///
    /// # Errors
    ///
    /// [`SeedError::Malformed`] if collection is unfinished and padding is
    /// disabled.
    pub fn finish<R: RngCore + ?Sized>(&self, rng: &mut R) -> Result<Vec<u8>> {
        let target = self.config.length.entropy_bytes();
        if self.is_complete() {
            return Ok(self.buffer.export_bytes());
        }
        if !self.config.pad_with_os_random {
            return Err(SeedError::Malformed(format!(
                "only {} of {} entropy bits collected",
                self.buffer.bit_count(),
                self.buffer.limit()
            )));
        }
        Ok(self.buffer.export_padded(target, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn session(length: MnemonicLength, pad: bool) -> CollectionSession {
        CollectionSession::new(CollectionConfig {
            length,
            pad_with_os_random: pad,
        })
    }

    #[test]
    fn test_default_config() {
        let config = CollectionConfig::default();
        assert_eq!(config.length, MnemonicLength::Words12);
        assert!(!config.pad_with_os_random);
    }

    #[test]
    fn test_coin_flips_fill_12_word_entropy() {
        let mut s = session(MnemonicLength::Words12, false);
        for i in 0..128 {
            let r = s.record(PhysicalSource::Coin, i % 2).unwrap();
            assert_eq!(r.consumed, 1);
        }
        assert!(s.is_complete());
        let extra = s.record(PhysicalSource::Coin, 1).unwrap();
        assert_eq!(extra.consumed, 0);

        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(s.finish(&mut rng).unwrap(), vec![0x55; 16]);
    }

    #[test]
    fn test_undo_skips_rolls_without_bits() {
        let mut s = session(MnemonicLength::Words12, false);
        s.record(PhysicalSource::D6, 2).unwrap();
        let before = s.buffer().clone();
        s.record(PhysicalSource::D6, 5).unwrap();
        assert_eq!(s.buffer().bit_count(), 3);
        assert_eq!(s.undo().map(|r| r.outcome), Some(5));
        assert_eq!(s.buffer(), &before);

        // a full buffer ignores the next roll; undoing it keeps the buffer
        let mut full = session(MnemonicLength::Words12, false);
        for _ in 0..32 {
            full.record(PhysicalSource::D20, 15).unwrap();
        }
        let complete = full.buffer().clone();
        full.record(PhysicalSource::D20, 3).unwrap();
        full.undo();
        assert_eq!(full.buffer(), &complete);
        assert_eq!(full.rolls().len(), 32);
    }

    #[test]
    fn test_bad_outcome_is_not_recorded() {
        let mut s = session(MnemonicLength::Words24, false);
        assert!(s.record(PhysicalSource::D6, 6).is_err());
        assert!(s.rolls().is_empty());
        assert_eq!(s.summary().bits_needed, 256);
    }

    #[test]
    fn test_finish_requires_complete_entropy_or_padding() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut strict = session(MnemonicLength::Words12, false);
        strict.record(PhysicalSource::D20, 10).unwrap();
        assert!(matches!(strict.finish(&mut rng), Err(SeedError::Malformed(_))));

        let mut padded = session(MnemonicLength::Words24, true);
        for _ in 0..4 {
            padded.record(PhysicalSource::D20, 15).unwrap();
        }
        let out = padded.finish(&mut rng).unwrap();
        assert_eq!(out.len(), 32);
        assert_eq!(&out[..2], &[0xff, 0xff]);
    }

    #[test]
    fn test_summary() {
        let mut s = session(MnemonicLength::Words12, false);
        s.record(PhysicalSource::D20, 17).unwrap();
        let summary = s.summary();
        assert_eq!(summary.rolls, 1);
        assert_eq!(summary.bits_collected, 2);
        assert_eq!(summary.hex, "1");
        assert!(!summary.complete);
    }
}
