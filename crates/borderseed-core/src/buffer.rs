//! Big-endian bit accumulator for physically sourced entropy.
//!
//! Every contribution is appended below the bits already collected
//! (`value = value * 2^bits + contribution`), so the first coin flip ends
//! up as the most significant bit of the exported entropy. Each push
//! records its width so the last roll can be undone exactly.
//!
//! One buffer belongs to one collection session: created, mutated by a
//! single flow, exported, then dropped.

use num_bigint::BigUint;
use rand::RngCore;

use crate::error::{Result, SeedError};
use crate::extractor::Contribution;
use crate::length::MnemonicLength;

/// Hard cap on collected bits (the entropy of a 24-word mnemonic).
pub const MAX_BITS: u32 = 256;

/// Arbitrary-precision entropy accumulator with undo history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntropyBitBuffer {
    value: BigUint,
    bit_count: u32,
    history: Vec<u32>,
    limit: u32,
}

impl Default for EntropyBitBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropyBitBuffer {
    /// Empty buffer capped at [`MAX_BITS`].
    pub fn new() -> Self {
        Self {
            value: BigUint::default(),
            bit_count: 0,
            history: Vec::new(),
            limit: MAX_BITS,
        }
    }

    /// Empty buffer capped at `limit` bits (`1..=256`).
    pub fn with_limit(limit: u32) -> Result<Self> {
        check_limit(limit)?;
        Ok(Self {
            limit,
            ..Self::new()
        })
    }

    /// Empty buffer sized for the entropy of a `length`-word mnemonic.
    pub fn for_length(length: MnemonicLength) -> Self {
        Self {
            limit: length.entropy_bits(),
            ..Self::new()
        }
    }

    /// Change the cap. The new limit may not drop below what is already
    /// collected.
    pub fn set_limit(&mut self, limit: u32) -> Result<()> {
        check_limit(limit)?;
        if limit < self.bit_count {
            return Err(SeedError::Malformed(format!(
                "limit {limit} is below the {} bits already collected",
                self.bit_count
            )));
        }
        self.limit = limit;
        Ok(())
    }

    /// Append `bits` bits holding `value`.
    ///
    /// At the cap this is a no-op that records nothing, so a following
    /// [`pop`](Self::pop) undoes the last push that did consume bits. A push
    /// that would cross the cap keeps only the most significant bits of
    /// `value` that still fit. Returns the number of bits actually consumed.
    ///
    /// `bits` is not limited to 64: `push(0, 128)` appends 128 zero bits.
    /// Values wider than a `u64` go through [`push_wide`](Self::push_wide).
    ///
    /// # Errors
    ///
    /// [`SeedError::Malformed`] if `value >= 2^bits`. The buffer is left
    /// untouched.
    pub fn push(&mut self, value: u64, bits: u32) -> Result<u32> {
        self.push_wide(&BigUint::from(value), bits)
    }

    /// [`push`](Self::push) for an arbitrary-precision value.
    pub fn push_wide(&mut self, value: &BigUint, bits: u32) -> Result<u32> {
        if value.bits() > u64::from(bits) {
            return Err(SeedError::Malformed(format!(
                "value {value} does not fit in {bits} bits"
            )));
        }
        if self.bit_count == self.limit {
            return Ok(0);
        }

        let room = self.limit - self.bit_count;
        let (value, bits) = if bits > room {
            log::debug!("entropy cap reached: keeping {room} of {bits} pushed bits");
            (value >> (bits - room), room)
        } else {
            (value.clone(), bits)
        };

        self.value = (&self.value << bits) + value;
        self.bit_count += bits;
        self.history.push(bits);
        Ok(bits)
    }

    /// Append an extractor contribution. `None` (a roll with no entropy)
    /// consumes nothing.
    pub fn push_contribution(&mut self, contribution: Option<Contribution>) -> Result<u32> {
        match contribution {
            Some(c) => self.push(c.value, c.bits),
            None => Ok(0),
        }
    }

    /// Undo the most recent push that consumed bits. Returns the width
    /// removed, or `None` when there is nothing to undo.
    ///
    /// Pushes made while the buffer was full left no history, so after one
    /// of them this removes the push before it.
    pub fn pop(&mut self) -> Option<u32> {
        let bits = self.history.pop()?;
        self.value = &self.value >> bits;
        self.bit_count -= bits;
        Some(bits)
    }

    pub fn bit_count(&self) -> u32 {
        self.bit_count
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn is_full(&self) -> bool {
        self.bit_count == self.limit
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Widths of every push still on the undo stack, oldest first.
    pub fn history(&self) -> &[u32] {
        &self.history
    }

    /// Big-endian hex of the collected value, zero-padded to
    /// `ceil(bit_count / 4)` nibbles. Empty when nothing is collected.
    pub fn to_hex(&self) -> String {
        if self.bit_count == 0 {
            return String::new();
        }
        let width = self.bit_count.div_ceil(4) as usize;
        format!("{:0>width$}", self.value.to_str_radix(16))
    }

    /// Whole bytes of collected entropy: exactly `floor(bit_count / 8)`
    /// bytes, big-endian.
    ///
    /// These are the low `8 * floor(bit_count / 8)` bits of the value; an
    /// incomplete leading byte is dropped and a short value is left-padded
    /// with zero bytes.
    pub fn export_bytes(&self) -> Vec<u8> {
        let n = (self.bit_count / 8) as usize;
        let mut out = self.value.to_bytes_le();
        out.resize(n, 0);
        out.reverse();
        out
    }

    /// [`export_bytes`](Self::export_bytes) topped up with bytes from `rng`
    /// to exactly `target_len` bytes. Exports longer than `target_len` are
    /// truncated.
    pub fn export_padded<R: RngCore + ?Sized>(&self, target_len: usize, rng: &mut R) -> Vec<u8> {
        let mut out = self.export_bytes();
        let collected = out.len();
        if collected < target_len {
            log::debug!(
                "padding {collected} collected bytes with {} random bytes",
                target_len - collected
            );
            out.resize(target_len, 0);
            rng.fill_bytes(&mut out[collected..]);
        } else {
            out.truncate(target_len);
        }
        out
    }

    /// Whole bytes still missing before `target_len` bytes can be exported.
    pub fn bytes_remaining(&self, target_len: usize) -> usize {
        target_len.saturating_sub((self.bit_count / 8) as usize)
    }
}

impl std::fmt::Display for EntropyBitBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

fn check_limit(limit: u32) -> Result<()> {
    if limit == 0 || limit > MAX_BITS {
        return Err(SeedError::Malformed(format!(
            "entropy limit {limit} outside 1..={MAX_BITS}"
        )));
    }
    Ok(())
}
