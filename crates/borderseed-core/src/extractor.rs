//! Dyadic entropy extraction from physical randomness.
//!
//! A fair `n`-sided die carries `log2(n)` bits, but only power-of-two
//! ranges map onto whole bits without bias. The outcome range `[0, n)` is
//! therefore tiled with descending power-of-two blocks (the binary
//! expansion of `n`), and each roll contributes exactly the bits of the
//! block it lands in:
//!
//! ```text
//! d6:   [0 1 2 3][4 5]           -> 2 bits or 1 bit
//! d20:  [0 .. 15][16 .. 19]      -> 4 bits or 2 bits
//! coin: [0 1]                    -> 1 bit
//! ```
//!
//! Every outcome keeps its full conditional entropy and nothing is
//! rejected, so no rolls are wasted and no bias is introduced.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeedError};

/// Bits contributed by one physical event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contribution {
    /// Value in `[0, 2^bits)`.
    pub value: u64,
    /// Number of bits the value spans.
    pub bits: u32,
}

/// Physical randomness sources offered by the entropy screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhysicalSource {
    /// Coin flip: heads/tails.
    Coin,
    /// Six-sided die.
    D6,
    /// Twenty-sided die.
    D20,
}

impl PhysicalSource {
    pub const ALL: [PhysicalSource; 3] = [Self::Coin, Self::D6, Self::D20];

    pub fn sides(self) -> u32 {
        match self {
            Self::Coin => 2,
            Self::D6 => 6,
            Self::D20 => 20,
        }
    }

    /// Extract a contribution from a zero-based outcome of this source.
    pub fn extract(self, outcome: u32) -> Result<Option<Contribution>> {
        extract(outcome, self.sides())
    }
}

impl std::fmt::Display for PhysicalSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Coin => write!(f, "coin"),
            Self::D6 => write!(f, "d6"),
            Self::D20 => write!(f, "d20"),
        }
    }
}

impl std::str::FromStr for PhysicalSource {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coin" | "d2" => Ok(Self::Coin),
            "d6" | "dice" | "die" => Ok(Self::D6),
            "d20" => Ok(Self::D20),
            other => Err(SeedError::Malformed(format!(
                "unknown physical source '{other}' (expected coin, d6 or d20)"
            ))),
        }
    }
}

/// Map one roll of a fair `sides`-sided die to an unbiased bit contribution.
///
/// `outcome` is zero-based. Returns `None` when the roll carries no bits:
/// a one-sided die, or an outcome landing in the single-element tail block
/// of an odd-sided die.
///
/// # Errors
///
/// [`SeedError::Malformed`] if `sides == 0` or `outcome >= sides`.
pub fn extract(outcome: u32, sides: u32) -> Result<Option<Contribution>> {
    if sides == 0 {
        return Err(SeedError::Malformed("die must have at least one side".into()));
    }
    if outcome >= sides {
        return Err(SeedError::Malformed(format!(
            "outcome {outcome} out of range for a {sides}-sided die"
        )));
    }
    if sides == 1 {
        return Ok(None);
    }

    let sides = u64::from(sides);
    let outcome = u64::from(outcome);

    // Largest power of two not exceeding `sides`.
    let mut bits = 63 - sides.leading_zeros();
    let mut cumulative = 0u64;
    while bits >= 1 {
        let block = 1u64 << bits;
        if cumulative + block > sides {
            bits -= 1;
            continue;
        }
        if outcome < cumulative + block {
            return Ok(Some(Contribution {
                value: outcome - cumulative,
                bits,
            }));
        }
        cumulative += block;
        bits -= 1;
    }
    // Only the zero-bit tail block is left.
    Ok(None)
}

/// Expected bits per roll for a fair die, averaged over all outcomes.
pub fn expected_bits(sides: u32) -> f64 {
    if sides <= 1 {
        return 0.0;
    }
    let total: u32 = (0..sides)
        .filter_map(|o| extract(o, sides).ok().flatten())
        .map(|c| c.bits)
        .sum();
    f64::from(total) / f64::from(sides)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(value: u64, bits: u32) -> Option<Contribution> {
        Some(Contribution { value, bits })
    }

    #[test]
    fn test_d6_tiling() {
        assert_eq!(extract(0, 6).unwrap(), c(0, 2));
        assert_eq!(extract(1, 6).unwrap(), c(1, 2));
        assert_eq!(extract(2, 6).unwrap(), c(2, 2));
        assert_eq!(extract(3, 6).unwrap(), c(3, 2));
        assert_eq!(extract(4, 6).unwrap(), c(0, 1));
        assert_eq!(extract(5, 6).unwrap(), c(1, 1));
    }

    #[test]
    fn test_coin() {
        assert_eq!(extract(0, 2).unwrap(), c(0, 1));
        assert_eq!(extract(1, 2).unwrap(), c(1, 1));
    }

    #[test]
    fn test_d20_tiling() {
        for o in 0..16 {
            assert_eq!(extract(o, 20).unwrap(), c(u64::from(o), 4));
        }
        for o in 16..20 {
            assert_eq!(extract(o, 20).unwrap(), c(u64::from(o - 16), 2));
        }
    }

    #[test]
    fn test_power_of_two_sides_use_single_block() {
        for o in 0..16 {
            assert_eq!(extract(o, 16).unwrap(), c(u64::from(o), 4));
        }
    }

    #[test]
    fn test_no_entropy_cases() {
        assert_eq!(extract(0, 1).unwrap(), None);
        // d3: [0 1][2] -> last outcome sits in a one-element block
        assert_eq!(extract(2, 3).unwrap(), None);
        assert_eq!(extract(1, 3).unwrap(), c(1, 1));
    }

    #[test]
    fn test_malformed_inputs() {
        assert!(matches!(extract(0, 0), Err(SeedError::Malformed(_))));
        assert!(matches!(extract(6, 6), Err(SeedError::Malformed(_))));
    }

    #[test]
    fn test_large_sides_do_not_overflow() {
        assert_eq!(extract(u32::MAX - 2, u32::MAX).unwrap(), c(1, 1));
        assert_eq!(extract(u32::MAX - 1, u32::MAX).unwrap(), None);
        assert_eq!(extract(0, u32::MAX).unwrap(), c(0, 31));
    }

    #[test]
    fn test_expected_bits() {
        assert!((expected_bits(2) - 1.0).abs() < 1e-12);
        assert!((expected_bits(6) - 10.0 / 6.0).abs() < 1e-12);
        assert!((expected_bits(20) - 72.0 / 20.0).abs() < 1e-12);
        assert_eq!(expected_bits(1), 0.0);
    }

    #[test]
    fn test_physical_source_parse_and_sides() {
        assert_eq!("coin".parse::<PhysicalSource>().unwrap(), PhysicalSource::Coin);
        assert_eq!("D6".parse::<PhysicalSource>().unwrap(), PhysicalSource::D6);
        assert_eq!("d20".parse::<PhysicalSource>().unwrap(), PhysicalSource::D20);
        assert!("d7".parse::<PhysicalSource>().is_err());
        assert_eq!(PhysicalSource::D20.sides(), 20);
        assert_eq!(PhysicalSource::D6.to_string(), "d6");
        assert_eq!(PhysicalSource::D6.extract(4).unwrap(), c(0, 1));
    }
}
