//! Secure randomness as an injectable capability.

use crate::error::Error;
use rand::rngs::OsRng;
use rand::RngCore;
use std::collections::VecDeque;

/// Source of cryptographically secure random bytes.
///
/// Injected wherever the engine needs entropy so deterministic test doubles
/// can replace the secure source without touching production code paths.
pub trait EntropySource {
    /// Fill `dest` with random bytes, or report `EntropyUnavailable`.
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), Error>;
}

/// Operating-system CSPRNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| Error::EntropyUnavailable(e.to_string()))
    }
}

/// Deterministic entropy double for tests: hands out a fixed byte script
/// and reports `EntropyUnavailable` once exhausted.
#[derive(Clone, Debug, Default)]
pub struct ScriptedEntropy {
    bytes: VecDeque<u8>,
}

impl ScriptedEntropy {
    pub fn new(bytes: impl IntoIterator<Item = u8>) -> Self {
        Self {
            bytes: bytes.into_iter().collect(),
        }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.bytes.len()
    }
}

impl EntropySource for ScriptedEntropy {
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        if self.bytes.len() < dest.len() {
            return Err(Error::EntropyUnavailable(format!(
                "scripted entropy exhausted: {} bytes requested, {} left",
                dest.len(),
                self.bytes.len()
            )));
        }
        for slot in dest.iter_mut() {
            *slot = self.bytes.pop_front().unwrap_or_default();
        }
        Ok(())
    }
}

/// Draw a fresh 256-bit key. One key per commitment, never reused.
pub fn generate_key(entropy: &mut dyn EntropySource) -> Result<[u8; 32], Error> {
    let mut key = [0u8; 32];
    entropy.fill(&mut key)?;
    Ok(key)
}

/// Uniform integer in `[min, max]` inclusive, free of modulo bias.
///
/// Draws the minimal byte width that can represent the range, interprets it
/// big-endian, and rejects any draw at or above the largest multiple of the
/// range that fits in that width. A plain `random % range` would favor low
/// values whenever the range does not divide the source's cardinality.
pub fn uniform_in_range(
    entropy: &mut dyn EntropySource,
    min: u64,
    max: u64,
) -> Result<u64, Error> {
    assert!(min <= max, "uniform_in_range: min {} > max {}", min, max);

    let range = (max - min) as u128 + 1;
    if range == 1 {
        return Ok(min);
    }

    let bits = 128 - (range - 1).leading_zeros();
    let width = ((bits + 7) / 8) as usize;
    let cardinality = 1u128 << (8 * width as u32);
    // Largest multiple of `range` representable in `width` bytes. Draws at
    // or above it are rejected, leaving every residue equally likely.
    let limit = cardinality / range * range;

    let mut buf = [0u8; 8];
    loop {
        entropy.fill(&mut buf[..width])?;
        let mut r: u128 = 0;
        for &byte in &buf[..width] {
            r = (r << 8) | byte as u128;
        }
        if r < limit {
            return Ok(min + (r % range) as u64);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_key_uses_all_32_bytes() {
        let mut entropy = ScriptedEntropy::new((0u8..32).collect::<Vec<_>>());
        let key = generate_key(&mut entropy).unwrap();
        assert_eq!(key[0], 0);
        assert_eq!(key[31], 31);
        assert_eq!(entropy.remaining(), 0);
    }

    #[test]
    fn test_uniform_single_value_range_draws_nothing() {
        let mut entropy = ScriptedEntropy::new([]);
        assert_eq!(uniform_in_range(&mut entropy, 7, 7).unwrap(), 7);
    }

    #[test]
    fn test_uniform_accepts_below_rejection_threshold() {
        // Range 6 in one byte: limit = floor(256/6) * 6 = 252.
        let mut entropy = ScriptedEntropy::new([251]);
        assert_eq!(uniform_in_range(&mut entropy, 0, 5).unwrap(), 251 % 6);
    }

    #[test]
    fn test_uniform_rejects_biased_tail_and_redraws() {
        // 252..=255 would bias the low residues; all four must be rejected.
        let mut entropy = ScriptedEntropy::new([252, 253, 254, 255, 9]);
        assert_eq!(uniform_in_range(&mut entropy, 0, 5).unwrap(), 9 % 6);
        assert_eq!(entropy.remaining(), 0);
    }

    #[test]
    fn test_uniform_offset_range() {
        let mut entropy = ScriptedEntropy::new([0, 1]);
        assert_eq!(uniform_in_range(&mut entropy, 10, 11).unwrap(), 10);
        assert_eq!(uniform_in_range(&mut entropy, 10, 11).unwrap(), 11);
    }

    #[test]
    fn test_uniform_wide_range_uses_two_bytes() {
        // Range 300 needs two bytes; big-endian draw 0x01_2C = 300.
        let mut entropy = ScriptedEntropy::new([0x01, 0x2C]);
        assert_eq!(uniform_in_range(&mut entropy, 0, 299).unwrap(), 0);
    }

    #[test]
    fn test_uniform_never_leaves_range() {
        let mut entropy = OsEntropy;
        for _ in 0..10_000 {
            let v = uniform_in_range(&mut entropy, 0, 5).unwrap();
            assert!(v <= 5, "value out of range: {}", v);
        }
    }

    #[test]
    fn test_exhausted_source_reports_entropy_unavailable() {
        let mut entropy = ScriptedEntropy::new([1, 2, 3]);
        let err = generate_key(&mut entropy).unwrap_err();
        assert!(matches!(err, Error::EntropyUnavailable(_)));
    }
}
