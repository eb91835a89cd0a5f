//! Time-randomized vote timestamps
//!
//! Every vote is backdated by a random offset inside the previous day so
//! that votes cast together by one operator's masternodes do not share a
//! timestamp. The offset is for obfuscation only; it makes no uniformity
//! promise against a determined observer.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::{CryptoError, Result};

/// Width of the backdating window (one day)
pub const TIMESTAMP_WINDOW_SECS: u64 = 86_400;

/// Source of the random bytes behind each timestamp.
///
/// There is no fallback: when the source fails, no timestamp is produced.
pub trait EntropySource {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()>;
}

/// Operating system randomness
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| CryptoError::EntropyUnavailable(e.to_string()))
    }
}

/// Deterministic entropy that replays a fixed byte sequence, wrapping at the end.
#[derive(Debug, Clone)]
pub struct FixedEntropy {
    bytes: Vec<u8>,
    position: usize,
}

impl FixedEntropy {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes, position: 0 }
    }

    /// How many bytes have been handed out so far
    pub fn consumed(&self) -> usize {
        self.position
    }
}

impl EntropySource for FixedEntropy {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        if self.bytes.is_empty() {
            return Err(CryptoError::EntropyUnavailable(
                "fixed entropy has no bytes".to_string(),
            ));
        }
        for byte in dest.iter_mut() {
            *byte = self.bytes[self.position % self.bytes.len()];
            self.position += 1;
        }
        Ok(())
    }
}

/// Offset in seconds derived from four random bytes: `Σ rᵢ^(2ⁱ) mod 86400`.
///
/// The largest term is 255^8, which still fits in a u64 together with the rest.
pub fn timestamp_offset(random: [u8; 4]) -> u64 {
    let offset: u64 = random
        .iter()
        .enumerate()
        .map(|(i, r)| u64::from(*r).pow(1u32 << i))
        .sum();
    offset % TIMESTAMP_WINDOW_SECS
}

/// Timestamp in `[now - 86399, now]`, drawing four fresh bytes per call.
pub fn random_past_timestamp<E: EntropySource + ?Sized>(entropy: &mut E, now: i64) -> Result<i64> {
    let mut random = [0u8; 4];
    entropy.fill_bytes(&mut random)?;
    Ok(now - timestamp_offset(random) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenEntropy;

    impl EntropySource for BrokenEntropy {
        fn fill_bytes(&mut self, _dest: &mut [u8]) -> Result<()> {
            Err(CryptoError::EntropyUnavailable("device missing".to_string()))
        }
    }

    #[test]
    fn test_offset_formula() {
        assert_eq!(timestamp_offset([0, 0, 0, 0]), 0);
        // 1 + 2^2 + 3^4 + 4^8
        assert_eq!(timestamp_offset([1, 2, 3, 4]), 65_622);
        assert_eq!(timestamp_offset([7, 200, 13, 99]), 40_569);
    }

    #[test]
    fn test_offset_does_not_overflow_at_max_bytes() {
        assert_eq!(timestamp_offset([255, 255, 255, 255]), 80_130);
    }

    #[test]
    fn test_timestamp_stays_inside_window() {
        let now = 1_700_000_000;
        let mut entropy = OsEntropy;
        for _ in 0..1_000 {
            let ts = random_past_timestamp(&mut entropy, now).unwrap();
            assert!(ts <= now);
            assert!(ts > now - TIMESTAMP_WINDOW_SECS as i64);
        }
    }

    #[test]
    fn test_each_call_draws_fresh_bytes() {
        let mut entropy = FixedEntropy::new(vec![1, 2, 3, 4, 0, 0, 0, 0]);
        let now = 1_000_000;

        assert_eq!(random_past_timestamp(&mut entropy, now).unwrap(), now - 65_622);
        assert_eq!(random_past_timestamp(&mut entropy, now).unwrap(), now);
        assert_eq!(entropy.consumed(), 8);
    }

    #[test]
    fn test_entropy_failure_is_an_error() {
        let result = random_past_timestamp(&mut BrokenEntropy, 1_000_000);
        assert!(matches!(result, Err(CryptoError::EntropyUnavailable(_))));

        let empty = random_past_timestamp(&mut FixedEntropy::new(Vec::new()), 1_000_000);
        assert!(empty.is_err());
    }
}
