//! Deterministic pseudo-random permutation for seeded sampling.
//!
//! The `/idioms/random` endpoint must be reproducible and prefix-stable when
//! a seed is supplied: the same seed always yields the same permutation, and
//! enlarging the page size never reorders already-returned items. Rather
//! than leaning on a database session RNG, the permutation is an explicit
//! pure function of `(seed, idiom id)` computed in process: each row's sort
//! key is a SHA-256 digest over the normalised seed and the id.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A permutation of the catalog keyed by a caller-supplied seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shuffle {
  seed_bits: u64,
}

impl Shuffle {
  /// Build the permutation for `seed`.
  ///
  /// The seed is normalised as `seed mod 1000 / 1000.0` (euclidean modulo,
  /// so negative seeds are well-defined); seeds congruent modulo 1000
  /// therefore produce the same permutation.
  pub fn from_seed(seed: i64) -> Self {
    let normalized = seed.rem_euclid(1000) as f64 / 1000.0;
    Self { seed_bits: normalized.to_bits() }
  }

  /// The sort key for one idiom: the first 8 bytes of
  /// `SHA-256(seed_bits || id)` as a big-endian integer.
  pub fn key(&self, id: Uuid) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(self.seed_bits.to_be_bytes());
    hasher.update(id.as_bytes());
    let digest = hasher.finalize();

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
  }
}
