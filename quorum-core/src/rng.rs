//! Deterministic RNG hierarchy.
//!
//! A master seed generates deterministic sub-seeds for each `(ticker, stream)`
//! pair, where the stream is usually a predictor's model type. Sub-seeds are
//! derived via BLAKE3 hashing, independently of evaluation order, so parallel
//! and sequential profile evaluation draw identical numbers.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Deterministic RNG hierarchy.
#[derive(Debug, Clone)]
pub struct RngHierarchy {
    master_seed: u64,
}

impl RngHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive a deterministic sub-seed for a specific `(ticker, stream)`.
    ///
    /// Lengths are hashed ahead of each string so `("AB", "C")` and
    /// `("A", "BC")` cannot collide.
    pub fn sub_seed(&self, ticker: &str, stream: &str) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(&(ticker.len() as u64).to_le_bytes());
        hasher.update(ticker.as_bytes());
        hasher.update(&(stream.len() as u64).to_le_bytes());
        hasher.update(stream.as_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Create a seeded StdRng for `(ticker, stream)`.
    pub fn rng_for(&self, ticker: &str, stream: &str) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(ticker, stream))
    }
}
