//! Deterministic seeding.
//!
//! A master seed is expanded into sub-seeds per `(scope, key)` pair with
//! BLAKE3, so the synthetic provider gives every ticker its own stable
//! random walk and the classifier shuffles identically on every run.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Default master seed when the user does not supply one.
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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

    /// Derive a sub-seed for `(scope, key)`, independent of call order.
    pub fn sub_seed(&self, scope: &str, key: &str) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(scope.as_bytes());
        // separator so ("ab", "c") and ("a", "bc") differ
        hasher.update(&[0]);
        hasher.update(key.as_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }

    pub fn rng_for(&self, scope: &str, key: &str) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(scope, key))
    }
}

impl Default for RngHierarchy {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
