//! Deterministic RNG wrapper used by the stochastic optimizer.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Deterministic RNG handle.
///
/// A master `seed: u64` must be provided by the caller. Independent streams
/// (population initialisation, mutation dithering) are derived with
/// [`derive_substream_seed`], which hashes `(master_seed, substream_id)` with
/// SipHash-1-3 under fixed zero keys so the rule is stable across platforms.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
}

impl RngHandle {
    /// Creates a new RNG handle from a master seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a handle for a derived substream of `master_seed`.
    pub fn substream(master_seed: u64, substream: u64) -> Self {
        Self::from_seed(derive_substream_seed(master_seed, substream))
    }

    /// Samples uniformly from `[lo, hi)`.
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.rng.gen::<f64>()
    }

    /// Samples an index in `0..len` that differs from every entry of `exclude`.
    ///
    /// Returns `None` when no admissible index exists.
    pub fn index_excluding(&mut self, len: usize, exclude: &[usize]) -> Option<usize> {
        let admissible = (0..len).filter(|idx| !exclude.contains(idx)).count();
        if admissible == 0 {
            return None;
        }
        let pick = self.rng.gen_range(0..admissible);
        (0..len).filter(|idx| !exclude.contains(idx)).nth(pick)
    }

    /// Returns a mutable reference to the underlying RNG for advanced usage.
    pub fn inner_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl RngCore for RngHandle {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Derives the deterministic seed for a specific substream.
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}
