//! Fisher-Yates shuffling over a seedable RNG
//!
//! Every shuffle goes through `ShuffleEngine`, which owns the RNG for a
//! draw session. Seeding it makes a whole reading reproducible.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

/// Random source for shuffles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawRng {
    inner: ChaCha12Rng,
}

impl DrawRng {
    /// Deterministic RNG for reproducible readings
    pub fn from_seed(seed: u64) -> Self {
        DrawRng {
            inner: ChaCha12Rng::seed_from_u64(seed),
        }
    }

    /// RNG seeded from OS entropy
    pub fn from_entropy() -> Self {
        DrawRng {
            inner: ChaCha12Rng::from_entropy(),
        }
    }

    /// Seeded if a seed is given, entropy otherwise
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::from_seed)
    }
}

impl RngCore for DrawRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

/// Return a shuffled copy of `items`, leaving the input untouched
///
/// Walks `i` from the last index down to 1 and swaps with a uniform `j` in `0..=i`.
pub fn fisher_yates<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.gen_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled
}

/// Produces random permutations of deck cards
#[derive(Debug, Clone)]
pub struct ShuffleEngine {
    rng: DrawRng,
}

impl ShuffleEngine {
    pub fn new(rng: DrawRng) -> Self {
        ShuffleEngine { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        ShuffleEngine::new(DrawRng::from_seed(seed))
    }

    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        fisher_yates(items, &mut self.rng)
    }
}
