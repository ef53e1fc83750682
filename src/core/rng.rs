//! Deterministic random number generation for question selection.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical question sequences
//! - **Context streams**: Independent sequences for the general pool, the
//!   role pool and the final ordering, so changing one pool's size does not
//!   reshuffle the other
//!
//! ```
//! use interview_battle::core::GameRng;
//!
//! let rng = GameRng::new(42);
//! let mut general = rng.for_context("general");
//! let mut role = rng.for_context("role");
//!
//! // Streams are independent but reproducible.
//! let a = general.gen_range_usize(0..1000);
//! let b = GameRng::new(42).for_context("general").gen_range_usize(0..1000);
//! assert_eq!(a, b);
//! let _ = role.gen_range_usize(0..1000);
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hash::{Hash, Hasher};

/// Seeded RNG used by the question selector and the headless driver.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from the thread-local entropy source.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        let context_seed = hasher.finish();

        Self {
            inner: ChaCha8Rng::seed_from_u64(context_seed),
            seed: context_seed,
        }
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place (Fisher-Yates).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.inner)
    }

    /// Draw `amount` items uniformly without replacement.
    ///
    /// Runs a partial Fisher-Yates over a copy of the slice, so every
    /// ordered subset is equally likely. Returns at most `slice.len()` items.
    pub fn sample<T: Clone>(&mut self, slice: &[T], amount: usize) -> Vec<T> {
        let mut pool = slice.to_vec();
        let (picked, _) = pool.partial_shuffle(&mut self.inner, amount);
        picked.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_range_usize(0..1000), rng2.gen_range_usize(0..1000));
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = GameRng::new(1);
        let mut rng2 = GameRng::new(2);

        let seq1: Vec<_> = (0..10).map(|_| rng1.gen_range_usize(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| rng2.gen_range_usize(0..1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_context_produces_different_sequence() {
        let rng = GameRng::new(42);
        let mut ctx1 = rng.for_context("general");
        let mut ctx2 = rng.for_context("role");

        let seq1: Vec<_> = (0..10).map(|_| ctx1.gen_range_usize(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| ctx2.gen_range_usize(0..1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = GameRng::new(42);
        let mut data = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

        rng.shuffle(&mut data);
        data.sort();
        assert_eq!(data, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_sample_without_replacement() {
        let mut rng = GameRng::new(7);
        let items: Vec<u32> = (0..20).collect();

        let mut picked = rng.sample(&items, 5);
        assert_eq!(picked.len(), 5);
        picked.sort();
        picked.dedup();
        assert_eq!(picked.len(), 5);
    }

    #[test]
    fn test_sample_clamps_to_supply() {
        let mut rng = GameRng::new(7);
        let items = vec!["a", "b", "c"];
        assert_eq!(rng.sample(&items, 10).len(), 3);
        assert!(rng.sample::<u8>(&[], 2).is_empty());
    }

    #[test]
    fn test_choose() {
        let mut rng = GameRng::new(42);
        let items = vec![1, 2, 3];
        assert!(items.contains(rng.choose(&items).unwrap()));

        let empty: Vec<i32> = vec![];
        assert!(rng.choose(&empty).is_none());
    }
}
