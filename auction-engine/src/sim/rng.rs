// Deterministic random source for sampling, shuffling, and tie-breaking.
//
// RULE: nothing in the engine may call a platform RNG. Every source of
// randomness in a run flows through one SeededRng instance, seeded from a
// single integer and passed explicitly to every consumer. The draw
// algorithms (modulo bound, Fisher-Yates) are spelled out here so a stream
// stays reproducible regardless of `rand` internals.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A seeded PRNG stream. Cloning forks the stream at its current position.
#[derive(Debug, Clone)]
pub struct SeededRng {
    inner: Pcg64Mcg,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        SeededRng {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Uniform index in `[0, n)`. `n` must be positive.
    pub fn next_index(&mut self, n: usize) -> usize {
        assert!(n > 0, "next_index called with n = 0");
        (self.inner.next_u64() % n as u64) as usize
    }

    /// Uniform integer in `[min, max]` inclusive.
    pub fn next_int(&mut self, min: u32, max: u32) -> u32 {
        assert!(min <= max, "next_int called with min {} > max {}", min, max);
        let span = (max - min) as u64 + 1;
        min + (self.inner.next_u64() % span) as u32
    }

    /// In-place Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_index(i + 1);
            items.swap(i, j);
        }
    }

    /// `n` distinct elements drawn without replacement, in the order fixed
    /// by the partial-shuffle algorithm. `n > items.len()` is a caller bug.
    pub fn sample<T: Clone>(&mut self, items: &[T], n: usize) -> Vec<T> {
        assert!(
            n <= items.len(),
            "sample of {} from a list of {}",
            n,
            items.len()
        );
        let mut indices: Vec<usize> = (0..items.len()).collect();
        for i in 0..n {
            let j = i + self.next_index(items.len() - i);
            indices.swap(i, j);
        }
        indices[..n].iter().map(|&i| items[i].clone()).collect()
    }
}
