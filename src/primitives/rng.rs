//! Seeded pseudo-random number generation.
//!
//! ## Purpose
//!
//! Reproducible randomness for fold shuffling, k-means++ seeding and
//! bootstrap bags. Results depend only on the seed.
//!
//! ## Non-goals
//!
//! * This is not a statistically strong or cryptographic generator.

/// Minimal PRNG.
///
/// Uses an LCG (Linear Congruential Generator) with constants from PCG/MQL.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Create a generator from a seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next 32 random bits.
    pub fn next_u32(&mut self) -> u32 {
        // LCG constants for 64-bit state
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Uniform index in `0..n`. Returns 0 when `n == 0`.
    pub fn next_index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        (self.next_u32() as usize) % n
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<E>(&mut self, values: &mut [E]) {
        for i in (1..values.len()).rev() {
            let j = self.next_index(i + 1);
            values.swap(i, j);
        }
    }
}
