//! # RandomNumberGenerator
//!
//! The `RandomNumberGenerator` struct is the random source handed to every
//! stochastic operation in the crate: initial population construction, parent
//! selection, crossover and mutation. It wraps the `rand` crate's `StdRng`.
//!
//! Each worker of the evolution engine owns its own generator. Generators are
//! derived from one another with [`RandomNumberGenerator::fork`], so a run
//! started from a fixed seed is reproducible.
//!
//! ## Example
//!
//! ```rust
//! use lockstep_ga::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let index = rng.index(10);
//! assert!(index < 10);
//!
//! let p = rng.probability();
//! assert!((0.0..1.0).contains(&p));
//! ```

use std::fmt;

use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

/// A wrapper around the `rand` crate's `StdRng`.
///
/// The wrapper implements [`RngCore`], so every `rand::Rng` and
/// `rand::seq::SliceRandom` helper can be used with it directly.
#[derive(Clone)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new `RandomNumberGenerator` instance seeded from the system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new `RandomNumberGenerator` instance with a specific seed.
    ///
    /// This is useful for reproducible tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns a uniformly distributed index in `[0, upper)`.
    ///
    /// # Panics
    ///
    /// Panics if `upper` is zero.
    pub fn index(&mut self, upper: usize) -> usize {
        self.rng.gen_range(0..upper)
    }

    /// Returns a uniformly distributed value in `[0, 1)`.
    pub fn probability(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Derives an independent generator from this one.
    ///
    /// The child is seeded from the parent's stream, so forking the same
    /// parent state always yields the same child.
    pub fn fork(&mut self) -> Self {
        Self::from_seed(self.rng.next_u64())
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RandomNumberGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomNumberGenerator").finish_non_exhaustive()
    }
}

impl RngCore for RandomNumberGenerator {
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
