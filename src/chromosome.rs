//! # Chromosome Trait
//!
//! The `Chromosome` trait defines the capability contract for candidate
//! solutions evolved by the engine: fitness evaluation against a target,
//! recombination with another candidate, and in-place mutation.
//!
//! The target is an associated type, so every encoding states at compile time
//! what it is scored against. Encodings that need temporary storage during
//! crossover declare it as `Scratch`; each worker owns one scratch value and
//! hands it to every crossover it performs.
//!
//! ## Example
//!
//! ```rust
//! use lockstep_ga::chromosome::Chromosome;
//! use lockstep_ga::error::Result;
//! use lockstep_ga::rng::RandomNumberGenerator;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Bits(Vec<bool>);
//!
//! impl Chromosome for Bits {
//!     type Target = usize;
//!     type Scratch = ();
//!
//!     fn fitness(&self, target: &usize) -> f64 {
//!         let ones = self.0.iter().filter(|b| **b).count();
//!         1.0 / (1.0 + ones.abs_diff(*target) as f64)
//!     }
//!
//!     fn crossover(
//!         &self,
//!         other: &Self,
//!         rng: &mut RandomNumberGenerator,
//!         _scratch: &mut (),
//!     ) -> Result<Self> {
//!         let split = rng.index(self.0.len() + 1);
//!         let mut genes = self.0[..split].to_vec();
//!         genes.extend_from_slice(&other.0[split..]);
//!         Ok(Bits(genes))
//!     }
//!
//!     fn mutate(&mut self, mutation_rate: f64, rng: &mut RandomNumberGenerator) {
//!         for bit in self.0.iter_mut() {
//!             if rng.probability() < mutation_rate {
//!                 *bit = !*bit;
//!             }
//!         }
//!     }
//! }
//!
//! let mut rng = RandomNumberGenerator::from_seed(1);
//! let a = Bits(vec![true, true, false]);
//! let b = Bits(vec![false, false, true]);
//! let child = a.crossover(&b, &mut rng, &mut ()).unwrap();
//! assert_eq!(child.0.len(), 3);
//! assert!(a.fitness(&2) > b.fitness(&2));
//! ```

use std::fmt::Debug;

use crate::error::Result;
use crate::rng::RandomNumberGenerator;

/// Trait for types that represent candidate solutions in the genetic algorithm.
///
/// Types implementing this trait must also implement `Clone`, `Debug`, `PartialEq`,
/// `Send` and `Sync`: chromosomes are cloned into breeding pools, compared for
/// exact-match termination, and read concurrently by worker threads.
pub trait Chromosome: Clone + Debug + PartialEq + Send + Sync {
    /// What the chromosome is scored against.
    type Target: Send + Sync;

    /// Reusable storage for crossover, owned by the calling worker.
    type Scratch: Default + Send;

    /// Scores the chromosome against the target. Higher is better.
    ///
    /// The best score of any population must be strictly positive, since
    /// breeding pools normalize by the maximum.
    fn fitness(&self, target: &Self::Target) -> f64;

    /// Produces one child with `self` as the primary parent.
    ///
    /// Given the same random stream the result must be the same.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneticError::IncompatibleCrossover`](crate::error::GeneticError::IncompatibleCrossover)
    /// when `other` cannot be recombined with `self`.
    fn crossover(
        &self,
        other: &Self,
        rng: &mut RandomNumberGenerator,
        scratch: &mut Self::Scratch,
    ) -> Result<Self>;

    /// Alters the chromosome in place with probability `mutation_rate`.
    fn mutate(&mut self, mutation_rate: f64, rng: &mut RandomNumberGenerator);
}
