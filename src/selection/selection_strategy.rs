use std::fmt::Debug;

use crate::breeding::{BreedingPool, WeightedChromosome};
use crate::error::Result;
use crate::rng::RandomNumberGenerator;

/// Trait for parent selection strategies.
///
/// A selection strategy picks one parent from a breeding pool. Populations
/// call it twice for every pair of offspring they produce.
pub trait SelectionStrategy<C>: Debug + Send + Sync {
    /// Selects a single parent from the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the strategy cannot produce a parent, for example
    /// when rejection sampling runs out of attempts.
    fn select<'a>(
        &self,
        pool: &'a BreedingPool<C>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<&'a WeightedChromosome<C>>;
}
