//! # Breeding
//!
//! Fitness bookkeeping for one generation: [`WeightedChromosome`] pairs a
//! chromosome with its raw and normalized fitness, and [`BreedingPool`] ranks
//! a set of candidates for parent selection.
pub mod pool;
pub mod weighted;

pub use pool::{BreedingPool, NORMALIZED_MAX};
pub use weighted::WeightedChromosome;
