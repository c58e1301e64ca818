pub mod breeding;
pub mod chromosome;
pub mod error;
pub mod evolution;
pub mod population;
pub mod problems;
pub mod rng;
pub mod selection;

// Re-export commonly used types for convenience
pub use breeding::{BreedingPool, WeightedChromosome};
pub use chromosome::Chromosome;
pub use error::{GeneticError, OptionExt, Result};
pub use evolution::{
    CancellationToken, EvolutionOptions, EvolutionOutcome, GeneticAlgorithm, RunStatus,
    Termination,
};
pub use population::Population;
