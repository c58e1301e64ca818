//! # Evolution
//!
//! The generational loop: [`EvolutionOptions`] configure a run,
//! [`GeneticAlgorithm`] drives it across barrier-synchronized workers, and the
//! [`termination`] types describe how it ends.
pub mod convergence;
pub mod engine;
pub mod options;
pub mod termination;

pub use convergence::ConvergenceTracker;
pub use engine::{GenerationContext, GeneticAlgorithm};
pub use options::{EvolutionOptions, EvolutionOptionsBuilder};
pub use termination::{
    CancellationToken, ConvergenceReason, EvolutionOutcome, RunStatus, Termination,
};
