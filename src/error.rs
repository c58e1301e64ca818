//! # Error Types
//!
//! This module defines the error type shared by the breeding pool, the
//! population operators and the evolution engine.
//!
//! Cancellation and stabilization are not errors: a run that stops on a
//! fitness plateau or on an external signal returns a regular
//! [`EvolutionOutcome`](crate::evolution::EvolutionOutcome).
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use lockstep_ga::error::{GeneticError, Result};
//!
//! fn check_rate(rate: f64) -> Result<f64> {
//!     if !(0.0..=1.0).contains(&rate) {
//!         return Err(GeneticError::Configuration(format!("bad rate {}", rate)));
//!     }
//!     Ok(rate)
//! }
//!
//! assert!(check_rate(0.5).is_ok());
//! assert!(check_rate(1.5).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use lockstep_ga::error::{GeneticError, OptionExt};
//!
//! fn find_best_candidate(candidates: &[i32]) -> lockstep_ga::error::Result<i32> {
//!     candidates.iter().max().cloned().ok_or_else_genetic(||
//!         GeneticError::EmptyPopulation
//!     )
//! }
//!
//! assert_eq!(find_best_candidate(&[1, 3, 2]).unwrap(), 3);
//! ```

use thiserror::Error;

/// Represents errors that can occur while evolving a population.
#[derive(Error, Debug)]
pub enum GeneticError {
    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// The best raw fitness of a breeding pool was not strictly positive,
    /// so the pool cannot be normalized.
    #[error("Invalid fitness: maximum fitness {0} must be greater than zero")]
    InvalidFitness(f64),

    /// Error that occurs when a fitness calculation produces NaN or infinity.
    #[error("Fitness calculation error: {0}")]
    FitnessCalculation(String),

    /// The normalized fitness of a weighted chromosome was read before the
    /// owning pool normalized it.
    #[error("Weighted chromosome has not been normalized")]
    NotNormalized,

    /// Rejection sampling did not accept a parent within the attempt bound.
    #[error("Selection exhausted: no parent accepted after {attempts} attempts")]
    SelectionExhausted { attempts: usize },

    /// Chromosome-level crossover was invoked with an incompatible peer.
    #[error("Incompatible crossover: {0}")]
    IncompatibleCrossover(String),

    /// A worker thread or the merge step panicked.
    #[error("Worker panicked: {0}")]
    WorkerPanicked(String),

    /// Error that occurs when an evolution process fails.
    #[error("Evolution error: {0}")]
    Evolution(String),
}

/// A specialized Result type for genetic algorithm operations.
///
/// This type is a convenience wrapper around `std::result::Result` with the error type
/// fixed to `GeneticError`.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an Option to a Result.
    ///
    /// This method converts an `Option<T>` to a `Result<T, GeneticError>` using
    /// a closure to generate the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}
