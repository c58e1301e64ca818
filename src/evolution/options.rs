//! # EvolutionOptions
//!
//! The `EvolutionOptions` struct holds the configuration of an evolution run:
//! population size, mutation rate, number of worker threads, the plateau rule
//! and the parent selection policy.
//!
//! ## Example
//!
//! ```rust
//! use lockstep_ga::evolution::options::EvolutionOptions;
//! use lockstep_ga::selection::ExhaustionPolicy;
//!
//! // Create a new EvolutionOptions instance with custom parameters
//! let custom_options = EvolutionOptions::builder()
//!     .population_size(200)
//!     .mutation_rate(0.01)
//!     .thread_count(4)
//!     .stabilization_threshold(500)
//!     .exhaustion_policy(ExhaustionPolicy::FallbackToLast)
//!     .seed(42)
//!     .build();
//! assert!(custom_options.validate().is_ok());
//!
//! // Create a new EvolutionOptions instance with default parameters
//! let default_options = EvolutionOptions::default();
//! assert_eq!(default_options.get_thread_count(), 1);
//! ```
//!
//! ## Defaults
//!
//! | option                    | default |
//! |---------------------------|---------|
//! | `population_size`         | 100     |
//! | `mutation_rate`           | 0.001   |
//! | `thread_count`            | 1       |
//! | `stabilization_threshold` | 1000    |
//! | `epsilon`                 | 1e-10   |
//! | `max_generations`         | none    |
//! | `selection_attempts`      | 1000    |
//! | `exhaustion_policy`       | `Fail`  |
//! | `carry_over_parents`      | true    |
//! | `parallel_threshold`      | 1000    |
//! | `seed`                    | none    |

use crate::error::{GeneticError, Result};
use crate::selection::{ExhaustionPolicy, StochasticAcceptance, DEFAULT_MAX_ATTEMPTS};

pub const DEFAULT_POPULATION_SIZE: usize = 100;
pub const DEFAULT_MUTATION_RATE: f64 = 0.001;
pub const DEFAULT_STABILIZATION_THRESHOLD: u64 = 1000;
pub const DEFAULT_EPSILON: f64 = 1e-10;
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1000;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionOptions {
    population_size: usize,
    mutation_rate: f64,
    thread_count: usize,
    /// Consecutive merged generations without improvement beyond `epsilon`
    /// before the run is stopped.
    stabilization_threshold: u64,
    epsilon: f64,
    max_generations: Option<usize>,
    selection_attempts: usize,
    exhaustion_policy: ExhaustionPolicy,
    /// Whether the previously published generation competes in the merge.
    carry_over_parents: bool,
    /// Minimum number of candidates to score in parallel
    parallel_threshold: usize,
    seed: Option<u64>,
}

impl EvolutionOptions {
    /// Creates options with the given population size, mutation rate and
    /// thread count. Everything else takes its default.
    pub fn new(population_size: usize, mutation_rate: f64, thread_count: usize) -> Self {
        Self {
            population_size,
            mutation_rate,
            thread_count,
            ..Self::default()
        }
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn get_thread_count(&self) -> usize {
        self.thread_count
    }

    pub fn get_stabilization_threshold(&self) -> u64 {
        self.stabilization_threshold
    }

    pub fn get_epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn get_max_generations(&self) -> Option<usize> {
        self.max_generations
    }

    pub fn get_selection_attempts(&self) -> usize {
        self.selection_attempts
    }

    pub fn get_exhaustion_policy(&self) -> ExhaustionPolicy {
        self.exhaustion_policy
    }

    pub fn get_carry_over_parents(&self) -> bool {
        self.carry_over_parents
    }

    /// Returns the minimum number of candidates to score in parallel.
    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn get_seed(&self) -> Option<u64> {
        self.seed
    }

    /// The parent selection strategy described by these options.
    pub fn selection(&self) -> StochasticAcceptance {
        StochasticAcceptance::new(self.selection_attempts, self.exhaustion_policy)
    }

    /// Sets the population size.
    pub fn set_population_size(&mut self, population_size: usize) {
        self.population_size = population_size;
    }

    /// Sets the mutation rate.
    pub fn set_mutation_rate(&mut self, mutation_rate: f64) {
        self.mutation_rate = mutation_rate;
    }

    /// Sets the number of worker threads.
    pub fn set_thread_count(&mut self, thread_count: usize) {
        self.thread_count = thread_count;
    }

    /// Sets the stabilization threshold.
    pub fn set_stabilization_threshold(&mut self, threshold: u64) {
        self.stabilization_threshold = threshold;
    }

    /// Sets the seed of the run.
    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.seed = seed;
    }

    /// Checks that every option is in range.
    ///
    /// # Errors
    ///
    /// Returns a [`GeneticError::Configuration`] naming the first offending option.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(GeneticError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(GeneticError::Configuration(format!(
                "Mutation rate must be within [0, 1], got {}",
                self.mutation_rate
            )));
        }

        if self.thread_count == 0 {
            return Err(GeneticError::Configuration(
                "Thread count cannot be zero".to_string(),
            ));
        }

        if self.stabilization_threshold == 0 {
            return Err(GeneticError::Configuration(
                "Stabilization threshold cannot be zero".to_string(),
            ));
        }

        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(GeneticError::Configuration(format!(
                "Epsilon must be a finite positive number, got {}",
                self.epsilon
            )));
        }

        if self.max_generations == Some(0) {
            return Err(GeneticError::Configuration(
                "Maximum generations cannot be zero".to_string(),
            ));
        }

        if self.selection_attempts == 0 {
            return Err(GeneticError::Configuration(
                "Selection attempts cannot be zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns a builder for creating an `EvolutionOptions` instance.
    pub fn builder() -> EvolutionOptionsBuilder {
        EvolutionOptionsBuilder::default()
    }
}

impl Default for EvolutionOptions {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            mutation_rate: DEFAULT_MUTATION_RATE,
            thread_count: 1,
            stabilization_threshold: DEFAULT_STABILIZATION_THRESHOLD,
            epsilon: DEFAULT_EPSILON,
            max_generations: None,
            selection_attempts: DEFAULT_MAX_ATTEMPTS,
            exhaustion_policy: ExhaustionPolicy::Fail,
            carry_over_parents: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            seed: None,
        }
    }
}

/// Builder for `EvolutionOptions`.
///
/// Provides a fluent interface for constructing `EvolutionOptions` instances.
#[derive(Debug, Clone, Default)]
pub struct EvolutionOptionsBuilder {
    population_size: Option<usize>,
    mutation_rate: Option<f64>,
    thread_count: Option<usize>,
    stabilization_threshold: Option<u64>,
    epsilon: Option<f64>,
    max_generations: Option<usize>,
    selection_attempts: Option<usize>,
    exhaustion_policy: Option<ExhaustionPolicy>,
    carry_over_parents: Option<bool>,
    parallel_threshold: Option<usize>,
    seed: Option<u64>,
}

impl EvolutionOptionsBuilder {
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn mutation_rate(mut self, value: f64) -> Self {
        self.mutation_rate = Some(value);
        self
    }

    pub fn thread_count(mut self, value: usize) -> Self {
        self.thread_count = Some(value);
        self
    }

    pub fn stabilization_threshold(mut self, value: u64) -> Self {
        self.stabilization_threshold = Some(value);
        self
    }

    pub fn epsilon(mut self, value: f64) -> Self {
        self.epsilon = Some(value);
        self
    }

    /// Caps the number of merged generations.
    pub fn max_generations(mut self, value: usize) -> Self {
        self.max_generations = Some(value);
        self
    }

    pub fn selection_attempts(mut self, value: usize) -> Self {
        self.selection_attempts = Some(value);
        self
    }

    pub fn exhaustion_policy(mut self, value: ExhaustionPolicy) -> Self {
        self.exhaustion_policy = Some(value);
        self
    }

    pub fn carry_over_parents(mut self, value: bool) -> Self {
        self.carry_over_parents = Some(value);
        self
    }

    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    pub fn seed(mut self, value: u64) -> Self {
        self.seed = Some(value);
        self
    }

    /// Builds the `EvolutionOptions` instance.
    pub fn build(self) -> EvolutionOptions {
        let default = EvolutionOptions::default();
        EvolutionOptions {
            population_size: self.population_size.unwrap_or(default.population_size),
            mutation_rate: self.mutation_rate.unwrap_or(default.mutation_rate),
            thread_count: self.thread_count.unwrap_or(default.thread_count),
            stabilization_threshold: self
                .stabilization_threshold
                .unwrap_or(default.stabilization_threshold),
            epsilon: self.epsilon.unwrap_or(default.epsilon),
            max_generations: self.max_generations.or(default.max_generations),
            selection_attempts: self
                .selection_attempts
                .unwrap_or(default.selection_attempts),
            exhaustion_policy: self
                .exhaustion_policy
                .unwrap_or(default.exhaustion_policy),
            carry_over_parents: self
                .carry_over_parents
                .unwrap_or(default.carry_over_parents),
            parallel_threshold: self
                .parallel_threshold
                .unwrap_or(default.parallel_threshold),
            seed: self.seed.or(default.seed),
        }
    }
}
