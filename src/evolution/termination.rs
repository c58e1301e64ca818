//! # Termination
//!
//! The stop rules of a run and the shape of its outcome.
//!
//! A run ends in exactly one of these ways:
//! - a worker's breeding pool holds a candidate satisfying the
//!   [`Termination`] predicate ([`RunStatus::Converged`]),
//! - the best fitness plateaued for the configured number of generations
//!   ([`RunStatus::Stabilized`]),
//! - the [`CancellationToken`] was triggered ([`RunStatus::Cancelled`]),
//! - the optional generation cap was reached ([`RunStatus::GenerationLimit`]).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::breeding::WeightedChromosome;

/// The local stop predicate evaluated against the best candidate of every
/// breeding pool.
#[derive(Debug, Clone, PartialEq)]
pub enum Termination<C> {
    /// Stop once the best candidate equals this chromosome.
    ExactMatch(C),
    /// Stop once the best raw fitness reaches this value.
    FitnessThreshold(f64),
    /// Stop on whichever of the two happens first.
    Either { chromosome: C, fitness: f64 },
    /// Never stop locally; only the plateau rule, the generation cap or
    /// cancellation end the run.
    Stabilization,
}

impl<C: PartialEq> Termination<C> {
    /// Checks the best candidate of a pool against the predicate.
    pub fn evaluate(&self, best: &WeightedChromosome<C>) -> Option<ConvergenceReason> {
        match self {
            Termination::ExactMatch(target) => {
                (best.chromosome() == target).then_some(ConvergenceReason::ExactMatch)
            }
            Termination::FitnessThreshold(threshold) => {
                (best.fitness() >= *threshold).then_some(ConvergenceReason::TargetFitness)
            }
            Termination::Either {
                chromosome,
                fitness,
            } => {
                if best.chromosome() == chromosome {
                    Some(ConvergenceReason::ExactMatch)
                } else if best.fitness() >= *fitness {
                    Some(ConvergenceReason::TargetFitness)
                } else {
                    None
                }
            }
            Termination::Stabilization => None,
        }
    }
}

impl<C> Default for Termination<C> {
    fn default() -> Self {
        Termination::Stabilization
    }
}

/// Why a worker reported a result.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceReason {
    ExactMatch,
    TargetFitness,
}

/// The terminal state of a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Converged(ConvergenceReason),
    Stabilized,
    Cancelled,
    GenerationLimit,
}

impl RunStatus {
    pub fn is_converged(&self) -> bool {
        matches!(self, RunStatus::Converged(_))
    }
}

/// The result of a successful run.
#[derive(Debug, Clone)]
pub struct EvolutionOutcome<C> {
    /// How the run ended.
    pub status: RunStatus,
    /// The winning or best known chromosome. `None` only when the run was
    /// cancelled before its first generation completed.
    pub best: Option<WeightedChromosome<C>>,
    /// The number of generations merged.
    pub generations: usize,
    /// The distinct chromosomes tied at the best fitness during the final
    /// plateau.
    pub optimal_solutions: Vec<C>,
}

impl<C> EvolutionOutcome<C> {
    /// The winning chromosome, if any.
    pub fn winner(&self) -> Option<&C> {
        self.best.as_ref().map(WeightedChromosome::chromosome)
    }

    pub fn into_winner(self) -> Option<C> {
        self.best.map(WeightedChromosome::into_chromosome)
    }
}

/// A cloneable signal for stopping a run from the outside.
///
/// Cancellation is cooperative: the engine checks the token once per
/// generation, after all workers have submitted their results.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
