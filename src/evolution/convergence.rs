//! # Convergence Tracker
//!
//! Plateau detection for the merge step. The tracker remembers the best
//! weighted chromosome of the last merged generation and counts how many
//! consecutive merges kept the best raw fitness within `epsilon` of it. Any
//! change beyond `epsilon` resets the count and forgets the tied solutions.
//! Once the count reaches the threshold the run is considered stabilized.

use crate::breeding::WeightedChromosome;

#[derive(Debug, Clone)]
pub struct ConvergenceTracker<C> {
    epsilon: f64,
    threshold: u64,
    current_best: Option<WeightedChromosome<C>>,
    stabilization: u64,
    optimal_solutions: Vec<C>,
}

impl<C: Clone + PartialEq> ConvergenceTracker<C> {
    pub fn new(threshold: u64, epsilon: f64) -> Self {
        Self {
            epsilon,
            threshold,
            current_best: None,
            stabilization: 0,
            optimal_solutions: Vec::new(),
        }
    }

    /// Records the best entry of a newly merged generation.
    ///
    /// Returns `true` once the plateau has lasted for the threshold.
    pub fn update(&mut self, best: WeightedChromosome<C>) -> bool {
        let plateau = self
            .current_best
            .as_ref()
            .is_some_and(|current| (best.fitness() - current.fitness()).abs() < self.epsilon);

        if plateau {
            self.stabilization += 1;
            if !self.optimal_solutions.contains(best.chromosome()) {
                self.optimal_solutions.push(best.chromosome().clone());
            }
        } else {
            self.stabilization = 0;
            self.optimal_solutions.clear();
        }

        self.current_best = Some(best);
        self.is_stabilized()
    }

    pub fn is_stabilized(&self) -> bool {
        self.stabilization >= self.threshold
    }
}

impl<C> ConvergenceTracker<C> {
    pub fn current_best(&self) -> Option<&WeightedChromosome<C>> {
        self.current_best.as_ref()
    }

    pub fn stabilization(&self) -> u64 {
        self.stabilization
    }

    pub fn optimal_solutions(&self) -> &[C] {
        &self.optimal_solutions
    }

    pub(crate) fn into_parts(self) -> (Option<WeightedChromosome<C>>, Vec<C>) {
        (self.current_best, self.optimal_solutions)
    }
}
