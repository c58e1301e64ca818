use std::fmt;

use crate::error::{GeneticError, Result};

/// A chromosome paired with its raw fitness and, once the owning pool has been
/// normalized, its fitness on a 0-100 scale.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedChromosome<C> {
    chromosome: C,
    fitness: f64,
    normalized_fitness: Option<f64>,
}

impl<C> WeightedChromosome<C> {
    /// Creates an unnormalized entry.
    pub fn new(chromosome: C, fitness: f64) -> Self {
        Self {
            chromosome,
            fitness,
            normalized_fitness: None,
        }
    }

    pub fn chromosome(&self) -> &C {
        &self.chromosome
    }

    pub fn into_chromosome(self) -> C {
        self.chromosome
    }

    /// The raw fitness as returned by the chromosome.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn is_normalized(&self) -> bool {
        self.normalized_fitness.is_some()
    }

    /// Returns the normalized fitness.
    ///
    /// # Errors
    ///
    /// Returns [`GeneticError::NotNormalized`] if the entry has not been
    /// normalized yet.
    pub fn normalized_fitness(&self) -> Result<f64> {
        self.normalized_fitness.ok_or(GeneticError::NotNormalized)
    }

    pub(crate) fn normalize(&mut self, ratio: f64) {
        self.normalized_fitness = Some(self.fitness * ratio);
    }
}

impl<C: fmt::Debug> fmt::Display for WeightedChromosome<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chromosome: {:?}, Fitness: {}", self.chromosome, self.fitness)
    }
}
