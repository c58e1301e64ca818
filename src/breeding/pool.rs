//! # BreedingPool
//!
//! A breeding pool is the fitness-ranked view of a set of candidates that a
//! generation selects its parents from. It is built fresh for every
//! generation and is read-only afterwards.
//!
//! Construction scores every candidate against the target, rescales the
//! scores so the best candidate has a normalized fitness of exactly 100, and
//! sorts the entries by normalized fitness in non-increasing order. Ties keep
//! their input order.

use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::trace;

use super::WeightedChromosome;
use crate::chromosome::Chromosome;
use crate::error::{GeneticError, Result};

/// The normalized fitness of the best entry of every pool.
pub const NORMALIZED_MAX: f64 = 100.0;

/// An ordered sequence of weighted chromosomes, best first.
#[derive(Debug, Clone)]
pub struct BreedingPool<C> {
    entries: Vec<WeightedChromosome<C>>,
}

impl<C: Chromosome> BreedingPool<C> {
    /// Builds a pool from `source`, scored against `target`.
    ///
    /// When the source holds at least `parallel_threshold` candidates, fitness
    /// is evaluated in parallel with Rayon.
    ///
    /// # Errors
    ///
    /// - [`GeneticError::EmptyPopulation`] if `source` is empty.
    /// - [`GeneticError::FitnessCalculation`] if any fitness is NaN or infinite.
    /// - [`GeneticError::InvalidFitness`] if the best fitness is not strictly
    ///   positive.
    pub fn create<I>(source: I, target: &C::Target, parallel_threshold: usize) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
    {
        let candidates: Vec<C> = source.into_iter().collect();
        if candidates.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }

        let score = |chromosome: C| -> Result<WeightedChromosome<C>> {
            let fitness = chromosome.fitness(target);
            if !fitness.is_finite() {
                return Err(GeneticError::FitnessCalculation(format!(
                    "Non-finite fitness score encountered: {}",
                    fitness
                )));
            }
            Ok(WeightedChromosome::new(chromosome, fitness))
        };

        let mut entries = if candidates.len() >= parallel_threshold {
            candidates
                .into_par_iter()
                .map(score)
                .collect::<Result<Vec<_>>>()?
        } else {
            candidates
                .into_iter()
                .map(score)
                .collect::<Result<Vec<_>>>()?
        };

        let max_fitness = entries
            .iter()
            .map(WeightedChromosome::fitness)
            .fold(f64::NEG_INFINITY, f64::max);
        if max_fitness <= 0.0 {
            return Err(GeneticError::InvalidFitness(max_fitness));
        }

        let ratio = NORMALIZED_MAX / max_fitness;
        entries.iter_mut().for_each(|entry| entry.normalize(ratio));

        // Stable: equal scores keep their input order
        entries.sort_by(|a, b| {
            b.normalized_fitness()
                .ok()
                .partial_cmp(&a.normalized_fitness().ok())
                .unwrap_or(Ordering::Equal)
        });

        trace!(size = entries.len(), max_fitness, "breeding pool created");

        Ok(Self { entries })
    }
}

impl<C> BreedingPool<C> {
    /// The highest ranked entry.
    pub fn best(&self) -> &WeightedChromosome<C> {
        // Pools are never empty
        &self.entries[0]
    }

    /// The normalized fitness of the best entry.
    pub fn max_normalized_fitness(&self) -> f64 {
        self.best().normalized_fitness().unwrap_or(NORMALIZED_MAX)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WeightedChromosome<C>> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeightedChromosome<C>> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[WeightedChromosome<C>] {
        &self.entries
    }

    /// Consumes the pool and keeps the `count` best entries.
    pub fn into_top(mut self, count: usize) -> Vec<WeightedChromosome<C>> {
        self.entries.truncate(count);
        self.entries
    }
}

impl<'a, C> IntoIterator for &'a BreedingPool<C> {
    type Item = &'a WeightedChromosome<C>;
    type IntoIter = std::slice::Iter<'a, WeightedChromosome<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RandomNumberGenerator;

    #[derive(Clone, Debug, PartialEq)]
    struct Scored(f64);

    impl Chromosome for Scored {
        type Target = f64;
        type Scratch = ();

        fn fitness(&self, offset: &f64) -> f64 {
            self.0 + offset
        }

        fn crossover(
            &self,
            other: &Self,
            _rng: &mut RandomNumberGenerator,
            _scratch: &mut (),
        ) -> Result<Self> {
            Ok(Scored((self.0 + other.0) / 2.0))
        }

        fn mutate(&mut self, _mutation_rate: f64, _rng: &mut RandomNumberGenerator) {}
    }

    fn scored(values: &[f64]) -> Vec<Scored> {
        values.iter().copied().map(Scored).collect()
    }

    #[test]
    fn test_pool_is_sorted_and_normalized() {
        let pool = BreedingPool::create(scored(&[2.0, 8.0, 4.0, 1.0]), &0.0, 1000).unwrap();

        let normalized: Vec<f64> = pool
            .iter()
            .map(|entry| entry.normalized_fitness().unwrap())
            .collect();
        assert_eq!(normalized, vec![100.0, 50.0, 25.0, 12.5]);

        for window in normalized.windows(2) {
            assert!(window[0] >= window[1]);
        }
        assert!((pool.max_normalized_fitness() - NORMALIZED_MAX).abs() < 1e-9);
        assert_eq!(pool.best().chromosome(), &Scored(8.0));
        assert_eq!(pool.best().fitness(), 8.0);
    }

    #[test]
    fn test_pool_uses_target() {
        let pool = BreedingPool::create(scored(&[1.0, 2.0]), &2.0, 1000).unwrap();
        assert_eq!(pool.best().fitness(), 4.0);
        assert_eq!(pool.get(1).unwrap().normalized_fitness().unwrap(), 75.0);
    }

    #[test]
    fn test_ties_keep_input_order() {
        #[derive(Clone, Debug, PartialEq)]
        struct Tagged(&'static str);

        impl Chromosome for Tagged {
            type Target = ();
            type Scratch = ();

            fn fitness(&self, _target: &()) -> f64 {
                1.0
            }

            fn crossover(
                &self,
                _other: &Self,
                _rng: &mut RandomNumberGenerator,
                _scratch: &mut (),
            ) -> Result<Self> {
                Ok(self.clone())
            }

            fn mutate(&mut self, _mutation_rate: f64, _rng: &mut RandomNumberGenerator) {}
        }

        let pool = BreedingPool::create(
            vec![Tagged("first"), Tagged("second"), Tagged("third")],
            &(),
            1000,
        )
        .unwrap();

        let order: Vec<&str> = pool.iter().map(|entry| entry.chromosome().0).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_parallel_evaluation_matches_sequential() {
        let values: Vec<f64> = (1..=64).map(|v| ((v * 37) % 64 + 1) as f64).collect();

        let sequential = BreedingPool::create(scored(&values), &0.0, usize::MAX).unwrap();
        let parallel = BreedingPool::create(scored(&values), &0.0, 1).unwrap();

        assert_eq!(sequential.as_slice(), parallel.as_slice());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let values = [3.0, 9.5, 0.25, 9.5, 7.0];
        let first = BreedingPool::create(scored(&values), &0.0, 1000).unwrap();
        let second = BreedingPool::create(scored(&values), &0.0, 1000).unwrap();

        let first: Vec<f64> = first.iter().map(|e| e.normalized_fitness().unwrap()).collect();
        let second: Vec<f64> = second.iter().map(|e| e.normalized_fitness().unwrap()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_source() {
        let result = BreedingPool::create(Vec::<Scored>::new(), &0.0, 1000);
        match result {
            Err(GeneticError::EmptyPopulation) => (),
            _ => panic!("Expected EmptyPopulation error"),
        }
    }

    #[test]
    fn test_non_positive_maximum() {
        let result = BreedingPool::create(scored(&[0.0, -1.0]), &0.0, 1000);
        match result {
            Err(GeneticError::InvalidFitness(max)) => assert_eq!(max, 0.0),
            _ => panic!("Expected InvalidFitness error"),
        }
    }

    #[test]
    fn test_non_finite_fitness() {
        let result = BreedingPool::create(scored(&[1.0, f64::NAN]), &0.0, 1000);
        assert!(matches!(result, Err(GeneticError::FitnessCalculation(_))));

        let result = BreedingPool::create(scored(&[1.0]), &f64::INFINITY, 1000);
        assert!(matches!(result, Err(GeneticError::FitnessCalculation(_))));
    }

    #[test]
    fn test_into_top() {
        let pool = BreedingPool::create(scored(&[1.0, 5.0, 3.0]), &0.0, 1000).unwrap();
        let top = pool.into_top(2);
        let kept: Vec<&Scored> = top.iter().map(|e| e.chromosome()).collect();
        assert_eq!(kept, vec![&Scored(5.0), &Scored(3.0)]);
    }
}
