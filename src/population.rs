//! # Population
//!
//! A `Population` is one generation of chromosomes together with its target
//! size and the random source it mutates with. Populations are built at
//! start-up from a factory, by crossover from a breeding pool, or by the
//! engine when it merges a generation. Apart from the mutation pass they are
//! never changed element-wise; the engine replaces them wholesale.
//!
//! ## Example
//!
//! ```rust
//! use lockstep_ga::population::Population;
//! use lockstep_ga::problems::Word;
//! use lockstep_ga::rng::RandomNumberGenerator;
//! use lockstep_ga::selection::StochasticAcceptance;
//!
//! let target = Word::new("hello");
//! let mut rng = RandomNumberGenerator::from_seed(11);
//! let population = Population::create_random(10, |rng| target.random_sibling(rng), &mut rng);
//!
//! let pool = population.breeding_pool(&target, 1000).unwrap();
//! let mut children = population
//!     .crossover(&pool, &StochasticAcceptance::default(), &mut rng, &mut ())
//!     .unwrap();
//! children.mutate(0.01);
//!
//! assert_eq!(children.len(), 10);
//! ```

use crate::breeding::BreedingPool;
use crate::chromosome::Chromosome;
use crate::error::Result;
use crate::rng::RandomNumberGenerator;
use crate::selection::SelectionStrategy;

#[derive(Debug, Clone)]
pub struct Population<C> {
    size: usize,
    chromosomes: Vec<C>,
    rng: RandomNumberGenerator,
}

impl<C: Chromosome> Population<C> {
    pub fn new(size: usize, chromosomes: Vec<C>, rng: RandomNumberGenerator) -> Self {
        Self {
            size,
            chromosomes,
            rng,
        }
    }

    /// Creates `size` chromosomes with `factory`.
    ///
    /// The population receives its own generator forked from `rng`.
    pub fn create_random<F>(size: usize, factory: F, rng: &mut RandomNumberGenerator) -> Self
    where
        F: Fn(&mut RandomNumberGenerator) -> C,
    {
        let chromosomes = (0..size).map(|_| factory(rng)).collect();
        Self::new(size, chromosomes, rng.fork())
    }

    /// Ranks this population against `target`.
    pub fn breeding_pool(
        &self,
        target: &C::Target,
        parallel_threshold: usize,
    ) -> Result<BreedingPool<C>> {
        BreedingPool::create(self.chromosomes.iter().cloned(), target, parallel_threshold)
    }

    /// Breeds a new population of the same size from `pool`.
    ///
    /// Parents are drawn in pairs and each pair yields two children, one with
    /// each parent as the primary. For an odd size the surplus child of the
    /// last pair is dropped, so the result always holds exactly `size`
    /// chromosomes.
    ///
    /// # Errors
    ///
    /// Propagates selection and chromosome-level crossover failures.
    pub fn crossover<S>(
        &self,
        pool: &BreedingPool<C>,
        selection: &S,
        rng: &mut RandomNumberGenerator,
        scratch: &mut C::Scratch,
    ) -> Result<Population<C>>
    where
        S: SelectionStrategy<C> + ?Sized,
    {
        let mut children = Vec::with_capacity(self.size + 1);

        while children.len() < self.size {
            let parent_a = selection.select(pool, rng)?.chromosome();
            let parent_b = selection.select(pool, rng)?.chromosome();

            children.push(parent_a.crossover(parent_b, rng, scratch)?);
            children.push(parent_b.crossover(parent_a, rng, scratch)?);
        }
        children.truncate(self.size);

        Ok(Population::new(self.size, children, rng.fork()))
    }

    /// Mutates every chromosome in place with the population's own generator.
    pub fn mutate(&mut self, mutation_rate: f64) {
        for chromosome in self.chromosomes.iter_mut() {
            chromosome.mutate(mutation_rate, &mut self.rng);
        }
    }
}

impl<C> Population<C> {
    /// The configured size of the population.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The number of chromosomes currently held.
    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, C> {
        self.chromosomes.iter()
    }

    pub fn chromosomes(&self) -> &[C] {
        &self.chromosomes
    }

    pub fn into_parts(self) -> (usize, Vec<C>, RandomNumberGenerator) {
        (self.size, self.chromosomes, self.rng)
    }
}

impl<'a, C> IntoIterator for &'a Population<C> {
    type Item = &'a C;
    type IntoIter = std::slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.chromosomes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneticError;
    use crate::selection::{ExhaustionPolicy, StochasticAcceptance};

    #[derive(Clone, Debug, PartialEq)]
    struct Gene {
        value: u32,
        mutations: u32,
    }

    impl Chromosome for Gene {
        type Target = ();
        type Scratch = Vec<u32>;

        fn fitness(&self, _target: &()) -> f64 {
            self.value as f64 + 1.0
        }

        fn crossover(
            &self,
            other: &Self,
            _rng: &mut RandomNumberGenerator,
            scratch: &mut Vec<u32>,
        ) -> Result<Self> {
            scratch.push(self.value);
            Ok(Gene {
                value: (self.value + other.value) / 2,
                mutations: 0,
            })
        }

        fn mutate(&mut self, mutation_rate: f64, rng: &mut RandomNumberGenerator) {
            if rng.probability() < mutation_rate {
                self.mutations += 1;
            }
        }
    }

    fn gene_factory(rng: &mut RandomNumberGenerator) -> Gene {
        Gene {
            value: rng.index(100) as u32,
            mutations: 0,
        }
    }

    #[test]
    fn test_create_random() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let population = Population::create_random(6, gene_factory, &mut rng);

        assert_eq!(population.size(), 6);
        assert_eq!(population.len(), 6);
        assert!(population.iter().all(|gene| gene.value < 100));
    }

    #[test]
    fn test_crossover_keeps_size() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        for size in [1, 2, 5, 8] {
            let population = Population::create_random(size, gene_factory, &mut rng);
            let pool = population.breeding_pool(&(), 1000).unwrap();
            let mut scratch = Vec::new();

            let children = population
                .crossover(&pool, &StochasticAcceptance::default(), &mut rng, &mut scratch)
                .unwrap();

            assert_eq!(children.len(), size);
            assert_eq!(children.size(), size);
            // Every pair of children reuses the caller's scratch twice
            assert_eq!(scratch.len(), size + size % 2);
        }
    }

    #[test]
    fn test_crossover_propagates_errors() {
        #[derive(Clone, Debug, PartialEq)]
        struct Stubborn;

        impl Chromosome for Stubborn {
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
                Err(GeneticError::IncompatibleCrossover("never".to_string()))
            }

            fn mutate(&mut self, _mutation_rate: f64, _rng: &mut RandomNumberGenerator) {}
        }

        let mut rng = RandomNumberGenerator::from_seed(5);
        let population = Population::create_random(4, |_| Stubborn, &mut rng);
        let pool = population.breeding_pool(&(), 1000).unwrap();
        let selection = StochasticAcceptance::new(10, ExhaustionPolicy::FallbackToLast);

        let result = population.crossover(&pool, &selection, &mut rng, &mut ());
        assert!(matches!(result, Err(GeneticError::IncompatibleCrossover(_))));
    }

    #[test]
    fn test_mutate_rates() {
        let mut rng = RandomNumberGenerator::from_seed(5);

        let mut population = Population::create_random(50, gene_factory, &mut rng);
        population.mutate(0.0);
        assert!(population.iter().all(|gene| gene.mutations == 0));

        population.mutate(1.0);
        assert!(population.iter().all(|gene| gene.mutations == 1));
    }

    #[test]
    fn test_same_seed_same_population() {
        let first = Population::create_random(8, gene_factory, &mut RandomNumberGenerator::from_seed(3));
        let second = Population::create_random(8, gene_factory, &mut RandomNumberGenerator::from_seed(3));
        assert_eq!(first.chromosomes(), second.chromosomes());
    }
}
