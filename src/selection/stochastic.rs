use crate::breeding::{BreedingPool, WeightedChromosome};
use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::SelectionStrategy;

/// The default bound on sampling attempts per selected parent.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// What stochastic acceptance does when no candidate was accepted within the
/// attempt bound.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExhaustionPolicy {
    /// Fail with [`GeneticError::SelectionExhausted`].
    #[default]
    Fail,
    /// Return the candidate drawn by the last attempt.
    FallbackToLast,
}

/// Fitness-proportionate selection by stochastic acceptance.
///
/// Each attempt draws a uniformly random entry of the pool and accepts it if
/// `u * max_normalized_fitness < normalized_fitness` for `u` uniform in
/// `[0, 1)`. The acceptance probability of a draw is therefore proportional to
/// the candidate's normalized fitness, which gives roulette-wheel behavior
/// without building a cumulative distribution.
///
/// # Examples
///
/// ```
/// use lockstep_ga::breeding::BreedingPool;
/// use lockstep_ga::problems::Word;
/// use lockstep_ga::rng::RandomNumberGenerator;
/// use lockstep_ga::selection::{ExhaustionPolicy, SelectionStrategy, StochasticAcceptance};
///
/// let target = Word::new("abc");
/// let candidates = vec![Word::new("abc"), Word::new("cba"), Word::new("bbb")];
/// let pool = BreedingPool::create(candidates, &target, 1000).unwrap();
///
/// let selection = StochasticAcceptance::new(1000, ExhaustionPolicy::Fail);
/// let mut rng = RandomNumberGenerator::from_seed(3);
/// let parent = selection.select(&pool, &mut rng).unwrap();
/// assert!(parent.normalized_fitness().unwrap() > 0.0);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StochasticAcceptance {
    max_attempts: usize,
    exhaustion_policy: ExhaustionPolicy,
}

impl StochasticAcceptance {
    /// Creates a new strategy. A bound of zero is raised to one attempt.
    pub fn new(max_attempts: usize, exhaustion_policy: ExhaustionPolicy) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            exhaustion_policy,
        }
    }

    pub fn with_policy(mut self, exhaustion_policy: ExhaustionPolicy) -> Self {
        self.exhaustion_policy = exhaustion_policy;
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn exhaustion_policy(&self) -> ExhaustionPolicy {
        self.exhaustion_policy
    }
}

impl Default for StochasticAcceptance {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, ExhaustionPolicy::default())
    }
}

impl<C: Send + Sync> SelectionStrategy<C> for StochasticAcceptance {
    fn select<'a>(
        &self,
        pool: &'a BreedingPool<C>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<&'a WeightedChromosome<C>> {
        if pool.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }

        let max_fitness = pool.max_normalized_fitness();
        let mut last = pool.best();

        for _ in 0..self.max_attempts {
            let candidate = &pool.as_slice()[rng.index(pool.len())];
            if rng.probability() * max_fitness < candidate.normalized_fitness()? {
                return Ok(candidate);
            }
            last = candidate;
        }

        match self.exhaustion_policy {
            ExhaustionPolicy::Fail => Err(GeneticError::SelectionExhausted {
                attempts: self.max_attempts,
            }),
            ExhaustionPolicy::FallbackToLast => Ok(last),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::Chromosome;

    #[derive(Clone, Debug, PartialEq)]
    struct Scored(f64);

    impl Chromosome for Scored {
        type Target = ();
        type Scratch = ();

        fn fitness(&self, _target: &()) -> f64 {
            self.0
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

    fn pool(values: &[f64]) -> BreedingPool<Scored> {
        BreedingPool::create(values.iter().copied().map(Scored), &(), 1000).unwrap()
    }

    #[test]
    fn test_selection_favors_fitter_candidates() {
        let pool = pool(&[1.0, 9.0]);
        let selection = StochasticAcceptance::default();
        let mut rng = RandomNumberGenerator::from_seed(42);

        let mut fit = 0;
        for _ in 0..2000 {
            if selection.select(&pool, &mut rng).unwrap().chromosome() == &Scored(9.0) {
                fit += 1;
            }
        }

        // Expected share is 0.9
        assert!(fit > 1600, "fitter candidate selected {} times", fit);
    }

    #[test]
    fn test_single_candidate_is_always_selected() {
        let pool = pool(&[3.0]);
        let selection = StochasticAcceptance::default();
        let mut rng = RandomNumberGenerator::from_seed(1);

        for _ in 0..100 {
            assert_eq!(selection.select(&pool, &mut rng).unwrap().chromosome(), &Scored(3.0));
        }
    }

    #[test]
    fn test_exhaustion_fails_by_default() {
        // Only non-positive entries besides the best can never be accepted
        let pool = pool(&[1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0]);
        let selection = StochasticAcceptance::new(1, ExhaustionPolicy::Fail);

        let mut exhausted = false;
        for seed in 0..64 {
            let mut rng = RandomNumberGenerator::from_seed(seed);
            match selection.select(&pool, &mut rng) {
                Err(GeneticError::SelectionExhausted { attempts }) => {
                    assert_eq!(attempts, 1);
                    exhausted = true;
                }
                Ok(parent) => assert_eq!(parent.chromosome(), &Scored(1.0)),
                Err(e) => panic!("Unexpected error: {}", e),
            }
        }
        assert!(exhausted);
    }

    #[test]
    fn test_exhaustion_fallback_returns_last_sample() {
        let pool = pool(&[1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0]);
        let selection = StochasticAcceptance::new(1, ExhaustionPolicy::FallbackToLast);

        for seed in 0..64 {
            let mut rng = RandomNumberGenerator::from_seed(seed);
            assert!(selection.select(&pool, &mut rng).is_ok());
        }
    }

    #[test]
    fn test_zero_attempts_is_raised_to_one() {
        let selection = StochasticAcceptance::new(0, ExhaustionPolicy::Fail);
        assert_eq!(selection.max_attempts(), 1);
        assert_eq!(
            selection.with_policy(ExhaustionPolicy::FallbackToLast).exhaustion_policy(),
            ExhaustionPolicy::FallbackToLast
        );
    }
}
