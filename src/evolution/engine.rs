//! # GeneticAlgorithm
//!
//! The evolution engine. A run keeps one published [`Population`] and a fixed
//! set of worker threads that evolve it in lockstep generations:
//!
//! 1. Every worker takes a snapshot of the published population, ranks it
//!    into a [`BreedingPool`], reports the pool to the observer, and either
//!    reports the pool's best candidate (when it satisfies the
//!    [`Termination`] predicate) or breeds and mutates a candidate next
//!    generation.
//! 2. Workers submit their result and wait at a barrier until all of them
//!    have submitted.
//! 3. Exactly one worker, the barrier leader, merges the round: it resolves
//!    the run on a failure or a converged result, and otherwise ranks the
//!    union of the candidate generations, keeps the best `population_size`
//!    chromosomes, updates the [`ConvergenceTracker`] and publishes the new
//!    population.
//! 4. A second barrier releases the workers into the next generation, or
//!    lets all of them observe the stop flag and exit together.
//!
//! By default the merge also ranks the previously published population
//! alongside the workers' candidate generations, so the best fitness never
//! decreases from one generation to the next. Setting
//! [`carry_over_parents`](EvolutionOptions::get_carry_over_parents) to
//! `false` merges the workers' candidates only.
//!
//! The merge is the only code that writes the published population and the
//! tracker. Worker failures and panics are submitted like any other result,
//! so every worker reaches every barrier and a failing run aborts instead of
//! deadlocking.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex, PoisonError, RwLock};
use std::thread;

use tracing::{debug, info, warn};

use super::convergence::ConvergenceTracker;
use super::options::EvolutionOptions;
use super::termination::{
    CancellationToken, ConvergenceReason, EvolutionOutcome, RunStatus, Termination,
};
use crate::breeding::{BreedingPool, WeightedChromosome};
use crate::chromosome::Chromosome;
use crate::error::{GeneticError, OptionExt, Result};
use crate::population::Population;
use crate::rng::RandomNumberGenerator;
use crate::selection::StochasticAcceptance;

/// What the observer sees once per generation per worker.
#[derive(Debug)]
pub struct GenerationContext<'a, C> {
    /// The pool ranked from the published population.
    pub pool: &'a BreedingPool<C>,
    /// A run-wide counter incremented by every worker for every generation.
    pub iteration: usize,
    /// The number of generations merged so far.
    pub generation: usize,
    /// The index of the reporting worker.
    pub worker: usize,
}

/// The evolution engine.
///
/// # Example
///
/// ```rust
/// use lockstep_ga::evolution::{EvolutionOptions, GeneticAlgorithm, Termination};
/// use lockstep_ga::problems::Word;
/// use lockstep_ga::rng::RandomNumberGenerator;
///
/// let target = Word::new("hi there");
/// let options = EvolutionOptions::builder()
///     .population_size(200)
///     .mutation_rate(0.02)
///     .thread_count(2)
///     .max_generations(10_000)
///     .seed(7)
///     .build();
///
/// let factory = {
///     let target = target.clone();
///     move |rng: &mut RandomNumberGenerator| target.random_sibling(rng)
/// };
/// let engine = GeneticAlgorithm::new(
///     options,
///     factory,
///     target.clone(),
///     Termination::ExactMatch(target.clone()),
/// )
/// .unwrap();
///
/// let outcome = engine.run().unwrap();
/// if outcome.status.is_converged() {
///     assert_eq!(outcome.winner(), Some(&target));
/// }
/// ```
pub struct GeneticAlgorithm<C, F>
where
    C: Chromosome,
{
    options: EvolutionOptions,
    factory: F,
    target: C::Target,
    termination: Termination<C>,
}

impl<C, F> GeneticAlgorithm<C, F>
where
    C: Chromosome,
    F: Fn(&mut RandomNumberGenerator) -> C,
{
    /// Creates a new engine.
    ///
    /// # Arguments
    ///
    /// * `options` - Population size, mutation rate, thread count and stop rules.
    /// * `factory` - Builds one random chromosome of the initial population.
    /// * `target` - What every chromosome is scored against.
    /// * `termination` - The local stop predicate.
    ///
    /// # Errors
    ///
    /// Returns a [`GeneticError::Configuration`] if the options are invalid.
    pub fn new(
        options: EvolutionOptions,
        factory: F,
        target: C::Target,
        termination: Termination<C>,
    ) -> Result<Self> {
        options.validate()?;

        Ok(Self {
            options,
            factory,
            target,
            termination,
        })
    }

    pub fn options(&self) -> &EvolutionOptions {
        &self.options
    }

    pub fn target(&self) -> &C::Target {
        &self.target
    }

    /// Runs to completion without an observer or external cancellation.
    pub fn run(&self) -> Result<EvolutionOutcome<C>> {
        self.compute(|_: &GenerationContext<'_, C>| {}, &CancellationToken::new())
    }

    /// Runs the generational loop until a stop rule fires.
    ///
    /// `observer` is called by every worker for every generation with the
    /// pool it is about to breed from. It runs on the worker's critical path
    /// and must return promptly.
    ///
    /// # Errors
    ///
    /// Returns the first failure reported by any worker or by the merge step.
    pub fn compute<O>(
        &self,
        observer: O,
        cancellation: &CancellationToken,
    ) -> Result<EvolutionOutcome<C>>
    where
        O: Fn(&GenerationContext<'_, C>) + Sync,
    {
        if cancellation.is_cancelled() {
            info!("run cancelled before the first generation");
            return Ok(EvolutionOutcome {
                status: RunStatus::Cancelled,
                best: None,
                generations: 0,
                optimal_solutions: Vec::new(),
            });
        }

        let thread_count = self.options.get_thread_count();
        let mut master = match self.options.get_seed() {
            Some(seed) => RandomNumberGenerator::from_seed(seed),
            None => RandomNumberGenerator::new(),
        };

        let initial = Population::create_random(
            self.options.get_population_size(),
            &self.factory,
            &mut master,
        );
        let worker_rngs: Vec<RandomNumberGenerator> =
            (0..thread_count).map(|_| master.fork()).collect();

        info!(
            population_size = self.options.get_population_size(),
            thread_count,
            mutation_rate = self.options.get_mutation_rate(),
            "starting evolution"
        );

        let shared = Shared::new(initial, &self.options);
        let evolver = Evolver {
            options: &self.options,
            target: &self.target,
            termination: &self.termination,
            selection: self.options.selection(),
            cancellation,
        };

        thread::scope(|scope| {
            for (index, rng) in worker_rngs.into_iter().enumerate() {
                let evolver = &evolver;
                let shared = &shared;
                let observer = &observer;
                scope.spawn(move || evolver.work(index, rng, shared, observer));
            }
        });

        let round = shared.into_round();
        let generations = round.generation;
        let (current_best, optimal_solutions) = round.tracker.into_parts();

        match round.resolution {
            Some(Resolution::Failed(error)) => {
                warn!(%error, generations, "evolution aborted");
                Err(error)
            }
            Some(Resolution::Converged { best, reason }) => {
                info!(?reason, generations, fitness = best.fitness(), "evolution converged");
                Ok(EvolutionOutcome {
                    status: RunStatus::Converged(reason),
                    best: Some(best),
                    generations,
                    optimal_solutions,
                })
            }
            Some(Resolution::Stopped(status)) => {
                info!(
                    ?status,
                    generations,
                    fitness = ?current_best.as_ref().map(WeightedChromosome::fitness),
                    "evolution stopped"
                );
                Ok(EvolutionOutcome {
                    status,
                    best: current_best,
                    generations,
                    optimal_solutions,
                })
            }
            None => Err(GeneticError::Evolution(
                "Workers exited without resolving the run".to_string(),
            )),
        }
    }
}

/// One worker's submission for a generation.
enum GenerationResult<C> {
    /// The pool's best candidate satisfied the stop predicate.
    Reached {
        best: WeightedChromosome<C>,
        reason: ConvergenceReason,
    },
    /// A bred and mutated candidate next generation.
    Evolved(Population<C>),
}

enum Resolution<C> {
    Converged {
        best: WeightedChromosome<C>,
        reason: ConvergenceReason,
    },
    Stopped(RunStatus),
    Failed(GeneticError),
}

/// State owned by the merge step.
struct RoundState<C> {
    submissions: Vec<(usize, Result<GenerationResult<C>>)>,
    tracker: ConvergenceTracker<C>,
    generation: usize,
    resolution: Option<Resolution<C>>,
}

/// State shared by all workers of a run.
struct Shared<C> {
    published: RwLock<Arc<Population<C>>>,
    round: Mutex<RoundState<C>>,
    barrier: Barrier,
    stop: AtomicBool,
    iterations: AtomicUsize,
}

impl<C: Chromosome> Shared<C> {
    fn new(initial: Population<C>, options: &EvolutionOptions) -> Self {
        let thread_count = options.get_thread_count();
        Self {
            published: RwLock::new(Arc::new(initial)),
            round: Mutex::new(RoundState {
                submissions: Vec::with_capacity(thread_count),
                tracker: ConvergenceTracker::new(
                    options.get_stabilization_threshold(),
                    options.get_epsilon(),
                ),
                generation: 0,
                resolution: None,
            }),
            barrier: Barrier::new(thread_count),
            stop: AtomicBool::new(false),
            iterations: AtomicUsize::new(0),
        }
    }

    fn snapshot(&self) -> Arc<Population<C>> {
        Arc::clone(&self.published.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn publish(&self, population: Population<C>) {
        *self.published.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(population);
    }

    fn submit(&self, worker: usize, result: Result<GenerationResult<C>>) {
        self.round
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .submissions
            .push((worker, result));
    }

    fn generation(&self) -> usize {
        self.round
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }

    fn into_round(self) -> RoundState<C> {
        self.round.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The read-only part of a run, borrowed by every worker.
struct Evolver<'a, C: Chromosome> {
    options: &'a EvolutionOptions,
    target: &'a C::Target,
    termination: &'a Termination<C>,
    selection: StochasticAcceptance,
    cancellation: &'a CancellationToken,
}

impl<C: Chromosome> Evolver<'_, C> {
    fn work<O>(
        &self,
        index: usize,
        mut rng: RandomNumberGenerator,
        shared: &Shared<C>,
        observer: &O,
    ) where
        O: Fn(&GenerationContext<'_, C>) + Sync,
    {
        let mut scratch = C::Scratch::default();

        while !shared.stop.load(Ordering::Acquire) {
            let population = shared.snapshot();
            let iteration = shared.iterations.fetch_add(1, Ordering::AcqRel) + 1;
            let generation = shared.generation();

            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                self.compute_one(
                    &population,
                    observer,
                    GenerationInfo {
                        iteration,
                        generation,
                        worker: index,
                    },
                    &mut rng,
                    &mut scratch,
                )
            }))
            .unwrap_or_else(|payload| Err(GeneticError::WorkerPanicked(panic_message(payload))));
            drop(population);

            shared.submit(index, result);

            if shared.barrier.wait().is_leader() {
                let merged = panic::catch_unwind(AssertUnwindSafe(|| self.merge(shared)));
                if let Err(payload) = merged {
                    self.resolve(shared, Resolution::Failed(GeneticError::WorkerPanicked(
                        panic_message(payload),
                    )));
                }
            }
            shared.barrier.wait();
        }
    }

    fn compute_one<O>(
        &self,
        population: &Population<C>,
        observer: &O,
        info: GenerationInfo,
        rng: &mut RandomNumberGenerator,
        scratch: &mut C::Scratch,
    ) -> Result<GenerationResult<C>>
    where
        O: Fn(&GenerationContext<'_, C>) + Sync,
    {
        let pool = population.breeding_pool(self.target, self.options.get_parallel_threshold())?;

        observer(&GenerationContext {
            pool: &pool,
            iteration: info.iteration,
            generation: info.generation,
            worker: info.worker,
        });

        if let Some(reason) = self.termination.evaluate(pool.best()) {
            return Ok(GenerationResult::Reached {
                best: pool.best().clone(),
                reason,
            });
        }

        let mut next = population.crossover(&pool, &self.selection, rng, scratch)?;
        next.mutate(self.options.get_mutation_rate());

        Ok(GenerationResult::Evolved(next))
    }

    /// Runs on the barrier leader only.
    fn merge(&self, shared: &Shared<C>) {
        let mut round = shared.round.lock().unwrap_or_else(PoisonError::into_inner);
        let mut submissions = std::mem::take(&mut round.submissions);
        debug_assert_eq!(submissions.len(), self.options.get_thread_count());
        round.generation += 1;

        submissions.sort_by_key(|(worker, _)| *worker);

        let mut failure = None;
        let mut reached = None;
        let mut populations = Vec::with_capacity(submissions.len());
        for (_, submission) in submissions {
            match submission {
                Err(error) => {
                    failure.get_or_insert(error);
                }
                Ok(GenerationResult::Reached { best, reason }) => {
                    reached.get_or_insert((best, reason));
                }
                Ok(GenerationResult::Evolved(population)) => populations.push(population),
            }
        }

        if let Some(error) = failure {
            drop(round);
            self.resolve(shared, Resolution::Failed(error));
            return;
        }

        if let Some((best, reason)) = reached {
            drop(round);
            self.resolve(shared, Resolution::Converged { best, reason });
            return;
        }

        let survivors = match self.select_survivors(shared, populations) {
            Ok(survivors) => survivors,
            Err(error) => {
                drop(round);
                self.resolve(shared, Resolution::Failed(error));
                return;
            }
        };
        let (population, best) = survivors;

        let stabilized = round.tracker.update(best);
        let generation = round.generation;

        debug!(
            generation,
            best_fitness = ?round.tracker.current_best().map(WeightedChromosome::fitness),
            stabilization = round.tracker.stabilization(),
            "generation merged"
        );

        shared.publish(population);

        let status = if stabilized {
            Some(RunStatus::Stabilized)
        } else if self.cancellation.is_cancelled() {
            Some(RunStatus::Cancelled)
        } else if self
            .options
            .get_max_generations()
            .is_some_and(|max| generation >= max)
        {
            Some(RunStatus::GenerationLimit)
        } else {
            None
        };

        drop(round);
        if let Some(status) = status {
            self.resolve(shared, Resolution::Stopped(status));
        }
    }

    /// Ranks the candidate generations and keeps the best `population_size`.
    fn select_survivors(
        &self,
        shared: &Shared<C>,
        populations: Vec<Population<C>>,
    ) -> Result<(Population<C>, WeightedChromosome<C>)> {
        let size = self.options.get_population_size();
        let mut inherited_rng = None;
        let mut candidates = Vec::with_capacity(size * (populations.len() + 1));

        if self.options.get_carry_over_parents() {
            candidates.extend(shared.snapshot().iter().cloned());
        }
        for population in populations {
            let (_, chromosomes, rng) = population.into_parts();
            inherited_rng.get_or_insert(rng);
            candidates.extend(chromosomes);
        }

        let rng = inherited_rng.ok_or_else_genetic(|| {
            GeneticError::Evolution("No worker contributed a population".to_string())
        })?;

        let pool = BreedingPool::create(candidates, self.target, self.options.get_parallel_threshold())?;
        let best = pool.best().clone();
        let chromosomes = pool
            .into_top(size)
            .into_iter()
            .map(WeightedChromosome::into_chromosome)
            .collect();

        Ok((Population::new(size, chromosomes, rng), best))
    }

    fn resolve(&self, shared: &Shared<C>, resolution: Resolution<C>) {
        let mut round = shared.round.lock().unwrap_or_else(PoisonError::into_inner);
        round.resolution.get_or_insert(resolution);
        shared.stop.store(true, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy)]
struct GenerationInfo {
    iteration: usize,
    generation: usize,
    worker: usize,
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
