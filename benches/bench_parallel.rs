use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lockstep_ga::{
    evolution::{EvolutionOptions, GeneticAlgorithm, Termination},
    problems::{CostMatrix, Route, Word},
    rng::RandomNumberGenerator,
};

fn bench_word_threads(c: &mut Criterion) {
    let target = Word::new("barrier synchronized");

    let mut group = c.benchmark_group("word_thread_count");
    group.sample_size(10);
    for threads in [1, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let options = EvolutionOptions::builder()
                    .population_size(200)
                    .mutation_rate(0.01)
                    .thread_count(threads)
                    .max_generations(50)
                    .seed(7)
                    .build();
                let factory = {
                    let target = target.clone();
                    move |rng: &mut RandomNumberGenerator| target.random_sibling(rng)
                };
                let engine = GeneticAlgorithm::new(
                    options,
                    factory,
                    target.clone(),
                    Termination::ExactMatch(target.clone()),
                )
                .unwrap();
                engine.run().unwrap()
            })
        });
    }
    group.finish();
}

fn bench_route_parallel_fitness(c: &mut Criterion) {
    let cities = 60;
    let mut rng = RandomNumberGenerator::from_seed(11);
    let costs = (0..cities)
        .map(|_| (0..cities).map(|_| rng.index(1_000) as u32).collect())
        .collect();
    let matrix = CostMatrix::new(costs).unwrap();

    let mut group = c.benchmark_group("route_parallel_threshold");
    group.sample_size(10);
    for threshold in [0, usize::MAX] {
        let label = if threshold == 0 { "parallel" } else { "sequential" };
        group.bench_function(label, |b| {
            b.iter(|| {
                let options = EvolutionOptions::builder()
                    .population_size(2_000)
                    .mutation_rate(0.1)
                    .thread_count(2)
                    .max_generations(5)
                    .parallel_threshold(threshold)
                    .seed(7)
                    .build();
                let engine = GeneticAlgorithm::new(
                    options,
                    move |rng: &mut RandomNumberGenerator| Route::random(cities, rng),
                    matrix.clone(),
                    Termination::Stabilization,
                )
                .unwrap();
                engine.run().unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_word_threads, bench_route_parallel_fitness);
criterion_main!(benches);
