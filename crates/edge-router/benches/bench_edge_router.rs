use criterion::{black_box, criterion_group, criterion_main, Criterion};
use edge_core::Tier;
use edge_router::{default_policy, route, ComplexityEstimator, LoadSnapshot, WordCountEstimator};
use rand::Rng;

fn bench_route(c: &mut Criterion) {
    let policy = default_policy();
    let estimator = WordCountEstimator::default();
    let mut rng = rand::thread_rng();
    let inputs: Vec<(Tier, f64, LoadSnapshot)> = (0..1000)
        .map(|_| {
            let tier = Tier::ALL[rng.gen_range(0..3)];
            let complexity = [0.2, 0.5, 0.8][rng.gen_range(0..3)];
            (tier, complexity, LoadSnapshot::new(rng.gen_range(0..12), 10))
        })
        .collect();
    let long_prompt = vec!["analyze"; 300].join(" ");

    c.bench_function("route_1000_random_inputs", |b| {
        b.iter(|| {
            for (tier, complexity, load) in &inputs {
                black_box(policy.route(*tier, *complexity, *load));
            }
        })
    });

    c.bench_function("estimate_300_words", |b| {
        b.iter(|| black_box(estimator.estimate(&long_prompt)))
    });

    c.bench_function("route_prompt_end_to_end", |b| {
        b.iter(|| black_box(route(&long_prompt, Tier::Enterprise, LoadSnapshot::new(2, 10))))
    });
}

criterion_group!(benches, bench_route);
criterion_main!(benches);
