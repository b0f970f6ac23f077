use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use synflood::classifier::LogisticRegression;
use synflood::{Dataset, EvalConfig, Evaluator};
use std::time::Duration;

const N_RECORDS: usize = 5000;
const DIM: usize = 256;

fn create_data(n_samples: usize, n_features: usize) -> Dataset {
    // reproducible seed
    let mut rng = StdRng::seed_from_u64(1903);
    let mut x = vec![0.0; n_samples * n_features];
    let mut y = Vec::with_capacity(n_samples);
    let mut sources = Vec::with_capacity(n_samples);
    for i in 0..n_samples {
        let attack = rng.gen::<f64>() < 0.3;
        let src = if attack { 0 } else { rng.gen_range(1..n_features / 4) };
        x[i * n_features + src] = 1.0;
        for _ in 0..3 {
            x[i * n_features + rng.gen_range(n_features / 4..n_features)] = 1.0;
        }
        y.push(attack as u8 as f64);
        sources.push(format!("10.0.0.{}", src));
    }
    Dataset::new(x, n_samples, n_features, y, sources).expect("valid synthetic dataset")
}

pub fn evaluation_benchmarks(c: &mut Criterion) {
    let data = create_data(N_RECORDS, DIM);
    let cfg = EvalConfig::default().set_vector_size(DIM);

    let window = data.matrix().slice_rows(0, cfg.window);
    let y = &data.labels()[0..cfg.window];
    c.bench_function("fit one window", |b| {
        b.iter(|| {
            let mut model = LogisticRegression::from_config(&cfg);
            model
                .fit(black_box(&window), black_box(y), &mut StdRng::seed_from_u64(cfg.seed))
                .unwrap()
        })
    });

    let mut group = c.benchmark_group("evaluate");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(30));
    let sequential = Evaluator::new(cfg.clone()).unwrap();
    group.bench_function("sequential", |b| b.iter(|| sequential.evaluate(black_box(&data)).unwrap()));
    let parallel = Evaluator::new(cfg.set_parallel(true, None)).unwrap();
    group.bench_function("parallel", |b| b.iter(|| parallel.evaluate(black_box(&data)).unwrap()));
    group.finish();
}

criterion_group!(benches, evaluation_benchmarks);
criterion_main!(benches);
