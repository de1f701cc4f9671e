use criterion::{criterion_group, criterion_main, Criterion};
use riffle::mc::{self, Simulator};
use riffle::outcome::OutcomeMatrix;
use tinyrand::Wyrand;

fn criterion_benchmark(c: &mut Criterion) {
    {
        // sanity check
        let outcome = Simulator::default()
            .with_trials(1_000)
            .with_shuffles(7)
            .run()
            .unwrap();
        assert_eq!(Ok(()), outcome.validate());
    }

    c.bench_function("cri_mc_batch_1k_7", |b| {
        let mut rand = Wyrand::default();
        let mut outcome = OutcomeMatrix::allocate(52);
        b.iter(|| {
            mc::run_batch(1_000, 7, &mut rand, &mut outcome, || {});
        });
    });

    c.bench_function("cri_mc_simulator_10k_7_4w", |b| {
        let simulator = Simulator::default()
            .with_trials(10_000)
            .with_shuffles(7)
            .with_workers(4);
        b.iter(|| simulator.run().unwrap());
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
