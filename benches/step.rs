//! Per-step cost of the three microcanonical presets.
//!
//! Run with: cargo bench --bench step

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use micro_mcmc::distributions::IsotropicGaussian;
use micro_mcmc::events::NullSink;
use micro_mcmc::microcanonical::Microcanonical;

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");

    for &dim in &[2usize, 10, 100] {
        let target = IsotropicGaussian::new(1.0_f64);
        let mut samplers = [
            ("mchmc", Microcanonical::mchmc(target, dim).set_seed(42)),
            ("mclmc", Microcanonical::mclmc(target, dim).set_seed(42)),
            ("isokinetic", Microcanonical::isokinetic(target, dim).set_seed(42)),
        ];
        for (name, sampler) in samplers.iter_mut() {
            group.bench_with_input(BenchmarkId::new(*name, dim), &dim, |b, _| {
                b.iter(|| {
                    // Keep the stored chain from growing without bound.
                    if sampler.n_steps() >= 10_000 {
                        sampler.reset();
                    }
                    black_box(sampler.step_with(&mut NullSink).len())
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
