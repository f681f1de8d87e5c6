//! Runs the three microcanonical samplers on a correlated 2D Gaussian and prints
//! summary statistics for each.
//!
//! Set `RUST_LOG=debug` to see rejected proposals and control changes.

use micro_mcmc::distributions::Gaussian2D;
use micro_mcmc::microcanonical::Microcanonical;
use ndarray::{arr1, arr2, Axis};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    const SAMPLE_SIZE: usize = 10_000;
    const BURNIN: usize = 1_000;
    const SEED: u64 = 42;

    let target = Gaussian2D {
        mean: arr1(&[0.0, 1.0]),
        cov: arr2(&[[4.0, 2.0], [2.0, 3.0]]),
    };

    let samplers = [
        Microcanonical::mchmc(target.clone(), 2),
        Microcanonical::mclmc(target.clone(), 2),
        Microcanonical::isokinetic(target, 2),
    ];

    for sampler in samplers {
        let mut sampler = sampler.set_seed(SEED);
        println!("{} ({})", sampler.description(), sampler.reference());
        for control in sampler.controls() {
            println!("  {:<18} {}", control.spec.label, control.value);
        }

        let sample = sampler.run_progress(SAMPLE_SIZE, BURNIN)?;
        let mean = sample
            .mean_axis(Axis(0))
            .ok_or("sample must not be empty")?;
        let centered = &sample - &mean;
        let var = centered.mapv(|x| x * x).mean_axis(Axis(0)).ok_or("sample must not be empty")?;

        println!("  mean:            ({:.3}, {:.3})", mean[0], mean[1]);
        println!("  variance:        ({:.3}, {:.3})", var[0], var[1]);
        println!("  acceptance rate: {:.3}", sampler.acceptance_rate());
    }

    Ok(())
}
