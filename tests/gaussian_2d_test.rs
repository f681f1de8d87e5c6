//! Sanity checks of the samplers on a correlated 2D Gaussian.
//!
//! The microcanonical samplers carry no Metropolis correction, so the checks are
//! deliberately loose: the target is point-symmetric around its mean, which pins
//! the sample mean, while the covariance only has to be of the right scale.

use approx::assert_abs_diff_eq;
use micro_mcmc::distributions::Gaussian2D;
use micro_mcmc::microcanonical::Microcanonical;
use ndarray::{arr1, arr2, Array2, Axis};
use ndarray_stats::CorrelationExt;

const SAMPLE_SIZE: usize = 5_000;
const BURNIN: usize = 500;

fn target() -> Gaussian2D<f64> {
    Gaussian2D {
        mean: arr1(&[0.0, 1.0]),
        cov: arr2(&[[4.0, 2.0], [2.0, 3.0]]),
    }
}

fn check_moments(sample: &Array2<f64>) {
    assert!(sample.iter().all(|x| x.is_finite()), "non-finite sample");

    let mean = sample.mean_axis(Axis(0)).unwrap();
    assert_abs_diff_eq!(mean, target().mean, epsilon = 0.5);

    let cov = sample.t().cov(1.0).unwrap();
    for i in 0..2 {
        assert!(
            cov[[i, i]] > 0.1 && cov[[i, i]] < 40.0,
            "variance {} out of range",
            cov[[i, i]]
        );
    }
}

#[test]
fn mchmc_gaussian_2d() {
    let mut sampler = Microcanonical::mchmc(target(), 2).set_seed(42);
    let sample = sampler.run(SAMPLE_SIZE, BURNIN);
    assert_eq!(sample.shape(), &[SAMPLE_SIZE, 2]);
    check_moments(&sample);
    assert_eq!(sampler.acceptance_rate(), 1.0);
}

#[test]
fn mclmc_gaussian_2d() {
    let mut sampler = Microcanonical::mclmc(target(), 2).set_seed(42);
    let sample = sampler.run(SAMPLE_SIZE, BURNIN);
    check_moments(&sample);
    assert_eq!(sampler.chain().len(), SAMPLE_SIZE + BURNIN + 1);
}

#[test]
fn mchmc_variance_is_of_target_order() {
    let mut sampler = Microcanonical::mchmc(target(), 2).set_seed(7);
    let sample = sampler.run(SAMPLE_SIZE, BURNIN);
    let cov = sample.t().cov(1.0).unwrap();
    let target_cov = target().cov;
    for i in 0..2 {
        let ratio = cov[[i, i]] / target_cov[[i, i]];
        assert!(
            ratio > 0.05 && ratio < 5.0,
            "variance {} is far from target {}",
            cov[[i, i]],
            target_cov[[i, i]]
        );
    }
}

#[test]
fn isokinetic_gaussian_2d() {
    let mut sampler = Microcanonical::isokinetic(target(), 2).set_seed(42);
    let sample = sampler.run(SAMPLE_SIZE, BURNIN);
    check_moments(&sample);
    let rate = sampler.acceptance_rate();
    assert!(rate > 0.05, "acceptance rate {} too low", rate);
}
