//! Leapfrog integration on the microcanonical energy shell.
//!
//! One leapfrog iteration is a Strang splitting:
//! - a half-step momentum update with the gradient at the current position,
//! - a full position step `q ← q + δt · p`,
//! - a second half-step momentum update with the gradient at the new position,
//! - for unit-sphere momentum, one partial refresh of the direction.
//!
//! The position move sits strictly between the two symmetric momentum half-steps,
//! which keeps the deterministic part of the scheme time-reversible.

use crate::distributions::GradientTarget;
use crate::refresh::{refresh, NormTarget};
use crate::update::MomentumUpdate;
use crate::vector::{lit, Vector};
use num_traits::Float;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// The result of one integration call.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory<T> {
    /// Final position.
    pub position: Vector<T>,
    /// Final momentum (or unit direction).
    pub momentum: Vector<T>,
    /// Every visited position, starting position included. Only used for
    /// visualization; it has `n_leapfrog + 1` entries.
    pub path: Vec<Vector<T>>,
}

/// A fixed-length leapfrog integrator parameterized by a momentum update rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leapfrog<T> {
    /// The step size δt.
    pub step_size: T,
    /// The number of leapfrog iterations per call.
    pub n_leapfrog: usize,
    /// The momentum rule applied at each half-step.
    pub update: MomentumUpdate,
}

impl<T: Float> Leapfrog<T> {
    pub fn new(step_size: T, n_leapfrog: usize, update: MomentumUpdate) -> Self {
        Self {
            step_size,
            n_leapfrog,
            update,
        }
    }

    /// Integrates from `(position, momentum)` for `n_leapfrog` iterations.
    ///
    /// Neither input is modified; the positions recorded in the returned path are
    /// independent copies.
    pub fn run<D, R>(
        &self,
        target: &D,
        position: &Vector<T>,
        momentum: &Vector<T>,
        eta: T,
        rng: &mut R,
    ) -> Trajectory<T>
    where
        D: GradientTarget<T> + ?Sized,
        R: Rng + ?Sized,
        StandardNormal: Distribution<T>,
    {
        let half = self.step_size * lit::<T>(0.5);
        let refresh_direction = self.update.unit_momentum() && eta > T::zero();

        let mut q = position.clone();
        let mut p = momentum.clone();
        let mut path = Vec::with_capacity(self.n_leapfrog + 1);
        path.push(q.clone());

        for _ in 0..self.n_leapfrog {
            p = self
                .update
                .apply(&p, &target.grad_unnorm_logp(&q), half, eta, rng);
            q = q.add_scaled(&p, self.step_size);
            p = self
                .update
                .apply(&p, &target.grad_unnorm_logp(&q), half, eta, rng);
            if refresh_direction {
                p = refresh(&p, eta, None, NormTarget::Unit, rng);
            }
            path.push(q.clone());
        }

        Trajectory {
            position: q,
            momentum: p,
            path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::{IsotropicGaussian, Target};
    use crate::update::DegenerateGradient;
    use approx::assert_abs_diff_eq;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    struct Flat;

    impl Target<f64> for Flat {
        fn unnorm_logp(&self, _position: &Vector<f64>) -> f64 {
            0.0
        }
    }

    impl GradientTarget<f64> for Flat {
        fn grad_unnorm_logp(&self, position: &Vector<f64>) -> Vector<f64> {
            Vector::zeros(position.len())
        }
    }

    #[test]
    fn path_includes_start_and_every_step() {
        let leapfrog = Leapfrog::new(0.1, 7, MomentumUpdate::Tangential);
        let q0 = Vector::from_vec(vec![0.5, -0.5]);
        let p0 = Vector::from_vec(vec![1.0, 0.0]);
        let traj = leapfrog.run(
            &IsotropicGaussian::new(1.0),
            &q0,
            &p0,
            0.0,
            &mut SmallRng::seed_from_u64(0),
        );

        assert_eq!(traj.path.len(), 8);
        assert_eq!(traj.path[0], q0);
        assert_eq!(traj.path.last(), Some(&traj.position));
    }

    #[test]
    fn flat_target_moves_in_a_straight_line() {
        let leapfrog = Leapfrog::new(0.25, 4, MomentumUpdate::Tangential);
        let q0 = Vector::from_vec(vec![1.0, 2.0]);
        let p0 = Vector::from_vec(vec![1.0, -1.0]);
        let traj = leapfrog.run(&Flat, &q0, &p0, 0.0, &mut SmallRng::seed_from_u64(0));

        assert_eq!(traj.momentum, p0);
        assert_abs_diff_eq!(traj.position[0], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(traj.position[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn isokinetic_direction_stays_unit_after_every_substep() {
        let leapfrog = Leapfrog::new(
            0.15,
            1,
            MomentumUpdate::Isokinetic {
                degenerate: DegenerateGradient::Hold,
            },
        );
        let target = IsotropicGaussian::new(1.0);
        let mut rng = SmallRng::seed_from_u64(11);
        let mut q = Vector::from_vec(vec![2.0, -1.0, 0.5]);
        let mut u = Vector::from_vec(vec![0.0, 1.0, 0.0]);

        for _ in 0..100 {
            let traj = leapfrog.run(&target, &q, &u, 0.2, &mut rng);
            assert_abs_diff_eq!(traj.momentum.norm(), 1.0, epsilon = 1e-6);
            q = traj.position;
            u = traj.momentum;
        }
        assert!(q.is_finite());
    }
}
