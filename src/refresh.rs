//! Partial momentum refreshment.
//!
//! A refresh mixes a fresh isotropic Gaussian draw into the momentum and then
//! renormalizes, so the noise changes the direction of travel but never the
//! energy level implied by the momentum norm. When a tangency constraint is
//! active the noise is first projected onto the plane orthogonal to the
//! constraint direction.

use crate::vector::Vector;
use num_traits::Float;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// The norm a refreshed momentum is rescaled to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormTarget<T> {
    /// Keep the norm the momentum had before the update that triggered the
    /// refresh (free-momentum variants).
    Original(T),
    /// Direction-only momentum on the unit sphere.
    Unit,
}

impl<T: Float> NormTarget<T> {
    pub fn value(self) -> T {
        match self {
            NormTarget::Original(norm) => norm,
            NormTarget::Unit => T::one(),
        }
    }
}

/// Adds `eta * z` to `momentum`, with `z ~ N(0, I)` (projected orthogonal to
/// `constraint` when given), and rescales the result to `target`.
///
/// `constraint` must be a unit vector. If the mixed vector has a norm at or
/// below [`crate::vector::NORM_EPS`] the refresh is skipped and `momentum` is
/// returned unchanged.
pub fn refresh<T, R>(
    momentum: &Vector<T>,
    eta: T,
    constraint: Option<&Vector<T>>,
    target: NormTarget<T>,
    rng: &mut R,
) -> Vector<T>
where
    T: Float,
    R: Rng + ?Sized,
    StandardNormal: Distribution<T>,
{
    try_refresh(momentum, eta, constraint, target, rng).unwrap_or_else(|| momentum.clone())
}

/// Like [`refresh`], but returns `None` instead of falling back to `momentum`
/// when the mixed vector cannot be renormalized.
pub fn try_refresh<T, R>(
    momentum: &Vector<T>,
    eta: T,
    constraint: Option<&Vector<T>>,
    target: NormTarget<T>,
    rng: &mut R,
) -> Option<Vector<T>>
where
    T: Float,
    R: Rng + ?Sized,
    StandardNormal: Distribution<T>,
{
    let mut noise = Vector::standard_normal(momentum.len(), rng);
    if let Some(direction) = constraint {
        noise = noise.project_out(direction);
    }
    let refreshed = momentum.add_scaled(&noise, eta).rescaled(target.value());
    if refreshed.is_none() {
        log::trace!("refresh skipped: mixed momentum has vanishing norm");
    }
    refreshed
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn unit_target_stays_on_sphere() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut u = Vector::from_vec(vec![0.6, 0.8, 0.0]);
        for _ in 0..100 {
            u = refresh(&u, 0.5, None, NormTarget::Unit, &mut rng);
            assert_abs_diff_eq!(u.norm(), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn tangent_refresh_keeps_norm_and_tangency() {
        let mut rng = SmallRng::seed_from_u64(42);
        let e = Vector::from_vec(vec![1.0, 0.0, 0.0]);
        let p = Vector::from_vec(vec![0.0, 2.0, -1.0]);
        let refreshed = refresh(&p, 0.3, Some(&e), NormTarget::Original(3.0), &mut rng);

        assert_abs_diff_eq!(refreshed.norm(), 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(refreshed.dot(&e), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_strength_only_rescales() {
        let mut rng = SmallRng::seed_from_u64(1);
        let p = Vector::from_vec(vec![3.0, 4.0]);
        let refreshed = refresh(&p, 0.0, None, NormTarget::Unit, &mut rng);
        assert_abs_diff_eq!(refreshed[0], 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(refreshed[1], 0.8, epsilon = 1e-12);
    }

    #[test]
    fn vanishing_norm_skips_refresh() {
        let mut rng = SmallRng::seed_from_u64(3);
        let p: Vector<f64> = Vector::zeros(4);
        let refreshed = refresh(&p, 0.0, None, NormTarget::Original(1.0), &mut rng);
        assert_eq!(refreshed, p);
        assert!(try_refresh(&p, 0.0, None, NormTarget::Original(1.0), &mut rng).is_none());
    }
}
