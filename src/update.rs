//! Momentum update rules for one leapfrog half-step.
//!
//! All rules share the same contract: given the current momentum, the gradient of
//! the log-density at the current position and a step fraction (usually `δt/2`),
//! return the new momentum. None of them fail; vanishing gradients are handled by
//! explicit guards instead.
//!
//! Write `e = ∇log p / ‖∇log p‖` for the unit direction of steepest ascent of the
//! log-density (equivalently `-∇U/‖∇U‖` for the potential `U = -log p`).
//!
//! - [`MomentumUpdate::Tangential`] projects the momentum onto the plane
//!   orthogonal to `e` and pushes it by `∇log p · stepFraction`. The push grows
//!   with the gradient, so trajectories far from the mode are pulled back harder
//!   than those near it.
//! - [`MomentumUpdate::StochasticTangential`] does the same projection, mixes in
//!   Gaussian noise restricted to that plane, restores the pre-update momentum
//!   norm and then applies the push. If the mixed vector vanishes the momentum
//!   is pushed without being projected.
//! - [`MomentumUpdate::Isokinetic`] moves a unit direction `u` along the geodesic
//!   towards `e` with the closed-form exponential-map update
//!   `u' ∝ e (1-ζ)(1+ζ+⟨u,e⟩(1-ζ)) + 2ζ u`, `ζ = exp(-stepFraction · ‖∇U‖ / (d-1))`.

use crate::refresh::{refresh, try_refresh, NormTarget};
use crate::vector::{lit, Vector};
use num_traits::Float;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Gradient norms below this skip the tangential rules.
pub const TANGENT_GRAD_EPS: f64 = 1e-10;

/// Gradient norms below this trigger the [`DegenerateGradient`] policy of the
/// isokinetic rule.
pub const SPHERE_GRAD_EPS: f64 = 1e-8;

/// What the isokinetic rule does when the gradient vanishes (flat regions,
/// saddles, the mode of a symmetric target).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegenerateGradient {
    /// Leave the direction unchanged.
    #[default]
    Hold,
    /// Apply a small random rotation: a unit-norm refresh of strength
    /// `η · stepFraction`.
    Rotate,
}

/// The per-half-step momentum rule, selected once per sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomentumUpdate {
    Tangential,
    StochasticTangential,
    Isokinetic { degenerate: DegenerateGradient },
}

impl MomentumUpdate {
    /// Returns `true` when the rule keeps momentum on the unit sphere.
    pub fn unit_momentum(self) -> bool {
        matches!(self, MomentumUpdate::Isokinetic { .. })
    }

    /// Returns `true` when the rule consumes the refresh strength `η`.
    pub fn uses_noise(self) -> bool {
        !matches!(self, MomentumUpdate::Tangential)
    }

    /// Advances `momentum` by one half-step.
    ///
    /// `eta` is only read by [`MomentumUpdate::StochasticTangential`] and by the
    /// [`DegenerateGradient::Rotate`] fallback; `rng` is only drawn from by
    /// those two paths.
    pub fn apply<T, R>(
        self,
        momentum: &Vector<T>,
        grad_logp: &Vector<T>,
        step_fraction: T,
        eta: T,
        rng: &mut R,
    ) -> Vector<T>
    where
        T: Float,
        R: Rng + ?Sized,
        StandardNormal: Distribution<T>,
    {
        match self {
            MomentumUpdate::Tangential => tangential(momentum, grad_logp, step_fraction),
            MomentumUpdate::StochasticTangential => {
                stochastic_tangential(momentum, grad_logp, step_fraction, eta, rng)
            }
            MomentumUpdate::Isokinetic { degenerate } => {
                isokinetic(momentum, grad_logp, step_fraction, eta, degenerate, rng)
            }
        }
    }
}

/// Returns the unit ascent direction of the log-density and the gradient norm,
/// or `None` when the norm is below `eps`.
pub fn gradient_direction<T: Float>(grad_logp: &Vector<T>, eps: f64) -> Option<(Vector<T>, T)> {
    let g = grad_logp.norm();
    if g < lit(eps) {
        return None;
    }
    Some((grad_logp.scale(T::one() / g), g))
}

fn tangential<T: Float>(momentum: &Vector<T>, grad_logp: &Vector<T>, step_fraction: T) -> Vector<T> {
    match gradient_direction(grad_logp, TANGENT_GRAD_EPS) {
        Some((e, _)) => momentum
            .project_out(&e)
            .add_scaled(grad_logp, step_fraction),
        None => momentum.clone(),
    }
}

fn stochastic_tangential<T, R>(
    momentum: &Vector<T>,
    grad_logp: &Vector<T>,
    step_fraction: T,
    eta: T,
    rng: &mut R,
) -> Vector<T>
where
    T: Float,
    R: Rng + ?Sized,
    StandardNormal: Distribution<T>,
{
    let Some((e, _)) = gradient_direction(grad_logp, TANGENT_GRAD_EPS) else {
        return momentum.clone();
    };
    let tangent = momentum.project_out(&e);
    let refreshed = try_refresh(
        &tangent,
        eta,
        Some(&e),
        NormTarget::Original(momentum.norm()),
        rng,
    )
    .unwrap_or_else(|| momentum.clone());
    refreshed.add_scaled(grad_logp, step_fraction)
}

fn isokinetic<T, R>(
    u: &Vector<T>,
    grad_logp: &Vector<T>,
    step_fraction: T,
    eta: T,
    degenerate: DegenerateGradient,
    rng: &mut R,
) -> Vector<T>
where
    T: Float,
    R: Rng + ?Sized,
    StandardNormal: Distribution<T>,
{
    // In one dimension the tangent plane of the sphere is empty.
    if u.len() < 2 {
        return u.clone();
    }
    let Some((e, g)) = gradient_direction(grad_logp, SPHERE_GRAD_EPS) else {
        return match degenerate {
            DegenerateGradient::Hold => u.clone(),
            DegenerateGradient::Rotate => {
                refresh(u, eta * step_fraction, None, NormTarget::Unit, rng)
            }
        };
    };

    let dm1 = lit::<T>((u.len() - 1) as f64);
    let zeta = (-step_fraction * g / dm1).exp();
    let one = T::one();
    let u_dot_e = u.dot(&e);
    let along_e = (one - zeta) * (one + zeta + u_dot_e * (one - zeta));
    let uu = e.scale(along_e).add_scaled(u, lit::<T>(2.0) * zeta);

    // uu collapses only for u = -e with ζ → 0; the limit direction is e.
    uu.normalized().unwrap_or(e)
}
