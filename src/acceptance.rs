//! Accept/reject policies for the end point of an integration.
//!
//! Neither policy is a Metropolis test. [`Acceptance::EnergyConserving`] always
//! accepts and corrects the momentum norm so that the total energy matches the
//! value recorded at the start of the trajectory. [`Acceptance::EnergyThreshold`]
//! rejects only gross energy violations, acting as a guard against integrator
//! blow-up rather than as a detailed-balance correction.

use crate::vector::{lit, Vector};
use num_traits::Float;

/// Lower bound on the kinetic energy left after the energy-conserving rescale.
pub const MIN_KINETIC: f64 = 1e-10;

/// Momenta with a norm at or below this are not rescaled.
const RESCALE_NORM_EPS: f64 = 1e-10;

/// Returns `½‖p‖²`, or the constant `½` for unit-sphere momentum.
pub fn kinetic_energy<T: Float>(momentum: &Vector<T>, unit_momentum: bool) -> T {
    let half = lit::<T>(0.5);
    if unit_momentum {
        half
    } else {
        half * momentum.norm2()
    }
}

/// How a proposed end point is turned into the next chain element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// Always accept, after rescaling momentum to restore the initial energy.
    EnergyConserving,
    /// Accept iff `|U(final) - U(initial)|` is below the configured tolerance.
    EnergyThreshold,
}

/// The outcome of [`Acceptance::decide`].
#[derive(Debug, Clone, PartialEq)]
pub struct Decision<T> {
    pub accepted: bool,
    /// The final momentum after any correction.
    pub momentum: Vector<T>,
    /// Total-energy drift for [`Acceptance::EnergyConserving`] (before the
    /// correction), potential-energy change for [`Acceptance::EnergyThreshold`].
    pub energy_error: T,
}

impl Acceptance {
    /// Decides whether to accept a proposal.
    ///
    /// * `initial_potential`, `final_potential` - `U = -log p` at both ends.
    /// * `final_momentum` - the momentum the integrator ended with.
    /// * `reference_energy` - kinetic plus potential energy at the start.
    /// * `threshold` - the tolerance of [`Acceptance::EnergyThreshold`].
    /// * `unit_momentum` - whether momentum lives on the unit sphere, in which
    ///   case its norm is never rescaled.
    pub fn decide<T: Float>(
        self,
        initial_potential: T,
        final_potential: T,
        final_momentum: &Vector<T>,
        reference_energy: T,
        threshold: T,
        unit_momentum: bool,
    ) -> Decision<T> {
        match self {
            Acceptance::EnergyConserving => {
                let drift = kinetic_energy(final_momentum, unit_momentum) + final_potential
                    - reference_energy;
                let momentum = if unit_momentum {
                    final_momentum.clone()
                } else {
                    conserve_energy(final_momentum, final_potential, reference_energy)
                };
                Decision {
                    accepted: true,
                    momentum,
                    energy_error: drift,
                }
            }
            Acceptance::EnergyThreshold => {
                let delta = final_potential - initial_potential;
                Decision {
                    // NaN compares false, so a blown-up trajectory is rejected.
                    accepted: delta.abs() < threshold,
                    momentum: final_momentum.clone(),
                    energy_error: delta,
                }
            }
        }
    }
}

/// Rescales `momentum` so that `½‖p‖² + U = E`, flooring the kinetic part at
/// [`MIN_KINETIC`].
fn conserve_energy<T: Float>(momentum: &Vector<T>, potential: T, energy: T) -> Vector<T> {
    let norm = momentum.norm();
    if norm <= lit(RESCALE_NORM_EPS) {
        return momentum.clone();
    }
    let kinetic = (energy - potential).max(lit(MIN_KINETIC));
    let target_norm = (lit::<T>(2.0) * kinetic).sqrt();
    momentum.scale(target_norm / norm)
}
