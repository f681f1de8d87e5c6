/*!
Target densities for the microcanonical samplers.

A sampler only needs two things from a target: the unnormalized log-density
([`Target`]) and its gradient ([`GradientTarget`]). Both must be pure. The
potential energy used by the integrators is `U(q) = -unnorm_logp(q)`.

The module ships a few standard targets that are handy for tests and demos.

# Examples

```rust
use micro_mcmc::distributions::{GradientTarget, IsotropicGaussian, Target};
use micro_mcmc::vector::Vector;

let target = IsotropicGaussian::new(1.0_f64);
let q = Vector::from_vec(vec![1.0, -2.0]);
assert_eq!(target.unnorm_logp(&q), -2.5);
assert_eq!(target.grad_unnorm_logp(&q).to_vec(), vec![-1.0, 2.0]);
```
*/

use crate::vector::{lit, Vector};
use ndarray::{Array1, Array2};
use num_traits::Float;

/// A continuous target distribution known up to a normalizing constant.
pub trait Target<T: Float> {
    /// Returns the log of the unnormalized density at `position`.
    fn unnorm_logp(&self, position: &Vector<T>) -> T;
}

/// A target that also provides the gradient of its log-density.
pub trait GradientTarget<T: Float>: Target<T> {
    /// Returns ∇ log p at `position`.
    fn grad_unnorm_logp(&self, position: &Vector<T>) -> Vector<T>;
}

/// An isotropic Gaussian `N(0, std² I)` of arbitrary dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsotropicGaussian<T> {
    pub std: T,
}

impl<T: Float> IsotropicGaussian<T> {
    pub fn new(std: T) -> Self {
        Self { std }
    }
}

impl<T: Float> Target<T> for IsotropicGaussian<T> {
    fn unnorm_logp(&self, position: &Vector<T>) -> T {
        -lit::<T>(0.5) * position.norm2() / (self.std * self.std)
    }
}

impl<T: Float> GradientTarget<T> for IsotropicGaussian<T> {
    fn grad_unnorm_logp(&self, position: &Vector<T>) -> Vector<T> {
        position.scale(-T::one() / (self.std * self.std))
    }
}

/**
A 2D Gaussian distribution parameterized by a mean vector and a 2×2 covariance matrix.

# Examples

```rust
use micro_mcmc::distributions::{Gaussian2D, Target};
use micro_mcmc::vector::Vector;
use ndarray::{arr1, arr2};

let gauss = Gaussian2D {
    mean: arr1(&[0.0, 1.0]),
    cov: arr2(&[[4.0, 2.0], [2.0, 3.0]]),
};
assert_eq!(gauss.unnorm_logp(&Vector::from_vec(vec![0.0, 1.0])), 0.0);
```
*/
#[derive(Debug, Clone, PartialEq)]
pub struct Gaussian2D<T> {
    pub mean: Array1<T>,
    pub cov: Array2<T>,
}

impl<T: Float> Gaussian2D<T> {
    /// Returns `Σ⁻¹ (x - μ)` along with `x - μ`.
    fn whiten(&self, position: &Vector<T>) -> ([T; 2], [T; 2]) {
        let (a, b, c, d) = (
            self.cov[(0, 0)],
            self.cov[(0, 1)],
            self.cov[(1, 0)],
            self.cov[(1, 1)],
        );
        let det = a * d - b * c;
        let diff = [position[0] - self.mean[0], position[1] - self.mean[1]];
        let solved = [
            (d * diff[0] - b * diff[1]) / det,
            (-c * diff[0] + a * diff[1]) / det,
        ];
        (diff, solved)
    }
}

impl<T: Float> Target<T> for Gaussian2D<T> {
    fn unnorm_logp(&self, position: &Vector<T>) -> T {
        let (diff, solved) = self.whiten(position);
        -lit::<T>(0.5) * (diff[0] * solved[0] + diff[1] * solved[1])
    }
}

impl<T: Float> GradientTarget<T> for Gaussian2D<T> {
    fn grad_unnorm_logp(&self, position: &Vector<T>) -> Vector<T> {
        let (_, solved) = self.whiten(position);
        Vector::from_vec(vec![-solved[0], -solved[1]])
    }
}

/// The 2D Rosenbrock ("banana") density:
/// `log p(x, y) = -[(a - x)² + b (y - x²)²]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rosenbrock2D<T> {
    pub a: T,
    pub b: T,
}

impl<T: Float> Target<T> for Rosenbrock2D<T> {
    fn unnorm_logp(&self, position: &Vector<T>) -> T {
        let (x, y) = (position[0], position[1]);
        let valley = y - x * x;
        -((self.a - x) * (self.a - x) + self.b * valley * valley)
    }
}

impl<T: Float> GradientTarget<T> for Rosenbrock2D<T> {
    fn grad_unnorm_logp(&self, position: &Vector<T>) -> Vector<T> {
        let (x, y) = (position[0], position[1]);
        let two = lit::<T>(2.0);
        let valley = y - x * x;
        Vector::from_vec(vec![
            two * (self.a - x) + lit::<T>(4.0) * self.b * x * valley,
            -two * self.b * valley,
        ])
    }
}
