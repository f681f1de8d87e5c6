//! Owned Euclidean vectors used for both positions and momenta.
//!
//! [`Vector`] wraps an [`ndarray::Array1`] and follows value semantics: every
//! operation except [`Vector::increment`] returns a fresh vector. A position that
//! has been pushed onto a trajectory or a chain is therefore never mutated by a
//! later integration step.
//!
//! # Examples
//!
//! ```rust
//! use micro_mcmc::vector::Vector;
//!
//! let q = Vector::from_vec(vec![3.0_f64, 4.0]);
//! assert_eq!(q.norm(), 5.0);
//!
//! let unit = q.normalized().unwrap();
//! assert!((unit.norm() - 1.0).abs() < 1e-12);
//! ```

use ndarray::{Array1, ArrayView1, Zip};
use num_traits::Float;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use std::ops::Index;

/// Norms at or below this value are treated as zero when renormalizing.
pub const NORM_EPS: f64 = 1e-12;

/// Converts an `f64` constant into the working float type.
pub(crate) fn lit<T: Float>(x: f64) -> T {
    T::from(x).unwrap()
}

/// A point (or direction) in R^d.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T> {
    data: Array1<T>,
}

impl<T: Float> Vector<T> {
    /// Creates the zero vector of dimension `dim`.
    pub fn zeros(dim: usize) -> Self {
        Self {
            data: Array1::from_elem(dim, T::zero()),
        }
    }

    /// Wraps the given coordinates.
    pub fn from_vec(values: Vec<T>) -> Self {
        Self {
            data: Array1::from_vec(values),
        }
    }

    /// Draws a vector with i.i.d. N(0, 1) coordinates.
    pub fn standard_normal<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> Self
    where
        StandardNormal: Distribution<T>,
    {
        Self {
            data: Array1::from_shape_fn(dim, |_| StandardNormal.sample(&mut *rng)),
        }
    }

    /// Returns the dimensionality of the vector.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `alpha * self`.
    pub fn scale(&self, alpha: T) -> Self {
        Self {
            data: self.data.mapv(|x| x * alpha),
        }
    }

    /// Returns `self + other`.
    pub fn add(&self, other: &Self) -> Self {
        Self {
            data: Zip::from(&self.data)
                .and(&other.data)
                .map_collect(|&a, &b| a + b),
        }
    }

    /// Returns `self - other`.
    pub fn sub(&self, other: &Self) -> Self {
        Self {
            data: Zip::from(&self.data)
                .and(&other.data)
                .map_collect(|&a, &b| a - b),
        }
    }

    /// Returns `self + alpha * other` without allocating the scaled temporary.
    pub fn add_scaled(&self, other: &Self, alpha: T) -> Self {
        Self {
            data: Zip::from(&self.data)
                .and(&other.data)
                .map_collect(|&a, &b| a + alpha * b),
        }
    }

    /// Dot product between two vectors.
    pub fn dot(&self, other: &Self) -> T {
        Zip::from(&self.data)
            .and(&other.data)
            .fold(T::zero(), |acc, &a, &b| acc + a * b)
    }

    /// Squared Euclidean norm.
    pub fn norm2(&self) -> T {
        self.dot(self)
    }

    pub fn norm(&self) -> T {
        self.norm2().sqrt()
    }

    /// In-place `self += other`.
    ///
    /// This is the only mutating operation; use it for accumulators that are
    /// never shared.
    pub fn increment(&mut self, other: &Self) {
        Zip::from(&mut self.data)
            .and(&other.data)
            .for_each(|a, &b| *a = *a + b);
    }

    /// Returns the vector rescaled to Euclidean norm `norm`, or `None` when the
    /// current norm is at or below [`NORM_EPS`].
    pub fn rescaled(&self, norm: T) -> Option<Self> {
        let current = self.norm();
        if current <= lit(NORM_EPS) {
            return None;
        }
        Some(self.scale(norm / current))
    }

    /// Returns the unit vector pointing along `self`, if it has a usable norm.
    pub fn normalized(&self) -> Option<Self> {
        self.rescaled(T::one())
    }

    /// Removes the component along the unit vector `direction`:
    /// `self - direction * (self · direction)`.
    pub fn project_out(&self, direction: &Self) -> Self {
        self.add_scaled(direction, -self.dot(direction))
    }

    /// Returns `true` if every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    pub fn view(&self) -> ArrayView1<'_, T> {
        self.data.view()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.data.to_vec()
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn arithmetic_returns_new_vectors() {
        let a = Vector::from_vec(vec![1.0, 2.0, 3.0]);
        let b = Vector::from_vec(vec![0.5, -1.0, 2.0]);

        assert_eq!(a.add(&b).to_vec(), vec![1.5, 1.0, 5.0]);
        assert_eq!(a.sub(&b).to_vec(), vec![0.5, 3.0, 1.0]);
        assert_eq!(a.scale(2.0).to_vec(), vec![2.0, 4.0, 6.0]);
        assert_eq!(a.add_scaled(&b, 2.0).to_vec(), vec![2.0, 0.0, 7.0]);
        assert_eq!(a.dot(&b), 4.5);
        assert_eq!(a.norm2(), 14.0);

        // Inputs untouched.
        assert_eq!(a.to_vec(), vec![1.0, 2.0, 3.0]);
        assert_eq!(b.to_vec(), vec![0.5, -1.0, 2.0]);
    }

    #[test]
    fn increment_mutates_in_place() {
        let mut acc = Vector::zeros(2);
        acc.increment(&Vector::from_vec(vec![1.0, -2.0]));
        acc.increment(&Vector::from_vec(vec![1.0, -2.0]));
        assert_eq!(acc.to_vec(), vec![2.0, -4.0]);
    }

    #[test]
    fn normalized_guards_tiny_norms() {
        let tiny = Vector::from_vec(vec![1e-14, 0.0]);
        assert!(tiny.normalized().is_none());

        let v = Vector::from_vec(vec![0.0, -2.0]);
        assert_eq!(v.normalized().unwrap().to_vec(), vec![0.0, -1.0]);
    }

    #[test]
    fn project_out_is_orthogonal() {
        let e = Vector::from_vec(vec![1.0, 1.0, 0.0]).normalized().unwrap();
        let p = Vector::from_vec(vec![2.0, -0.5, 3.0]);
        let tangent = p.project_out(&e);
        assert_abs_diff_eq!(tangent.dot(&e), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(tangent[2], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn standard_normal_is_seeded() {
        let a: Vector<f64> = Vector::standard_normal(5, &mut SmallRng::seed_from_u64(42));
        let b: Vector<f64> = Vector::standard_normal(5, &mut SmallRng::seed_from_u64(42));
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
        assert!(a.is_finite());
    }
}
