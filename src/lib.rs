//! # Micro MCMC
//!
//! A compact Rust library of **microcanonical** Markov Chain Monte Carlo samplers.
//! Instead of Metropolis–Hastings proposals, each step simulates Hamiltonian-like
//! dynamics on a fixed energy shell: momentum is kept tangent to the level sets of
//! the density (or on the unit sphere), optionally refreshed with a little noise,
//! and the end point of a leapfrog trajectory becomes the next sample.
//!
//! The family consists of:
//! 1. **Microcanonical Hamiltonian MC** ([`microcanonical::Microcanonical::mchmc`]):
//!    tangential momentum updates, deterministic energy-conserving acceptance.
//! 2. **Microcanonical Langevin MC** ([`microcanonical::Microcanonical::mclmc`]):
//!    tangential updates with partial refreshment in the tangent plane.
//! 3. **Isokinetic Langevin MC** ([`microcanonical::Microcanonical::isokinetic`]):
//!    unit-sphere momentum with the exponential-map update, gated by an
//!    energy-drift threshold.
//!
//! You need to provide a target implementing [`distributions::GradientTarget`].
//!
//! ## Example: Sampling a 2D Rosenbrock
//!
//! ```rust
//! use micro_mcmc::distributions::Rosenbrock2D;
//! use micro_mcmc::microcanonical::Microcanonical;
//!
//! let target = Rosenbrock2D { a: 1.0_f64, b: 10.0 };
//! let mut sampler = Microcanonical::mclmc(target, 2).set_seed(42);
//! sampler.config.step_size = 0.05;
//!
//! // 200 burn-in steps, then 500 collected samples of shape [500, 2].
//! let sample = sampler.run(500, 200);
//! assert_eq!(sample.shape(), &[500, 2]);
//! ```
//!
//! ## Example: Watching trajectories
//!
//! ```rust
//! use micro_mcmc::distributions::IsotropicGaussian;
//! use micro_mcmc::events::Event;
//! use micro_mcmc::microcanonical::Microcanonical;
//!
//! let mut sampler = Microcanonical::isokinetic(IsotropicGaussian::new(1.0_f64), 2).set_seed(7);
//! sampler.set_control("leapfrogSteps", 10.0).unwrap();
//!
//! let mut events = Vec::new();
//! sampler.step_with(&mut events);
//! match &events[0] {
//!     Event::Proposal { trajectory, .. } => assert_eq!(trajectory.len(), 11),
//!     other => panic!("expected a proposal, got {}", other.kind()),
//! }
//! ```

pub mod acceptance;
pub mod config;
pub mod core;
pub mod distributions;
pub mod events;
pub mod integrator;
pub mod microcanonical;
pub mod refresh;
pub mod update;
pub mod vector;
