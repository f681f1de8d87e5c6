/*!
# Microcanonical samplers

[`Microcanonical`] wires a target density, a [`MomentumUpdate`] rule, an
[`Acceptance`] policy and a [`MicrocanonicalConfig`] into a single-chain
sampler. One call to [`Microcanonical::step_with`]:

1. draws a fresh momentum from N(0, I) (normalized to the unit sphere for the
   isokinetic rule) and records the starting energy,
2. runs the [`Leapfrog`] integrator from the current chain state,
3. asks the acceptance policy whether the end point replaces the state,
4. emits one `proposal` event and one `accept`/`reject` event,
5. appends exactly one element to the chain: the end point on accept, a copy of
   the previous state on reject.

The three presets mirror the members of the family:

| constructor                     | momentum rule          | acceptance       |
|---------------------------------|------------------------|------------------|
| [`Microcanonical::mchmc`]       | tangential             | energy-conserving|
| [`Microcanonical::mclmc`]       | stochastic tangential  | energy-conserving|
| [`Microcanonical::isokinetic`]  | isokinetic (unit u)    | energy threshold |

Any other combination can be built with [`Microcanonical::new`].

## Example Usage

```rust
use micro_mcmc::distributions::IsotropicGaussian;
use micro_mcmc::events::Event;
use micro_mcmc::microcanonical::Microcanonical;

let mut sampler = Microcanonical::mclmc(IsotropicGaussian::new(1.0_f64), 2).set_seed(42);

let mut events: Vec<Event<f64>> = Vec::new();
sampler.step_with(&mut events);

assert_eq!(sampler.chain().len(), 2);
assert_eq!(events.len(), 2);
assert_eq!(events[0].kind(), "proposal");

let sample = sampler.run(100, 10);
assert_eq!(sample.shape(), &[100, 2]);
```
*/

use crate::acceptance::{kinetic_energy, Acceptance};
use crate::config::{ConfigError, MicrocanonicalConfig, Param, ParamSpec, Parameter, PARAMETERS};
use crate::core::{run_chain, MarkovChain};
use crate::distributions::GradientTarget;
use crate::events::{Event, EventSink, NullSink};
use crate::integrator::{Leapfrog, Trajectory};
use crate::update::{DegenerateGradient, MomentumUpdate};
use crate::vector::Vector;
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::Array2;
use num_traits::Float;
use rand::prelude::*;
use rand_distr::StandardNormal;
use std::collections::VecDeque;
use std::error::Error;

/// Summary of the most recent step.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<T> {
    pub accepted: bool,
    /// End point of the integration, whether or not it was accepted.
    pub proposal: Vector<T>,
    /// Momentum drawn at the start of the step.
    pub initial_momentum: Vector<T>,
    /// Final momentum after the acceptance policy's correction.
    pub momentum: Vector<T>,
    /// Kinetic plus potential energy at the start of the step.
    pub initial_energy: T,
    /// Potential energy `-log p` at the proposal.
    pub final_potential: T,
    /// See [`crate::acceptance::Decision::energy_error`].
    pub energy_error: T,
}

/// A single-chain microcanonical sampler.
#[derive(Debug, Clone)]
pub struct Microcanonical<T, D> {
    /// The target distribution.
    pub target: D,
    /// The half-step momentum rule.
    pub update: MomentumUpdate,
    /// The accept/reject policy.
    pub acceptance: Acceptance,
    /// Tunables, read at the start of every step.
    pub config: MicrocanonicalConfig<T>,
    /// The random seed the generator was last initialized with.
    pub seed: u64,
    /// The single random source for momenta and refreshment noise.
    pub rng: SmallRng,
    dim: usize,
    chain: Vec<Vector<T>>,
    n_accepted: usize,
    last: Option<Transition<T>>,
}

impl<T, D> Microcanonical<T, D>
where
    T: Float,
    D: GradientTarget<T>,
    StandardNormal: Distribution<T>,
{
    /// Creates a sampler over R^`dim` and seeds its chain with one draw from
    /// N(0, I).
    ///
    /// # Panics
    ///
    /// Panics if `dim` is zero.
    pub fn new(
        target: D,
        dim: usize,
        update: MomentumUpdate,
        acceptance: Acceptance,
        config: MicrocanonicalConfig<T>,
    ) -> Self {
        assert!(dim > 0, "a microcanonical sampler needs at least one dimension");
        let seed = thread_rng().gen::<u64>();
        let mut sampler = Self {
            target,
            update,
            acceptance,
            config,
            seed,
            rng: SmallRng::seed_from_u64(seed),
            dim,
            chain: Vec::new(),
            n_accepted: 0,
            last: None,
        };
        sampler.reset();
        sampler
    }

    /// Microcanonical Hamiltonian Monte Carlo: tangential momentum updates and
    /// deterministic, energy-conserving acceptance.
    pub fn mchmc(target: D, dim: usize) -> Self {
        Self::new(
            target,
            dim,
            MomentumUpdate::Tangential,
            Acceptance::EnergyConserving,
            MicrocanonicalConfig::default(),
        )
    }

    /// Microcanonical Langevin Monte Carlo: tangential updates with partial
    /// refreshment in the tangent plane, deterministic acceptance.
    pub fn mclmc(target: D, dim: usize) -> Self {
        Self::new(
            target,
            dim,
            MomentumUpdate::StochasticTangential,
            Acceptance::EnergyConserving,
            MicrocanonicalConfig::default(),
        )
    }

    /// Isokinetic Langevin dynamics with unit-sphere momentum, gated by the
    /// energy-drift threshold.
    pub fn isokinetic(target: D, dim: usize) -> Self {
        Self::new(
            target,
            dim,
            MomentumUpdate::Isokinetic {
                degenerate: DegenerateGradient::Hold,
            },
            Acceptance::EnergyThreshold,
            MicrocanonicalConfig::default(),
        )
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: MicrocanonicalConfig<T>) -> Self {
        self.config = config;
        self
    }

    /// Sets a new random seed and restarts the chain from a fresh reference draw,
    /// so that a seeded sampler is fully reproducible.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = SmallRng::seed_from_u64(seed);
        self.reset();
        self
    }

    /// Clears the chain and seeds it with one sample from N(0, I).
    pub fn reset(&mut self) {
        let start = Vector::standard_normal(self.dim, &mut self.rng);
        self.reset_at(start);
    }

    /// Clears the chain and starts it at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` does not have the sampler's dimension.
    pub fn reset_at(&mut self, position: Vector<T>) {
        assert_eq!(
            position.len(),
            self.dim,
            "initial position has the wrong dimension"
        );
        self.chain = vec![position];
        self.n_accepted = 0;
        self.last = None;
        log::debug!("{} reset in {} dimensions", self.description(), self.dim);
    }

    /// Human-readable name of the algorithm selected by the momentum rule.
    pub fn description(&self) -> &'static str {
        match self.update {
            MomentumUpdate::Tangential => "Microcanonical Hamiltonian MC",
            MomentumUpdate::StochasticTangential => "Microcanonical Langevin MC",
            MomentumUpdate::Isokinetic { .. } => "Isokinetic Microcanonical Langevin MC",
        }
    }

    /// Reference paper for the selected algorithm.
    pub fn reference(&self) -> &'static str {
        match self.update {
            MomentumUpdate::Tangential => "https://arxiv.org/abs/2212.08549",
            MomentumUpdate::StochasticTangential | MomentumUpdate::Isokinetic { .. } => {
                "https://arxiv.org/abs/2303.18221"
            }
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Every chain element so far; index 0 is the initial sample.
    pub fn chain(&self) -> &[Vector<T>] {
        &self.chain
    }

    /// The latest chain element.
    pub fn current(&self) -> &Vector<T> {
        &self.chain[self.chain.len() - 1]
    }

    /// Details of the most recent step, if any.
    pub fn last_transition(&self) -> Option<&Transition<T>> {
        self.last.as_ref()
    }

    /// Number of steps taken since the last reset.
    pub fn n_steps(&self) -> usize {
        self.chain.len() - 1
    }

    /// Fraction of steps whose proposal was accepted.
    pub fn acceptance_rate(&self) -> f64 {
        match self.n_steps() {
            0 => 0.0,
            n => self.n_accepted as f64 / n as f64,
        }
    }

    /// Returns `true` if `spec` has any effect on this sampler.
    pub fn is_applicable(&self, spec: &ParamSpec) -> bool {
        match spec.key {
            Param::LeapfrogSteps | Param::StepSize => true,
            Param::Eta => self.update.uses_noise(),
            Param::EnergyThreshold => self.acceptance == Acceptance::EnergyThreshold,
        }
    }

    /// The control-panel view of the tunables this sampler actually reads.
    pub fn controls(&self) -> Vec<Parameter> {
        PARAMETERS
            .iter()
            .filter(|spec| self.is_applicable(spec))
            .map(|spec| Parameter {
                spec: *spec,
                value: self.config.get(spec),
            })
            .collect()
    }

    /// Sets a tunable by control-panel name; takes effect from the next step.
    pub fn set_control(&mut self, name: &str, value: f64) -> Result<f64, ConfigError> {
        let spec = ParamSpec::lookup(name)?;
        if !self.is_applicable(spec) {
            return Err(ConfigError::NotApplicable(name.to_string()));
        }
        self.config.set(name, value)
    }

    /// Draws the initial momentum of a trajectory.
    fn draw_momentum(&mut self) -> Vector<T> {
        loop {
            let p = Vector::standard_normal(self.dim, &mut self.rng);
            if !self.update.unit_momentum() {
                return p;
            }
            if let Some(u) = p.normalized() {
                return u;
            }
        }
    }

    /// Performs one step, reporting the trajectory to `sink`, and returns the
    /// new chain element.
    pub fn step_with<E: EventSink<T>>(&mut self, sink: &mut E) -> &Vector<T> {
        let config = self.config;
        let unit = self.update.unit_momentum();

        let start = self.current().clone();
        let initial_momentum = self.draw_momentum();
        let initial_potential = -self.target.unnorm_logp(&start);
        let initial_energy = kinetic_energy(&initial_momentum, unit) + initial_potential;

        let leapfrog = Leapfrog::new(config.step_size, config.n_leapfrog, self.update);
        let Trajectory {
            position,
            momentum,
            path,
        } = leapfrog.run(
            &self.target,
            &start,
            &initial_momentum,
            config.eta,
            &mut self.rng,
        );

        let final_potential = -self.target.unnorm_logp(&position);
        let decision = self.acceptance.decide(
            initial_potential,
            final_potential,
            &momentum,
            initial_energy,
            config.energy_threshold,
            unit,
        );

        sink.emit(Event::Proposal {
            proposal: position.clone(),
            trajectory: path,
            initial_momentum: initial_momentum.clone(),
        });

        let next = if decision.accepted {
            self.n_accepted += 1;
            sink.emit(Event::Accept {
                proposal: position.clone(),
            });
            position.clone()
        } else {
            log::debug!(
                "proposal rejected: energy error {:?} exceeds threshold {:?}",
                decision.energy_error.to_f64(),
                config.energy_threshold.to_f64()
            );
            sink.emit(Event::Reject {
                proposal: position.clone(),
            });
            start
        };
        self.chain.push(next);

        log::trace!(
            "step {}: accepted={} energy_error={:?}",
            self.n_steps(),
            decision.accepted,
            decision.energy_error.to_f64()
        );
        self.last = Some(Transition {
            accepted: decision.accepted,
            proposal: position,
            initial_momentum,
            momentum: decision.momentum,
            initial_energy,
            final_potential,
            energy_error: decision.energy_error,
        });

        self.current()
    }

    /// Runs the sampler for `n_collect` + `n_discard` steps.
    ///
    /// First, the sampler takes `n_discard` burn-in steps, then takes
    /// `n_collect` further steps and returns those samples as an array of shape
    /// `[n_collect, dim]`. Every step, burn-in included, is appended to
    /// [`Microcanonical::chain`].
    pub fn run(&mut self, n_collect: usize, n_discard: usize) -> Array2<T> {
        (0..n_discard).for_each(|_| {
            self.step_with(&mut NullSink);
        });
        run_chain(self, n_collect)
    }

    /// Like [`Microcanonical::run`], displaying a progress bar with the
    /// acceptance rate over a sliding window of 100 steps.
    pub fn run_progress(
        &mut self,
        n_collect: usize,
        n_discard: usize,
    ) -> Result<Array2<T>, Box<dyn Error>> {
        (0..n_discard).for_each(|_| {
            self.step_with(&mut NullSink);
        });

        let pb = ProgressBar::new(n_collect as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:8} {bar:40.white} ETA {eta:3} | {msg}")?
                .progress_chars("=>-"),
        );
        pb.set_prefix("MCMC");

        let window_size = 100;
        let mut accept_window: VecDeque<f64> = VecDeque::with_capacity(window_size);
        let mut out = Array2::from_elem((n_collect, self.dim), T::zero());

        for i in 0..n_collect {
            let state = self.step_with(&mut NullSink);
            out.row_mut(i).assign(&state.view());

            let accepted = self.last.as_ref().map_or(false, |t| t.accepted);
            accept_window.push_front(if accepted { 1.0 } else { 0.0 });
            if accept_window.len() > window_size {
                accept_window.pop_back();
            }
            let avg_accept_rate = accept_window.iter().sum::<f64>() / accept_window.len() as f64;

            pb.inc(1);
            pb.set_message(format!("p(accept)≈{:.2}", avg_accept_rate));
        }
        pb.finish_with_message("Done!");
        log::info!(
            "{}: {} samples, acceptance rate {:.3}",
            self.description(),
            n_collect,
            self.acceptance_rate()
        );
        Ok(out)
    }
}

impl<T, D> MarkovChain<Vector<T>> for Microcanonical<T, D>
where
    T: Float,
    D: GradientTarget<T>,
    StandardNormal: Distribution<T>,
{
    fn step(&mut self) -> &Vector<T> {
        self.step_with(&mut NullSink)
    }

    fn current_state(&self) -> &Vector<T> {
        self.current()
    }
}
