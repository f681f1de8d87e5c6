//! Sampler tunables and the bounded control surface that edits them.
//!
//! [`MicrocanonicalConfig`] is a plain struct with public fields; code that
//! builds a sampler programmatically may put any value in it. Interactive
//! front-ends go through the named parameters in [`PARAMETERS`] instead, which
//! carry display labels, bounds and slider granularity and reject values outside
//! their range.

use crate::vector::lit;
use num_traits::Float;
use thiserror::Error;

/// Per-sampler tunables, read at the start of every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MicrocanonicalConfig<T> {
    /// Number of leapfrog iterations per step.
    pub n_leapfrog: usize,
    /// Leapfrog step size δt.
    pub step_size: T,
    /// Partial refreshment strength η.
    pub eta: T,
    /// Energy-drift tolerance of the threshold acceptance policy.
    pub energy_threshold: T,
}

impl<T: Float> Default for MicrocanonicalConfig<T> {
    fn default() -> Self {
        Self {
            n_leapfrog: 40,
            step_size: lit(0.15),
            eta: lit(0.1),
            energy_threshold: lit(0.5),
        }
    }
}

/// Identifies a tunable of [`MicrocanonicalConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    LeapfrogSteps,
    StepSize,
    Eta,
    EnergyThreshold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Integer,
    Float,
}

/// Description of one tunable as shown on a control panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub key: Param,
    pub name: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub kind: ParamKind,
}

pub const LEAPFROG_STEPS: ParamSpec = ParamSpec {
    key: Param::LeapfrogSteps,
    name: "leapfrogSteps",
    label: "Leapfrog Steps",
    min: 5.0,
    max: 100.0,
    step: 1.0,
    kind: ParamKind::Integer,
};

pub const STEP_SIZE: ParamSpec = ParamSpec {
    key: Param::StepSize,
    name: "dt",
    label: "Leapfrog Δt",
    min: 0.01,
    max: 0.5,
    step: 0.01,
    kind: ParamKind::Float,
};

pub const ETA: ParamSpec = ParamSpec {
    key: Param::Eta,
    name: "eta",
    label: "Noise Strength η",
    min: 0.0,
    max: 1.0,
    step: 0.01,
    kind: ParamKind::Float,
};

pub const ENERGY_THRESHOLD: ParamSpec = ParamSpec {
    key: Param::EnergyThreshold,
    name: "energyThreshold",
    label: "Energy Threshold",
    min: 0.01,
    max: 1.0,
    step: 0.01,
    kind: ParamKind::Float,
};

/// Every known parameter, in display order.
pub const PARAMETERS: [ParamSpec; 4] = [LEAPFROG_STEPS, STEP_SIZE, ETA, ENERGY_THRESHOLD];

/// A parameter together with its current value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameter {
    pub spec: ParamSpec,
    pub value: f64,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown parameter `{0}`")]
    Unknown(String),
    #[error("parameter `{0}` is not used by this sampler")]
    NotApplicable(String),
    #[error("value {value} for `{name}` is outside [{min}, {max}]")]
    OutOfBounds {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl ParamSpec {
    /// Finds a parameter by its control-surface name.
    pub fn lookup(name: &str) -> Result<&'static ParamSpec, ConfigError> {
        PARAMETERS
            .iter()
            .find(|spec| spec.name == name)
            .ok_or_else(|| ConfigError::Unknown(name.to_string()))
    }

    /// Validates `value` against the bounds and snaps it to the slider grid.
    pub fn snap(&self, value: f64) -> Result<f64, ConfigError> {
        if !(self.min..=self.max).contains(&value) {
            return Err(ConfigError::OutOfBounds {
                name: self.name,
                value,
                min: self.min,
                max: self.max,
            });
        }
        let ticks = ((value - self.min) / self.step).round();
        Ok((self.min + ticks * self.step).clamp(self.min, self.max))
    }
}

impl<T: Float> MicrocanonicalConfig<T> {
    /// Returns the current value of `spec` as shown on a control panel.
    pub fn get(&self, spec: &ParamSpec) -> f64 {
        let value = match spec.key {
            Param::LeapfrogSteps => return self.n_leapfrog as f64,
            Param::StepSize => self.step_size,
            Param::Eta => self.eta,
            Param::EnergyThreshold => self.energy_threshold,
        };
        value.to_f64().unwrap_or(f64::NAN)
    }

    /// Sets parameter `name` through the control surface and returns the value
    /// actually stored after snapping.
    pub fn set(&mut self, name: &str, value: f64) -> Result<f64, ConfigError> {
        let spec = ParamSpec::lookup(name)?;
        let snapped = spec.snap(value)?;
        match spec.key {
            Param::LeapfrogSteps => self.n_leapfrog = snapped as usize,
            Param::StepSize => self.step_size = lit(snapped),
            Param::Eta => self.eta = lit(snapped),
            Param::EnergyThreshold => self.energy_threshold = lit(snapped),
        }
        log::debug!("control `{}` set to {}", spec.name, snapped);
        Ok(snapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn defaults_match_control_panel() {
        let config = MicrocanonicalConfig::<f64>::default();
        assert_eq!(config.get(&LEAPFROG_STEPS), 40.0);
        assert_abs_diff_eq!(config.get(&STEP_SIZE), 0.15);
        assert_abs_diff_eq!(config.get(&ETA), 0.1);
        assert_abs_diff_eq!(config.get(&ENERGY_THRESHOLD), 0.5);
    }

    #[test]
    fn set_snaps_to_granularity() {
        let mut config = MicrocanonicalConfig::<f64>::default();
        assert_eq!(config.set("leapfrogSteps", 12.6), Ok(13.0));
        assert_eq!(config.n_leapfrog, 13);

        let dt = config.set("dt", 0.123).unwrap();
        assert_abs_diff_eq!(dt, 0.12, epsilon = 1e-12);
        assert_abs_diff_eq!(config.step_size, 0.12, epsilon = 1e-12);
    }

    #[test]
    fn set_rejects_bad_input() {
        let mut config = MicrocanonicalConfig::<f32>::default();
        assert_eq!(
            config.set("temperature", 1.0),
            Err(ConfigError::Unknown("temperature".to_string()))
        );
        assert!(matches!(
            config.set("eta", 1.5),
            Err(ConfigError::OutOfBounds { name: "eta", .. })
        ));
        assert!(config.set("dt", f64::NAN).is_err());
        // Rejected writes leave the config untouched.
        assert_eq!(config, MicrocanonicalConfig::default());
    }
}
