use std::fmt;

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// A named scalar searched within `[start, end]`.
///
/// `step` scales the Gaussian noise added on mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ParameterSpec")]
pub struct Parameter {
    pub name: String,
    pub start: f64,
    pub end: f64,
    pub step: f64,
    /// Current value; starts at `start` until the search initializes it,
    /// also when a config file leaves it out.
    pub value: f64,
}

#[derive(Deserialize)]
struct ParameterSpec {
    name: String,
    start: f64,
    end: f64,
    step: f64,
    #[serde(default)]
    value: Option<f64>,
}

impl From<ParameterSpec> for Parameter {
    fn from(spec: ParameterSpec) -> Self {
        Self {
            value: spec.value.unwrap_or(spec.start),
            name: spec.name,
            start: spec.start,
            end: spec.end,
            step: spec.step,
        }
    }
}

/// Malformed parameter bounds or step.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("parameter `{name}`: bounds must be finite with start <= end (got [{start}, {end}])")]
    InvalidBounds { name: String, start: f64, end: f64 },
    #[error("parameter `{name}`: step must be finite and >= 0 (got {step})")]
    InvalidStep { name: String, step: f64 },
}

impl Parameter {
    pub fn new(
        name: impl Into<String>,
        start: f64,
        end: f64,
        step: f64,
    ) -> Result<Self, ParameterError> {
        let parameter = Self {
            name: name.into(),
            start,
            end,
            step,
            value: start,
        };
        parameter.validate()?;
        Ok(parameter)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        if !(self.start.is_finite() && self.end.is_finite() && self.start <= self.end) {
            return Err(ParameterError::InvalidBounds {
                name: self.name.clone(),
                start: self.start,
                end: self.end,
            });
        }
        if !self.step.is_finite() || self.step < 0.0 {
            return Err(ParameterError::InvalidStep {
                name: self.name.clone(),
                step: self.step,
            });
        }
        Ok(())
    }

    /// Draw the value uniformly from `[start, end]`.
    pub fn initialize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let u: f64 = rng.gen();
        self.value = self.start + (self.end - self.start) * u;
    }

    /// Add `step * N(0, 1)` and clamp back into the bounds.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let noise: f64 = rng.sample(StandardNormal);
        self.value = (self.value + self.step * noise).clamp(self.start, self.end);
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.start..=self.end).contains(&value)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.4}", self.name, self.value)
    }
}

/// One candidate solution: an ordered list of parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    parameters: Vec<Parameter>,
}

impl Individual {
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub(crate) fn parameters_mut(&mut self) -> &mut [Parameter] {
        &mut self.parameters
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn value(&self, index: usize) -> Option<f64> {
        self.parameters.get(index).map(|p| p.value)
    }

    /// Value of the first parameter called `name`.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value)
    }

    pub fn values(&self) -> Vec<f64> {
        self.parameters.iter().map(|p| p.value).collect()
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{p}")?;
        }
        Ok(())
    }
}
