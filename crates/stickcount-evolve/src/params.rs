use serde::{Deserialize, Serialize};

use crate::evaluator::EvaluateError;
use crate::parameter::ParameterError;

/// Configuration of a [`crate::GeneticSearch`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub population_size: usize,
    /// The search stops once the best fitness reaches this value.
    pub target_fitness: f64,
    pub seed: u64,
    /// Optional cap on the number of generations. `None` runs until the
    /// target is reached, which may be forever.
    pub max_generations: Option<usize>,
    /// Probability that an adjacent pair exchanges values at all.
    pub crossover_rate: f64,
    /// Per-position swap probability inside a crossing pair.
    pub swap_probability: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            population_size: 20,
            target_fitness: 1.0,
            seed: 3_289_579_843,
            max_generations: None,
            crossover_rate: 0.75,
            swap_probability: 0.5,
        }
    }
}

impl SearchParams {
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.population_size == 0 {
            return Err(SearchError::EmptyPopulation);
        }
        if self.target_fitness.is_nan() {
            return Err(SearchError::InvalidTarget(self.target_fitness));
        }
        for (name, value) in [
            ("crossover_rate", self.crossover_rate),
            ("swap_probability", self.swap_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SearchError::InvalidProbability { name, value });
            }
        }
        Ok(())
    }
}

/// Errors produced by the genetic search.
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("population size must be > 0")]
    EmptyPopulation,
    #[error("at least one parameter is required")]
    NoParameters,
    #[error("target fitness must not be NaN (got {0})")]
    InvalidTarget(f64),
    #[error("{name} must be within [0, 1] (got {value})")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    #[error("evaluating individual {index} failed")]
    Evaluation {
        index: usize,
        #[source]
        source: EvaluateError,
    },
    #[error("individual {index} scored {value}; fitness must be finite and >= 0")]
    InvalidFitness { index: usize, value: f64 },
}
