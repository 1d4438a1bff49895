//! Seeded genetic search over bounded scalar parameters.
//!
//! Every [`Individual`] carries its own copy of the [`Parameter`] list. Each
//! generation is scored by an [`Evaluator`] (in parallel with the `rayon`
//! feature), then resampled proportionally to fitness with the best-ever
//! individual kept in slot 0, crossed over in adjacent pairs and mutated
//! with Gaussian noise scaled by each parameter's step.
//!
//! ```
//! use stickcount_evolve::{GeneticSearch, Individual, Parameter, SearchParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let params = SearchParams {
//!     population_size: 10,
//!     target_fitness: 0.9,
//!     max_generations: Some(50),
//!     ..SearchParams::default()
//! };
//! let x = Parameter::new("x", 0.0, 1.0, 0.05)?;
//! let mut search = GeneticSearch::new(params, vec![x])?;
//! let outcome = search.run(&|ind: &Individual| ind.value(0).unwrap_or(0.0))?;
//! assert!(outcome.best_fitness <= 1.0);
//! # Ok(())
//! # }
//! ```

mod evaluator;
mod parameter;
mod params;
mod search;

pub use evaluator::{EvaluateError, Evaluator};
pub use parameter::{Individual, Parameter, ParameterError};
pub use params::{SearchError, SearchParams};
pub use search::{run, GeneticSearch, SearchOutcome};
