use log::info;
use stickcount_evolve::GeneticSearch;

use crate::evaluator::{CountAccuracyEvaluator, LabeledSample};
use crate::io::{CalibrationConfig, CalibrationReport};
use crate::pipeline::CalibrationError;

/// Search the configured parameters for the best count accuracy on
/// `samples`.
///
/// Without `config.search.max_generations` the run only ends once the
/// target fitness is reached.
pub fn calibrate(
    config: &CalibrationConfig,
    samples: Vec<LabeledSample>,
) -> Result<CalibrationReport, CalibrationError> {
    let num_samples = samples.len();
    let evaluator = CountAccuracyEvaluator::new(
        samples,
        config.pipeline.clone(),
        &config.parameters,
        config.tolerance,
    )?;
    let mut search = GeneticSearch::new(config.search.clone(), config.parameters.clone())?;

    info!(
        "calibrating {} parameters on {} samples (population {}, target {:.3})",
        config.parameters.len(),
        num_samples,
        config.search.population_size,
        config.search.target_fitness
    );
    let outcome = search.run(&evaluator)?;
    let pipeline = evaluator.pipeline_params(&outcome.best)?;
    info!(
        "best fitness {:.3} after {} generations: {}",
        outcome.best_fitness, outcome.generations, outcome.best
    );

    Ok(CalibrationReport {
        best: outcome.best,
        best_fitness: outcome.best_fitness,
        generations: outcome.generations,
        reached_target: outcome.reached_target,
        pipeline,
        num_samples,
    })
}
