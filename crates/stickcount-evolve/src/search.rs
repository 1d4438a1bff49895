use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::evaluator::{EvaluateError, Evaluator};
use crate::parameter::{Individual, Parameter};
use crate::params::{SearchError, SearchParams};

/// Result of a finished search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Best individual seen over the whole run.
    pub best: Individual,
    pub best_fitness: f64,
    /// Number of select/crossover/mutate rounds performed.
    pub generations: usize,
    pub reached_target: bool,
}

/// Generational genetic search with fitness-proportionate selection,
/// uniform crossover, Gaussian mutation and persistent elitism.
///
/// A single seeded RNG drives initialization and every generational
/// operator; evaluation never touches it, so a run is reproducible from
/// `SearchParams::seed` alone.
#[derive(Debug)]
pub struct GeneticSearch {
    params: SearchParams,
    rng: StdRng,
    population: Vec<Individual>,
    fitness: Vec<f64>,
    best: Option<(Individual, f64)>,
    generation: usize,
}

impl GeneticSearch {
    /// Build the initial population: every individual gets its own copy of
    /// `prototypes` with values drawn uniformly from their bounds.
    pub fn new(params: SearchParams, prototypes: Vec<Parameter>) -> Result<Self, SearchError> {
        params.validate()?;
        if prototypes.is_empty() {
            return Err(SearchError::NoParameters);
        }
        for p in &prototypes {
            p.validate()?;
        }

        let mut rng = StdRng::seed_from_u64(params.seed);
        let population = (0..params.population_size)
            .map(|_| {
                let mut individual = Individual::new(prototypes.clone());
                for p in individual.parameters_mut() {
                    p.initialize(&mut rng);
                }
                individual
            })
            .collect();

        Ok(Self {
            fitness: vec![0.0; params.population_size],
            params,
            rng,
            population,
            best: None,
            generation: 0,
        })
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    /// Fitness of the current population from the last evaluation.
    pub fn fitness(&self) -> &[f64] {
        &self.fitness
    }

    /// Best-ever individual and its fitness, once anything was evaluated.
    pub fn best(&self) -> Option<(&Individual, f64)> {
        self.best.as_ref().map(|(ind, f)| (ind, *f))
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Score every individual and update the best-ever record. A later
    /// individual only replaces the record with a strictly greater fitness.
    pub fn evaluate<E: Evaluator + ?Sized>(&mut self, evaluator: &E) -> Result<(), SearchError> {
        #[cfg(feature = "rayon")]
        let scores: Vec<Result<f64, EvaluateError>> = self
            .population
            .par_iter()
            .map(|individual| evaluator.evaluate(individual))
            .collect();

        #[cfg(not(feature = "rayon"))]
        let scores: Vec<Result<f64, EvaluateError>> = self
            .population
            .iter()
            .map(|individual| evaluator.evaluate(individual))
            .collect();

        for (index, score) in scores.into_iter().enumerate() {
            let value = score.map_err(|source| SearchError::Evaluation { index, source })?;
            if !value.is_finite() || value < 0.0 {
                return Err(SearchError::InvalidFitness { index, value });
            }
            self.fitness[index] = value;
        }

        for (index, &value) in self.fitness.iter().enumerate() {
            if self.best.as_ref().map_or(true, |(_, best)| value > *best) {
                debug!(
                    "generation {}: new best {:.4} ({})",
                    self.generation, value, self.population[index]
                );
                self.best = Some((self.population[index].clone(), value));
            }
        }
        Ok(())
    }

    /// Fitness-proportionate resampling. Slot 0 receives the best-ever
    /// individual; a draw landing exactly on a bucket boundary goes to the
    /// lower bucket, and an all-zero generation resolves every draw to 0.
    pub fn select(&mut self) {
        let n = self.population.len();
        let mut cumulative = Vec::with_capacity(n + 1);
        cumulative.push(0.0);
        let mut total = 0.0;
        for &f in &self.fitness {
            total += f;
            cumulative.push(total);
        }

        let mut next = Vec::with_capacity(n);
        next.push(match &self.best {
            Some((individual, _)) => individual.clone(),
            None => self.population[0].clone(),
        });
        for _ in 1..n {
            let u: f64 = self.rng.gen();
            let index = bucket_of(&cumulative, u * total).min(n - 1);
            next.push(self.population[index].clone());
        }
        self.population = next;
    }

    /// Uniform crossover over adjacent pairs. With an odd population the
    /// last individual has no partner.
    pub fn crossover(&mut self) {
        let crossover_rate = self.params.crossover_rate;
        let swap_probability = self.params.swap_probability;
        for pair in self.population.chunks_exact_mut(2) {
            if self.rng.gen::<f64>() >= crossover_rate {
                continue;
            }
            let (left, right) = pair.split_at_mut(1);
            let a = left[0].parameters_mut();
            let b = right[0].parameters_mut();
            for (pa, pb) in a.iter_mut().zip(b.iter_mut()) {
                if self.rng.gen::<f64>() < swap_probability {
                    std::mem::swap(&mut pa.value, &mut pb.value);
                }
            }
        }
    }

    /// Mutate each parameter with probability `1 / parameter_count`.
    pub fn mutate(&mut self) {
        for individual in &mut self.population {
            let rate = 1.0 / individual.len() as f64;
            for p in individual.parameters_mut() {
                if self.rng.gen::<f64>() < rate {
                    p.mutate(&mut self.rng);
                }
            }
        }
    }

    /// One full generation: select, crossover, mutate, evaluate.
    pub fn step<E: Evaluator + ?Sized>(&mut self, evaluator: &E) -> Result<(), SearchError> {
        self.select();
        self.crossover();
        self.mutate();
        self.generation += 1;
        self.evaluate(evaluator)
    }

    /// Evaluate, then iterate generations until the best-ever fitness
    /// reaches the target or `max_generations` is hit.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, evaluator),
            fields(population = self.params.population_size, seed = self.params.seed)
        )
    )]
    pub fn run<E: Evaluator + ?Sized>(&mut self, evaluator: &E) -> Result<SearchOutcome, SearchError> {
        self.evaluate(evaluator)?;
        loop {
            let best_fitness = self.best_fitness();
            if best_fitness >= self.params.target_fitness {
                info!(
                    "target {:.4} reached after {} generations",
                    self.params.target_fitness, self.generation
                );
                return Ok(self.outcome(true));
            }
            if self
                .params
                .max_generations
                .is_some_and(|max| self.generation >= max)
            {
                info!(
                    "stopping after {} generations; best fitness {:.4} below target {:.4}",
                    self.generation, best_fitness, self.params.target_fitness
                );
                return Ok(self.outcome(false));
            }
            info!("generation {}: best fitness {:.4}", self.generation, best_fitness);
            self.step(evaluator)?;
        }
    }

    fn best_fitness(&self) -> f64 {
        self.best.as_ref().map_or(f64::NEG_INFINITY, |(_, f)| *f)
    }

    fn outcome(&self, reached_target: bool) -> SearchOutcome {
        let (best, best_fitness) = match &self.best {
            Some((individual, fitness)) => (individual.clone(), *fitness),
            None => (self.population[0].clone(), 0.0),
        };
        SearchOutcome {
            best,
            best_fitness,
            generations: self.generation,
            reached_target,
        }
    }
}

/// First bucket `k` with `value <= cumulative[k + 1]`.
fn bucket_of(cumulative: &[f64], value: f64) -> usize {
    cumulative[1..].partition_point(|&upper| upper < value)
}

/// Run a search with default operator settings and return the best
/// individual. Loops until `target_fitness` is reached.
pub fn run<E: Evaluator + ?Sized>(
    population_size: usize,
    target_fitness: f64,
    evaluator: &E,
    initial_parameters: &[Parameter],
) -> Result<Individual, SearchError> {
    let params = SearchParams {
        population_size,
        target_fitness,
        ..SearchParams::default()
    };
    let mut search = GeneticSearch::new(params, initial_parameters.to_vec())?;
    Ok(search.run(evaluator)?.best)
}
