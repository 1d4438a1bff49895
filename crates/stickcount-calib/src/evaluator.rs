use std::cell::RefCell;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use stickcount_core::EdgeMask;
use stickcount_evolve::{EvaluateError, Evaluator, Individual, Parameter};
use stickcount_hough::HoughWorkspace;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::pipeline::{count_objects_with_workspace, CalibrationError, PipelineParams};
use crate::tunable::Tunable;

/// An edge mask with its hand-counted number of objects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    pub mask: EdgeMask,
    pub expected: usize,
}

impl LabeledSample {
    pub fn new(mask: EdgeMask, expected: usize) -> Self {
        Self { mask, expected }
    }
}

/// Masks denser than this are more likely a failed edge detection than a
/// pile of sticks.
const MAX_EDGE_FRACTION: f64 = 0.5;

fn implausible_edge_fraction(fraction: f64) -> bool {
    fraction == 0.0 || fraction > MAX_EDGE_FRACTION
}

thread_local! {
    // One accumulator per evaluation thread, reused across samples and
    // generations.
    static WORKSPACE: RefCell<HoughWorkspace> = RefCell::new(HoughWorkspace::new());
}

/// Scores an individual by the share of samples whose predicted count lies
/// within `tolerance` of the label.
///
/// Search parameters bind to pipeline fields by name (see [`Tunable`]);
/// fields without a parameter keep their value from `base`.
#[derive(Clone, Debug)]
pub struct CountAccuracyEvaluator {
    samples: Vec<LabeledSample>,
    base: PipelineParams,
    bindings: Vec<Tunable>,
    tolerance: usize,
}

impl CountAccuracyEvaluator {
    pub fn new(
        samples: Vec<LabeledSample>,
        base: PipelineParams,
        parameters: &[Parameter],
        tolerance: usize,
    ) -> Result<Self, CalibrationError> {
        if samples.is_empty() {
            return Err(CalibrationError::EmptyDataset);
        }
        let bindings = parameters
            .iter()
            .map(|p| p.name.parse::<Tunable>())
            .collect::<Result<Vec<_>, _>>()?;

        for (index, sample) in samples.iter().enumerate() {
            let fraction = sample.mask.edge_fraction();
            if implausible_edge_fraction(fraction) {
                warn!(
                    "sample {index} ({}x{}, expected {}) has edge fraction {fraction:.3}",
                    sample.mask.width(),
                    sample.mask.height(),
                    sample.expected
                );
            }
        }

        Ok(Self {
            samples,
            base,
            bindings,
            tolerance,
        })
    }

    pub fn samples(&self) -> &[LabeledSample] {
        &self.samples
    }

    pub fn tolerance(&self) -> usize {
        self.tolerance
    }

    /// Pipeline settings an individual stands for.
    pub fn pipeline_params(&self, individual: &Individual) -> Result<PipelineParams, CalibrationError> {
        if individual.len() != self.bindings.len() {
            return Err(CalibrationError::ParameterCount {
                expected: self.bindings.len(),
                got: individual.len(),
            });
        }
        let mut params = self.base.clone();
        for (tunable, p) in self.bindings.iter().zip(individual.parameters()) {
            tunable.apply(p.value, &mut params);
        }
        Ok(params)
    }

    /// Fraction of samples counted within tolerance under `params`.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(samples = self.samples.len()))
    )]
    pub fn accuracy(&self, params: &PipelineParams) -> Result<f64, CalibrationError> {
        WORKSPACE.with(|workspace| -> Result<f64, CalibrationError> {
            let mut workspace = workspace.borrow_mut();
            let mut hits = 0usize;
            for sample in &self.samples {
                let count = count_objects_with_workspace(&sample.mask, params, &mut workspace)?;
                if count.abs_diff(sample.expected) <= self.tolerance {
                    hits += 1;
                }
            }
            let accuracy = hits as f64 / self.samples.len() as f64;
            debug!(
                "vote_threshold {} cluster_distance {:.4}: {hits}/{} within {} -> {accuracy:.3}",
                params.hough.vote_threshold,
                params.cluster.max_distance_in_cluster,
                self.samples.len(),
                self.tolerance
            );
            Ok(accuracy)
        })
    }
}

impl Evaluator for CountAccuracyEvaluator {
    fn evaluate(&self, individual: &Individual) -> Result<f64, EvaluateError> {
        self.pipeline_params(individual)
            .and_then(|params| self.accuracy(&params))
            .map_err(EvaluateError::other)
    }
}
