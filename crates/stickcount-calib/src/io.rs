//! JSON configuration and report files for calibration runs.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use stickcount_evolve::{Individual, Parameter, SearchParams};

use crate::pipeline::PipelineParams;

#[derive(thiserror::Error, Debug)]
pub enum CalibIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn default_parameters() -> Vec<Parameter> {
    vec![
        Parameter {
            name: "vote_threshold".to_string(),
            start: 50.0,
            end: 150.0,
            step: 2.0,
            value: 50.0,
        },
        Parameter {
            name: "cluster_distance".to_string(),
            start: 0.005,
            end: 0.03,
            step: 0.001,
            value: 0.005,
        },
    ]
}

fn default_tolerance() -> usize {
    1
}

/// Everything a calibration run needs apart from the labeled samples.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    #[serde(default)]
    pub search: SearchParams,
    /// Searched parameters; names must be [`crate::Tunable`] names.
    #[serde(default = "default_parameters")]
    pub parameters: Vec<Parameter>,
    /// Values of every pipeline field that is not searched.
    #[serde(default)]
    pub pipeline: PipelineParams,
    /// Largest accepted difference between predicted and expected counts.
    #[serde(default = "default_tolerance")]
    pub tolerance: usize,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            search: SearchParams::default(),
            parameters: default_parameters(),
            pipeline: PipelineParams::default(),
            tolerance: default_tolerance(),
        }
    }
}

impl CalibrationConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CalibIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), CalibIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Outcome of a calibration run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub best: Individual,
    pub best_fitness: f64,
    pub generations: usize,
    pub reached_target: bool,
    /// Pipeline settings with the best values applied.
    pub pipeline: PipelineParams,
    pub num_samples: usize,
}

impl CalibrationReport {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CalibIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), CalibIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
