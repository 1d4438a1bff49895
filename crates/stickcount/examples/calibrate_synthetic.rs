use std::{env, path::PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stickcount::evolve::{Parameter, SearchParams};
use stickcount::hough::HoughParams;
use stickcount::{calibrate, count_objects, CalibrationConfig, EdgeMask, LabeledSample, PipelineParams};

#[cfg(not(feature = "tracing"))]
use log::{info, warn};

#[cfg(feature = "tracing")]
use tracing::{info, warn};

#[cfg(feature = "tracing")]
use stickcount::core::init_tracing;
#[cfg(not(feature = "tracing"))]
use stickcount::core::init_from_env;

const WIDTH: usize = 120;
const HEIGHT: usize = 90;
const MIN_GAP: usize = 12;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(not(feature = "tracing"))]
    {
        let level = init_from_env()?;
        info!("logger initialized at {level}");
    }

    #[cfg(feature = "tracing")]
    init_tracing(false);

    run()
}

/// Usage: `calibrate_synthetic [config.json] [report.json]`.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "info"))]
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            info!("loading config from {path}");
            CalibrationConfig::load_json(path)?
        }
        None => default_config()?,
    };
    let report_path = args.next().map(PathBuf::from);

    let train = synthetic_samples(12, 7);
    let report = calibrate(&config, train)?;
    if !report.reached_target {
        warn!(
            "target {:.3} not reached, best {:.3}",
            config.search.target_fitness, report.best_fitness
        );
    }

    let held_out = synthetic_samples(8, 1234);
    let mut hits = 0;
    for (i, sample) in held_out.iter().enumerate() {
        let count = count_objects(&sample.mask, &report.pipeline)?;
        info!("held-out {i}: counted {count}, expected {}", sample.expected);
        if count == sample.expected {
            hits += 1;
        }
    }
    info!("held-out accuracy {hits}/{}", held_out.len());

    match report_path {
        Some(path) => {
            report.write_json(&path)?;
            info!("report written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn default_config() -> Result<CalibrationConfig, Box<dyn std::error::Error>> {
    Ok(CalibrationConfig {
        search: SearchParams {
            population_size: 16,
            max_generations: Some(40),
            ..SearchParams::default()
        },
        parameters: vec![
            Parameter::new("vote_threshold", 20.0, 100.0, 2.0)?,
            Parameter::new("cluster_distance", 0.005, 0.03, 0.001)?,
        ],
        pipeline: PipelineParams {
            hough: HoughParams {
                max_width: 0.0,
                maxima_radius: 5,
                ..HoughParams::default()
            },
            ..PipelineParams::default()
        },
        tolerance: 0,
    })
}

/// Masks with one to four vertical sticks at least `MIN_GAP` pixels apart.
fn synthetic_samples(n: usize, seed: u64) -> Vec<LabeledSample> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let wanted = rng.gen_range(1..=4);
            let mut xs: Vec<usize> = Vec::with_capacity(wanted);
            while xs.len() < wanted {
                let x = rng.gen_range(8..WIDTH - 8);
                if xs.iter().all(|&other| x.abs_diff(other) >= MIN_GAP) {
                    xs.push(x);
                }
            }
            LabeledSample::new(EdgeMask::from_fn(WIDTH, HEIGHT, |x, _| xs.contains(&x)), xs.len())
        })
        .collect()
}
