use stickcount_calib::{
    calibrate, count_objects, CalibrationConfig, CalibrationError, CalibrationReport,
    LabeledSample, PipelineParams,
};
use stickcount_core::EdgeMask;
use stickcount_evolve::{Parameter, SearchParams};
use stickcount_hough::HoughParams;

fn sticks(xs: &[usize]) -> EdgeMask {
    EdgeMask::from_fn(80, 60, |x, _| xs.contains(&x))
}

fn dataset() -> Vec<LabeledSample> {
    vec![
        LabeledSample::new(sticks(&[15]), 1),
        LabeledSample::new(sticks(&[15, 40]), 2),
        LabeledSample::new(sticks(&[15, 40, 65]), 3),
        LabeledSample::new(sticks(&[30, 60]), 2),
    ]
}

fn config() -> CalibrationConfig {
    CalibrationConfig {
        search: SearchParams {
            population_size: 10,
            max_generations: Some(30),
            ..SearchParams::default()
        },
        parameters: vec![Parameter::new("vote_threshold", 20.0, 80.0, 2.0).unwrap()],
        pipeline: PipelineParams {
            hough: HoughParams {
                max_width: 0.0,
                maxima_radius: 5,
                ..HoughParams::default()
            },
            ..PipelineParams::default()
        },
        tolerance: 0,
    }
}

#[test]
fn finds_a_working_vote_threshold() {
    let report = calibrate(&config(), dataset()).unwrap();
    assert!(report.reached_target);
    assert_eq!(report.best_fitness, 1.0);
    assert_eq!(report.num_samples, 4);
    assert!(report.pipeline.hough.vote_threshold < 60);

    for sample in dataset() {
        assert_eq!(
            count_objects(&sample.mask, &report.pipeline).unwrap(),
            sample.expected
        );
    }
}

#[test]
fn report_round_trips_through_file() {
    let report = calibrate(&config(), dataset()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    report.write_json(&path).unwrap();
    assert_eq!(CalibrationReport::load_json(&path).unwrap(), report);
}

#[test]
fn config_file_drives_a_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calib.json");
    config().write_json(&path).unwrap();
    let loaded = CalibrationConfig::load_json(&path).unwrap();
    let report = calibrate(&loaded, dataset()).unwrap();
    assert_eq!(report, calibrate(&config(), dataset()).unwrap());
}

#[test]
fn unknown_parameter_fails_before_searching() {
    let mut bad = config();
    bad.parameters.push(Parameter::new("canny_low", 0.0, 1.0, 0.1).unwrap());
    assert!(matches!(
        calibrate(&bad, dataset()),
        Err(CalibrationError::UnknownTunable(name)) if name == "canny_low"
    ));
}

#[test]
fn empty_dataset_is_rejected() {
    assert!(matches!(
        calibrate(&config(), Vec::new()),
        Err(CalibrationError::EmptyDataset)
    ));
}
