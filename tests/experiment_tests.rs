// tests/experiment_tests.rs

// End-to-end runs on the local backends, plus configuration loading and the
// saved results file.
use vermicular::{
    Experiment, ExperimentConfig, Platform, Ratio, SearchError, StateVectorBackend, TargetFragment,
};

use chrono::{Local, TimeZone};
use std::fs;

fn ideal_outcome(seed: u64, shots: usize) -> Result<vermicular::ExperimentOutcome, SearchError> {
    let experiment = Experiment::new(ExperimentConfig { shots: Some(shots), seed, ..Default::default() })?;
    let mut backend = StateVectorBackend::with_seed(seed);
    experiment.run(&mut backend)
}

#[test]
fn test_ideal_simulator_reference_scenario() -> Result<(), SearchError> {
    let outcome = ideal_outcome(11, 4000)?;

    // One round on two units is exact, pulses or not.
    assert_eq!(outcome.augmented.stage_rates(), vec![1.0, 1.0, 1.0]);
    assert_eq!(outcome.summary.augmented_total(), 1.0);

    // The baseline's first stage is exact; the later two overshoot with
    // two rounds and land on the target a quarter of the time.
    let rates = outcome.baseline.stage_rates();
    assert_eq!(rates[0], 1.0);
    for rate in &rates[1..] {
        assert!((rate - 0.25).abs() < 0.05, "rate {} too far from 0.25", rate);
    }
    assert!(matches!(outcome.summary.overall(), Ratio::Finite(v) if v > 8.0));
    Ok(())
}

#[test]
fn test_same_seed_same_outcome() -> Result<(), SearchError> {
    let first = ideal_outcome(3, 500)?;
    let second = ideal_outcome(3, 500)?;
    assert_eq!(first.baseline.stage_rates(), second.baseline.stage_rates());
    assert_eq!(first.summary.baseline_total(), second.summary.baseline_total());
    Ok(())
}

#[test]
fn test_emulated_hardware_degrades_rates() -> Result<(), SearchError> {
    let experiment = Experiment::new(ExperimentConfig {
        platform: Platform::Rigetti,
        shots: Some(2000),
        error_rate: Some(0.05),
        ..Default::default()
    })?;
    let mut backend = experiment.platform_backend()?;
    let outcome = experiment.run(&mut backend)?;

    assert_eq!(outcome.device, "Rigetti Ankaa-3");
    for rate in outcome.augmented.stage_rates() {
        assert!(rate < 1.0);
        assert!(rate > 0.3);
    }
    Ok(())
}

#[test]
fn test_results_document_layout() -> Result<(), SearchError> {
    let outcome = ideal_outcome(5, 100)?;
    let created = Local
        .with_ymd_and_hms(2025, 3, 14, 15, 9, 26)
        .single()
        .expect("unambiguous local time");
    let document = outcome.document(created)?;
    assert_eq!(document.file_name(), "vermicular_demo_results_simulator_20250314_150926.json");

    let dir = tempfile::tempdir()?;
    let path = document.save_in(dir.path())?;
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;

    assert_eq!(value["targets"][0], serde_json::json!(["Alpha", "00"]));
    assert_eq!(value["targets"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["results"]["vermicular"]["stages"], serde_json::json!([1.0, 1.0, 1.0]));
    assert_eq!(value["results"]["vermicular"]["total"], serde_json::json!(1.0));
    assert_eq!(value["results"]["standard"]["iterations"], serde_json::json!([1, 2, 2]));
    assert_eq!(value["results"]["standard"]["depths"], serde_json::json!([16, 22, 26]));
    assert!(value["improvement_factor"].is_number() || value["improvement_factor"].is_null());
    Ok(())
}

#[test]
fn test_config_from_json_file() -> Result<(), SearchError> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("experiment.json");
    fs::write(
        &path,
        r#"{
            "platform": "iqm",
            "shots": 64,
            "seed": 9,
            "targets": [
                { "name": "Delta", "pattern": "01" },
                { "name": "Epsilon", "pattern": "10" }
            ]
        }"#,
    )?;

    let config = ExperimentConfig::from_json(&path)?;
    assert_eq!(config.platform, Platform::Iqm);
    assert_eq!(config.effective_shots(), 64);
    assert_eq!(config.circuit_count(), 4);
    assert!((config.estimated_cost() - 64.0 * 0.00035 * 4.0).abs() < 1e-12);

    let experiment = Experiment::new(config)?;
    assert_eq!(experiment.catalog().targets()[1], TargetFragment::parse("Epsilon", "10")?);
    Ok(())
}

#[test]
fn test_config_rejects_bad_pattern() -> Result<(), SearchError> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{ "targets": [ { "name": "X", "pattern": "0a" } ] }"#)?;
    assert!(matches!(ExperimentConfig::from_json(&path), Err(SearchError::Json(_))));
    Ok(())
}
