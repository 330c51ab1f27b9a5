// tests/sequencer_tests.rs

// Drives the sequencer and the comparison with scripted backends, so the
// expected rates are exact and independent of sampling.
use vermicular::{
    AlgorithmRun, BitPattern, ExecutionBackend, Experiment, ExperimentConfig, MeasurementSet,
    Ratio, SearchCircuit, SearchError, StageSequencer, Strategy, TargetCatalog, TargetFragment,
    compare, plan_pass,
};

use std::collections::VecDeque;

// Answers each submission from a script of (target, hits). The remaining
// shots land on the target's complement.
struct ScriptedBackend {
    script: VecDeque<(BitPattern, usize)>,
    depths: Vec<usize>,
}

impl ScriptedBackend {
    fn new(script: Vec<(&str, usize)>) -> Self {
        let script = script
            .into_iter()
            .map(|(p, hits)| (p.parse().expect("valid pattern"), hits))
            .collect();
        Self { script, depths: Vec::new() }
    }

    // Every stage of both passes finds its target on every shot.
    fn perfect(catalog: &TargetCatalog, shots: usize) -> Self {
        let mut script = VecDeque::new();
        for _ in Strategy::ALL {
            for target in catalog {
                script.push_back((target.pattern().clone(), shots));
            }
        }
        Self { script, depths: Vec::new() }
    }
}

fn complement(pattern: &BitPattern) -> BitPattern {
    BitPattern::from_bits(pattern.bits().iter().map(|b| !b).collect())
}

impl ExecutionBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    fn submit(&mut self, circuit: SearchCircuit, shots: usize) -> Result<MeasurementSet, SearchError> {
        self.depths.push(circuit.depth());
        let (target, hits) = self.script.pop_front().ok_or_else(|| SearchError::Backend {
            message: "script exhausted".to_string(),
        })?;
        let mut set = MeasurementSet::new(circuit.units());
        set.record_many(complement(&target), shots - hits)?;
        set.record_many(target, hits)?;
        Ok(set)
    }
}

// Fails every submission and counts how often it was asked.
struct FailingBackend {
    calls: usize,
}

impl ExecutionBackend for FailingBackend {
    fn name(&self) -> &str {
        "failing"
    }

    fn submit(&mut self, _circuit: SearchCircuit, _shots: usize) -> Result<MeasurementSet, SearchError> {
        self.calls += 1;
        Err(SearchError::Backend { message: "device offline".to_string() })
    }
}

#[test]
fn test_perfect_backend_gives_unit_rates_and_ratios() -> Result<(), SearchError> {
    let catalog = TargetCatalog::reference();
    let mut backend = ScriptedBackend::perfect(&catalog, 100);
    let mut sequencer = StageSequencer::new(&mut backend, 100)?;

    let baseline = sequencer.run(Strategy::Baseline, &catalog)?;
    let augmented = sequencer.run(Strategy::Augmented, &catalog)?;
    let summary = compare(&baseline, &augmented)?;

    assert_eq!(baseline.stage_rates(), vec![1.0, 1.0, 1.0]);
    assert_eq!(augmented.stage_rates(), vec![1.0, 1.0, 1.0]);
    assert_eq!(summary.baseline_total(), 1.0);
    assert_eq!(summary.augmented_total(), 1.0);
    assert_eq!(summary.overall(), Ratio::Finite(1.0));
    for row in summary.stages() {
        assert_eq!(row.ratio, Ratio::Finite(1.0));
    }
    Ok(())
}

#[test]
fn test_baseline_iterations_adapt_to_accumulated_depth() -> Result<(), SearchError> {
    let catalog = TargetCatalog::reference();
    let mut backend = ScriptedBackend::perfect(&catalog, 10);
    let baseline = StageSequencer::new(&mut backend, 10)?.run(Strategy::Baseline, &catalog)?;

    let iterations: Vec<usize> = baseline.stages().iter().map(|s| s.iterations()).collect();
    let depths: Vec<usize> = baseline.stages().iter().map(|s| s.depth()).collect();
    // Alpha "00" needs 16 operations with one round; after that the
    // threshold is passed and Beta "11" and Gamma "10" get two rounds.
    assert_eq!(iterations, vec![1, 2, 2]);
    assert_eq!(depths, vec![16, 2 + 2 * 10, 2 + 2 * 12]);
    assert_eq!(baseline.cumulative_depth(), 16 + 22 + 26);
    assert_eq!(backend.depths, depths);
    Ok(())
}

#[test]
fn test_augmented_always_uses_one_round_with_pulses() -> Result<(), SearchError> {
    let catalog = TargetCatalog::reference();
    let mut backend = ScriptedBackend::perfect(&catalog, 10);
    let augmented = StageSequencer::new(&mut backend, 10)?.run(Strategy::Augmented, &catalog)?;

    let iterations: Vec<usize> = augmented.stages().iter().map(|s| s.iterations()).collect();
    let depths: Vec<usize> = augmented.stages().iter().map(|s| s.depth()).collect();
    assert_eq!(iterations, vec![1, 1, 1]);
    assert_eq!(depths, vec![16 + 8, 12 + 8, 14 + 8]);
    Ok(())
}

#[test]
fn test_submitted_circuits_follow_the_plan() -> Result<(), SearchError> {
    let catalog = TargetCatalog::reference();
    for strategy in Strategy::ALL {
        let plan = plan_pass(strategy, &catalog)?;
        let mut backend = ScriptedBackend::perfect(&catalog, 10);
        let run = StageSequencer::new(&mut backend, 10)?.run(strategy, &catalog)?;

        let planned: Vec<usize> = plan.iter().map(|p| p.circuit.depth()).collect();
        assert_eq!(backend.depths, planned);
        let iterations: Vec<usize> = run.stages().iter().map(|s| s.iterations()).collect();
        assert_eq!(iterations, plan.iter().map(|p| p.iterations).collect::<Vec<_>>());
    }
    Ok(())
}

#[test]
fn test_product_rule_and_unbounded_ratio() -> Result<(), SearchError> {
    let catalog = TargetCatalog::new(vec![
        TargetFragment::parse("Alpha", "00")?,
        TargetFragment::parse("Beta", "11")?,
    ])?;
    // baseline: 50%, 0%; augmented: 60%, 100%
    let mut backend = ScriptedBackend::new(vec![("00", 5), ("11", 0), ("00", 6), ("11", 10)]);
    let mut sequencer = StageSequencer::new(&mut backend, 10)?;
    let baseline = sequencer.run(Strategy::Baseline, &catalog)?;
    let augmented = sequencer.run(Strategy::Augmented, &catalog)?;

    assert_eq!(baseline.total_success(), 0.0);
    assert!((augmented.total_success() - 0.6).abs() < 1e-12);

    let summary = compare(&baseline, &augmented)?;
    assert_eq!(summary.stages()[1].ratio, Ratio::Unbounded);
    assert!(summary.stages()[0].ratio.value().is_some_and(|v| (v - 1.2).abs() < 1e-12));
    assert_eq!(summary.overall(), Ratio::Unbounded);
    assert!(summary.to_string().contains('∞'));
    Ok(())
}

#[test]
fn test_backend_failure_aborts_without_retry() -> Result<(), SearchError> {
    let catalog = TargetCatalog::reference();
    let mut backend = FailingBackend { calls: 0 };
    let result = StageSequencer::new(&mut backend, 10)?.run(Strategy::Baseline, &catalog);

    assert!(matches!(result, Err(SearchError::Backend { .. })));
    assert_eq!(backend.calls, 1);
    Ok(())
}

// Answers every request with a fixed number of shots.
struct ShortBackend(ScriptedBackend);

impl ExecutionBackend for ShortBackend {
    fn name(&self) -> &str {
        "short"
    }

    fn submit(&mut self, circuit: SearchCircuit, _shots: usize) -> Result<MeasurementSet, SearchError> {
        self.0.submit(circuit, 10)
    }
}

#[test]
fn test_short_response_is_rejected() -> Result<(), SearchError> {
    let catalog = TargetCatalog::new(vec![TargetFragment::parse("Alpha", "01")?])?;
    let mut backend = ShortBackend(ScriptedBackend::new(vec![("01", 3)]));
    let result = StageSequencer::new(&mut backend, 20)?.run(Strategy::Augmented, &catalog);
    assert!(matches!(result, Err(SearchError::Backend { .. })));
    Ok(())
}

#[test]
fn test_mixed_width_catalog_fails_before_any_submission() {
    let mut backend = FailingBackend { calls: 0 };
    let config = ExperimentConfig {
        targets: vec![
            TargetFragment::parse("Alpha", "00").expect("valid"),
            TargetFragment::parse("Wide", "101").expect("valid"),
        ],
        ..Default::default()
    };

    let result = Experiment::new(config).and_then(|e| e.run(&mut backend));
    assert!(matches!(result, Err(SearchError::Configuration { .. })));
    assert_eq!(backend.calls, 0);
}

#[test]
fn test_uniform_wrong_width_catalog_fails_before_any_submission() {
    for patterns in [vec!["101", "011"], vec!["10110011001100110011"]] {
        let mut backend = FailingBackend { calls: 0 };
        let targets = patterns
            .iter()
            .enumerate()
            .map(|(i, p)| TargetFragment::parse(format!("T{}", i), p).expect("valid"))
            .collect();
        let config = ExperimentConfig { targets, ..Default::default() };

        let result = Experiment::new(config).and_then(|e| e.run(&mut backend));
        assert!(matches!(result, Err(SearchError::Configuration { .. })), "patterns {:?}", patterns);
        assert_eq!(backend.calls, 0);
    }
}

#[test]
fn test_zero_shots_rejected() {
    let mut backend = FailingBackend { calls: 0 };
    assert!(matches!(
        StageSequencer::new(&mut backend, 0),
        Err(SearchError::Configuration { .. })
    ));
}

#[test]
fn test_compare_rejects_mismatched_runs() -> Result<(), SearchError> {
    let catalog = TargetCatalog::reference();
    let mut backend = ScriptedBackend::perfect(&catalog, 5);
    let mut sequencer = StageSequencer::new(&mut backend, 5)?;
    let baseline = sequencer.run(Strategy::Baseline, &catalog)?;

    assert!(compare(&baseline, &baseline).is_err());
    assert!(compare(&baseline, &AlgorithmRun::new(Strategy::Augmented)).is_err());
    Ok(())
}
