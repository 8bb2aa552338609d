//! End-to-End Pipeline Integration Test
//!
//! Runs population, networks, simulation, spillover and contagion detection
//! from one configuration and checks the stages line up.

use agora_core::{AgoraError, ReturnSeries};
use agora_runner::{ContagionPipeline, PipelineConfig, PipelineError, load_config_from_str};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Gaussian external returns with a fixed seed
fn external_returns(n_periods: usize, n_assets: usize) -> ReturnSeries {
    let mut rng = StdRng::seed_from_u64(7);
    let normal = Normal::new(0.0, 0.01).unwrap();
    let rows = (0..n_periods)
        .map(|_| (0..n_assets).map(|_| normal.sample(&mut rng)).collect())
        .collect();
    ReturnSeries::from_rows(rows).unwrap()
}

fn small_config() -> PipelineConfig {
    load_config_from_str(
        r#"{
            "seed": 11,
            "population": {"n_agents": 40, "n_assets": 3},
            "simulation": {"n_periods": 80},
            "spillover": {"window_size": 15}
        }"#,
    )
    .unwrap()
}

#[test]
fn test_stages_line_up() {
    init_logger();
    let pipeline = ContagionPipeline::new(small_config()).unwrap();
    let report = pipeline.run(&external_returns(80, 3)).unwrap();

    assert_eq!(report.population.n_agents, 40);
    assert!(report.network.is_some());
    assert_eq!(report.simulation.n_periods(), 80);

    let n_windows = 80 - 15 + 1;
    assert_eq!(report.spillover.len(), n_windows);
    assert_eq!(report.spillover_summary.n_windows, n_windows);
    assert_eq!(report.market_returns.len(), n_windows);
    assert_eq!(report.contagion.n_periods, n_windows);

    for window in &report.spillover.windows {
        assert!((0..3).all(|i| window.matrix[i][i] == 0.0));
        assert!((0.0..=100.0).contains(&window.total_spillover));
    }
    for episode in &report.contagion.episodes {
        assert!((episode.start..=episode.end).all(|t| report.contagion.votes[t] >= 2));
    }
    assert!((0.0..=1.0).contains(&report.contagion.contagion_fraction()));
}

#[test]
fn test_same_seed_same_report() {
    init_logger();
    let returns = external_returns(80, 3);
    let first = ContagionPipeline::new(small_config())
        .unwrap()
        .run(&returns)
        .unwrap();
    let second = ContagionPipeline::new(small_config())
        .unwrap()
        .run(&returns)
        .unwrap();
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn test_without_network_effects() {
    init_logger();
    let mut config = small_config();
    config.simulation.network_effects = false;
    let report = ContagionPipeline::new(config)
        .unwrap()
        .run(&external_returns(80, 3))
        .unwrap();
    assert!(report.network.is_none());
}

#[test]
fn test_too_few_assets_in_returns() {
    init_logger();
    let pipeline = ContagionPipeline::new(small_config()).unwrap();
    let err = pipeline.run(&external_returns(80, 2)).unwrap_err();
    assert!(matches!(err, PipelineError::Agora(AgoraError::DataShape(_))));
}

#[test]
fn test_report_written_as_json() {
    init_logger();
    let report = ContagionPipeline::new(small_config())
        .unwrap()
        .run(&external_returns(80, 3))
        .unwrap();

    let path = std::env::temp_dir().join("agora_runner_report.json");
    report.write_json(&path).unwrap();
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(written["seed"], 11);
    assert!(written["contagion"]["votes"].is_array());
    assert!(written["spillover_summary"]["n_windows"].is_number());
}
