//! The command line end to end, minus process spawning

use ccsim::cli::{run, Cli, CliError};
use clap::Parser;
use std::fs;

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("ccsim").chain(args.iter().copied())).unwrap()
}

fn run_to_string(cli: &Cli) -> Result<String, CliError> {
    let mut out = Vec::new();
    run(cli, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn default_run_prints_three_scenarios() {
    let out = run_to_string(&cli(&["--seed", "42"])).unwrap();
    assert!(out.starts_with("\nScenario A (3 agents, 10 min avg service)\n"));
    assert_eq!(out.matches("Average Wait Time: ").count(), 3);
    assert!(out.contains("Scenario C (3 agents, 7 min avg service)"));
}

#[test]
fn same_seed_same_report() {
    let first = run_to_string(&cli(&["--seed", "5", "--stats"])).unwrap();
    let second = run_to_string(&cli(&["--seed", "5", "--stats"])).unwrap();
    assert_eq!(first, second);
}

#[test]
fn writes_json_and_charts() {
    let dir = tempfile::tempdir().unwrap();
    let json = dir.path().join("results.json");
    let charts = dir.path().join("charts");
    let args = [
        "--seed",
        "1",
        "--horizon",
        "120",
        "--json",
        json.to_str().unwrap(),
        "--charts",
        charts.to_str().unwrap(),
    ];
    run_to_string(&cli(&args)).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(value["params"]["horizon"], 120.0);
    assert_eq!(value["results"].as_array().map(Vec::len), Some(3));
    assert_eq!(fs::read_dir(&charts).unwrap().count(), 3);
}

#[test]
fn reads_scenarios_from_a_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("study.json");
    fs::write(
        &path,
        r#"{
            "horizon": 60.0,
            "seed": 3,
            "scenarios": [
                { "label": "Night shift", "server_count": 1, "mean_service_time": 4.0 }
            ]
        }"#,
    )
    .unwrap();

    let out = run_to_string(&cli(&["--config", path.to_str().unwrap()])).unwrap();
    assert!(out.starts_with("\nNight shift\n"));
    assert_eq!(out.matches("Average Wait Time: ").count(), 1);
}

#[test]
fn replications_are_summarized() {
    let out = run_to_string(&cli(&["--seed", "2", "--horizon", "60", "--replications", "4"])).unwrap();
    assert_eq!(out.matches("(4 replications, seeds 2..6)").count(), 3);
}

#[test]
fn unknown_histogram_scenario_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let args = [
        "--charts",
        dir.path().to_str().unwrap(),
        "--histogram-scenario",
        "Scenario Z",
    ];
    let err = run_to_string(&cli(&args)).unwrap_err();
    assert!(matches!(err, CliError::Visualization(_)));
    // rejected before anything ran
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn invalid_configuration_fails() {
    let err = run_to_string(&cli(&["--inter-arrival-mean", "0"])).unwrap_err();
    assert!(matches!(err, CliError::Simulation(_)));
}
