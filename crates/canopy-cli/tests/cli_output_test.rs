//! Integration tests for CLI output
//!
//! These run the `canopy` binary against the simulated provider only.

use std::process::{Command, Output};

fn canopy(args: &[&str]) -> Output {
    let workdir = tempfile::tempdir().expect("Failed to create temp dir");
    Command::new(env!("CARGO_BIN_EXE_canopy"))
        .args(args)
        .current_dir(workdir.path())
        .env("RUST_LOG", "error")
        .output()
        .expect("Failed to execute command")
}

fn json_stdout(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("Output should be valid JSON")
}

#[test]
fn test_index_json_output() {
    let output = canopy(&[
        "--json",
        "--seed",
        "7",
        "index",
        "--bounds",
        "-74.0,4.6,-73.9,4.7",
        "--start",
        "2024-01-01",
        "--end",
        "2024-01-31",
        "--provider",
        "simulated",
    ]);
    assert!(output.status.success(), "Command should succeed");

    let parsed = json_stdout(&output);
    assert_eq!(parsed["status"], "success");
    let mean = parsed["data"]["result"]["statistics"]["mean"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&mean));
    assert_eq!(parsed["data"]["provider"], "simulated");
}

#[test]
fn test_seeded_runs_are_repeatable() {
    let args = [
        "--json", "--seed", "21", "index", "--bounds", "10,45,10.05,45.05", "--start",
        "2023-05-01", "--end", "2023-05-31", "--index", "evi",
    ];
    let first = json_stdout(&canopy(&args));
    let second = json_stdout(&canopy(&args));
    assert_eq!(
        first["data"]["result"]["statistics"],
        second["data"]["result"]["statistics"]
    );
}

#[test]
fn test_analyze_json_output() {
    let output = canopy(&[
        "--json",
        "--seed",
        "3",
        "analyze",
        "--bounds",
        "-74.0,4.6,-73.9,4.7",
        "--start",
        "2023-06-01",
        "--analysis-date",
        "2024-06-01",
        "--providers",
        "simulated",
    ]);
    assert!(output.status.success(), "Command should succeed");

    let report = &json_stdout(&output)["data"];
    assert_eq!(report["success"], true);
    assert_eq!(report["analysis_period"]["monitoring_duration_days"], 366);
    assert_eq!(
        report["satellite_analysis"]["vegetation_monitoring"]["monitoring_available"],
        true
    );
}

#[test]
fn test_reversed_analysis_period_fails() {
    let output = canopy(&[
        "analyze",
        "--bounds",
        "-74.0,4.6,-73.9,4.7",
        "--start",
        "2024-06-01",
        "--analysis-date",
        "2024-01-01",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must be before analysis date"));
}

#[test]
fn test_providers_listing() {
    let output = canopy(&["--json", "providers"]);
    assert!(output.status.success());

    let rows = json_stdout(&output);
    let names: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|row| row["name"].as_str())
        .collect();
    assert_eq!(names, vec!["highres", "moderate", "simulated"]);
}

#[test]
fn test_config_reports_cli_source() {
    let output = canopy(&["--json", "--seed", "5", "config"]);
    assert!(output.status.success());

    let rows = json_stdout(&output);
    let seed = rows
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["key"] == "seed")
        .unwrap();
    assert_eq!(seed["value"], "5");
    assert_eq!(seed["source"], "Cli");
}

#[test]
fn test_synthesize_json_output() {
    let output = canopy(&["--json", "synthesize", "--ndvi", "0.7", "--latitude", "4.6"]);
    assert!(output.status.success());

    let synthesis = &json_stdout(&output)["data"];
    assert_eq!(synthesis["evi_estimated"], true);
    let lai = synthesis["lai"]["value"].as_f64().unwrap();
    assert!((0.1..=8.0).contains(&lai));
}
