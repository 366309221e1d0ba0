//! End-to-end tests of the headless binary.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_microgrid-dash"))
        .args(args)
        .env("MICROGRID_LOG", "warn")
        .output()
        .expect("microgrid-dash process should run")
}

fn stdout_of(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        output.status.success(),
        "run failed for {args:?}: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout should be valid UTF-8")
}

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("microgrid-dash-{}-{name}", std::process::id()));
    fs::write(&path, contents).expect("temp file should be writable");
    path
}

#[test]
fn json_mode_prints_one_object_per_tick() {
    let stdout = stdout_of(&["--ticks", "5", "--json", "--start-hour", "12"]);
    let lines: Vec<Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line should be JSON"))
        .collect();
    assert_eq!(lines.len(), 5);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(line["tick"], i as u64 + 1);
        let soc = line["snapshot"]["storage"]["overallSOC"].as_f64().unwrap();
        assert!((20.0..=95.0).contains(&soc));
    }
    assert_eq!(lines[4]["chart"].as_array().unwrap().len(), 5);
}

#[test]
fn text_mode_prints_one_line_per_tick() {
    let stdout = stdout_of(&["--ticks", "3", "--start-hour", "8"]);
    assert_eq!(stdout.lines().count(), 3);
    assert!(stdout.lines().all(|l| l.contains("gen=") && l.contains("SOC=")));
}

#[test]
fn same_seed_same_output() {
    let args = ["--ticks", "8", "--json", "--seed", "11", "--start-hour", "6"];
    let a = stdout_of(&args);
    let b = stdout_of(&args);
    assert_eq!(a, b);
}

#[test]
fn every_preset_runs() {
    for preset in ["default", "overcast", "calm"] {
        let stdout = stdout_of(&["--preset", preset, "--ticks", "2", "--start-hour", "12"]);
        assert_eq!(stdout.lines().count(), 2, "preset {preset}");
    }
}

#[test]
fn unknown_preset_fails() {
    let output = run(&["--preset", "hurricane", "--ticks", "1"]);
    assert!(!output.status.success());
}

#[test]
fn config_file_is_loaded_and_validated() {
    let good = temp_file("good.toml", "[alerts]\nprobability = 0.0\n[chart]\nwindow = 3\n");
    let stdout = stdout_of(&[
        "--config",
        good.to_str().unwrap(),
        "--ticks",
        "4",
        "--json",
        "--start-hour",
        "12",
    ]);
    let last: Value = serde_json::from_str(stdout.lines().last().unwrap()).unwrap();
    assert_eq!(last["chart"].as_array().unwrap().len(), 3);
    assert!(last["snapshot"]["alerts"].as_array().unwrap().is_empty());

    let bad = temp_file("bad.toml", "[chart]\nwindow = 0\n");
    let output = run(&["--config", bad.to_str().unwrap(), "--ticks", "1"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("chart.window"));

    let _ = fs::remove_file(good);
    let _ = fs::remove_file(bad);
}

#[test]
fn apply_payload_renders_before_first_tick() {
    let payload = temp_file(
        "apply.json",
        r#"{"alerts":[{"id":7,"type":"warning","message":"Inverter fault","time":"07:00"}],"timestamp":"now"}"#,
    );
    let stdout = stdout_of(&[
        "--apply",
        payload.to_str().unwrap(),
        "--ticks",
        "1",
        "--json",
        "--start-hour",
        "12",
    ]);
    let lines: Vec<Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["tick"], 0);
    assert_eq!(lines[0]["snapshot"]["alerts"][0]["id"], 7);
    assert_eq!(lines[0]["snapshot"]["alerts"][0]["type"], "warning");

    let _ = fs::remove_file(payload);
}
