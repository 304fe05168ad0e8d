use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

// Minimal config: two probe channels, one manual channel, alarms
fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
primary_channel = "BT"
alarms = [150.0, 180.0]

[[channel]]
id = "BT"

[[channel]]
id = "ET"

[[manual_channel]]
id = "gas"
min = 0
max = 100
step = 5
default_value = 50
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["self-check"], 0, "ok", "stdout")]
#[case(&["simulate"], 0, "Stopped: Dropped", "stdout")]
#[case(&["simulate"], 0, "DRY_END", "stdout")]
#[case(&["simulate", "--seconds", "60"], 0, "Stopped: MaxDuration", "stdout")]
#[case(&["analyze"], 2, "required", "stderr")]
#[case(&["simulate", "--seconds", "abc"], 2, "invalid value", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("roast").unwrap();

    // Always include a valid config to avoid relying on default path
    cmd.arg("--config").arg(&cfg);
    for a in args {
        cmd.arg(a);
    }

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[test]
fn simulate_json_reports_all_auto_events() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let out = Command::cargo_bin("roast")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--json")
        .arg("simulate")
        .output()
        .unwrap();
    assert!(out.status.success());

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    for key in ["CHARGE", "TP", "DRY_END", "DROP"] {
        assert!(v["events"][key].is_object(), "missing {key}: {v}");
    }
    assert_eq!(v["events"]["CHARGE"]["elapsed"], "00:00");
    assert_eq!(v["stop"], "Dropped");
    assert_eq!(v["alarms_fired"], serde_json::json!([150.0, 180.0]));
    assert!(v["phases"]["develop"]["duration_secs"].as_i64().unwrap() > 0);
}

#[test]
fn saved_simulation_reanalyzes_to_same_events() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let profile = dir.path().join("roast.json");

    let sim = Command::cargo_bin("roast")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--json")
        .arg("simulate")
        .arg("--save")
        .arg(&profile)
        .output()
        .unwrap();
    assert!(sim.status.success());
    assert!(profile.exists());

    let analyzed = Command::cargo_bin("roast")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--json")
        .arg("analyze")
        .arg("--profile")
        .arg(&profile)
        .arg("--ghost")
        .arg(&profile)
        .output()
        .unwrap();
    assert!(analyzed.status.success());

    let a: serde_json::Value = serde_json::from_slice(&sim.stdout).unwrap();
    let b: serde_json::Value = serde_json::from_slice(&analyzed.stdout).unwrap();
    assert_eq!(a["events"], b["events"]);
    assert_eq!(a["phases"], b["phases"]);
    assert_eq!(a["last_smoothed"], b["last_smoothed"]);
    assert_eq!(b["reference"]["phases"], b["phases"]);
}

#[test]
fn malformed_profile_exits_with_four() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let bad = dir.path().join("bad.json");
    fs::write(&bad, "{ \"channelArr\": 5 }").unwrap();

    Command::cargo_bin("roast")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("analyze")
        .arg("--profile")
        .arg(&bad)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("roast profile is invalid"));
}

#[test]
fn profile_without_primary_channel_is_rejected_as_json() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let p = dir.path().join("et_only.json");
    fs::write(
        &p,
        r#"{ "channelArr": [{ "id": "ET", "dataArr": [{ "timestamp": 0, "value": 200.0 }] }] }"#,
    )
    .unwrap();

    let out = Command::cargo_bin("roast")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--json")
        .arg("analyze")
        .arg("--profile")
        .arg(&p)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(4));
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["reason"], "InvalidProfile");
}

#[test]
fn missing_config_file_fails_with_hint() {
    Command::cargo_bin("roast")
        .unwrap()
        .arg("--config")
        .arg("/nonexistent/roast.toml")
        .arg("self-check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config file could not be read"));
}

#[test]
fn invalid_config_is_explained() {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("cfg.toml");
    fs::write(
        &cfg,
        "primary_channel = \"BT\"\n[[channel]]\nid = \"BT\"\n[smoothing]\nkernel_len = 4\n",
    )
    .unwrap();

    Command::cargo_bin("roast")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("self-check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("kernel_len must be odd"));
}
