use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[rstest]
fn probe_timeout_bubbles_to_cli() {
    let dir = tempdir().unwrap();
    let toml = r#"
[[channel]]
id = "BT"

[sampling]
read_timeout_ms = 500
"#;
    let cfg = dir.path().join("cfg.toml");
    fs::write(&cfg, toml).unwrap();

    let mut cmd = Command::cargo_bin("roast").unwrap();
    cmd.env("ROAST_TEST_SIM_STALL_AFTER", "20");
    cmd.arg("--config").arg(&cfg).arg("simulate");
    cmd.assert()
        .code(3)
        .stderr(predicate::str::contains("What happened: Probe read timed out"));
}
