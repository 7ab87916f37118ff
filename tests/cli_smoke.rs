//! Smoke tests for the procsynth CLI
//!
//! Every command runs with `--provider none` and without API keys in the
//! environment, so only the local pipeline is exercised.

use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const DESCRIPTION: &str = "Customer places order, then we verify payment, check inventory, \
                           ship the product, and send confirmation.";

fn procsynth_cmd(work_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("procsynth"));
    cmd.current_dir(work_dir)
        .env_remove("OPENAI_API_KEY")
        .env_remove("HUGGINGFACE_API_KEY")
        .env_remove("PROCSYNTH_CONFIG")
        .env("NO_COLOR", "1")
        .args(["--provider", "none"]);
    cmd
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    procsynth_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("procsynth"));
}

#[test]
fn generate_prints_document() {
    let dir = TempDir::new().unwrap();
    procsynth_cmd(dir.path())
        .args(["generate", "--title", "Order Fulfilment", "--description", DESCRIPTION])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"))
        .stdout(predicate::str::contains("name=\"Verify payment\""))
        .stdout(predicate::str::contains("</bpmn:definitions>"))
        .stderr(predicate::str::contains("Fallback"));
}

#[test]
fn generate_json_to_file() {
    let dir = TempDir::new().unwrap();
    let desc = dir.path().join("desc.txt");
    fs::write(&desc, DESCRIPTION).unwrap();

    procsynth_cmd(dir.path())
        .args(["generate", "--title", "Orders", "--industry", "Manufacturing", "--json"])
        .arg("--file")
        .arg(&desc)
        .args(["--output", "out.json"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let body: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("out.json")).unwrap()).unwrap();
    assert_eq!(body["industry"], "manufacturing");
    assert_eq!(body["report"]["source"], "fallback");
    assert_eq!(body["document"]["metadata"]["processCount"], 1);
    assert!(body["document"]["xml"].as_str().unwrap().contains("bpmn:definitions"));
}

#[test]
fn generate_rejects_short_description() {
    let dir = TempDir::new().unwrap();
    procsynth_cmd(dir.path())
        .args(["generate", "--title", "Orders", "--description", "short"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn generate_rejects_unknown_industry() {
    let dir = TempDir::new().unwrap();
    procsynth_cmd(dir.path())
        .args(["generate", "--title", "Orders", "--industry", "aerospace"])
        .args(["--description", DESCRIPTION])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("aerospace"));
}

#[test]
fn guided_from_answers_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("answers.json"),
        r#"{"main_steps": "collect samples, then analyze results", "patient_safety": "verify identity"}"#,
    )
    .unwrap();

    procsynth_cmd(dir.path())
        .args(["guided", "--title", "Lab Intake", "--industry", "healthcare"])
        .args(["--answers", "answers.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name=\"Collect samples\""))
        .stdout(predicate::str::contains("name=\"Lab Intake\""));
}

#[test]
fn guided_rejects_malformed_answers() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("answers.json"), "[1, 2").unwrap();

    procsynth_cmd(dir.path())
        .args(["guided", "--title", "Lab Intake", "--answers", "answers.json"])
        .assert()
        .code(2);
}

#[test]
fn optimize_appends_history() {
    let dir = TempDir::new().unwrap();
    procsynth_cmd(dir.path())
        .args(["generate", "--title", "Orders", "--description", DESCRIPTION])
        .args(["--output", "orders.bpmn"])
        .assert()
        .success();

    for expected in 1..=2 {
        procsynth_cmd(dir.path())
            .args(["optimize", "--input", "orders.bpmn", "--goal", "focus=speed"])
            .args(["--history", "history.json", "--output", "optimized.bpmn"])
            .assert()
            .success()
            .stderr(predicate::str::contains(format!("Version {expected}")));
    }

    let history: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("history.json")).unwrap())
            .unwrap();
    assert_eq!(history.as_array().map(Vec::len), Some(2));
    assert_eq!(history[1]["version"], 2);
    assert_eq!(history[1]["changes"][0], "Added error handling paths");
}

#[test]
fn validate_reports_missing_root() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.bpmn"), "<bpmn:process id=\"p\" />").unwrap();

    procsynth_cmd(dir.path())
        .args(["validate", "bad.bpmn"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("definitions"));
}

#[test]
fn validate_strict_requires_events() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("doc.bpmn"),
        "<bpmn:definitions>\r\n\r\n<bpmn:process id=\"p\" />\r\n</bpmn:definitions>",
    )
    .unwrap();

    procsynth_cmd(dir.path())
        .args(["validate", "doc.bpmn"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<bpmn:definitions>\n<bpmn:process"));

    procsynth_cmd(dir.path())
        .args(["validate", "--strict", "doc.bpmn"])
        .assert()
        .code(3);
}

#[test]
fn assess_prints_metadata_json() {
    let dir = TempDir::new().unwrap();
    procsynth_cmd(dir.path())
        .args(["generate", "--title", "Orders", "--description", DESCRIPTION])
        .args(["--output", "orders.bpmn"])
        .assert()
        .success();

    let output = procsynth_cmd(dir.path())
        .args(["assess", "orders.bpmn"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let metadata: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(metadata["gatewayCount"], 2);
    assert_eq!(metadata["complexity"], "medium");
}

#[test]
fn config_shows_cli_attribution() {
    let dir = TempDir::new().unwrap();
    procsynth_cmd(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("llm.provider = none [cli]"));
}

#[test]
fn config_file_in_working_directory_is_used() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("procsynth.toml"),
        "[generation]\ncall_timeout_secs = 7\n",
    )
    .unwrap();

    procsynth_cmd(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("call_timeout_secs = 7 [config]"));
}
