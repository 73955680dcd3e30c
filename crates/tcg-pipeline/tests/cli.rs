//! `tcg` binary behavior

use std::io::Write;
use std::process::{Command, Output, Stdio};
use tcg_core::NormalizedRecord;
use tcg_test_utils::fenced_test_cases;

fn tcg(args: &[&str], stdin: Option<&str>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tcg"))
        .args(args)
        .env("RUST_LOG", "warn")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    {
        let mut pipe = child.stdin.take().unwrap();
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).unwrap();
        }
    }
    child.wait_with_output().unwrap()
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn write_records(dir: &tempfile::TempDir, records: &[NormalizedRecord]) -> String {
    let path = dir.path().join("records.json");
    std::fs::write(&path, serde_json::to_string(records).unwrap()).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn extract_reads_stdin_and_prints_outcome() {
    let output = tcg(&["extract", "--input", "-"], Some(&fenced_test_cases(2)));
    let value = stdout_json(&output);
    assert_eq!(value["source"], "strict");
    assert_eq!(value["records"].as_array().unwrap().len(), 2);
}

#[test]
fn extract_scenarios_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("response.txt");
    std::fs::write(&input, "no json here").unwrap();

    let output = tcg(
        &["extract", "--input", input.to_str().unwrap(), "--kind", "scenario"],
        None,
    );
    let value = stdout_json(&output);
    assert_eq!(value["source"], "fallback");
    assert_eq!(value["kind"], "scenario");
}

#[test]
fn analyze_reports_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_records(
        &dir,
        &[
            NormalizedRecord::new("TC_1", "Archive a project"),
            NormalizedRecord::new("TC_2", "archive a PROJECT"),
        ],
    );

    let value = stdout_json(&tcg(&["analyze", "--records", &path], None));
    assert_eq!(value["total"], 2);
    assert_eq!(value["near_duplicates"][0]["record_id"], "TC_2");
}

#[test]
fn arrange_groups_and_renumbers() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_records(
        &dir,
        &[
            NormalizedRecord::new("A", "one").with_module("Auth", "Login"),
            NormalizedRecord::new("B", "two").with_module("Billing", "Invoices"),
            NormalizedRecord::new("C", "three").with_module("Auth", "Login"),
        ],
    );

    let value = stdout_json(&tcg(&["arrange", "--records", &path, "--renumber", "TC"], None));
    let summaries: Vec<_> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|r| (r["id"].as_str().unwrap().to_string(), r["summary"].as_str().unwrap().to_string()))
        .collect();
    assert_eq!(
        summaries,
        vec![
            ("TC_1".to_string(), "one".to_string()),
            ("TC_2".to_string(), "three".to_string()),
            ("TC_3".to_string(), "two".to_string()),
        ]
    );
}

#[test]
fn prompt_prints_composed_text() {
    let output = tcg(
        &["prompt", "--module", "Checkout", "--summary", "Apply coupons", "--count", "3"],
        None,
    );
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.contains("Generate 3 distinct test cases"));
    assert!(text.contains("Module: Checkout"));
}

#[test]
fn generate_without_api_key_fails_with_exit_one() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("tcg.toml");
    std::fs::write(&config, "[gemini]\napi_key_env = \"TCG_CLI_TEST_KEY_NEVER_SET\"\n").unwrap();

    let output = tcg(
        &["generate", "--prompt", "-", "--config", config.to_str().unwrap()],
        Some("make tests"),
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("TCG_CLI_TEST_KEY_NEVER_SET"));
}

#[test]
fn invalid_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("tcg.toml");
    std::fs::write(&config, "[retry]\nmax_attempts = 0\n").unwrap();

    let output = tcg(&["prompt", "--module", "M", "--summary", "S", "--config", config.to_str().unwrap()], None);
    assert_eq!(output.status.code(), Some(1));
}
