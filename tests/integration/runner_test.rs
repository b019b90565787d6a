//! Runner Integration Tests
//!
//! Runs real shell commands through `AnalysisRunner` inside temporary
//! working directories and checks the reconciliation precedence end to end.

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};

use pothole_analysis::{AnalysisConfig, AnalysisRunner, AppError};
use pothole_analysis_core::Record;
use pothole_analysis_engine::{Analysis, AnalysisSource};
use serde_json::json;
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn sample_records() -> Vec<Record> {
    vec![
        Record::new(1)
            .with_severity("high")
            .with_resolved_count(4)
            .with_location(40.7, -74.0),
        Record::new("b")
            .with_severity("low")
            .with_resolved_count("2")
            .with_location("40.8", "-73.9"),
    ]
}

fn runner(temp: &TempDir, template: &str) -> AnalysisRunner {
    let config = AnalysisConfig {
        command_template: Some(template.to_string()),
        working_dir: Some(temp.path().to_path_buf()),
        timeout_secs: 30,
        ..Default::default()
    };
    AnalysisRunner::new(config).unwrap()
}

fn paths(temp: &TempDir) -> (PathBuf, PathBuf) {
    (
        temp.path().join("data").join("in.json"),
        temp.path().join("data").join("out.json"),
    )
}

fn external(value: serde_json::Value) -> Analysis {
    Analysis::External(value)
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

#[tokio::test]
async fn test_input_is_written_before_command_runs() {
    let temp = tempfile::tempdir().unwrap();
    let (input, output) = paths(&temp);
    // The command copies its input to the output, proving the input existed.
    let runner = runner(&temp, "cp {input} {output}");

    let envelope = runner
        .run_with_paths(&sample_records(), &input, &output)
        .await
        .unwrap();

    assert!(envelope.ok);
    assert!(envelope.executed);
    assert_eq!(envelope.analysis_source(), Some(AnalysisSource::OutputFile));
    assert_eq!(read_json(&input)[0]["id"], json!(1));
    assert_eq!(read_json(&input)[1]["resolved_count"], json!("2"));

    let execution = envelope.execution.as_ref().unwrap();
    assert_eq!(
        execution.command,
        format!("cp \"{}\" \"{}\"", input.display(), output.display())
    );
    assert_eq!(execution.analysis.to_value()[1]["id"], json!("b"));
}

#[tokio::test]
async fn test_relative_paths_resolve_against_working_dir() {
    let temp = tempfile::tempdir().unwrap();
    let runner = runner(&temp, "cp {input} {output}");

    let envelope = runner
        .run_with_paths(
            &sample_records(),
            Path::new("nested/in.json"),
            Path::new("nested/out.json"),
        )
        .await
        .unwrap();

    assert_eq!(envelope.input_path, temp.path().join("nested/in.json"));
    assert_eq!(envelope.output_path, temp.path().join("nested/out.json"));
    assert!(temp.path().join("nested/out.json").exists());
}

#[tokio::test]
async fn test_envelope_serializes_expected_fields() {
    let temp = tempfile::tempdir().unwrap();
    let (input, output) = paths(&temp);
    let runner = runner(&temp, r#"echo progress; echo 'ANALYSIS_JSON: {"count": 2}'"#);

    let envelope = runner
        .run_with_paths(&sample_records(), &input, &output)
        .await
        .unwrap();
    let value = serde_json::to_value(&envelope).unwrap();

    assert_eq!(value["ok"], json!(true));
    assert_eq!(value["executed"], json!(true));
    assert!(value.get("reason").is_none());
    assert_eq!(value["analysisSource"], json!("stdout-marker"));
    assert_eq!(value["analysis"], json!({"count": 2}));
    assert!(value["stdout"].as_str().unwrap().starts_with("progress"));
    assert_eq!(value["stderr"], json!(""));
    assert!(value["analysisParseError"]
        .as_str()
        .unwrap()
        .starts_with("Failed to read"));
}

// ============================================================================
// Reconciliation Precedence Tests
// ============================================================================

#[tokio::test]
async fn test_malformed_output_file_then_stdout_marker() {
    let temp = tempfile::tempdir().unwrap();
    let (input, output) = paths(&temp);
    let runner = runner(
        &temp,
        r#"printf '{"count": ' > {output}; echo 'ANALYSIS_JSON: {"count": 5}'"#,
    );

    let envelope = runner
        .run_with_paths(&sample_records(), &input, &output)
        .await
        .unwrap();

    assert_eq!(envelope.analysis_source(), Some(AnalysisSource::StdoutMarker));
    assert_eq!(envelope.analysis(), Some(&external(json!({"count": 5}))));
    let parse_error = envelope.analysis_parse_error().unwrap();
    assert!(parse_error.contains(&format!("Failed to parse {}", output.display())));
}

#[tokio::test]
async fn test_alternate_default_file_in_working_dir() {
    let temp = tempfile::tempdir().unwrap();
    let (input, output) = paths(&temp);
    // Writes to the default file name in the working directory instead of {output}.
    let runner = runner(&temp, r#"printf '{"where": "alternate"}' > pothole_analysis.json"#);

    let envelope = runner
        .run_with_paths(&sample_records(), &input, &output)
        .await
        .unwrap();

    assert_eq!(
        envelope.analysis_source(),
        Some(AnalysisSource::AlternateOutputFile)
    );
    assert_eq!(envelope.analysis(), Some(&external(json!({"where": "alternate"}))));
    assert!(envelope
        .analysis_parse_error()
        .unwrap()
        .starts_with("Failed to read"));
}

#[tokio::test]
async fn test_configured_alternate_paths() {
    let temp = tempfile::tempdir().unwrap();
    let (input, output) = paths(&temp);
    let config = AnalysisConfig {
        command_template: Some(r#"mkdir -p alt && printf '[1,2]' > alt/result.json"#.to_string()),
        working_dir: Some(temp.path().to_path_buf()),
        alternate_output_paths: Some(vec![PathBuf::from("alt/result.json")]),
        ..Default::default()
    };
    let runner = AnalysisRunner::new(config).unwrap();

    let envelope = runner
        .run_with_paths(&sample_records(), &input, &output)
        .await
        .unwrap();

    assert_eq!(
        envelope.analysis_source(),
        Some(AnalysisSource::AlternateOutputFile)
    );
    assert_eq!(envelope.analysis(), Some(&external(json!([1, 2]))));
}

#[tokio::test]
async fn test_stderr_marker_when_stdout_silent() {
    let temp = tempfile::tempdir().unwrap();
    let (input, output) = paths(&temp);
    let runner = runner(&temp, r#"echo 'ANALYSIS_JSON: {"via": "stderr"}' 1>&2"#);

    let envelope = runner
        .run_with_paths(&sample_records(), &input, &output)
        .await
        .unwrap();

    assert_eq!(envelope.analysis_source(), Some(AnalysisSource::StderrMarker));
    assert_eq!(envelope.analysis(), Some(&external(json!({"via": "stderr"}))));
}

#[tokio::test]
async fn test_silent_process_falls_back() {
    let temp = tempfile::tempdir().unwrap();
    let (input, output) = paths(&temp);
    let runner = runner(&temp, "true");

    let envelope = runner
        .run_with_paths(&sample_records(), &input, &output)
        .await
        .unwrap();

    assert!(envelope.ok);
    assert_eq!(envelope.analysis_source(), Some(AnalysisSource::Fallback));

    let report = envelope.analysis().and_then(Analysis::as_report).unwrap();
    assert_eq!(report.count, 2);
    assert_eq!(report.max_resolved_reports, 4.0);
    assert_eq!(report.average_resolved_reports, 3.0);
    assert_eq!(report.bounding_box.max_lat, Some(40.8));

    let parse_error = envelope.analysis_parse_error().unwrap();
    assert!(parse_error.starts_with("Failed to read"));
    assert!(parse_error.contains("No ANALYSIS_JSON marker found"));
    assert!(parse_error.ends_with("Used in-process fallback analysis"));

    let value = serde_json::to_value(&envelope).unwrap();
    assert_eq!(value["analysisSource"], json!("node-fallback"));
    assert_eq!(value["analysis"]["count"], json!(2));
}

// ============================================================================
// Failure Tests
// ============================================================================

#[tokio::test]
async fn test_not_configured_returns_structured_result() {
    let temp = tempfile::tempdir().unwrap();
    let (input, output) = paths(&temp);
    let config = AnalysisConfig {
        command_template: Some("  ".to_string()),
        working_dir: Some(temp.path().to_path_buf()),
        ..Default::default()
    };
    let runner = AnalysisRunner::new(config).unwrap();

    let envelope = runner
        .run_with_paths(&sample_records(), &input, &output)
        .await
        .unwrap();

    assert!(!envelope.ok);
    assert!(!envelope.executed);
    assert!(envelope.reason.is_some());
    assert!(input.exists());
    assert!(!output.exists());

    let value = serde_json::to_value(&envelope).unwrap();
    assert!(value.get("analysis").is_none());
    assert!(value.get("stdout").is_none());
}

#[tokio::test]
async fn test_non_zero_exit_is_fatal() {
    let temp = tempfile::tempdir().unwrap();
    let (input, output) = paths(&temp);
    let runner = runner(&temp, r#"echo 'ANALYSIS_JSON: {"a":1}'; exit 2"#);

    let err = runner
        .run_with_paths(&sample_records(), &input, &output)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Command(_)));
}

#[tokio::test]
async fn test_timeout_is_fatal() {
    let temp = tempfile::tempdir().unwrap();
    let (input, output) = paths(&temp);
    let config = AnalysisConfig {
        command_template: Some("sleep 10".to_string()),
        working_dir: Some(temp.path().to_path_buf()),
        timeout_secs: 1,
        ..Default::default()
    };
    let runner = AnalysisRunner::new(config).unwrap();

    let err = runner
        .run_with_paths(&sample_records(), &input, &output)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("timed out after 1 seconds"));
}
