use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::NamedTempFile;

fn cargo_bin() -> PathBuf {
    if let Ok(path) = env::var("CARGO_BIN_EXE_onboard") {
        return PathBuf::from(path);
    }

    let target_dir = env::var("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| repo_root().join("target"));
    let executable_name = format!("onboard{}", std::env::consts::EXE_SUFFIX);
    let fallback = target_dir.join("debug").join(executable_name);

    if fallback.exists() {
        return fallback;
    }

    panic!(
        "CARGO_BIN_EXE_onboard is not set and fallback binary was not found at {}",
        fallback.display()
    );
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn state_path(name: &str) -> PathBuf {
    repo_root().join("testdata").join("states").join(name)
}

fn run(args: &[&str]) -> Output {
    Command::new(cargo_bin())
        .args(args)
        .output()
        .expect("onboard should execute")
}

fn run_validate(state: &Path, extra: &[&str]) -> Output {
    let state = state.to_string_lossy();
    let mut args = vec!["validate", state.as_ref()];
    args.extend_from_slice(extra);
    run(&args)
}

fn assert_exit_code(output: &Output, expected: i32) {
    let actual = output.status.code().unwrap_or(-1);
    assert_eq!(
        actual,
        expected,
        "unexpected exit code; stdout: {}; stderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn validate_blocks_empty_practice_info() {
    let output = run_validate(&state_path("empty.json"), &[]);

    assert_exit_code(&output, 1);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Status: blocked"));
    assert!(stdout.contains("Errors (3 of 5):"));
    assert!(stdout.contains("[CRITICAL] firstName: FirstName is required"));
    assert!(stdout.contains("hint: Please enter your firstName"));
}

#[test]
fn validate_all_lists_every_error() {
    let output = run_validate(&state_path("empty.json"), &["--all"]);

    assert_exit_code(&output, 1);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Errors (5 of 5):"));
}

#[test]
fn validate_allows_proceeding_with_high_errors() {
    let output = run_validate(&state_path("high_only.json"), &[]);

    assert_exit_code(&output, 0);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Status: has errors (can proceed)"));
    assert!(stdout.contains("[HIGH] firstName: FirstName must be at least 2 characters"));
    assert!(stdout.contains("[HIGH] email: Please enter a valid email address"));
}

#[test]
fn validate_json_reports_document_uploads() {
    let output = run_validate(&state_path("documents_pending.json"), &["--json"]);

    assert_exit_code(&output, 1);

    let result: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(result["isValid"], false);
    assert_eq!(result["canProceed"], false);
    assert_eq!(result["hasBlockingErrors"], true);
    assert_eq!(result["errors"][0]["field"], "documents");
    assert_eq!(result["errors"][0]["priority"], "CRITICAL");
    assert_eq!(result["errors"][0]["context"], "documents: doc-2");
}

#[test]
fn validate_step_override_checks_review() {
    let output = run_validate(&state_path("complete.json"), &["--step", "review"]);

    assert_exit_code(&output, 0);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Status: valid"));
}

#[test]
fn validate_honours_display_limits_from_config() {
    let mut config = NamedTempFile::new().expect("temporary config should be created");
    writeln!(config, "validation:\n  display_limits:\n    critical: 1")
        .expect("temporary config should be written");

    let config_path = config.path().to_string_lossy().into_owned();
    let state = state_path("empty.json");
    let output = run(&[
        "--config",
        &config_path,
        "validate",
        state.to_string_lossy().as_ref(),
    ]);

    assert_exit_code(&output, 1);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Errors (1 of 5):"));
}

#[test]
fn validate_fails_for_missing_state_file() {
    let output = run_validate(&state_path("does_not_exist.json"), &[]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read state"));
}

#[test]
fn field_accepts_valid_email_with_success_message() {
    let state = state_path("empty.json");
    let output = run(&[
        "field",
        state.to_string_lossy().as_ref(),
        "--step",
        "practice_info",
        "--field",
        "email",
        "--value",
        "john@example.com",
        "--json",
    ]);

    assert_exit_code(&output, 0);

    let result: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(result["isValid"], true);
    assert_eq!(result["successMessage"], "Email address looks good.");
}

#[test]
fn field_defaults_to_stored_value() {
    let state = state_path("empty.json");
    let output = run(&[
        "field",
        state.to_string_lossy().as_ref(),
        "--step",
        "practice_info",
        "--field",
        "firstName",
    ]);

    assert_exit_code(&output, 1);
    assert!(String::from_utf8_lossy(&output.stdout).contains("FirstName is required"));
}

#[test]
fn summary_reports_completable_application() {
    let state = state_path("complete.json");
    let output = run(&["summary", state.to_string_lossy().as_ref()]);

    assert_exit_code(&output, 0);
    assert!(String::from_utf8_lossy(&output.stdout).contains("onboarding can be completed"));
}

#[test]
fn summary_json_lists_invalid_steps() {
    let state = state_path("empty.json");
    let output = run(&["summary", state.to_string_lossy().as_ref(), "--json"]);

    assert_exit_code(&output, 1);

    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(summary["canCompleteOnboarding"], false);
    assert_eq!(
        summary["invalidSteps"],
        serde_json::json!(["practice_info", "documents", "specializations"])
    );
}

#[test]
fn rules_lists_document_validators() {
    let output = run(&["rules", "--step", "documents"]);

    assert_exit_code(&output, 0);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("documents:"));
    assert!(stdout.contains("arrayMinLength, uploadsComplete, documentsClean"));
    assert!(stdout.contains("debounce: 300ms"));
}

#[test]
fn rules_rejects_unknown_step() {
    let output = run(&["rules", "--step", "payment"]);

    assert_exit_code(&output, 2);
}
