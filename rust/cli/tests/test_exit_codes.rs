//! Exit codes and the in-process view of environment configuration.
//!
//! Tests that set `MATHQUIZ_*` variables mutate this process's environment and
//! are serialized.

mod helpers;

use helpers::run_in_process;
use serial_test::serial;

fn clear_env() {
    for var in [
        "MATHQUIZ_CONFIG",
        "MATHQUIZ_MODE",
        "MATHQUIZ_SEED",
        "MATHQUIZ_FEEDBACK_MS",
    ] {
        unsafe {
            std::env::remove_var(var);
        }
    }
}

#[test]
#[serial]
fn successful_commands_return_zero() {
    clear_env();
    for args in [
        vec!["deal", "--seed", "1"],
        vec!["cfg"],
        vec!["sim", "--sessions", "1", "--seed", "1"],
        vec!["play", "--mode", "classic", "--seed", "1"],
    ] {
        let res = run_in_process(&args, "q\n");
        assert_eq!(res.exit_code, mathquiz_cli::EXIT_SUCCESS, "{:?}: {}", args, res.stderr);
    }
}

#[test]
#[serial]
fn errors_go_to_stderr_with_code_two() {
    clear_env();
    let res = run_in_process(&["play", "--feedback-ms", "5001"], "");
    assert_eq!(res.exit_code, mathquiz_cli::EXIT_ERROR);
    assert!(res.stdout.is_empty());
    assert!(
        res.stderr
            .starts_with("Error: Invalid feedback delay: 5001 ms, maximum: 5000 ms"),
        "stderr: {}",
        res.stderr
    );
}

#[test]
#[serial]
fn missing_subcommand_is_a_usage_error() {
    let res = run_in_process(&[], "");
    assert_eq!(res.exit_code, mathquiz_cli::EXIT_ERROR);
    assert!(res.stderr.contains("For full help, run: mathquiz --help"));
}

#[test]
#[serial]
fn env_seed_is_used_when_no_flag_is_given() {
    clear_env();
    unsafe {
        std::env::set_var("MATHQUIZ_SEED", "31");
    }
    let res = run_in_process(&["sim", "--sessions", "1"], "");
    clear_env();

    assert_eq!(res.exit_code, 0, "stderr: {}", res.stderr);
    let report: mathquiz_cli::SimReport = serde_json::from_str(&res.stdout).expect("json");
    assert_eq!(report.seed, 31);
}

#[test]
#[serial]
fn env_feedback_delay_is_validated() {
    clear_env();
    unsafe {
        std::env::set_var("MATHQUIZ_FEEDBACK_MS", "10000");
    }
    let res = run_in_process(&["sim", "--sessions", "1"], "");
    clear_env();

    assert_eq!(res.exit_code, mathquiz_cli::EXIT_ERROR);
    assert!(res.stderr.contains("Configuration error"), "stderr: {}", res.stderr);
}

#[test]
#[serial]
fn config_file_mode_applies_to_sim() {
    clear_env();
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("mathquiz.toml");
    std::fs::write(&path, "mode = \"survival\"\n").expect("write config");
    unsafe {
        std::env::set_var("MATHQUIZ_CONFIG", &path);
    }
    let res = run_in_process(&["sim", "--sessions", "1", "--seed", "2"], "");
    clear_env();

    assert_eq!(res.exit_code, 0, "stderr: {}", res.stderr);
    let report: mathquiz_cli::SimReport = serde_json::from_str(&res.stdout).expect("json");
    assert_eq!(report.mode, mathquiz_engine::state::Mode::Survival);
}
