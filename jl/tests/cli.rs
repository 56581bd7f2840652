//! CLI tests for the `jl` binary.
//!
//! Spawns the binary in a temp dir and checks exit codes, stdout results and
//! the trace lines written to stderr or the configured log file.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use jl::config::ENV_PREFIX;
use jl::exit_codes;

fn jl(dir: &Path, args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_jl"));
    command.current_dir(dir).args(args);
    for (key, _) in std::env::vars() {
        if key.starts_with(ENV_PREFIX) {
            command.env_remove(key);
        }
    }
    command.output().expect("run jl")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn celsius_to_fahrenheit_prints_result_and_traces() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = jl(temp.path(), &["celsius-to-fahrenheit", "100"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(stdout(&output), "212");
    let log = stderr(&output);
    assert!(log.contains("INFO:Starting jl CLI..."), "{log}");
    assert!(log.contains("INFO:Entering: celsius_to_fahrenheit"), "{log}");
    assert!(log.contains("DEBUG:Celsius input is boiling point."), "{log}");
    assert!(log.contains("DEBUG:Exiting: celsius_to_fahrenheit"), "{log}");
}

#[test]
fn calc_add_accepts_negative_operands() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = jl(temp.path(), &["calc", "add", "-2", "3"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(stdout(&output), "1");
    assert!(stderr(&output).contains("INFO:Entering: Calculator.add"));
}

#[test]
fn divide_by_zero_fails_with_traced_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = jl(temp.path(), &["calc", "divide", "10", "0"]);

    assert_eq!(output.status.code(), Some(exit_codes::FAILED));
    assert!(stdout(&output).is_empty());
    let log = stderr(&output);
    assert!(log.contains("ERROR:Calculator.divide failed in "), "{log}");
    assert!(
        log.contains("DEBUG:Exception: CalculatorError: Cannot divide by zero"),
        "{log}"
    );
    assert!(log.contains("DEBUG:Exiting: Calculator.divide"), "{log}");
    assert!(log.contains("error: Cannot divide by zero"), "{log}");
}

#[test]
fn invalid_unit_fails() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = jl(temp.path(), &["convert", "100", "C", "X"]);

    assert_eq!(output.status.code(), Some(exit_codes::FAILED));
    let log = stderr(&output);
    assert!(log.contains("ERROR:Invalid units: from='C', to='X'"), "{log}");
    assert!(log.contains("Invalid temperature unit"), "{log}");
}

#[test]
fn unknown_log_level_is_a_config_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(
        temp.path().join("jl.toml"),
        "[logging]\nlog_level = \"LOUD\"\n",
    )
    .expect("write config");
    let output = jl(temp.path(), &["primes", "10"]);

    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("LOUD"));
}

#[test]
fn info_level_and_template_come_from_config() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(
        temp.path().join("jl.toml"),
        "app_name = \"Thermo\"\n\n[logging]\nlog_level = \"INFO\"\nlog_format = \"%(name)s|%(levelname)s|%(message)s\"\n",
    )
    .expect("write config");
    let output = jl(temp.path(), &["fib", "10"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(stdout(&output), "55");
    let log = stderr(&output);
    assert!(log.contains("Thermo|INFO|Entering: Fibonacci.iterative"), "{log}");
    assert!(!log.contains("DEBUG"), "{log}");
}

#[test]
fn log_file_receives_the_same_lines() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(
        temp.path().join("jl.toml"),
        "[logging]\nlog_file = \"jl.log\"\n",
    )
    .expect("write config");
    let output = jl(temp.path(), &["primes", "10"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(stdout(&output), "2 3 5 7");
    let file = fs::read_to_string(temp.path().join("jl.log")).expect("log file");
    assert!(file.contains("INFO:Entering: PrimeGenerator.generate_primes"), "{file}");
    assert!(file.contains("DEBUG:Return: [2, 3, 5, 7]"), "{file}");
}

#[test]
fn usage_errors_exit_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = jl(temp.path(), &["calc", "power", "2", "3"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));

    let output = jl(temp.path(), &["fib", "--method", "recursive", "45"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
}

#[test]
fn fib_overflow_fails_with_traced_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = jl(temp.path(), &["fib", "94"]);

    assert_eq!(output.status.code(), Some(exit_codes::FAILED));
    assert!(stdout(&output).is_empty());
    let log = stderr(&output);
    assert!(log.contains("ERROR:Fibonacci.iterative failed in "), "{log}");
    assert!(
        log.contains("DEBUG:Exception: FibonacciError: Fibonacci(94) overflows u64"),
        "{log}"
    );
}
