use std::io::Write;
use std::process::Command;

fn run_formlet(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_formlet"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    (stdout.trim().to_string(), stderr.trim().to_string(), output.status.code().unwrap_or(-1))
}

#[test]
fn test_cli_let() {
    let (stdout, _stderr, code) = run_formlet(&["=LET(x, 23, x + 100)"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "Number(123.0)");
}

#[test]
fn test_cli_with_variables() {
    let (stdout, _stderr, code) = run_formlet(&["=LAMBDA(a, b, a * b)(:price, :qty)", "price=2.5", "qty=4"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "Number(10.0)");
}

#[test]
fn test_cli_with_json_variables() {
    let (stdout, _stderr, code) = run_formlet(&[
        "=SUMIF(:sales, \">80+10\")",
        "--json",
        r#"{"sales": [1, 2, 100, 200]}"#,
    ]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "Number(300.0)");
}

#[test]
fn test_cli_output_json() {
    let (stdout, _stderr, code) = run_formlet(&["=LAMBDA(x, x * 2)(21)", "--output-json"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["result"], serde_json::json!(42.0));
    assert_eq!(parsed["type"], "Number");
    assert!(parsed["execution_time"].as_str().unwrap().ends_with("ms"));
}

#[test]
fn test_cli_evaluation_error_exit_code() {
    let (_stdout, stderr, code) = run_formlet(&["=LET(x, 1)"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Missing final computed value/expression"), "{}", stderr);
}

#[test]
fn test_cli_usage_errors() {
    let (_stdout, stderr, code) = run_formlet(&[]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Usage"));

    let (_stdout, _stderr, code) = run_formlet(&["=1", "--json"]);
    assert_eq!(code, 1);

    let (_stdout, stderr, code) = run_formlet(&["=1", "oops"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid variable assignment"));
}

#[test]
fn test_cli_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"case_sensitivity": "insensitive"}}"#).unwrap();
    let path = file.path().to_str().unwrap();
    let (stdout, _stderr, code) = run_formlet(&["=LET(Total, 5, total * 2)", "--config", path]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "Number(10.0)");
}
