use formlet::{evaluate_with_config, CaseSensitivity, EngineConfig, ErrorKind, Separators, Value};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn insensitive() -> EngineConfig {
    EngineConfig { case_sensitivity: CaseSensitivity::Insensitive, ..EngineConfig::default() }
}

#[test]
fn loads_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"case_sensitivity": "insensitive", "separators": {{"decimal": ",", "group": "."}}}}"#).unwrap();
    let config = EngineConfig::from_file(file.path()).unwrap();
    assert_eq!(config.case_sensitivity, CaseSensitivity::Insensitive);
    assert_eq!(config.separators, Separators { decimal: ',', group: '.' });
}

#[test]
fn missing_or_invalid_file_is_config_error() {
    let err = EngineConfig::from_file("/definitely/not/here.json").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Config);

    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"case_sensitivity": "sometimes"}}"#).unwrap();
    assert_eq!(EngineConfig::from_file(file.path()).unwrap_err().kind, ErrorKind::Config);
}

#[test]
fn name_lookup_follows_case_policy() {
    let vars = HashMap::new();
    let value = evaluate_with_config("LET(Rate, 2, rate * 3)", &vars, &insensitive()).unwrap();
    assert_eq!(value, Value::Number(6.0));

    let err = evaluate_with_config("LET(Rate, 2, rate * 3)", &vars, &EngineConfig::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnresolvedReference);
}

#[test]
fn duplicates_follow_case_policy() {
    let vars = HashMap::new();
    let ok = evaluate_with_config("LET(a, 1, A, 2, a + A)", &vars, &EngineConfig::default()).unwrap();
    assert_eq!(ok, Value::Number(3.0));
    let err = evaluate_with_config("LET(a, 1, A, 2, a + A)", &vars, &insensitive()).unwrap_err();
    assert_eq!(err.message, "Duplicate name 'A' at argument 3");
}

#[test]
fn glob_case_follows_policy() {
    let vars = HashMap::new();
    let formula = r#"COUNTIF(["Apple", "apple", "APPLE"], "app*")"#;
    let sensitive = evaluate_with_config(formula, &vars, &EngineConfig::default()).unwrap();
    assert_eq!(sensitive, Value::Number(1.0));
    let folded = evaluate_with_config(formula, &vars, &insensitive()).unwrap();
    assert_eq!(folded, Value::Number(3.0));
}

#[test]
fn glob_uses_decimal_separator() {
    let vars = HashMap::new();
    let config = EngineConfig { separators: Separators { decimal: ',', group: '.' }, ..EngineConfig::default() };
    let formula = r#"COUNTIF([123.5, 99], "1?3,5")"#;
    assert_eq!(evaluate_with_config(formula, &vars, &config).unwrap(), Value::Number(1.0));
    assert_eq!(evaluate_with_config(formula, &vars, &EngineConfig::default()).unwrap(), Value::Number(0.0));
}

#[test]
fn invalid_config_is_rejected_before_evaluation() {
    let vars = HashMap::new();
    let config = EngineConfig { separators: Separators { decimal: ',', group: ',' }, ..EngineConfig::default() };
    let err = evaluate_with_config("1 + 1", &vars, &config).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Config);
}
