pub mod ast;
pub mod concurrent_registry;
pub mod config;
pub mod custom;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod runtime;
pub mod traits;
pub mod types;

pub use ast::Expr;
pub use concurrent_registry::FunctionRegistry;
pub use config::{CaseSensitivity, EngineConfig, Separators};
pub use custom::CustomFunction;
pub use error::{Error, ErrorKind};
pub use runtime::{CriteriaPredicate, EnvironmentContext, Evaluator, NameBinding, VariableContext};
pub use traits::{EvaluationContext, Function, Parameter, ParameterKind};
pub use types::{Lambda, Value};
use std::collections::HashMap;
use std::sync::Arc;

// Global function registry, seeded with the built-ins
lazy_static::lazy_static! {
    static ref GLOBAL_REGISTRY: Arc<FunctionRegistry> = Arc::new(FunctionRegistry::with_builtins());
}

/// Parse a formula (optional leading '=') into an AST.
pub fn parse(input: &str) -> Result<Expr, Error> {
    // Allow optional leading '=' after whitespace
    let trimmed = input.trim_start();
    let source = trimmed.strip_prefix('=').unwrap_or(input);
    parser::Parser::new(source)?.parse()
}

/// Evaluate a formula with no variables.
pub fn evaluate(input: &str) -> Result<Value, Error> {
    evaluate_with(input, &HashMap::new())
}

/// Evaluate with a map of variables, the global registry and default config.
pub fn evaluate_with(input: &str, vars: &HashMap<String, Value>) -> Result<Value, Error> {
    evaluate_with_config(input, vars, &EngineConfig::default())
}

pub fn evaluate_with_config(
    input: &str,
    vars: &HashMap<String, Value>,
    config: &EngineConfig,
) -> Result<Value, Error> {
    config.validate()?;
    let expr = parse(input)?;
    let context = VariableContext::new(vars, global_registry()).with_config(config.clone());
    Evaluator::eval(&expr, &context)
}

/// Evaluate with variables provided as JSON string.
/// JSON format: {"var1": "value1", "var2": 42, "var3": [1, 2]}
pub fn evaluate_with_json(input: &str, json_vars: &str) -> Result<Value, Error> {
    let json_value: serde_json::Value = serde_json::from_str(json_vars)
        .map_err(|e| Error::new(format!("Invalid JSON: {}", e), None))?;

    let vars = match json_value {
        serde_json::Value::Object(map) => {
            let mut result = HashMap::new();
            for (key, value) in map {
                result.insert(key, json_to_value(value)?);
            }
            result
        }
        _ => return Err(Error::new("JSON must be an object with key-value pairs", None)),
    };

    evaluate_with(input, &vars)
}

/// Convert serde_json::Value to a formula value. Nested objects have no
/// counterpart and are rejected.
pub fn json_to_value(json: serde_json::Value) -> Result<Value, Error> {
    match json {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Boolean(b)),
        serde_json::Value::Number(n) => n
            .as_f64()
            .map(Value::Number)
            .ok_or_else(|| Error::new("Invalid number in JSON", None)),
        serde_json::Value::String(s) => Ok(Value::String(s)),
        serde_json::Value::Array(arr) => {
            let mut result = Vec::with_capacity(arr.len());
            for item in arr {
                result.push(json_to_value(item)?);
            }
            Ok(Value::Array(result))
        }
        serde_json::Value::Object(_) => Err(Error::new("JSON objects are not supported as values", None)),
    }
}

/// Convert a formula value to JSON. Non-finite numbers become null and
/// lambdas render as their text form.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Number(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Null => serde_json::Value::Null,
        Value::Array(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
        Value::Lambda(lambda) => serde_json::Value::String(format!("LAMBDA({})", lambda.params.join(", "))),
    }
}

pub fn global_registry() -> Arc<FunctionRegistry> {
    Arc::clone(&GLOBAL_REGISTRY)
}

/// Register a custom function globally
pub fn register_function(function: Box<dyn CustomFunction>) -> Result<(), Error> {
    GLOBAL_REGISTRY.register_custom(function)
}

/// Unregister a function by name
pub fn unregister_function(name: &str) -> bool {
    GLOBAL_REGISTRY.unregister(name)
}

/// List every globally registered function, built-ins included
pub fn list_functions() -> Vec<String> {
    GLOBAL_REGISTRY.list_functions()
}

pub fn has_function(name: &str) -> bool {
    GLOBAL_REGISTRY.has_function(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approxv(v: Value, b: f64) -> bool { matches!(v, Value::Number(a) if (a - b).abs() < 1e-9) }

    #[test]
    fn test_basic_arithmetic() {
        assert!(approxv(evaluate("2 + 3 * 4").unwrap(), 14.0));
        assert!(approxv(evaluate("(2 + 3) * 4").unwrap(), 20.0));
        assert!(approxv(evaluate("2 ^ 3").unwrap(), 8.0));
        assert!(approxv(evaluate("= 10 + 20 * 3").unwrap(), 70.0));
    }

    #[test]
    fn json_objects_are_rejected() {
        let err = evaluate_with_json("x", r#"{"x": {"y": 1}}"#).unwrap_err();
        assert_eq!(err.message, "JSON objects are not supported as values");
    }

    #[test]
    fn values_convert_to_json() {
        let v = Value::Array(vec![Value::Number(1.5), Value::Null, Value::Number(f64::NAN)]);
        assert_eq!(value_to_json(&v), serde_json::json!([1.5, null, null]));
    }
}
