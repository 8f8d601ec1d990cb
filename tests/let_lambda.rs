use formlet::{evaluate, evaluate_with, ErrorKind, Value};
use pretty_assertions::assert_eq;
use std::collections::HashMap;

fn num(n: f64) -> Value {
    Value::Number(n)
}

#[test]
fn let_single_argument_is_the_value() {
    assert_eq!(evaluate(r#"LET("ABC")"#).unwrap(), Value::String("ABC".into()));
}

#[test]
fn let_ignores_unreferenced_binding() {
    assert_eq!(evaluate(r#"LET("ABC", 123, "DEF")"#).unwrap(), Value::String("DEF".into()));
}

#[test]
fn let_resolves_bound_names() {
    assert_eq!(evaluate("LET(x, 23, x + 100)").unwrap(), num(123.0));
    assert_eq!(evaluate(r#"LET("x", 5, x * 2)"#).unwrap(), num(10.0));
    assert_eq!(evaluate("=LET(a, 1, b, a + 1, c, b * 10, c + a)").unwrap(), num(21.0));
}

#[test]
fn let_duplicate_cites_position() {
    let err = evaluate(r#"LET("D", 1, "D", 2, 999)"#).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Naming);
    assert_eq!(err.message, "Duplicate name 'D' at argument 3");
}

#[test]
fn let_arity_messages() {
    assert_eq!(evaluate("LET()").unwrap_err().message, "Missing computed value/expression");
    let err = evaluate("LET(x, 1)").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Arity);
    assert_eq!(err.message, "Missing final computed value/expression");
    assert_eq!(
        evaluate("LET(x, 1, y, 2)").unwrap_err().message,
        "Missing final computed value/expression"
    );
}

#[test]
fn let_rejects_bad_names() {
    let err = evaluate(r#"LET("a.b", 1, 2)"#).unwrap_err();
    assert_eq!(err.message, "Name 'a.b' at argument 1 must not contain '.'");
    let err = evaluate("LET(x, 1, 5, 2, x)").unwrap_err();
    assert_eq!(err.message, "Argument 3 must be a name, got Number");
    let err = evaluate(r#"LET("two words", 1, 2)"#).unwrap_err();
    assert_eq!(err.message, "Invalid name 'two words' at argument 1");
}

#[test]
fn inner_let_shadows_then_releases() {
    assert_eq!(evaluate("LET(x, 1, LET(x, 2, x) + x)").unwrap(), num(3.0));
}

#[test]
fn let_shadows_caller_variables() {
    let mut vars = HashMap::new();
    vars.insert("rate".to_string(), num(0.5));
    assert_eq!(evaluate_with("LET(rate, 2, rate * 10) + rate", &vars).unwrap(), num(20.5));
}

#[test]
fn unresolved_name_inside_scope() {
    let err = evaluate("LET(x, 1, y + x)").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnresolvedReference);
    assert_eq!(err.message, "Unresolved reference: y");
}

#[test]
fn lambda_invocation() {
    assert_eq!(evaluate("LAMBDA(x, x * 2)(21)").unwrap(), num(42.0));
    assert_eq!(evaluate("LAMBDA(42)()").unwrap(), num(42.0));
    assert_eq!(evaluate("LET(add, LAMBDA(a, b, a + b), (add)(2, 3))").unwrap(), num(5.0));
}

#[test]
fn lambda_arity_messages() {
    assert_eq!(evaluate("LAMBDA()").unwrap_err().message, "Missing last parameter with expression");
    let err = evaluate("LAMBDA(x, x)(1, 2)").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Arity);
    assert_eq!(err.message, "LAMBDA expects 1 argument(s), got 2");
}

#[test]
fn lambda_duplicate_parameter() {
    let err = evaluate("LAMBDA(a, b, a, a + b)").unwrap_err();
    assert_eq!(err.message, "Duplicate name 'a' at argument 3");
}

#[test]
fn lambda_body_sees_the_calling_scope() {
    let result = evaluate("LET(k, 10, f, LAMBDA(x, x + k), LET(k, 100, (f)(1)))").unwrap();
    assert_eq!(result, num(101.0));
    assert_eq!(evaluate("LET(k, 10, f, LAMBDA(x, x + k), (f)(1))").unwrap(), num(11.0));
}

#[test]
fn bound_name_is_not_a_function() {
    let err = evaluate("LET(f, LAMBDA(x, x * 2), f(21))").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Naming);
    assert_eq!(err.message, "Function name 'f' is a named value, not an actual function");
}

#[test]
fn lambda_parameter_shadows_outer_binding() {
    assert_eq!(evaluate("LET(x, 1, LAMBDA(x, x * 10)(5) + x)").unwrap(), num(51.0));
}

#[test]
fn repeated_evaluation_is_stable() {
    let formula = "LET(a, SUM([1, 2, 3]), b, a * a, b - a)";
    let first = evaluate(formula).unwrap();
    for _ in 0..5 {
        assert_eq!(evaluate(formula).unwrap(), first);
    }
    assert_eq!(first, num(30.0));
}
