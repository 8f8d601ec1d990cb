//! Argument-count dependent parameter shapes for `LET` and `LAMBDA`, and
//! extraction of the names those constructs bind.

use crate::ast::Expr;
use crate::error::Error;
use crate::runtime::environment::{validate_names, NameBinding};
use crate::runtime::Evaluator;
use crate::traits::{EvaluationContext, Parameter, ParameterKind};
use crate::types::Value;

/// `LET(name1, value1, …, nameN, valueN, calculation)` or `LET(calculation)`.
pub fn let_shape(argument_count: usize) -> Result<Vec<Parameter>, Error> {
    if argument_count == 0 {
        return Err(Error::arity("Missing computed value/expression"));
    }
    if argument_count % 2 == 0 {
        return Err(Error::arity("Missing final computed value/expression"));
    }
    let pairs = argument_count / 2;
    let mut shape = Vec::with_capacity(argument_count);
    for i in 1..=pairs {
        shape.push(Parameter::new(format!("name{}", i), ParameterKind::Name));
        shape.push(Parameter::new(format!("value{}", i), ParameterKind::Lazy));
    }
    shape.push(Parameter::new("calculation", ParameterKind::Body));
    Ok(shape)
}

/// `LAMBDA(param1, …, paramN, calculation)`; a single argument is the body.
pub fn lambda_shape(argument_count: usize) -> Result<Vec<Parameter>, Error> {
    if argument_count == 0 {
        return Err(Error::arity("Missing last parameter with expression"));
    }
    let mut shape: Vec<Parameter> = (1..argument_count)
        .map(|i| Parameter::new(format!("parameter{}", i), ParameterKind::Name))
        .collect();
    shape.push(Parameter::new("calculation", ParameterKind::Body));
    Ok(shape)
}

/// Read a name argument: a bare identifier is taken as written, anything
/// else must evaluate to text.
pub fn extract_name(expr: &Expr, position: usize, context: &dyn EvaluationContext) -> Result<String, Error> {
    match expr {
        Expr::Variable(name) => Ok(name.clone()),
        other => match Evaluator::eval(other, context)? {
            Value::String(name) => Ok(name),
            v => Err(Error::naming(format!(
                "Argument {} must be a name, got {}",
                position,
                v.type_name()
            ))),
        },
    }
}

/// Destructure the `(name, value)` pairs of a `LET` call, leaving the values
/// unevaluated. `pairs` excludes the trailing calculation.
pub fn let_bindings<'a>(pairs: &'a [Expr], context: &dyn EvaluationContext) -> Result<Vec<NameBinding<'a>>, Error> {
    let mut bindings = Vec::with_capacity(pairs.len() / 2);
    for (i, pair) in pairs.chunks(2).enumerate() {
        let position = 2 * i + 1;
        let name = extract_name(&pair[0], position, context)?;
        let value = pair
            .get(1)
            .ok_or_else(|| Error::arity("Missing final computed value/expression"))?;
        bindings.push(NameBinding::deferred(name, position, value));
    }
    Ok(bindings)
}

/// Extract and validate the parameter names of a `LAMBDA` call. `params`
/// excludes the trailing body.
pub fn lambda_parameters(params: &[Expr], context: &dyn EvaluationContext) -> Result<Vec<String>, Error> {
    let names = params
        .iter()
        .enumerate()
        .map(|(i, p)| extract_name(p, i + 1, context))
        .collect::<Result<Vec<_>, _>>()?;
    validate_names(
        names.iter().enumerate().map(|(i, n)| (n.as_str(), i + 1)),
        context.case_sensitivity(),
    )?;
    Ok(names)
}
