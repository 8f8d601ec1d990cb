use crate::ast::Expr;
use crate::error::Error;
use crate::runtime::binder::{lambda_parameters, lambda_shape, let_bindings, let_shape};
use crate::runtime::environment::{EnvironmentContext, NameBinding};
use crate::runtime::{prepare_arguments, Evaluator};
use crate::traits::{EvaluationContext, Function, Parameter};
use crate::types::{Lambda, Value};
use std::sync::Arc;

/// `LET(name1, value1, …, calculation)`.
pub struct LetFunction;

impl Function for LetFunction {
    fn name(&self) -> &str {
        "LET"
    }

    fn parameter_shape(&self, argument_count: usize) -> Result<Vec<Parameter>, Error> {
        let_shape(argument_count)
    }

    fn apply(&self, args: &[Expr], context: &dyn EvaluationContext) -> Result<Value, Error> {
        let_shape(args.len())?;
        let Some((body, pairs)) = args.split_last() else {
            return Err(Error::arity("Missing computed value/expression"));
        };
        if pairs.is_empty() {
            return Evaluator::eval(body, context);
        }
        let bindings = let_bindings(pairs, context)?;
        let scope = EnvironmentContext::push(context, &bindings)?;
        Evaluator::eval(body, &scope)
    }
}

/// `LAMBDA(param1, …, calculation)`, producing a callable value.
pub struct LambdaFunction;

impl Function for LambdaFunction {
    fn name(&self) -> &str {
        "LAMBDA"
    }

    fn parameter_shape(&self, argument_count: usize) -> Result<Vec<Parameter>, Error> {
        lambda_shape(argument_count)
    }

    fn apply(&self, args: &[Expr], context: &dyn EvaluationContext) -> Result<Value, Error> {
        lambda_shape(args.len())?;
        let Some((body, params)) = args.split_last() else {
            return Err(Error::arity("Missing last parameter with expression"));
        };
        let params = lambda_parameters(params, context)?;
        tracing::trace!(?params, "created lambda");
        Ok(Value::Lambda(Arc::new(Lambda::new(params, body.clone()))))
    }
}

/// Call a lambda value. Arguments are evaluated in the caller's context and
/// the body runs in a scope pushed onto that same context.
pub fn invoke_lambda(lambda: &Lambda, args: &[Expr], context: &dyn EvaluationContext) -> Result<Value, Error> {
    let values = prepare_arguments(args, context)?;
    if values.len() != lambda.params.len() {
        return Err(Error::arity(format!(
            "LAMBDA expects {} argument(s), got {}",
            lambda.params.len(),
            values.len()
        )));
    }
    let bindings: Vec<NameBinding> = lambda
        .params
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (name, value))| NameBinding::ready(name.clone(), i + 1, value))
        .collect();
    let scope = EnvironmentContext::push(context, &bindings)?;
    Evaluator::eval(&lambda.body, &scope)
}
