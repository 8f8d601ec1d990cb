use crate::ast::Expr;
use crate::error::Error;
use crate::runtime::prepare_arguments;
use crate::runtime::utils::{collect_numbers, count_present};
use crate::traits::{EvaluationContext, Function, Parameter, ParameterKind};
use crate::types::Value;

/// A variadic aggregate over evaluated arguments. Arrays are flattened.
pub struct Reducer {
    name: &'static str,
    reduce: fn(&[Value]) -> Result<Value, Error>,
}

impl Reducer {
    pub const fn new(name: &'static str, reduce: fn(&[Value]) -> Result<Value, Error>) -> Self {
        Self { name, reduce }
    }
}

impl Function for Reducer {
    fn name(&self) -> &str {
        self.name
    }

    fn parameter_shape(&self, argument_count: usize) -> Result<Vec<Parameter>, Error> {
        Ok((1..=argument_count)
            .map(|i| Parameter::new(format!("value{}", i), ParameterKind::Value))
            .collect())
    }

    fn apply(&self, args: &[Expr], context: &dyn EvaluationContext) -> Result<Value, Error> {
        let values = prepare_arguments(args, context)?;
        (self.reduce)(&values)
    }
}

pub fn sum(values: &[Value]) -> Result<Value, Error> {
    Ok(Value::Number(collect_numbers(values).iter().sum()))
}

pub fn count(values: &[Value]) -> Result<Value, Error> {
    Ok(Value::Number(collect_numbers(values).len() as f64))
}

pub fn counta(values: &[Value]) -> Result<Value, Error> {
    Ok(Value::Number(count_present(values) as f64))
}

pub fn average(values: &[Value]) -> Result<Value, Error> {
    let nums = collect_numbers(values);
    if nums.is_empty() {
        return Err(Error::new("AVERAGE of an empty set", None));
    }
    Ok(Value::Number(nums.iter().sum::<f64>() / nums.len() as f64))
}

pub fn max(values: &[Value]) -> Result<Value, Error> {
    let nums = collect_numbers(values);
    Ok(Value::Number(nums.into_iter().reduce(f64::max).unwrap_or(0.0)))
}

pub fn min(values: &[Value]) -> Result<Value, Error> {
    let nums = collect_numbers(values);
    Ok(Value::Number(nums.into_iter().reduce(f64::min).unwrap_or(0.0)))
}
