use crate::ast::Expr;
use crate::error::Error;
use crate::runtime::criteria::CriteriaPredicate;
use crate::runtime::utils::into_list;
use crate::runtime::prepare_arguments;
use crate::traits::{EvaluationContext, Function, Parameter, ParameterKind};
use crate::types::Value;
use std::sync::Arc;

/// `SUMIF`-style function: filter a range through a criteria operand and
/// hand what is left to a reducer.
pub struct AggregateIf {
    name: &'static str,
    reducer: Arc<dyn Function>,
    accepts_value_range: bool,
}

impl AggregateIf {
    pub fn new(name: &'static str, reducer: Arc<dyn Function>) -> Self {
        Self { name, reducer, accepts_value_range: true }
    }

    /// Only `range` and `criteria`; no paired value range.
    pub fn without_value_range(mut self) -> Self {
        self.accepts_value_range = false;
        self
    }
}

impl Function for AggregateIf {
    fn name(&self) -> &str {
        self.name
    }

    fn parameter_shape(&self, argument_count: usize) -> Result<Vec<Parameter>, Error> {
        let max = if self.accepts_value_range { 3 } else { 2 };
        if argument_count < 2 || argument_count > max {
            let expected = if self.accepts_value_range { "2 or 3" } else { "2" };
            return Err(Error::arity(format!(
                "{} expects {} arguments, got {}",
                self.name, expected, argument_count
            )));
        }
        let mut shape = vec![
            Parameter::new("range", ParameterKind::Value),
            Parameter::new("criteria", ParameterKind::Value),
        ];
        if argument_count == 3 {
            shape.push(Parameter::new("value_range", ParameterKind::Value));
        }
        Ok(shape)
    }

    fn is_pure(&self) -> bool {
        self.reducer.is_pure()
    }

    fn apply(&self, args: &[Expr], context: &dyn EvaluationContext) -> Result<Value, Error> {
        let args = prepare_arguments(args, context)?;
        self.parameter_shape(args.len())?;
        let mut args = args.into_iter();
        let candidates = args.next().map(into_list).unwrap_or_default();
        let criteria = args.next().unwrap_or(Value::Null);
        let values = args.next().map(into_list);
        let result = apply_if(self.reducer.as_ref(), candidates, values, &criteria, context);
        tracing::debug!(function = self.name, ok = result.is_ok(), "aggregate-if finished");
        result
    }
}

/// Keep the candidates the criteria accepts, in order, and reduce them.
///
/// With `values`, the element paired with each accepted candidate is reduced
/// instead; the two lists are truncated to the shorter one.
pub fn apply_if(
    reducer: &dyn Function,
    candidates: Vec<Value>,
    values: Option<Vec<Value>>,
    criteria: &Value,
    context: &dyn EvaluationContext,
) -> Result<Value, Error> {
    let predicate = CriteriaPredicate::compile(criteria, context)?;
    let total = candidates.len();
    let mut kept = Vec::new();
    match values {
        None => {
            for candidate in candidates {
                if predicate.test(&candidate, context)? {
                    kept.push(candidate);
                }
            }
        }
        Some(values) => {
            for (candidate, value) in candidates.iter().zip(values) {
                if predicate.test(candidate, context)? {
                    kept.push(value);
                }
            }
        }
    }
    tracing::debug!(reducer = reducer.name(), kept = kept.len(), total, "filtered candidates");
    reducer.apply(&[Expr::Literal(Value::Array(kept))], context)
}
