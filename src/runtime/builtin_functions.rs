use super::aggregate_if::AggregateIf;
use super::arithmetic::{self, Reducer};
use super::scoping::{LambdaFunction, LetFunction};
use crate::concurrent_registry::FunctionRegistry;
use crate::traits::Function;
use std::sync::Arc;

/// Every function available without registration.
pub fn builtin_functions() -> Vec<Arc<dyn Function>> {
    let sum: Arc<dyn Function> = Arc::new(Reducer::new("SUM", arithmetic::sum));
    let counta: Arc<dyn Function> = Arc::new(Reducer::new("COUNTA", arithmetic::counta));
    let average: Arc<dyn Function> = Arc::new(Reducer::new("AVERAGE", arithmetic::average));
    let max: Arc<dyn Function> = Arc::new(Reducer::new("MAX", arithmetic::max));
    let min: Arc<dyn Function> = Arc::new(Reducer::new("MIN", arithmetic::min));

    let functions: [Arc<dyn Function>; 15] = [
        Arc::clone(&sum),
        Arc::new(Reducer::new("COUNT", arithmetic::count)),
        Arc::clone(&counta),
        Arc::clone(&average),
        Arc::new(Reducer::new("AVG", arithmetic::average)),
        Arc::clone(&max),
        Arc::clone(&min),
        Arc::new(AggregateIf::new("SUMIF", sum)),
        Arc::new(AggregateIf::new("COUNTIF", counta).without_value_range()),
        Arc::new(AggregateIf::new("AVERAGEIF", Arc::clone(&average))),
        Arc::new(AggregateIf::new("AVGIF", average)),
        Arc::new(AggregateIf::new("MAXIF", max)),
        Arc::new(AggregateIf::new("MINIF", min)),
        Arc::new(LetFunction),
        Arc::new(LambdaFunction),
    ];
    functions.into()
}

pub fn register_builtins(registry: &FunctionRegistry) {
    for function in builtin_functions() {
        if let Err(e) = registry.register(function) {
            tracing::warn!(error = %e, "skipping builtin");
        }
    }
}
