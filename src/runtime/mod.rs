pub mod aggregate_if;
pub mod arithmetic;
pub mod binder;
pub mod builtin_functions;
pub mod criteria;
pub mod environment;
pub mod evaluator;
pub mod scoping;
pub mod type_casting;
pub mod utils;
pub mod wildcard;

// Re-export the main public items
pub use aggregate_if::{apply_if, AggregateIf};
pub use criteria::CriteriaPredicate;
pub use environment::{EnvironmentContext, NameBinding, RawValue, NAME_SEPARATOR};
pub use evaluator::{prepare_arguments, Evaluator, VariableContext};
pub use scoping::{invoke_lambda, LambdaFunction, LetFunction};
pub use type_casting::cast_value;
pub use utils::values_equal;
