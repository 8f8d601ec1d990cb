use crate::ast::Expr;
use crate::error::Error;
use crate::runtime::prepare_arguments;
use crate::traits::{EvaluationContext, Function, Parameter, ParameterKind};
use crate::types::Value;

/// Trait for implementing custom functions over evaluated values
///
/// # Example
/// ```rust
/// use formlet::custom::CustomFunction;
/// use formlet::{Value, Error};
///
/// struct DoubleFunction;
///
/// impl CustomFunction for DoubleFunction {
///     fn name(&self) -> &str { "DOUBLE" }
///     fn min_args(&self) -> usize { 1 }
///     fn max_args(&self) -> Option<usize> { Some(1) }
///
///     fn execute(&self, args: Vec<Value>) -> Result<Value, Error> {
///         let num = args[0].as_number()
///             .ok_or_else(|| Error::new("DOUBLE expects a number", None))?;
///         Ok(Value::Number(num * 2.0))
///     }
/// }
/// ```
pub trait CustomFunction: Send + Sync {
    /// The name of the function (case-insensitive)
    fn name(&self) -> &str;

    /// Minimum number of arguments required
    fn min_args(&self) -> usize;

    /// Maximum number of arguments allowed (None = unlimited)
    fn max_args(&self) -> Option<usize>;

    /// Execute the function with the given arguments
    fn execute(&self, args: Vec<Value>) -> Result<Value, Error>;

    /// Whether calls may be cached; return false for functions with side effects
    fn is_pure(&self) -> bool { true }

    /// Optional: Description of the function for documentation
    fn description(&self) -> Option<&str> { None }

    /// Optional: Example usage for documentation
    fn example(&self) -> Option<&str> { None }
}

/// Exposes a [`CustomFunction`] through the [`Function`] interface.
pub struct CustomFunctionAdapter {
    inner: Box<dyn CustomFunction>,
}

impl CustomFunctionAdapter {
    pub fn new(inner: Box<dyn CustomFunction>) -> Result<Self, Error> {
        if inner.name().is_empty() {
            return Err(Error::new("Function name cannot be empty", None));
        }
        if inner.min_args() > inner.max_args().unwrap_or(usize::MAX) {
            return Err(Error::new("min_args cannot be greater than max_args", None));
        }
        Ok(Self { inner })
    }

    pub fn description(&self) -> Option<&str> {
        self.inner.description()
    }

    pub fn example(&self) -> Option<&str> {
        self.inner.example()
    }
}

impl Function for CustomFunctionAdapter {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn parameter_shape(&self, argument_count: usize) -> Result<Vec<Parameter>, Error> {
        let name = self.inner.name();
        if argument_count < self.inner.min_args() {
            return Err(Error::arity(format!(
                "{} expects at least {} arguments, got {}",
                name,
                self.inner.min_args(),
                argument_count
            )));
        }
        if let Some(max_args) = self.inner.max_args() {
            if argument_count > max_args {
                return Err(Error::arity(format!(
                    "{} expects at most {} arguments, got {}",
                    name, max_args, argument_count
                )));
            }
        }
        Ok((1..=argument_count)
            .map(|i| Parameter::new(format!("arg{}", i), ParameterKind::Value))
            .collect())
    }

    fn is_pure(&self) -> bool {
        self.inner.is_pure()
    }

    fn apply(&self, args: &[Expr], context: &dyn EvaluationContext) -> Result<Value, Error> {
        let values = prepare_arguments(args, context)?;
        // Spreads can change the count, so validate what the function will actually see
        self.parameter_shape(values.len())?;
        self.inner.execute(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    struct TestFunction;

    impl CustomFunction for TestFunction {
        fn name(&self) -> &str { "TEST" }
        fn min_args(&self) -> usize { 1 }
        fn max_args(&self) -> Option<usize> { Some(2) }

        fn execute(&self, args: Vec<Value>) -> Result<Value, Error> {
            Ok(Value::String(format!("Called with {} args", args.len())))
        }

        fn description(&self) -> Option<&str> { Some("A test function") }
        fn example(&self) -> Option<&str> { Some("TEST(1, 2)") }
    }

    struct Inverted;

    impl CustomFunction for Inverted {
        fn name(&self) -> &str { "INVERTED" }
        fn min_args(&self) -> usize { 3 }
        fn max_args(&self) -> Option<usize> { Some(1) }
        fn execute(&self, _args: Vec<Value>) -> Result<Value, Error> { Ok(Value::Null) }
    }

    #[test]
    fn shape_follows_min_and_max() {
        let f = CustomFunctionAdapter::new(Box::new(TestFunction)).unwrap();
        assert_eq!(f.parameter_shape(2).unwrap().len(), 2);
        assert_eq!(f.parameter_shape(0).unwrap_err().kind, ErrorKind::Arity);
        assert_eq!(f.parameter_shape(3).unwrap_err().kind, ErrorKind::Arity);
        assert_eq!(f.description(), Some("A test function"));
        assert_eq!(f.example(), Some("TEST(1, 2)"));
    }

    #[test]
    fn inconsistent_bounds_are_rejected() {
        assert!(CustomFunctionAdapter::new(Box::new(Inverted)).is_err());
    }
}
