use crate::ast::{Expr, TypeName};
use crate::config::{CaseSensitivity, Separators};
use crate::error::Error;
use crate::types::Value;
use std::sync::Arc;

/// Capabilities an expression can use while it is evaluated.
///
/// Contexts form a chain. Every method except [`parent`](Self::parent) has a
/// default that forwards to the parent, so a wrapping context only overrides
/// what it changes. A context without a parent is a root and must answer
/// everything itself.
pub trait EvaluationContext {
    /// The enclosing context, `None` for a root.
    fn parent(&self) -> Option<&dyn EvaluationContext> {
        None
    }

    /// Resolve a name to a value.
    fn lookup(&self, name: &str) -> Result<Value, Error> {
        match self.parent() {
            Some(parent) => parent.lookup(name),
            None => Err(Error::unresolved(name)),
        }
    }

    /// Resolve a function by name. `Ok(None)` means no such function.
    fn resolve_function(&self, name: &str) -> Result<Option<Arc<dyn Function>>, Error> {
        match self.parent() {
            Some(parent) => parent.resolve_function(name),
            None => Ok(None),
        }
    }

    /// Whether the named function is free of side effects.
    fn is_pure(&self, name: &str) -> Result<bool, Error> {
        match self.parent() {
            Some(parent) => parent.is_pure(name),
            None => Err(Error::new(format!("Unknown function: {}", name), None)),
        }
    }

    /// Whether reading `name` is free of side effects. Names bound to an
    /// expression are as pure as that expression; root variables always are.
    fn is_name_pure(&self, name: &str) -> bool {
        self.parent().map(|p| p.is_name_pure(name)).unwrap_or(true)
    }

    fn case_sensitivity(&self) -> CaseSensitivity {
        self.parent().map(|p| p.case_sensitivity()).unwrap_or_default()
    }

    fn separators(&self) -> Separators {
        self.parent().map(|p| p.separators()).unwrap_or_default()
    }

    /// Number of scope layers between this context and the root.
    fn scope_depth(&self) -> usize {
        self.parent().map(|p| p.scope_depth()).unwrap_or(0)
    }

    /// Parse formula text into an expression.
    fn parse(&self, text: &str) -> Result<Expr, Error> {
        match self.parent() {
            Some(parent) => parent.parse(text),
            None => crate::parse(text),
        }
    }

    /// Convert a value to another type.
    fn convert(&self, value: Value, ty: &TypeName) -> Result<Value, Error> {
        match self.parent() {
            Some(parent) => parent.convert(value, ty),
            None => crate::runtime::cast_value(value, ty),
        }
    }
}

/// How an argument position is treated before a function sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// An identifier that introduces a binding; never evaluated.
    Name,
    /// Evaluated eagerly by the standard preparation path.
    Value,
    /// Evaluated on first use inside the scope it belongs to.
    Lazy,
    /// The trailing expression evaluated against the new scope.
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub kind: ParameterKind,
}

impl Parameter {
    pub fn new<N: Into<String>>(name: N, kind: ParameterKind) -> Self {
        Self { name: name.into(), kind }
    }
}

/// A callable formula function.
///
/// Functions receive their arguments unevaluated so that constructs such as
/// `LET` can decide what to evaluate and when. Functions that only want
/// values go through [`prepare_arguments`](crate::runtime::prepare_arguments).
pub trait Function: Send + Sync {
    fn name(&self) -> &str;

    /// Describe the parameters for a call with `argument_count` arguments.
    /// Fails with an arity error when that count is not accepted.
    fn parameter_shape(&self, argument_count: usize) -> Result<Vec<Parameter>, Error>;

    fn is_pure(&self) -> bool {
        true
    }

    fn apply(&self, args: &[Expr], context: &dyn EvaluationContext) -> Result<Value, Error>;
}
