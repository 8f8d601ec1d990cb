use crate::ast::Expr;
use crate::config::CaseSensitivity;
use crate::error::Error;
use crate::runtime::Evaluator;
use crate::traits::{EvaluationContext, Function};
use crate::types::Value;
use std::cell::OnceCell;
use std::sync::Arc;

/// Reserved for member access; never valid inside a binding name.
pub const NAME_SEPARATOR: char = '.';

/// Scopes nested deeper than this fail instead of overflowing the stack.
pub const MAX_SCOPE_DEPTH: usize = 64;

/// What a binding holds before it is first looked up.
#[derive(Debug, Clone)]
pub enum RawValue<'a> {
    /// Evaluated on first access (`LET` values).
    Deferred(&'a Expr),
    /// Already evaluated by the caller (`LAMBDA` arguments).
    Ready(Value),
}

#[derive(Debug)]
pub struct NameBinding<'a> {
    name: String,
    position: usize,
    raw: RawValue<'a>,
    memo: OnceCell<Value>,
}

impl<'a> NameBinding<'a> {
    pub fn deferred(name: String, position: usize, expr: &'a Expr) -> Self {
        Self { name, position, raw: RawValue::Deferred(expr), memo: OnceCell::new() }
    }

    pub fn ready(name: String, position: usize, value: Value) -> Self {
        Self { name, position, raw: RawValue::Ready(value), memo: OnceCell::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 1-based argument position of the name in the call that introduced it.
    pub fn position(&self) -> usize {
        self.position
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check a set of `(name, position)` pairs: each must be an identifier free of
/// the separator, and no two may be equal under `policy`.
pub fn validate_names<'n, I>(names: I, policy: CaseSensitivity) -> Result<(), Error>
where
    I: IntoIterator<Item = (&'n str, usize)>,
{
    let mut seen: Vec<&str> = Vec::new();
    for (name, position) in names {
        if name.contains(NAME_SEPARATOR) {
            return Err(Error::naming(format!(
                "Name '{}' at argument {} must not contain '{}'",
                name, position, NAME_SEPARATOR
            )));
        }
        if !is_identifier(name) {
            return Err(Error::naming(format!("Invalid name '{}' at argument {}", name, position)));
        }
        if seen.iter().any(|prev| policy.names_equal(prev, name)) {
            return Err(Error::naming(format!("Duplicate name '{}' at argument {}", name, position)));
        }
        seen.push(name);
    }
    Ok(())
}

/// A scope layer introducing read-only bindings over a parent context.
///
/// Lookup checks the local bindings first and then the parent. Function
/// resolution refuses names that are bound here, since a bound value is
/// never callable by name. Everything else is answered by the parent.
pub struct EnvironmentContext<'a> {
    parent: &'a dyn EvaluationContext,
    bindings: &'a [NameBinding<'a>],
    depth: usize,
}

impl<'a> EnvironmentContext<'a> {
    pub fn push(parent: &'a dyn EvaluationContext, bindings: &'a [NameBinding<'a>]) -> Result<Self, Error> {
        let depth = parent.scope_depth() + 1;
        if depth > MAX_SCOPE_DEPTH {
            return Err(Error::new(format!("Scope nesting exceeds {} levels", MAX_SCOPE_DEPTH), None));
        }
        validate_names(bindings.iter().map(|b| (b.name(), b.position())), parent.case_sensitivity())?;
        tracing::debug!(
            depth,
            names = ?bindings.iter().map(NameBinding::name).collect::<Vec<_>>(),
            "pushed scope"
        );
        Ok(Self { parent, bindings, depth })
    }

    fn find(&self, name: &str) -> Option<usize> {
        let policy = self.parent.case_sensitivity();
        self.bindings.iter().position(|b| policy.names_equal(&b.name, name))
    }

    fn collision(&self, name: &str) -> Result<(), Error> {
        match self.find(name) {
            Some(_) => Err(Error::naming(format!(
                "Function name '{}' is a named value, not an actual function",
                name
            ))),
            None => Ok(()),
        }
    }

    /// The view a deferred value is evaluated in: only the bindings declared before it.
    fn prefix(&self, index: usize) -> EnvironmentContext<'a> {
        EnvironmentContext {
            parent: self.parent,
            bindings: &self.bindings[..index],
            depth: self.depth,
        }
    }

    fn binding_is_pure(&self, index: usize) -> bool {
        match &self.bindings[index].raw {
            RawValue::Ready(_) => true,
            RawValue::Deferred(expr) => Evaluator::is_pure(expr, &self.prefix(index)).unwrap_or(false),
        }
    }

    fn value_of(&self, index: usize) -> Result<Value, Error> {
        let binding = &self.bindings[index];
        if let Some(cached) = binding.memo.get() {
            return Ok(cached.clone());
        }
        match &binding.raw {
            RawValue::Ready(value) => Ok(value.clone()),
            RawValue::Deferred(expr) => {
                let scope = self.prefix(index);
                let value = Evaluator::eval(expr, &scope)?;
                let pure = Evaluator::is_pure(expr, &scope).unwrap_or(false);
                tracing::trace!(name = %binding.name, pure, "evaluated binding");
                if pure {
                    let _ = binding.memo.set(value.clone());
                }
                Ok(value)
            }
        }
    }
}

impl EvaluationContext for EnvironmentContext<'_> {
    fn parent(&self) -> Option<&dyn EvaluationContext> {
        Some(self.parent)
    }

    fn lookup(&self, name: &str) -> Result<Value, Error> {
        match self.find(name) {
            Some(index) => self.value_of(index),
            None => self.parent.lookup(name),
        }
    }

    fn is_name_pure(&self, name: &str) -> bool {
        match self.find(name) {
            Some(index) => self.binding_is_pure(index),
            None => self.parent.is_name_pure(name),
        }
    }

    fn resolve_function(&self, name: &str) -> Result<Option<Arc<dyn Function>>, Error> {
        self.collision(name)?;
        self.parent.resolve_function(name)
    }

    fn is_pure(&self, name: &str) -> Result<bool, Error> {
        self.collision(name)?;
        self.parent.is_pure(name)
    }

    fn scope_depth(&self) -> usize {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concurrent_registry::FunctionRegistry;
    use crate::config::EngineConfig;
    use crate::error::ErrorKind;
    use crate::runtime::VariableContext;
    use std::collections::HashMap;

    fn root_vars() -> HashMap<String, Value> {
        let mut vars = HashMap::new();
        vars.insert("base".to_string(), Value::Number(1.0));
        vars
    }

    #[test]
    fn local_binding_shadows_parent() {
        let vars = root_vars();
        let root = VariableContext::new(&vars, Arc::new(FunctionRegistry::with_builtins()));
        let bindings = vec![NameBinding::ready("base".into(), 1, Value::Number(5.0))];
        let scope = EnvironmentContext::push(&root, &bindings).unwrap();
        assert_eq!(scope.lookup("base").unwrap(), Value::Number(5.0));
        assert_eq!(root.lookup("base").unwrap(), Value::Number(1.0));
        assert_eq!(scope.lookup("other").unwrap_err().kind, ErrorKind::UnresolvedReference);
    }

    #[test]
    fn later_binding_sees_earlier_one() {
        let vars = root_vars();
        let root = VariableContext::new(&vars, Arc::new(FunctionRegistry::with_builtins()));
        let first = crate::parse("base + 1").unwrap();
        let second = crate::parse("a * 10").unwrap();
        let bindings = vec![
            NameBinding::deferred("a".into(), 1, &first),
            NameBinding::deferred("b".into(), 3, &second),
        ];
        let scope = EnvironmentContext::push(&root, &bindings).unwrap();
        assert_eq!(scope.lookup("b").unwrap(), Value::Number(20.0));
    }

    #[test]
    fn self_reference_resolves_outward() {
        let vars = root_vars();
        let root = VariableContext::new(&vars, Arc::new(FunctionRegistry::with_builtins()));
        let expr = crate::parse("base + 100").unwrap();
        let bindings = vec![NameBinding::deferred("base".into(), 1, &expr)];
        let scope = EnvironmentContext::push(&root, &bindings).unwrap();
        assert_eq!(scope.lookup("base").unwrap(), Value::Number(101.0));
    }

    #[test]
    fn duplicate_names_cite_second_position() {
        let err = validate_names([("D", 1), ("D", 3)], CaseSensitivity::Sensitive).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Naming);
        assert_eq!(err.message, "Duplicate name 'D' at argument 3");
        assert!(validate_names([("d", 1), ("D", 3)], CaseSensitivity::Sensitive).is_ok());
        assert!(validate_names([("d", 1), ("D", 3)], CaseSensitivity::Insensitive).is_err());
    }

    #[test]
    fn separator_and_shape_are_checked() {
        let err = validate_names([("a.b", 1)], CaseSensitivity::Sensitive).unwrap_err();
        assert_eq!(err.message, "Name 'a.b' at argument 1 must not contain '.'");
        let err = validate_names([("9lives", 5)], CaseSensitivity::Sensitive).unwrap_err();
        assert_eq!(err.message, "Invalid name '9lives' at argument 5");
        assert!(validate_names([("", 1)], CaseSensitivity::Sensitive).is_err());
    }

    #[test]
    fn bound_name_cannot_be_called() {
        let vars = HashMap::new();
        let root = VariableContext::new(&vars, Arc::new(FunctionRegistry::with_builtins()));
        let bindings = vec![NameBinding::ready("sum".into(), 1, Value::Number(1.0))];
        let scope = EnvironmentContext::push(&root, &bindings).unwrap();
        assert!(scope.resolve_function("SUM").unwrap().is_some());
        let err = scope.resolve_function("sum").err().unwrap();
        assert_eq!(err.message, "Function name 'sum' is a named value, not an actual function");
        assert!(scope.is_pure("sum").is_err());
    }

    #[test]
    fn insensitive_policy_applies_to_collisions() {
        let vars = HashMap::new();
        let config = EngineConfig { case_sensitivity: CaseSensitivity::Insensitive, ..EngineConfig::default() };
        let root = VariableContext::new(&vars, Arc::new(FunctionRegistry::with_builtins())).with_config(config);
        let bindings = vec![NameBinding::ready("sum".into(), 1, Value::Number(1.0))];
        let scope = EnvironmentContext::push(&root, &bindings).unwrap();
        assert_eq!(scope.resolve_function("SUM").err().unwrap().kind, ErrorKind::Naming);
        assert_eq!(scope.lookup("Sum").unwrap(), Value::Number(1.0));
    }
}
