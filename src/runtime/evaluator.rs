use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::concurrent_registry::FunctionRegistry;
use crate::config::{CaseSensitivity, EngineConfig, Separators};
use crate::error::Error;
use crate::runtime::scoping::invoke_lambda;
use crate::runtime::utils::values_equal;
use crate::traits::{EvaluationContext, Function};
use crate::types::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

/// Root context: caller-supplied variables, a function registry and the
/// engine configuration.
pub struct VariableContext<'a> {
    variables: Cow<'a, HashMap<String, Value>>,
    registry: Arc<FunctionRegistry>,
    config: EngineConfig,
}

impl<'a> VariableContext<'a> {
    pub fn new(vars: &'a HashMap<String, Value>, registry: Arc<FunctionRegistry>) -> Self {
        Self {
            variables: Cow::Borrowed(vars),
            registry,
            config: EngineConfig::default(),
        }
    }

    pub fn with_owned(vars: HashMap<String, Value>, registry: Arc<FunctionRegistry>) -> Self {
        Self {
            variables: Cow::Owned(vars),
            registry,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &Arc<FunctionRegistry> {
        &self.registry
    }
}

impl EvaluationContext for VariableContext<'_> {
    fn lookup(&self, name: &str) -> Result<Value, Error> {
        let found = match self.config.case_sensitivity {
            CaseSensitivity::Sensitive => self.variables.get(name),
            policy => self
                .variables
                .iter()
                .find(|(key, _)| policy.names_equal(key, name))
                .map(|(_, value)| value),
        };
        found.cloned().ok_or_else(|| Error::unresolved(name))
    }

    fn resolve_function(&self, name: &str) -> Result<Option<Arc<dyn Function>>, Error> {
        Ok(self.registry.get(name))
    }

    fn is_pure(&self, name: &str) -> Result<bool, Error> {
        self.registry
            .get(name)
            .map(|f| f.is_pure())
            .ok_or_else(|| Error::new(format!("Unknown function: {}", name), None))
    }

    fn case_sensitivity(&self) -> CaseSensitivity {
        self.config.case_sensitivity
    }

    fn separators(&self) -> Separators {
        self.config.separators
    }
}

/// Standard parameter preparation: evaluate each argument in order and
/// expand `...spread` arrays in place.
pub fn prepare_arguments(args: &[Expr], context: &dyn EvaluationContext) -> Result<Vec<Value>, Error> {
    let mut out = Vec::with_capacity(args.len());
    for a in args {
        match a {
            Expr::Spread(inner) => match Evaluator::eval(inner, context)? {
                Value::Array(items) => out.extend(items),
                _ => return Err(Error::new("Spread expects array", None)),
            },
            _ => out.push(Evaluator::eval(a, context)?),
        }
    }
    Ok(out)
}

pub struct Evaluator;

impl Evaluator {
    pub fn eval(expr: &Expr, context: &dyn EvaluationContext) -> Result<Value, Error> {
        match expr {
            Expr::Literal(v) => Ok(v.clone()),
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::StringLit(s) => Ok(Value::String(s.clone())),
            Expr::Null => Ok(Value::Null),

            Expr::Unary(op, e) => {
                let v = Self::eval(e, context)?;
                Self::unary_op(*op, v)
            }

            Expr::Binary(l, op, r) => {
                let a = Self::eval(l, context)?;
                let b = Self::eval(r, context)?;
                Self::binary_op(*op, a, b)
            }

            Expr::Variable(name) => context.lookup(name),

            Expr::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for e in items {
                    out.push(Self::eval(e, context)?);
                }
                Ok(Value::Array(out))
            }

            Expr::TypeCast { expr, ty } => {
                let v = Self::eval(expr, context)?;
                context.convert(v, ty)
            }

            Expr::FunctionCall { name, args } => {
                let function = context
                    .resolve_function(name)?
                    .ok_or_else(|| Error::new(format!("Unknown function: {}", name), None))?;
                function.apply(args, context)
            }

            Expr::Invoke { target, args } => match Self::eval(target, context)? {
                Value::Lambda(lambda) => invoke_lambda(&lambda, args, context),
                other => Err(Error::new(format!("{} is not callable", other.type_name()), None)),
            },

            Expr::Spread(_) => Err(Error::new("Spread not allowed here", None)),
        }
    }

    /// Whether evaluating `expr` can only call pure functions.
    /// Invocations are treated as impure since the callee is only known at run time.
    pub fn is_pure(expr: &Expr, context: &dyn EvaluationContext) -> Result<bool, Error> {
        Ok(match expr {
            Expr::Literal(_) | Expr::Number(_) | Expr::StringLit(_) | Expr::Null => true,
            Expr::Variable(name) => context.is_name_pure(name),
            Expr::Unary(_, e) | Expr::Spread(e) | Expr::TypeCast { expr: e, .. } => Self::is_pure(e, context)?,
            Expr::Binary(l, _, r) => Self::is_pure(l, context)? && Self::is_pure(r, context)?,
            Expr::Array(items) => Self::all_pure(items, context)?,
            Expr::FunctionCall { name, args } => context.is_pure(name)? && Self::all_pure(args, context)?,
            Expr::Invoke { .. } => false,
        })
    }

    fn all_pure(exprs: &[Expr], context: &dyn EvaluationContext) -> Result<bool, Error> {
        for e in exprs {
            if !Self::is_pure(e, context)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn unary_op(op: UnaryOp, v: Value) -> Result<Value, Error> {
        match op {
            UnaryOp::Plus => Ok(Value::Number(v.as_number().ok_or_else(|| Error::new("Unary '+' on non-number", None))?)),
            UnaryOp::Minus => Ok(Value::Number(-v.as_number().ok_or_else(|| Error::new("Unary '-' on non-number", None))?)),
            UnaryOp::Not => Ok(Value::Boolean(!v.as_bool().ok_or_else(|| Error::new("Unary '!' on non-boolean", None))?)),
        }
    }

    /// Apply a binary operator to two evaluated operands.
    ///
    /// Equality is structural across all types; ordering is only defined
    /// between two numbers, two strings or two booleans (FALSE < TRUE).
    pub fn binary_op(op: BinaryOp, a: Value, b: Value) -> Result<Value, Error> {
        match op {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod | BinaryOp::Pow => {
                let an = a.as_number().ok_or_else(|| Error::new("Arithmetic op on non-number", None))?;
                let bn = b.as_number().ok_or_else(|| Error::new("Arithmetic op on non-number", None))?;
                Ok(Value::Number(match op {
                    BinaryOp::Add => an + bn,
                    BinaryOp::Sub => an - bn,
                    BinaryOp::Mul => an * bn,
                    BinaryOp::Div => an / bn,
                    BinaryOp::Mod => an % bn,
                    _ => an.powf(bn),
                }))
            }
            BinaryOp::Eq => Ok(Value::Boolean(values_equal(&a, &b))),
            BinaryOp::Ne => Ok(Value::Boolean(!values_equal(&a, &b))),
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                let ordering = match (&a, &b) {
                    (Value::Number(x), Value::Number(y)) => x.partial_cmp(y),
                    (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
                    (Value::Boolean(x), Value::Boolean(y)) => Some(x.cmp(y)),
                    _ => {
                        return Err(Error::new(
                            format!("Comparison of incompatible types: {} and {}", a.type_name(), b.type_name()),
                            None,
                        ))
                    }
                };
                Ok(Value::Boolean(match ordering {
                    Some(o) => match op {
                        BinaryOp::Lt => o.is_lt(),
                        BinaryOp::Le => o.is_le(),
                        BinaryOp::Gt => o.is_gt(),
                        _ => o.is_ge(),
                    },
                    None => false,
                }))
            }
            BinaryOp::And | BinaryOp::Or => {
                let ab = a.as_bool().ok_or_else(|| Error::new("Logical op on non-boolean", None))?;
                let bb = b.as_bool().ok_or_else(|| Error::new("Logical op on non-boolean", None))?;
                Ok(Value::Boolean(match op {
                    BinaryOp::And => ab && bb,
                    _ => ab || bb,
                }))
            }
        }
    }
}
