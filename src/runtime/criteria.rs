//! Criteria operands of the `*IF` functions.
//!
//! A non-text operand matches candidates equal to it. Text starting with a
//! comparison operator compares each candidate against the expression after
//! the operator. Any other text is a glob matched against the candidate's
//! text form.

use crate::ast::{BinaryOp, Expr, TypeName};
use crate::error::Error;
use crate::runtime::wildcard::GlobPattern;
use crate::runtime::Evaluator;
use crate::traits::EvaluationContext;
use crate::types::Value;

/// Checked in order, so two-character operators win over their prefixes.
const OPERATOR_PREFIXES: [(&str, BinaryOp); 6] = [
    ("<>", BinaryOp::Ne),
    ("<=", BinaryOp::Le),
    ("<", BinaryOp::Lt),
    (">=", BinaryOp::Ge),
    (">", BinaryOp::Gt),
    ("=", BinaryOp::Eq),
];

#[derive(Debug, Clone, PartialEq)]
pub enum CriteriaPredicate {
    Equals(Value),
    Compare { op: BinaryOp, rhs: Expr },
    Glob(GlobPattern),
}

impl CriteriaPredicate {
    pub fn compile(operand: &Value, context: &dyn EvaluationContext) -> Result<Self, Error> {
        let text = match operand {
            Value::String(text) => text,
            other => {
                tracing::trace!(operand = ?other, "criteria compiled as equality");
                return Ok(CriteriaPredicate::Equals(other.clone()));
            }
        };
        for (prefix, op) in OPERATOR_PREFIXES {
            if let Some(rest) = text.strip_prefix(prefix) {
                let rhs = context.parse(rest)?;
                tracing::trace!(criteria = %text, ?op, "criteria compiled as comparison");
                return Ok(CriteriaPredicate::Compare { op, rhs });
            }
        }
        tracing::trace!(criteria = %text, "criteria compiled as glob");
        Ok(CriteriaPredicate::Glob(GlobPattern::new(text, context.case_sensitivity())))
    }

    pub fn test(&self, candidate: &Value, context: &dyn EvaluationContext) -> Result<bool, Error> {
        let outcome = match self {
            CriteriaPredicate::Equals(expected) => {
                Evaluator::binary_op(BinaryOp::Eq, candidate.clone(), expected.clone())?
            }
            CriteriaPredicate::Compare { op, rhs } => {
                let rhs = Evaluator::eval(rhs, context)?;
                Evaluator::binary_op(*op, candidate.clone(), rhs)?
            }
            CriteriaPredicate::Glob(pattern) => {
                return Ok(pattern.matches(&candidate_text(candidate, context)?));
            }
        };
        match context.convert(outcome, &TypeName::Boolean)? {
            Value::Boolean(b) => Ok(b),
            other => Err(Error::new(format!("Criteria produced {}, expected Boolean", other.type_name()), None)),
        }
    }
}

/// Text form used for glob matching, with the locale's decimal separator
/// applied to numbers at any nesting depth.
fn candidate_text(candidate: &Value, context: &dyn EvaluationContext) -> Result<String, Error> {
    if let Value::Array(items) = candidate {
        let parts = items
            .iter()
            .map(|item| candidate_text(item, context))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(format!("[{}]", parts.join(", ")));
    }
    let text = match context.convert(candidate.clone(), &TypeName::String)? {
        Value::String(s) => s,
        other => return Err(Error::new(format!("Cannot render {} as text", other.type_name()), None)),
    };
    let decimal = context.separators().decimal;
    if matches!(candidate, Value::Number(_)) && decimal != '.' {
        return Ok(text.replace('.', &decimal.to_string()));
    }
    Ok(text)
}
