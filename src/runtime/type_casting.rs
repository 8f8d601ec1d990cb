use crate::ast::TypeName;
use crate::error::Error;
use crate::types::Value;

pub fn cast_value(v: Value, ty: &TypeName) -> Result<Value, Error> {
    Ok(match ty {
        TypeName::Float => match v {
            Value::Number(n) => Value::Number(n),
            Value::String(s) => Value::Number(
                s.trim()
                    .parse::<f64>()
                    .map_err(|_| Error::new("Cannot cast String to Float", None))?,
            ),
            Value::Boolean(b) => Value::Number(if b { 1.0 } else { 0.0 }),
            Value::Null => Value::Number(0.0),
            other => return Err(Error::new(format!("Cannot cast {} to Float", other.type_name()), None)),
        },
        TypeName::Integer => match v {
            Value::Number(n) => Value::Number(n.trunc()),
            Value::String(s) => {
                let mut clean_s = String::new();
                let mut has_dot = false;
                for (i, c) in s.trim().chars().enumerate() {
                    if i == 0 && (c == '-' || c == '+') {
                        clean_s.push(c);
                    } else if c.is_ascii_digit() {
                        clean_s.push(c);
                    } else if c == '.' && !has_dot {
                        clean_s.push(c);
                        has_dot = true;
                    } else {
                        break;
                    }
                }
                Value::Number(clean_s.parse::<f64>().unwrap_or(0.0).trunc())
            }
            Value::Boolean(b) => Value::Number(if b { 1.0 } else { 0.0 }),
            Value::Null => Value::Number(0.0),
            other => return Err(Error::new(format!("Cannot cast {} to Integer", other.type_name()), None)),
        },
        TypeName::String => Value::String(display_text(&v)),
        TypeName::Boolean => match v {
            Value::Boolean(b) => Value::Boolean(b),
            Value::Number(n) => Value::Boolean(n != 0.0),
            Value::String(s) => Value::Boolean(!s.trim().is_empty()),
            Value::Array(items) => Value::Boolean(!items.is_empty()),
            Value::Null => Value::Boolean(false),
            Value::Lambda(_) => Value::Boolean(true),
        },
        TypeName::Array => match v {
            Value::Array(items) => Value::Array(items),
            other => Value::Array(vec![other]),
        },
    })
}

fn display_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Boolean(b) => if *b { "TRUE".into() } else { "FALSE".into() },
        Value::Null => String::new(),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(display_text).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Lambda(lambda) => format!("LAMBDA({})", lambda.params.join(", ")),
    }
}
